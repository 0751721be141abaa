mod cache;
mod config;
mod db;
mod errors;
mod generation;
mod humanizer;
mod linkedin;
mod llm_client;
mod models;
mod paraphrase;
mod routes;
mod state;
mod store;
mod voice;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::FetchCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::linkedin::{LinkedInService, ProfileStore};
use crate::llm_client::LlmClient;
use crate::paraphrase::ParaphraseClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails when no LLM provider key is set)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting voice API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: PostgreSQL when configured, in-memory otherwise
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    // Optional Redis cache for fetched LinkedIn data
    let cache = match &config.redis_url {
        Some(url) => {
            let profile_ttl = Duration::from_secs(config.profile_cache_days * 24 * 3600);
            let posts_ttl = Duration::from_secs(config.post_cache_hours * 3600);
            match FetchCache::connect(url, profile_ttl, posts_ttl).await {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!("Fetch cache disabled: {e:#}");
                    None
                }
            }
        }
        None => None,
    };

    let linkedin = LinkedInService::from_config(&config, cache);
    info!("LinkedIn data source: {}", linkedin.source_name());

    let profiles = ProfileStore::open(&config.profiles_dir)
        .await
        .context("opening the profiles directory")?;

    let llm = LlmClient::from_config(&config).context("initializing the LLM client")?;
    info!("LLM client initialized ({}: {})", llm.provider(), llm.model());

    let paraphrase = ParaphraseClient::from_config(&config);
    if config.humanizer_enabled() {
        info!("Paraphrase webhook enabled");
    } else {
        info!("Paraphrase webhook disabled (no credentials)");
    }

    let state = AppState {
        store,
        llm,
        linkedin,
        profiles,
        paraphrase,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
