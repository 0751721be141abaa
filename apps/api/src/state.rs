use std::sync::Arc;

use crate::config::Config;
use crate::linkedin::{LinkedInService, ProfileStore};
use crate::llm_client::LlmClient;
use crate::paraphrase::ParaphraseClient;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users, targets, posts and generated comments. Postgres or in-memory.
    pub store: Arc<dyn Store>,
    pub llm: LlmClient,
    /// Target profiles, posts and post comments, cached in Redis when configured.
    pub linkedin: LinkedInService,
    /// JSON voice profiles under `PROFILES_DIR`.
    pub profiles: ProfileStore,
    pub paraphrase: ParaphraseClient,
    pub config: Config,
}
