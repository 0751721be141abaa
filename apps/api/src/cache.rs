use std::time::Duration;

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "voice";

/// Redis-backed TTL cache for fetched LinkedIn data.
/// Cache errors are logged and treated as misses; they never fail a request.
#[derive(Clone)]
pub struct FetchCache {
    conn: ConnectionManager,
    profile_ttl: Duration,
    posts_ttl: Duration,
}

impl FetchCache {
    pub async fn connect(redis_url: &str, profile_ttl: Duration, posts_ttl: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("invalid REDIS_URL")?;
        let conn = client
            .get_connection_manager()
            .await
            .context("cannot connect to Redis")?;
        info!("Redis fetch cache connected");
        Ok(Self {
            conn,
            profile_ttl,
            posts_ttl,
        })
    }

    pub fn profile_ttl(&self) -> Duration {
        self.profile_ttl
    }

    pub fn posts_ttl(&self) -> Duration {
        self.posts_ttl
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Redis GET {key} failed: {e}");
                return None;
            }
        };
        let value = raw.and_then(|s| serde_json::from_str(&s).ok());
        debug!("cache {} for {key}", if value.is_some() { "hit" } else { "miss" });
        value
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let body = match serde_json::to_string(value) {
            Ok(body) => body,
            Err(e) => {
                warn!("Cannot serialize cache entry {key}: {e}");
                return;
            }
        };
        let mut conn = self.conn.clone();
        let result: redis::RedisResult<()> = conn.set_ex(key, body, ttl.as_secs().max(1)).await;
        if let Err(e) = result {
            warn!("Redis SETEX {key} failed: {e}");
        }
    }
}

/// Builds a namespaced cache key, e.g. `voice:posts:jane-doe:30`.
pub fn cache_key(kind: &str, parts: &[&str]) -> String {
    let mut key = format!("{KEY_PREFIX}:{kind}");
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}
