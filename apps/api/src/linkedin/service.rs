use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{cache_key, FetchCache};
use crate::config::Config;
use crate::linkedin::mock::MockSource;
use crate::linkedin::rapidapi::RapidApiSource;
use crate::linkedin::source::{PostBatch, PostComment, Profile, ProfileSource};
use crate::linkedin::username::extract_username;

/// Routes LinkedIn lookups to the configured source, with an optional Redis cache in front.
#[derive(Clone)]
pub struct LinkedInService {
    source: Arc<dyn ProfileSource>,
    cache: Option<FetchCache>,
}

impl LinkedInService {
    pub fn new(source: Arc<dyn ProfileSource>, cache: Option<FetchCache>) -> Self {
        Self { source, cache }
    }

    /// `DATA_SOURCE=rapidapi` needs `RAPIDAPI_KEY`; anything else (or a missing key) uses mock data.
    pub fn from_config(config: &Config, cache: Option<FetchCache>) -> Self {
        let source: Arc<dyn ProfileSource> = match (config.data_source.as_str(), &config.rapidapi_key) {
            ("rapidapi", Some(key)) => {
                info!("Using LinkedIn scraper API ({})", config.rapidapi_host);
                Arc::new(RapidApiSource::new(
                    key.clone(),
                    config.rapidapi_host.clone(),
                    config.rapidapi_base_url.clone(),
                ))
            }
            ("rapidapi", None) => {
                warn!("DATA_SOURCE=rapidapi but RAPIDAPI_KEY is not set, using mock data");
                Arc::new(MockSource::new())
            }
            _ => {
                info!("Using mock LinkedIn data");
                Arc::new(MockSource::new())
            }
        };
        Self::new(source, cache)
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Target profiles always come from the source (never from the JSON profile store).
    pub async fn get_target_profile(&self, linkedin_url: &str) -> Profile {
        let key = cache_key("profile", &[self.source.name(), &extract_username(linkedin_url)]);
        if let Some(cache) = &self.cache {
            if let Some(profile) = cache.get::<Profile>(&key).await {
                return profile;
            }
        }

        let profile = self.source.fetch_profile(linkedin_url).await;
        if let Some(cache) = &self.cache {
            if !profile.is_empty() {
                cache.put(&key, &profile, cache.profile_ttl()).await;
            }
        }
        profile
    }

    pub async fn get_target_posts(&self, linkedin_url: &str, max_posts: usize, max_days: i64) -> PostBatch {
        let key = cache_key(
            "posts",
            &[
                self.source.name(),
                &extract_username(linkedin_url),
                &max_days.to_string(),
                &max_posts.to_string(),
            ],
        );
        if let Some(cache) = &self.cache {
            if let Some(batch) = cache.get::<PostBatch>(&key).await {
                return batch;
            }
        }

        let batch = self.source.fetch_posts(linkedin_url, max_posts, max_days).await;
        if let Some(cache) = &self.cache {
            if batch.has_recent_posts {
                cache.put(&key, &batch, cache.posts_ttl()).await;
            }
        }
        batch
    }

    pub async fn get_post_comments(&self, post_id: &str, max_comments: usize) -> Vec<PostComment> {
        self.source.fetch_post_comments(post_id, max_comments).await
    }
}
