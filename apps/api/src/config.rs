use anyhow::{Context, Result};

const DEFAULT_RAPIDAPI_HOST: &str = "linkedin-scraper-api-real-time-fast-affordable.p.rapidapi.com";
const DEFAULT_HUMANIZER_URL: &str =
    "https://primary-production-37efc.up.railway.app/webhook/humanizer";

/// Application configuration loaded from environment variables.
/// Only the LLM keys are checked at startup: at least one provider must be configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ai_provider: String,
    pub anthropic_model: String,
    pub openai_model: String,
    pub gemini_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub llm_base_url: Option<String>,

    pub data_source: String,
    pub rapidapi_key: Option<String>,
    pub rapidapi_host: String,
    pub rapidapi_base_url: String,

    pub humanizer_user: Option<String>,
    pub humanizer_password: Option<String>,
    pub humanizer_url: String,

    pub profiles_dir: String,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub profile_cache_days: u64,
    pub post_cache_hours: u64,

    pub max_posts_fetch: usize,
    pub max_comments_analyze: usize,
    pub recent_post_days: i64,
    pub comment_variations: usize,

    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let rapidapi_host = env_or("RAPIDAPI_HOST", DEFAULT_RAPIDAPI_HOST);
        let config = Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            ai_provider: env_or("AI_PROVIDER", "anthropic"),
            anthropic_model: env_or("ANTHROPIC_MODEL", "claude-sonnet-4-5"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.0-flash-exp"),
            max_tokens: parse_env("MAX_TOKENS", 3000)?,
            temperature: parse_env("TEMPERATURE", 0.7)?,
            llm_base_url: optional_env("LLM_BASE_URL"),

            data_source: env_or("DATA_SOURCE", "mock"),
            rapidapi_key: optional_env("RAPIDAPI_KEY"),
            rapidapi_base_url: env_or("RAPIDAPI_BASE_URL", &format!("https://{rapidapi_host}")),
            rapidapi_host,

            humanizer_user: optional_env("HUMANIZER_BOT_AUTH_USER"),
            humanizer_password: optional_env("HUMANIZER_BOT_AUTH_PASSWORD"),
            humanizer_url: env_or("HUMANIZER_API_URL", DEFAULT_HUMANIZER_URL),

            profiles_dir: env_or("PROFILES_DIR", "user_profiles"),
            database_url: optional_env("DATABASE_URL"),
            redis_url: optional_env("REDIS_URL"),
            profile_cache_days: parse_env("PROFILE_CACHE_DAYS", 7)?,
            post_cache_hours: parse_env("POST_CACHE_HOURS", 24)?,

            max_posts_fetch: parse_env("MAX_POSTS_FETCH", 30)?,
            max_comments_analyze: parse_env("MAX_COMMENTS_ANALYZE", 50)?,
            recent_post_days: parse_env("RECENT_POST_DAYS", 30)?,
            comment_variations: parse_env("COMMENT_VARIATIONS", 3)?,

            port: parse_env("PORT", 8000).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        };

        if !config.has_any_llm_key() {
            anyhow::bail!(
                "No LLM provider configured. Set at least one of ANTHROPIC_API_KEY, OPENAI_API_KEY or GEMINI_API_KEY"
            );
        }

        Ok(config)
    }

    pub fn has_any_llm_key(&self) -> bool {
        self.anthropic_api_key.is_some()
            || self.openai_api_key.is_some()
            || self.gemini_api_key.is_some()
    }

    pub fn humanizer_enabled(&self) -> bool {
        self.humanizer_user.is_some() && self.humanizer_password.is_some()
    }
}

#[cfg(test)]
impl Config {
    /// Baseline config for tests: mock data, in-memory store, a fake Anthropic key.
    pub fn for_tests(profiles_dir: &str) -> Self {
        Config {
            anthropic_api_key: Some("test-key".to_string()),
            openai_api_key: None,
            gemini_api_key: None,
            ai_provider: "anthropic".to_string(),
            anthropic_model: "claude-sonnet-4-5".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            gemini_model: "gemini-2.0-flash-exp".to_string(),
            max_tokens: 3000,
            temperature: 0.7,
            llm_base_url: None,
            data_source: "mock".to_string(),
            rapidapi_key: None,
            rapidapi_host: DEFAULT_RAPIDAPI_HOST.to_string(),
            rapidapi_base_url: format!("https://{DEFAULT_RAPIDAPI_HOST}"),
            humanizer_user: None,
            humanizer_password: None,
            humanizer_url: DEFAULT_HUMANIZER_URL.to_string(),
            profiles_dir: profiles_dir.to_string(),
            database_url: None,
            redis_url: None,
            profile_cache_days: 7,
            post_cache_hours: 24,
            max_posts_fetch: 30,
            max_comments_analyze: 50,
            recent_post_days: 30,
            comment_variations: 3,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

/// Reads an env var, treating empty strings and the `.env.example` placeholders as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.starts_with("your-"))
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
