/// LLM client: the single point of entry for all model calls in the service.
///
/// ARCHITECTURAL RULE: No other module may call a vendor API directly.
/// All LLM interactions MUST go through this module.
///
/// The provider is picked once at startup from the configured preference and
/// the keys that are actually present (see `LlmClient::from_config`).
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod json_repair;
pub mod prompts;
pub mod providers;

pub use json_repair::repair_json;
pub use providers::Provider;

use providers::{
    AnthropicRequest, AnthropicResponse, ChatMessage, GeminiContent, GeminiGenerationConfig,
    GeminiPart, GeminiRequest, GeminiResponse, OpenAiRequest, OpenAiResponse, VendorError,
};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No LLM provider has an API key configured")]
    NoProvider,
}

/// Vendor-neutral result of a completion call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The single LLM client used by all services.
/// Wraps one vendor API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: Provider,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    /// Replaces the vendor host, e.g. for a gateway speaking the same API.
    base_url: Option<String>,
    /// First retry delay; each further retry doubles it.
    retry_backoff: Duration,
}

impl LlmClient {
    pub fn new(provider: Provider, api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            provider,
            api_key,
            model,
            max_tokens: 3000,
            temperature: 0.7,
            base_url: None,
            retry_backoff: RETRY_BACKOFF,
        }
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Picks the preferred provider if its key is set, otherwise the first of
    /// anthropic → openai → gemini that has one.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let preferred = match config.ai_provider.parse::<Provider>() {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("{e}, falling back to the default provider order");
                None
            }
        };

        let chain = preferred
            .into_iter()
            .chain(Provider::FALLBACK_ORDER)
            .collect::<Vec<_>>();

        for provider in chain {
            let (key, model) = match provider {
                Provider::Anthropic => (&config.anthropic_api_key, &config.anthropic_model),
                Provider::OpenAi => (&config.openai_api_key, &config.openai_model),
                Provider::Gemini => (&config.gemini_api_key, &config.gemini_model),
            };
            if let Some(key) = key {
                if Some(provider) != preferred {
                    warn!(
                        "Preferred provider '{}' has no key, using {provider}",
                        config.ai_provider
                    );
                }
                info!("LLM provider: {provider} ({model})");
                let client = Self::new(provider, key.clone(), model.clone())
                    .with_limits(config.max_tokens, config.temperature);
                return Ok(match &config.llm_base_url {
                    Some(url) => client.with_base_url(url.clone()),
                    None => client,
                });
            }
        }

        Err(LlmError::NoProvider)
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        match (self.provider, self.base_url.as_deref()) {
            (Provider::Anthropic, None) => providers::ANTHROPIC_API_URL.to_string(),
            (Provider::Anthropic, Some(base)) => format!("{base}/v1/messages"),
            (Provider::OpenAi, None) => providers::OPENAI_API_URL.to_string(),
            (Provider::OpenAi, Some(base)) => format!("{base}/v1/chat/completions"),
            (Provider::Gemini, base) => format!(
                "{}/v1beta/models/{}:generateContent",
                base.unwrap_or(providers::GEMINI_API_HOST),
                self.model
            ),
        }
    }

    fn build_request(&self, prompt: &str, system: &str) -> RequestBuilder {
        let messages = |with_system: bool| {
            let mut m = Vec::with_capacity(2);
            if with_system {
                m.push(ChatMessage {
                    role: "system",
                    content: system,
                });
            }
            m.push(ChatMessage {
                role: "user",
                content: prompt,
            });
            m
        };

        match self.provider {
            Provider::Anthropic => self
                .client
                .post(self.endpoint())
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", providers::ANTHROPIC_VERSION)
                .json(&AnthropicRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    system,
                    messages: messages(false),
                }),
            Provider::OpenAi => self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.api_key)
                .json(&OpenAiRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    messages: messages(true),
                }),
            Provider::Gemini => self
                .client
                .post(self.endpoint())
                .query(&[("key", self.api_key.as_str())])
                .json(&GeminiRequest {
                    system_instruction: GeminiContent {
                        role: None,
                        parts: vec![GeminiPart { text: system }],
                    },
                    contents: vec![GeminiContent {
                        role: Some("user"),
                        parts: vec![GeminiPart { text: prompt }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        max_output_tokens: self.max_tokens,
                        temperature: self.temperature,
                    },
                }),
        }
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<LlmResponse, LlmError> {
        match self.provider {
            Provider::Anthropic => response.json::<AnthropicResponse>().await?.try_into(),
            Provider::OpenAi => response.json::<OpenAiResponse>().await?.try_into(),
            Provider::Gemini => response.json::<GeminiResponse>().await?.try_into(),
        }
    }

    /// Makes a raw call to the active provider.
    /// Retries up to `MAX_RETRIES` times on 429 (rate limit), 5xx and transport
    /// errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = self.retry_backoff * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.build_request(prompt, system).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("{} API returned {}: {}", self.provider, status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<VendorError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response = self.parse_response(response).await?;

            debug!(
                "LLM call succeeded: provider={}, input_tokens={}, output_tokens={}",
                self.provider, llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the LLM and deserializes the text response as JSON, repairing
    /// fences, surrounding prose and truncation first.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        if response.text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        let repaired = repair_json(&response.text);
        serde_json::from_str(&repaired).map_err(LlmError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::StatusCode;

    use super::*;

    /// Serves an OpenAI-style endpoint that always answers `status`, counting hits.
    async fn fixed_status_server(status: StatusCode) -> (SocketAddr, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = axum::Router::new().route(
            "/v1/chat/completions",
            axum::routing::post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (addr, hits)
    }

    fn client_for(addr: SocketAddr) -> LlmClient {
        LlmClient::new(Provider::OpenAi, "sk".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(format!("http://{addr}"))
            .with_retry_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_three_times() {
        let (addr, hits) = fixed_status_server(StatusCode::TOO_MANY_REQUESTS).await;
        let err = client_for(addr).call("hi", "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, .. }), "got {err}");
        assert_eq!(hits.load(Ordering::SeqCst), 1 + MAX_RETRIES as usize);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (addr, hits) = fixed_status_server(StatusCode::BAD_REQUEST).await;
        let err = client_for(addr).call("hi", "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 400, .. }), "got {err}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preferred_provider_with_key_wins() {
        let mut config = Config::for_tests("profiles");
        config.openai_api_key = Some("sk-test".to_string());
        config.ai_provider = "openai".to_string();
        let client = LlmClient::from_config(&config).unwrap();
        assert_eq!(client.provider(), Provider::OpenAi);
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_falls_back_when_preferred_has_no_key() {
        let mut config = Config::for_tests("profiles");
        config.ai_provider = "gemini".to_string();
        let client = LlmClient::from_config(&config).unwrap();
        assert_eq!(client.provider(), Provider::Anthropic);
    }

    #[test]
    fn test_fallback_order_skips_missing_keys() {
        let mut config = Config::for_tests("profiles");
        config.anthropic_api_key = None;
        config.gemini_api_key = Some("g".to_string());
        config.ai_provider = "nonsense".to_string();
        let client = LlmClient::from_config(&config).unwrap();
        assert_eq!(client.provider(), Provider::Gemini);
    }

    #[test]
    fn test_no_keys_is_an_error() {
        let mut config = Config::for_tests("profiles");
        config.anthropic_api_key = None;
        assert!(matches!(LlmClient::from_config(&config), Err(LlmError::NoProvider)));
    }

    #[test]
    fn test_gemini_request_targets_model_endpoint() {
        let client = LlmClient::new(Provider::Gemini, "k".to_string(), "gemini-pro".to_string());
        let request = client.build_request("hi", "sys").build().unwrap();
        assert_eq!(request.url().path(), "/v1beta/models/gemini-pro:generateContent");
        assert_eq!(request.url().query(), Some("key=k"));
    }

    #[test]
    fn test_openai_request_uses_bearer_auth() {
        let client = LlmClient::new(Provider::OpenAi, "sk".to_string(), "gpt-4o-mini".to_string());
        let request = client.build_request("hi", "sys").build().unwrap();
        assert_eq!(
            request.headers().get("authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer sk")
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = LlmClient::new(Provider::Anthropic, "k".to_string(), "m".to_string())
            .with_base_url("http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/messages");

        let client = LlmClient::new(Provider::Gemini, "k".to_string(), "g".to_string())
            .with_base_url("http://gw");
        assert_eq!(client.endpoint(), "http://gw/v1beta/models/g:generateContent");
    }
}
