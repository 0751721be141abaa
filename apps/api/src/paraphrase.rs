//! Client for the external humanizer webhook.
//!
//! The webhook paraphrases a comment before the local pipeline runs. It is an
//! optional extra: every failure path returns the input text untouched.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::llm_client::prompts::truncate_chars;

const PARAPHRASE_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct ParaphraseClient {
    client: Client,
    url: String,
    credentials: Option<(String, String)>,
}

impl ParaphraseClient {
    pub fn new(url: String, user: Option<String>, password: Option<String>) -> Self {
        let credentials = match (user, password) {
            (Some(u), Some(p)) => Some((u, p)),
            _ => None,
        };
        if credentials.is_some() {
            info!("Humanizer webhook enabled");
        } else {
            warn!("Humanizer webhook disabled (HUMANIZER_BOT_AUTH_USER or HUMANIZER_BOT_AUTH_PASSWORD missing)");
        }

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(PARAPHRASE_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            url,
            credentials,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.humanizer_url.clone(),
            config.humanizer_user.clone(),
            config.humanizer_password.clone(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Paraphrases `text`, or returns it unchanged if the webhook is disabled,
    /// fails, or answers with nothing new.
    pub async fn paraphrase(&self, text: &str) -> String {
        let Some((user, password)) = &self.credentials else {
            debug!("Humanizer webhook disabled, returning original");
            return text.to_string();
        };
        if text.trim().is_empty() {
            warn!("Empty text provided for paraphrasing");
            return text.to_string();
        }

        let response = self
            .client
            .post(&self.url)
            .basic_auth(user, Some(password))
            .json(&json!({ "content": text }))
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("Humanizer webhook timed out, returning original");
                return text.to_string();
            }
            Err(e) => {
                error!("Humanizer webhook request failed: {e}");
                return text.to_string();
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            match status {
                StatusCode::UNAUTHORIZED => {
                    error!("Humanizer webhook rejected credentials")
                }
                StatusCode::TOO_MANY_REQUESTS => warn!("Humanizer webhook rate limited"),
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    warn!("Humanizer webhook returned {status}: {}", truncate_chars(&body, 200));
                }
            }
            return text.to_string();
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("Humanizer webhook returned invalid JSON: {e}");
                return text.to_string();
            }
        };

        match extract_output(&body) {
            Some(out) if out != text.trim() => {
                debug!("Paraphrased: {}", truncate_chars(&out, 60));
                out
            }
            _ => {
                warn!("No paraphrased output in webhook response, returning original");
                text.to_string()
            }
        }
    }

    /// Paraphrases each text in turn. The result lines up with `texts`.
    pub async fn paraphrase_batch(&self, texts: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            debug!("Paraphrasing {}/{}", i + 1, texts.len());
            out.push(self.paraphrase(text).await);
        }
        out
    }

    /// Sends a fixed sentence through the webhook and reports whether it came back changed.
    pub async fn test_connection(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let probe = "This is a test message to check the connection.";
        self.paraphrase(probe).await != probe
    }
}

/// Pulls the paraphrased text out of the webhook's response.
/// Accepts `[{"output": ..}]`, `["..."]` and `{"output"|"content": ..}`.
fn extract_output(body: &Value) -> Option<String> {
    let candidate = match body {
        Value::Array(items) => match items.first()? {
            Value::Object(obj) => obj.get("output")?.as_str(),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        },
        Value::Object(obj) => obj
            .get("output")
            .and_then(Value::as_str)
            .or_else(|| obj.get("content").and_then(Value::as_str)),
        _ => None,
    }?;

    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
