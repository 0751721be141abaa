//! Comment generation: orchestrates the full pipeline for one post.
//!
//! Flow: detect sentiment → pick angle → build prompts → LLM call_json →
//!       per comment: paraphrase → humanize → validate.
//!
//! An LLM failure, an unparseable answer or an empty comment list never
//! fails the request; the caller gets fallback comments built from the post's
//! response angles instead.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generation::angles::{detect_sentiment, select_best_angle};
use crate::generation::prompts::{build_generation_prompt, build_system_prompt, PromptInputs};
use crate::generation::validation::{validate_comment, ValidationReport};
use crate::humanizer::Humanizer;
use crate::llm_client::LlmClient;
use crate::paraphrase::ParaphraseClient;
use crate::voice::{PostContext, TargetInsights, VoiceProfile};

const DEFAULT_CONFIDENCE: f64 = 0.85;
const FALLBACK_CONFIDENCE: f64 = 0.70;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A finished comment, ready to show the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedComment {
    pub text: String,
    /// 1-based position among the variations.
    pub variation: u32,
    pub confidence: f64,
    pub approach: String,
    pub validation: ValidationReport,
}

/// Shape the model is asked to return.
#[derive(Debug, Default, Deserialize)]
struct RawComments {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    text: String,
    confidence: Option<f64>,
    approach: Option<String>,
}

/// Inputs for one generation run.
pub struct GenerationRequest<'a> {
    pub profile: &'a VoiceProfile,
    pub target: &'a TargetInsights,
    pub post: &'a PostContext,
    pub post_content: &'a str,
    pub variations: usize,
    /// Seeds the humanizer; `None` draws from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub comments: Vec<GeneratedComment>,
    pub sentiment: String,
    pub angle: String,
    pub used_fallback: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_comments(
    llm: &LlmClient,
    paraphrase: &ParaphraseClient,
    request: GenerationRequest<'_>,
) -> GenerationOutcome {
    let sentiment = detect_sentiment(request.post_content);
    let angle = select_best_angle(sentiment, request.post);
    info!(
        "Generating {} comments: sentiment={sentiment}, angle={angle}, examples={}, connectives={}",
        request.variations,
        request.profile.real_comment_examples.len(),
        request.profile.common_connectives.len()
    );

    let system = build_system_prompt(request.profile);
    let prompt = build_generation_prompt(&PromptInputs {
        profile: request.profile,
        target: request.target,
        post: request.post,
        post_content: request.post_content,
        sentiment,
        angle,
        variations: request.variations.max(1),
    });

    let raw = match llm.call_json::<RawComments>(&prompt, &system).await {
        Ok(raw) => raw.comments,
        Err(e) => {
            warn!("Comment generation failed, using fallback comments: {e}");
            Vec::new()
        }
    };

    let mut humanizer = match request.seed {
        Some(seed) => Humanizer::with_seed(seed),
        None => Humanizer::new(),
    };
    let hints = request.profile.style_hints();

    let candidates: Vec<RawComment> = raw
        .into_iter()
        .filter(|c| !c.text.trim().is_empty())
        .collect();
    let texts: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
    let paraphrased = paraphrase.paraphrase_batch(&texts).await;

    let mut comments = Vec::new();
    for (candidate, paraphrased) in candidates.into_iter().zip(paraphrased) {
        let variation = comments.len() as u32 + 1;
        let text = humanizer.humanize(&paraphrased, &hints);
        let validation = validate_comment(&text, request.profile);
        if !validation.valid {
            warn!("Comment {variation} validation issues: {:?}", validation.issues);
        }

        comments.push(GeneratedComment {
            text,
            variation,
            confidence: candidate
                .confidence
                .filter(|c| c.is_finite())
                .unwrap_or(DEFAULT_CONFIDENCE)
                .clamp(0.0, 1.0),
            approach: candidate
                .approach
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "authentic".to_string()),
            validation,
        });
    }

    let used_fallback = comments.is_empty();
    if used_fallback {
        warn!("No usable comments generated, using fallback");
        comments = fallback_comments(request.profile, request.post);
    } else {
        info!("Generated {} comments", comments.len());
    }

    GenerationOutcome {
        comments,
        sentiment: sentiment.to_string(),
        angle: angle.to_string(),
        used_fallback,
    }
}

/// Three short comments built from the post's response angles.
pub fn fallback_comments(profile: &VoiceProfile, post: &PostContext) -> Vec<GeneratedComment> {
    const OPENERS: [(&str, &str); 3] = [
        ("this resonates.", "curious to hear more"),
        ("interesting perspective.", "makes me think"),
        ("good point.", "gonna reflect on this"),
    ];

    OPENERS
        .iter()
        .enumerate()
        .map(|(i, (opener, default_tail))| {
            let tail = post
                .best_response_angles
                .get(i)
                .map(String::as_str)
                .unwrap_or(*default_tail);
            let text = format!("{opener} {tail}");
            GeneratedComment {
                validation: validate_comment(&text, profile),
                text,
                variation: i as u32 + 1,
                confidence: FALLBACK_CONFIDENCE,
                approach: format!("fallback_{}", i + 1),
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Provider;

    #[test]
    fn test_fallback_uses_response_angles() {
        let post = PostContext {
            best_response_angles: vec!["share perspective".to_string(), "ask question".to_string()],
            ..PostContext::default()
        };
        let comments = fallback_comments(&VoiceProfile::default(), &post);
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].text, "this resonates. share perspective");
        assert_eq!(comments[1].text, "interesting perspective. ask question");
        assert_eq!(comments[2].text, "good point. gonna reflect on this");
        assert_eq!(comments[2].approach, "fallback_3");
        assert_eq!(comments[0].variation, 1);
        assert!((comments[0].confidence - 0.70).abs() < f64::EPSILON);
    }

    #[test]
    fn test_raw_comments_tolerates_missing_fields() {
        let raw: RawComments =
            serde_json::from_str(r#"{"comments":[{"text":"hi"},{"approach":"x"}]}"#).unwrap();
        assert_eq!(raw.comments.len(), 2);
        assert!(raw.comments[0].confidence.is_none());
        assert!(raw.comments[1].text.is_empty());

        let empty: RawComments = serde_json::from_str("{}").unwrap();
        assert!(empty.comments.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_llm_degrades_to_fallback() {
        // Port 9 (discard) is closed on test hosts, so every attempt fails fast.
        let llm = LlmClient::new(Provider::OpenAi, "key".to_string(), "m".to_string())
            .with_base_url("http://127.0.0.1:9")
            .with_retry_backoff(std::time::Duration::from_millis(1));
        let paraphrase = ParaphraseClient::new("http://127.0.0.1:9".to_string(), None, None);
        let outcome = generate_comments(
            &llm,
            &paraphrase,
            GenerationRequest {
                profile: &VoiceProfile::default(),
                target: &TargetInsights::fallback(),
                post: &PostContext::default(),
                post_content: "Thrilled to announce we launched",
                variations: 3,
                seed: Some(7),
            },
        )
        .await;

        assert!(outcome.used_fallback);
        assert_eq!(outcome.comments.len(), 3);
        assert_eq!(outcome.sentiment, "celebration_win");
        assert_eq!(outcome.angle, "INEVITABLE_NOT_SURPRISING");
    }
}
