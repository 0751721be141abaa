//! Voice, target and post analysis.
//!
//! Each analysis asks the LLM for a JSON record and degrades to a
//! deterministic default when the call or the parse fails, so a flaky model
//! never fails a request.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::humanizer::LengthRange;
use crate::linkedin::profile_store::stored_comment_samples;
use crate::linkedin::{PostComment, Profile};
use crate::llm_client::prompts::{truncate_chars, KEEP_JSON_SHORT};
use crate::llm_client::LlmClient;
use crate::voice::facts::{
    extract_post_facts, extract_target_facts, fallback_post_context, format_experience,
};
use crate::voice::models::{
    number, string_list, text, PostContext, TargetInsights, VoiceInsights, VoiceProfile,
};
use crate::voice::prompts::{ANALYSIS_SYSTEM, POST_PROMPT, TARGET_PROMPT, USER_VOICE_PROMPT};

const MAX_COMMENTS_FOR_VOICE: usize = 8;
const MAX_COMMENTS_FOR_POST: usize = 10;

/// Top-level sections that mark a full voice fingerprint file.
const RICH_SECTIONS: &[&str] = &[
    "basic_info",
    "core_voice_fingerprint",
    "rhythm_metrics",
    "generation_recipe",
    "real_comment_examples",
];

// ────────────────────────────────────────────────────────────────────────────
// User voice
// ────────────────────────────────────────────────────────────────────────────

/// Builds the user's voice profile from the stored JSON and their real comments.
pub async fn analyze_user_writing_style(
    llm: &LlmClient,
    stored: &Value,
    comments: &[String],
) -> VoiceProfile {
    if !stored.is_object() {
        warn!("Stored profile is not a JSON object, using default voice profile");
        return VoiceProfile::default();
    }

    let profile = load_voice_profile(stored);
    let insights = ask_voice_insights(llm, &profile, comments).await;
    let profile = merge_insights(profile, insights);

    info!(
        "Voice profile ready: archetype={}, length={} words, examples={}, source={}",
        profile.voice_archetype,
        profile.avg_comment_length,
        profile.real_comment_examples.len(),
        profile.profile_source
    );
    profile
}

async fn ask_voice_insights(
    llm: &LlmClient,
    profile: &VoiceProfile,
    comments: &[String],
) -> VoiceInsights {
    let comments: Vec<&String> = comments
        .iter()
        .filter(|c| !c.trim().is_empty())
        .take(MAX_COMMENTS_FOR_VOICE)
        .collect();
    if comments.is_empty() {
        info!("No comments to analyze, using stored profile only");
        return VoiceInsights::default();
    }

    let existing = if profile.profile_source == "default" {
        "None - perform full analysis".to_string()
    } else {
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string())
    };
    let numbered = comments
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. \"{}\"", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = USER_VOICE_PROMPT
        .replace("{existing_profile}", &existing)
        .replace("{comments}", &numbered);

    match llm.call_json::<VoiceInsights>(&prompt, ANALYSIS_SYSTEM).await {
        Ok(insights) => {
            info!("LLM found {} voice patterns", insights.discovered_patterns.len());
            insights
        }
        Err(e) => {
            warn!("Voice analysis failed, keeping stored profile: {e}");
            VoiceInsights::default()
        }
    }
}

fn stored_has_rich_sections(stored: &Value) -> bool {
    stored
        .as_object()
        .map(|obj| RICH_SECTIONS.iter().any(|k| obj.contains_key(*k)))
        .unwrap_or(false)
}

/// Reads every voice field a stored profile carries, with defaults for the rest.
///
/// Full fingerprint files (`basic_info`, `rhythm_metrics`, ...) are read section
/// by section; simpler files may only carry a flat `writing_style` block.
pub fn load_voice_profile(stored: &Value) -> VoiceProfile {
    let mut profile = VoiceProfile {
        name: text(&stored["basic_info"]["name"], ""),
        real_comment_examples: stored_comment_samples(stored),
        expertise_areas: string_list(&stored["professional"]["expertise_areas"]),
        experience: experience_lines(&stored["professional"]["experience"]),
        ..VoiceProfile::default()
    };

    if stored_has_rich_sections(stored) {
        apply_fingerprint(&mut profile, stored);
        profile.confidence = 0.9;
        profile.profile_source = "json_profile".to_string();
    } else if stored["writing_style"].is_object() {
        apply_writing_style(&mut profile, &stored["writing_style"]);
        profile.profile_source = "writing_style".to_string();
    }
    profile
}

fn apply_fingerprint(profile: &mut VoiceProfile, stored: &Value) {
    let basic = &stored["basic_info"];
    let core = &stored["core_voice_fingerprint"];
    let rhythm = &stored["rhythm_metrics"];
    let punctuation = &stored["punctuation_profile"];

    profile.voice_archetype = text(&basic["voice_archetype"], "professional");
    profile.confidence_level = text(&basic["confidence_level"], "moderate");
    profile.tone = text(&core["tone"], "professional");
    profile.formality_score = number(&core["formality_score"], 0.5);
    profile.emoji_usage = text(
        if core["emoji_usage"].is_string() { &core["emoji_usage"] } else { &stored["emoji_usage"] },
        "none",
    );

    let sentence_length = &rhythm["sentence_length_mean_words"];
    profile.avg_comment_length = word_count(&sentence_length["target"], 50.0);
    let min = word_count(&sentence_length["min"], 35.0);
    let max = word_count(&sentence_length["max"], 65.0);
    profile.length_range = (min <= max).then_some(LengthRange { min, max });
    profile.sentence_count_typical =
        number(&rhythm["sentence_count_distribution"]["mode"], 1.0).max(1.0) as u32;
    profile.burstiness_level = text(&rhythm["burstiness_level"], "moderate");

    if stored["generation_recipe"].is_object() {
        profile.generation_recipe = stored["generation_recipe"].clone();
    }

    profile.connective_density = number(&stored["connective_density"], 0.15);
    profile.common_connectives = string_list(&stored["common_connectives"]);
    if profile.common_connectives.is_empty() {
        profile.common_connectives = string_list(
            &stored["cohesion_signature"]["discourse_marker_variety"]["common_markers"],
        );
    }
    profile.common_phrases = string_list(&stored["common_phrases"]);
    profile.typical_comment_openings = string_list(&stored["typical_comment_openings"]);

    profile.question_marks = count(&stored["question_marks"], &punctuation["question_marks"]);
    profile.exclamation_marks =
        count(&stored["exclamation_marks"], &punctuation["exclamation_marks"]);
    profile.comma_density_max = number(&stored["comma_density_max"], 0.02);

    profile.personality_traits = string_list(&stored["personality_traits"]);
    if stored["lexical_density"].is_object() {
        profile.lexical_density = stored["lexical_density"].clone();
    }
}

fn apply_writing_style(profile: &mut VoiceProfile, style: &Value) {
    profile.tone = text(&style["tone"], &profile.tone);
    profile.formality_score = number(&style["formality_score"], profile.formality_score);
    profile.avg_comment_length =
        word_count(&style["avg_comment_length"], profile.avg_comment_length as f64);
    profile.emoji_usage = text(&style["emoji_usage"], &profile.emoji_usage);
    profile.common_phrases = string_list(&style["common_phrases"]);
    profile.typical_comment_openings = string_list(&style["typical_comment_openings"]);
    profile.personality_traits = string_list(&style["personality_traits"]);
}

/// Adds the LLM's observations on top of the stored profile.
pub fn merge_insights(mut profile: VoiceProfile, insights: VoiceInsights) -> VoiceProfile {
    if insights.is_empty() {
        return profile;
    }
    profile.llm_discovered_patterns = insights.discovered_patterns;
    if insights.voice_qualities.is_object() {
        profile.voice_qualities = insights.voice_qualities;
    }
    profile.unique_markers = insights.unique_markers;
    profile.confidence = insights.confidence.unwrap_or(0.85).clamp(0.0, 1.0);
    profile.profile_source = if profile.profile_source == "default" {
        "llm".to_string()
    } else {
        format!("{}+llm", profile.profile_source)
    };
    profile
}

fn word_count(value: &Value, default: f64) -> usize {
    number(value, default).round().max(1.0) as usize
}

/// First present count wins; a missing count means "never used".
fn count(primary: &Value, secondary: &Value) -> u32 {
    let raw = if primary.is_null() { secondary } else { primary };
    number(raw, 0.0).max(0.0) as u32
}

fn experience_lines(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(3)
                .filter_map(|e| {
                    let title = e["title"].as_str().unwrap_or_default();
                    let company = e["company"].as_str().unwrap_or_default();
                    if title.is_empty() && company.is_empty() {
                        return None;
                    }
                    let desc = e["description"].as_str().unwrap_or_default();
                    Some(if desc.is_empty() {
                        format!("{title} at {company}")
                    } else {
                        format!("{title} at {company}: {}", truncate_chars(desc, 100))
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Target and post
// ────────────────────────────────────────────────────────────────────────────

pub async fn analyze_target_profile(llm: &LlmClient, target: &Profile) -> TargetInsights {
    let facts = extract_target_facts(target);
    info!("Analyzing target {} ({} facts)", target.name, facts.len());

    let or_na = |s: &str| if s.is_empty() { "N/A".to_string() } else { s.to_string() };
    let prompt = TARGET_PROMPT
        .replace("{name}", if target.name.is_empty() { "Professional" } else { &target.name })
        .replace("{headline}", &or_na(&target.headline))
        .replace("{about}", &or_na(truncate_chars(&target.about, 800)))
        .replace("{experience}", &format_experience(target, 5))
        .replace(
            "{facts}",
            &if facts.is_empty() { "Limited info".to_string() } else { facts.join(", ") },
        );

    match llm.call_json::<TargetInsights>(&prompt, ANALYSIS_SYSTEM).await {
        Ok(insights) => {
            info!(
                "Target analyzed: expertise={}",
                insights.expertise_areas.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
            );
            insights
        }
        Err(e) => {
            warn!("Target analysis failed, using default insights: {e}");
            TargetInsights::fallback()
        }
    }
}

pub async fn analyze_post_context(
    llm: &LlmClient,
    content: &str,
    existing_comments: &[PostComment],
) -> PostContext {
    let facts = extract_post_facts(content);
    info!("Analyzing post ({} facts)", facts.len());

    let comments = existing_comments
        .iter()
        .take(MAX_COMMENTS_FOR_POST)
        .map(|c| format!("• {}", truncate_chars(&c.comment_text, 150)))
        .collect::<Vec<_>>();
    let prompt = POST_PROMPT
        .replace("{content}", truncate_chars(content, 1000))
        .replace(
            "{facts}",
            &if facts.is_empty() { "No specific facts".to_string() } else { facts.join(", ") },
        )
        .replace(
            "{comments}",
            &if comments.is_empty() { "No comments yet".to_string() } else { comments.join("\n") },
        )
        .replace("{facts_json}", &json!(facts).to_string())
        + "\n\n"
        + KEEP_JSON_SHORT;

    match llm.call_json::<PostContext>(&prompt, ANALYSIS_SYSTEM).await {
        Ok(mut context) => {
            if context.extracted_facts.is_empty() {
                context.extracted_facts = facts;
            }
            info!("Post analyzed: type={}, topic={}", context.post_type, context.main_topic);
            context
        }
        Err(e) => {
            warn!("Post analysis failed, using keyword fallback: {e}");
            fallback_post_context(content, facts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint() -> Value {
        json!({
            "basic_info": {"name": "Jane Doe", "voice_archetype": "direct_operator"},
            "core_voice_fingerprint": {"tone": "direct, casual", "formality_score": 0.25},
            "rhythm_metrics": {
                "sentence_length_mean_words": {"target": 53.4, "min": 35, "max": 65},
                "sentence_count_distribution": {"mode": 2},
                "burstiness_level": "high"
            },
            "generation_recipe": {"form": "1 sentence, 45-70 words"},
            "cohesion_signature": {"discourse_marker_variety": {"common_markers": ["and", "so"]}},
            "real_comment_examples": [{"text": "we shipped this in a week and it broke twice"}],
            "punctuation_profile": {"question_marks": 0, "exclamation_marks": 1},
            "professional": {
                "expertise_areas": ["growth"],
                "experience": [{"title": "COO", "company": "Acme"}]
            }
        })
    }

    #[test]
    fn test_load_full_fingerprint() {
        let profile = load_voice_profile(&fingerprint());
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.voice_archetype, "direct_operator");
        assert_eq!(profile.tone, "direct, casual");
        assert_eq!(profile.avg_comment_length, 53);
        assert_eq!(profile.length_range, Some(LengthRange { min: 35, max: 65 }));
        assert_eq!(profile.sentence_count_typical, 2);
        assert_eq!(profile.common_connectives, vec!["and", "so"]);
        assert_eq!(profile.real_comment_examples.len(), 1);
        assert_eq!(profile.exclamation_marks, 1);
        assert_eq!(profile.experience, vec!["COO at Acme"]);
        assert_eq!(profile.recipe("form", ""), "1 sentence, 45-70 words");
        assert_eq!(profile.profile_source, "json_profile");
    }

    #[test]
    fn test_load_simple_writing_style() {
        let stored = json!({
            "writing_style": {"tone": "casual", "avg_comment_length": 25, "emoji_usage": "moderate"}
        });
        let profile = load_voice_profile(&stored);
        assert_eq!(profile.tone, "casual");
        assert_eq!(profile.avg_comment_length, 25);
        assert!(profile.style_hints().uses_emoji());
        assert_eq!(profile.profile_source, "writing_style");
    }

    #[test]
    fn test_load_empty_profile_uses_defaults() {
        let profile = load_voice_profile(&json!({}));
        assert_eq!(profile, VoiceProfile::default());
    }

    #[test]
    fn test_merge_insights() {
        let base = load_voice_profile(&fingerprint());
        let insights = VoiceInsights {
            discovered_patterns: vec!["chains clauses with and".to_string()],
            unique_markers: vec!["I feel".to_string()],
            confidence: Some(1.7),
            ..VoiceInsights::default()
        };
        let merged = merge_insights(base, insights);
        assert_eq!(merged.llm_discovered_patterns.len(), 1);
        assert_eq!(merged.confidence, 1.0);
        assert_eq!(merged.profile_source, "json_profile+llm");
    }

    #[test]
    fn test_merge_empty_insights_is_noop() {
        let base = load_voice_profile(&fingerprint());
        assert_eq!(merge_insights(base.clone(), VoiceInsights::default()), base);
    }
}
