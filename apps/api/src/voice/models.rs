//! Records produced by the analyzer and consumed by the comment generator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::humanizer::{LengthRange, StyleHints};

/// Everything known about how a user writes comments: the stored JSON
/// fingerprint merged with what the LLM noticed in their real comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceProfile {
    pub name: String,
    pub voice_archetype: String,
    pub confidence_level: String,
    pub tone: String,
    pub formality_score: f64,
    pub avg_comment_length: usize,
    pub length_range: Option<LengthRange>,
    pub sentence_count_typical: u32,
    pub burstiness_level: String,
    pub emoji_usage: String,

    /// Free-form recipe (`form`, `opening`, `glue`, `punctuation`, ...).
    pub generation_recipe: Value,
    pub connective_density: f64,
    pub common_connectives: Vec<String>,
    pub real_comment_examples: Vec<String>,
    pub common_phrases: Vec<String>,
    pub typical_comment_openings: Vec<String>,

    pub question_marks: u32,
    pub exclamation_marks: u32,
    pub comma_density_max: f64,

    pub personality_traits: Vec<String>,
    pub lexical_density: Value,
    pub expertise_areas: Vec<String>,
    pub experience: Vec<String>,

    pub llm_discovered_patterns: Vec<String>,
    pub voice_qualities: Value,
    pub unique_markers: Vec<String>,

    pub confidence: f64,
    pub profile_source: String,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            voice_archetype: "professional".to_string(),
            confidence_level: "moderate".to_string(),
            tone: "professional".to_string(),
            formality_score: 0.5,
            avg_comment_length: 50,
            length_range: None,
            sentence_count_typical: 1,
            burstiness_level: "moderate".to_string(),
            emoji_usage: "none".to_string(),
            generation_recipe: Value::Object(Default::default()),
            connective_density: 0.15,
            common_connectives: Vec::new(),
            real_comment_examples: Vec::new(),
            common_phrases: Vec::new(),
            typical_comment_openings: Vec::new(),
            question_marks: 0,
            exclamation_marks: 0,
            comma_density_max: 0.02,
            personality_traits: Vec::new(),
            lexical_density: Value::Object(Default::default()),
            expertise_areas: Vec::new(),
            experience: Vec::new(),
            llm_discovered_patterns: Vec::new(),
            voice_qualities: Value::Object(Default::default()),
            unique_markers: Vec::new(),
            confidence: 0.5,
            profile_source: "default".to_string(),
        }
    }
}

impl VoiceProfile {
    /// The subset of the profile the humanizer reads.
    pub fn style_hints(&self) -> StyleHints {
        StyleHints {
            avg_comment_length: self.avg_comment_length,
            length_range: self.length_range,
            tone: self.tone.clone(),
            typical_comment_openings: self.typical_comment_openings.clone(),
            emoji_usage: self.emoji_usage.clone(),
            question_marks: self.question_marks,
            exclamation_marks: self.exclamation_marks,
            allows_lowercase_start: self.formality_score < 0.3,
        }
    }

    /// A string field of the generation recipe, or `default` when absent.
    pub fn recipe(&self, key: &str, default: &str) -> String {
        self.generation_recipe[key]
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

/// What the LLM reports after reading a user's real comments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VoiceInsights {
    pub discovered_patterns: Vec<String>,
    pub voice_qualities: Value,
    pub unique_markers: Vec<String>,
    pub confidence: Option<f64>,
}

impl VoiceInsights {
    pub fn is_empty(&self) -> bool {
        self.discovered_patterns.is_empty()
            && self.unique_markers.is_empty()
            && self.confidence.is_none()
            && !self.voice_qualities.is_object()
    }
}

/// How to engage with the person whose post is being commented on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetInsights {
    pub expertise_areas: Vec<String>,
    pub professional_focus: String,
    pub communication_style: String,
    pub key_themes: Vec<String>,
    pub industry: String,
    pub seniority: String,
    pub engagement_style: String,
    pub topics_they_care_about: Vec<String>,
    pub values: Vec<String>,
}

impl TargetInsights {
    /// Used when the target could not be analyzed.
    pub fn fallback() -> Self {
        Self {
            expertise_areas: vec!["professional".to_string()],
            professional_focus: "career development".to_string(),
            communication_style: "professional".to_string(),
            engagement_style: "thoughtful engagement".to_string(),
            ..Self::default()
        }
    }
}

/// Reading of a single post: what it is about and how best to respond.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostContext {
    pub post_type: String,
    pub is_achievement: bool,
    pub core_message: String,
    pub main_topic: String,
    pub emotional_tone: String,
    pub sentiment: String,
    pub specific_details: Vec<String>,
    pub key_moments: Vec<String>,
    pub author_wants: String,
    pub engagement_opportunity: String,
    pub best_response_angles: Vec<String>,
    pub extracted_facts: Vec<String>,
    pub avoid_generic: Vec<String>,
}

impl PostContext {
    pub fn is_achievement(&self) -> bool {
        self.is_achievement || self.post_type.eq_ignore_ascii_case("achievement")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient JSON readers for hand-edited profile files
// ────────────────────────────────────────────────────────────────────────────

/// Strings from an array whose items are strings or objects with a
/// `text`, `phrase` or `marker` field. Anything else reads as empty.
pub(crate) fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => ["text", "phrase", "marker"]
                        .iter()
                        .find_map(|k| obj.get(*k).and_then(Value::as_str))
                        .map(str::to_string),
                    _ => None,
                })
                .filter(|s| !s.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn number(value: &Value, default: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::String(s) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub(crate) fn text(value: &Value, default: &str) -> String {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_profile() {
        let profile = VoiceProfile::default();
        assert_eq!(profile.tone, "professional");
        assert_eq!(profile.avg_comment_length, 50);
        assert_eq!(profile.profile_source, "default");
    }

    #[test]
    fn test_style_hints_carry_punctuation_and_length() {
        let profile = VoiceProfile {
            avg_comment_length: 30,
            length_range: Some(LengthRange { min: 20, max: 40 }),
            question_marks: 2,
            formality_score: 0.2,
            ..VoiceProfile::default()
        };
        let hints = profile.style_hints();
        assert_eq!(hints.avg_comment_length, 30);
        assert_eq!(hints.length_range, Some(LengthRange { min: 20, max: 40 }));
        assert_eq!(hints.question_marks, 2);
        assert!(hints.allows_lowercase_start);
    }

    #[test]
    fn test_recipe_falls_back() {
        let profile = VoiceProfile {
            generation_recipe: json!({"form": "1 sentence", "opening": ""}),
            ..VoiceProfile::default()
        };
        assert_eq!(profile.recipe("form", "x"), "1 sentence");
        assert_eq!(profile.recipe("opening", "natural start"), "natural start");
    }

    #[test]
    fn test_post_context_deserializes_partial_llm_output() {
        let ctx: PostContext =
            serde_json::from_value(json!({"post_type": "achievement", "main_topic": "funding"}))
                .unwrap();
        assert!(ctx.is_achievement());
        assert!(ctx.best_response_angles.is_empty());
    }

    #[test]
    fn test_string_list_accepts_mixed_items() {
        let value = json!(["and", {"text": "so"}, {"phrase": "because"}, 3, ""]);
        assert_eq!(string_list(&value), vec!["and", "so", "because"]);
        assert!(string_list(&json!(null)).is_empty());
    }

    #[test]
    fn test_number_reads_strings() {
        assert_eq!(number(&json!("12"), 0.0), 12.0);
        assert_eq!(number(&json!(null), 7.0), 7.0);
    }
}
