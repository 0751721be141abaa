// Prompts for comment generation.
// The system prompt carries the user's hard rules; the user prompt carries the post,
// the voice fingerprint, the target and the response strategy.

use crate::generation::angles::angle_instruction;
use crate::llm_client::prompts::{quoted_list, truncate_chars};
use crate::voice::{PostContext, TargetInsights, VoiceProfile};

const DEFAULT_CONNECTIVES: &[&str] = &["and", "but", "so", "because"];

/// Replace `{form}`, `{opening}`, `{glue}`, `{punctuation}`, `{closing}`,
/// `{question_rule}`, `{exclamation_rule}`, `{comma_max}`, `{tone}` and `{formality}`.
const SYSTEM_TEMPLATE: &str = r#"You are writing LinkedIn comments in a specific person's EXACT voice.

CRITICAL RULES (MUST FOLLOW):

1. GENERATION RECIPE (PRIMARY):
   {form}
   Opening: {opening}
   Structure: {glue}
   Punctuation: {punctuation}
   Closing: {closing}

2. PUNCTUATION (STRICT):
   - {question_rule}
   - {exclamation_rule}
   - Maximum {comma_max} comma per 100 words
   - Use periods only at sentence end

3. VOICE RULES:
   - Tone: {tone}
   - Formality: {formality} (0=casual, 1=formal)
   - Use contractions the way people actually type

4. OUTPUT FORMAT:
   Return ONLY valid JSON (no markdown, no explanations):
   {"comments":[{"text":"comment here","approach":"approach","confidence":0.85}]}

Follow these rules EXACTLY. Do not deviate."#;

pub fn build_system_prompt(profile: &VoiceProfile) -> String {
    let question_rule = if profile.question_marks == 0 {
        "NEVER use question marks (?)"
    } else {
        "Question marks allowed"
    };
    let exclamation_rule = if profile.exclamation_marks == 0 {
        "NEVER use exclamation marks (!)"
    } else {
        "Exclamation marks allowed"
    };

    SYSTEM_TEMPLATE
        .replace("{form}", &profile.recipe("form", "1-2 sentences, 40-60 words"))
        .replace("{opening}", &profile.recipe("opening", "natural start"))
        .replace("{glue}", &profile.recipe("glue", "natural flow"))
        .replace("{punctuation}", &profile.recipe("punctuation", "minimal"))
        .replace("{closing}", &profile.recipe("closing", "natural end"))
        .replace("{question_rule}", question_rule)
        .replace("{exclamation_rule}", exclamation_rule)
        .replace("{comma_max}", &format_number(profile.comma_density_max.max(1.0)))
        .replace("{tone}", &profile.tone)
        .replace("{formality}", &format_number(profile.formality_score))
}

/// Everything the generator feeds into the user prompt.
pub struct PromptInputs<'a> {
    pub profile: &'a VoiceProfile,
    pub target: &'a TargetInsights,
    pub post: &'a PostContext,
    pub post_content: &'a str,
    pub sentiment: &'a str,
    pub angle: &'a str,
    pub variations: usize,
}

pub fn build_generation_prompt(inputs: &PromptInputs<'_>) -> String {
    let PromptInputs {
        profile,
        target,
        post,
        ..
    } = inputs;

    let (min_len, max_len) = length_band(profile);
    let connectives = if profile.common_connectives.is_empty() {
        DEFAULT_CONNECTIVES.iter().map(|s| s.to_string()).collect()
    } else {
        first(&profile.common_connectives, 5)
    };
    let connectives_str = quoted_list(&connectives);

    let examples = if profile.real_comment_examples.is_empty() {
        "   (No examples available)".to_string()
    } else {
        profile
            .real_comment_examples
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, ex)| format!("   Example {}: \"{}\"", i + 1, ex))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let details = quoted_list(&first(&post.specific_details, 5));
    let facts = join_or(&first(&post.extracted_facts, 5), "none");
    let angles = if post.best_response_angles.is_empty() {
        "   • Add thoughtful perspective".to_string()
    } else {
        post.best_response_angles
            .iter()
            .take(3)
            .map(|a| format!("   • {a}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let avoid = if post.avoid_generic.is_empty() {
        "generic congratulations".to_string()
    } else {
        quoted_list(&first(&post.avoid_generic, 3))
    };
    let personality = join_or(&first(&profile.personality_traits, 5), "authentic");
    let angle_hint = angle_instruction(inputs.angle)
        .unwrap_or("Use your own lens, reference specific details, stay authentic to your voice.");
    let never_or_allowed = |count: u32| if count == 0 { "NEVER" } else { "allowed" };

    format!(
        r#"Write {variations} LinkedIn comments for this post using the EXACT voice profile below.

═══════════════════════════════════════════════════════════════════
POST CONTENT:
{content}

Post Type: {post_type}
Emotional Tone: {emotional_tone}
Detected Sentiment: {sentiment}
Specific Details to Reference: {details}
Facts Extracted: {facts}
═══════════════════════════════════════════════════════════════════

YOUR VOICE FINGERPRINT (Follow EXACTLY):

GENERATION RECIPE (PRIMARY INSTRUCTION):
   Form: {form}
   Opening: {opening}
   Structure/Glue: {glue}
   Punctuation Rule: {punctuation}
   Data Inclusion: {data}

LENGTH REQUIREMENTS:
   Target: {avg} words
   Range: {min_len}-{max_len} words
   Sentence Count: {sentences} sentence(s)

CONNECTIVES (SIGNATURE, USE THESE):
   Target Density: {density}
   Use: {connectives_str}
   Burstiness: {burstiness}

REAL EXAMPLES (Your actual comments, STUDY THESE):
{examples}

PATTERNS & PHRASES:
   Common Phrases: {phrases}
   Typical Openings: {openings}
   Personality: {personality}
   Your Experience: {experience}
   Your Expertise: {expertise}

TARGET CONTEXT:
   Their Expertise: {target_expertise}
   Their Focus: {target_focus}
   Their Style: {target_style}
   Best Engagement: {target_engagement}
   Topics They Care About: {target_topics}

POST RESPONSE STRATEGY:
   Engagement Opportunity: {opportunity}
   Best Response Angles:
{angles}
   Suggested Angle: {angle}
   {angle_hint}

AVOID:
   Generic phrases: {avoid}
   Question marks: {questions}
   Exclamation marks: {exclamations}

═══════════════════════════════════════════════════════════════════

TASK: Write {variations} comments following the GENERATION RECIPE and REAL EXAMPLES above.

REQUIREMENTS:
1. Match the EXACT form from the generation recipe
2. Use connectives ({connectives_str}) at density {density}
3. Reference SPECIFIC DETAILS: {details}
4. Follow the REAL EXAMPLES style precisely
5. Stay within {min_len}-{max_len} words
6. Match the personality: {personality}

Each comment should use a different approach but keep the SAME voice.

Return ONLY JSON:
{{"comments":[{{"text":"comment","approach":"angle","confidence":0.85}}]}}"#,
        variations = inputs.variations,
        content = truncate_chars(inputs.post_content, 600),
        post_type = or(&post.post_type, "general"),
        emotional_tone = or(&post.emotional_tone, "neutral"),
        sentiment = inputs.sentiment,
        details = if post.specific_details.is_empty() { "general content".to_string() } else { details },
        facts = facts,
        form = profile.recipe("form", "1-2 sentences, 40-60 words"),
        opening = profile.recipe("opening", "natural"),
        glue = profile.recipe("glue", "use connectives"),
        punctuation = profile.recipe("punctuation", "minimal"),
        data = profile.recipe("data_inclusion", "use specific numbers when relevant"),
        avg = profile.avg_comment_length,
        sentences = profile.sentence_count_typical,
        density = format_number(profile.connective_density),
        burstiness = profile.burstiness_level,
        phrases = or_list(&first(&profile.common_phrases, 5), "natural language"),
        openings = or_list(&first(&profile.typical_comment_openings, 3), "natural start"),
        experience = join_or(&profile.experience, "not provided"),
        expertise = join_or(&first(&profile.expertise_areas, 5), "not provided"),
        target_expertise = join_or(&first(&target.expertise_areas, 3), "professional"),
        target_focus = or(&target.professional_focus, "professional topics"),
        target_style = or(&target.communication_style, "professional"),
        target_engagement = or(&target.engagement_style, "thoughtful engagement"),
        target_topics = join_or(&first(&target.topics_they_care_about, 3), "general"),
        opportunity = or(&post.engagement_opportunity, "add thoughtful perspective"),
        angle = inputs.angle,
        questions = never_or_allowed(profile.question_marks),
        exclamations = never_or_allowed(profile.exclamation_marks),
    )
}

/// Lenient word band used in prompts: the profile's range, else avg ± 15.
pub fn length_band(profile: &VoiceProfile) -> (usize, usize) {
    match profile.length_range {
        Some(range) => (range.min, range.max),
        None => {
            let avg = profile.avg_comment_length;
            (avg.saturating_sub(15), avg + 15)
        }
    }
}

fn first(items: &[String], n: usize) -> Vec<String> {
    items.iter().take(n).cloned().collect()
}

fn or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn join_or(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}

fn or_list(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        quoted_list(items)
    }
}

fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanizer::LengthRange;
    use serde_json::json;

    #[test]
    fn test_system_prompt_reflects_punctuation_counts() {
        let mut profile = VoiceProfile {
            generation_recipe: json!({"form": "1 sentence, 45-70 words"}),
            ..VoiceProfile::default()
        };
        let prompt = build_system_prompt(&profile);
        assert!(prompt.contains("1 sentence, 45-70 words"));
        assert!(prompt.contains("NEVER use question marks"));
        assert!(prompt.contains("NEVER use exclamation marks"));

        profile.question_marks = 3;
        let prompt = build_system_prompt(&profile);
        assert!(prompt.contains("Question marks allowed"));
    }

    #[test]
    fn test_generation_prompt_includes_voice_and_post() {
        let profile = VoiceProfile {
            length_range: Some(LengthRange { min: 30, max: 60 }),
            common_connectives: vec!["and".to_string(), "so".to_string()],
            real_comment_examples: vec!["we tried this and it broke".to_string()],
            ..VoiceProfile::default()
        };
        let post = PostContext {
            specific_details: vec!["Series A".to_string()],
            best_response_angles: vec!["what comes next".to_string()],
            ..PostContext::default()
        };
        let prompt = build_generation_prompt(&PromptInputs {
            profile: &profile,
            target: &TargetInsights::fallback(),
            post: &post,
            post_content: "We closed our Series A.",
            sentiment: "celebration_win",
            angle: "REAL_COST",
            variations: 3,
        });

        assert!(prompt.starts_with("Write 3 LinkedIn comments"));
        assert!(prompt.contains("We closed our Series A."));
        assert!(prompt.contains("Range: 30-60 words"));
        assert!(prompt.contains("\"and\", \"so\""));
        assert!(prompt.contains("Example 1: \"we tried this and it broke\""));
        assert!(prompt.contains("• what comes next"));
        assert!(prompt.contains("Suggested Angle: REAL_COST"));
        assert!(prompt.contains("career development"));
        assert!(prompt.contains(r#"{"comments":["#));
    }

    #[test]
    fn test_length_band_defaults_to_fifteen_either_side() {
        let profile = VoiceProfile {
            avg_comment_length: 10,
            ..VoiceProfile::default()
        };
        assert_eq!(length_band(&profile), (0, 25));
    }
}
