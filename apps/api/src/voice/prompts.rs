// Prompts for the three analysis calls. Templates use `{name}` placeholders.

/// System prompt shared by every analysis call.
pub const ANALYSIS_SYSTEM: &str = "You are an expert analyst of professional writing on LinkedIn. \
    You read profiles, posts and comments and describe voice, intent and engagement \
    opportunities precisely. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace `{existing_profile}` and `{comments}`.
pub const USER_VOICE_PROMPT: &str = r#"Analyze this person's LinkedIn commenting voice deeply.

EXISTING PROFILE DATA:
{existing_profile}

REAL COMMENTS TO ANALYZE:
{comments}

Think about:
1. What makes this voice unique and recognizable?
2. What patterns emerge across all comments?
3. What is the underlying personality or archetype?
4. Which subtle patterns would a quick read miss?

Return ONLY valid JSON:
{
  "discovered_patterns": ["specific pattern you noticed"],
  "voice_qualities": {
    "primary_trait": "main characteristic",
    "secondary_trait": "supporting characteristic",
    "energy_level": "high/moderate/low"
  },
  "unique_markers": ["phrases or patterns that are signature to this voice"],
  "confidence": 0.85
}"#;

/// Replace `{name}`, `{headline}`, `{about}`, `{experience}` and `{facts}`.
pub const TARGET_PROMPT: &str = r#"Analyze this LinkedIn profile to understand how to engage with them.

NAME: {name}
HEADLINE: {headline}

ABOUT:
{about}

EXPERIENCE:
{experience}

EXTRACTED FACTS: {facts}

Think about:
1. What are their real areas of expertise, beyond keywords?
2. What do they care about professionally?
3. How do they communicate: formal, casual, data-driven?
4. What would make them engage with a comment?

Return ONLY valid JSON:
{
  "expertise_areas": ["specific area 1", "specific area 2"],
  "professional_focus": "their main mission or focus",
  "communication_style": "how they communicate",
  "key_themes": ["theme1", "theme2"],
  "industry": "their industry",
  "seniority": "junior/mid/senior/executive",
  "engagement_style": "best way to engage them",
  "topics_they_care_about": ["topic1", "topic2"],
  "values": ["what they value professionally"]
}

Base the analysis on the profile content above."#;

/// Replace `{content}`, `{facts}`, `{facts_json}` and `{comments}`.
pub const POST_PROMPT: &str = r#"Analyze this LinkedIn post to understand the best way to comment.

POST CONTENT:
{content}

EXTRACTED FACTS: {facts}

WHAT OTHERS ALREADY SAID:
{comments}

Think about:
1. What is the real message or emotion behind this post?
2. Which specific details should a great comment reference?
3. Which angles would create meaningful engagement?
4. What should be avoided?

Return ONLY valid JSON:
{
  "post_type": "achievement/question/insight/story/announcement",
  "is_achievement": false,
  "core_message": "the real point of the post",
  "main_topic": "specific topic",
  "emotional_tone": "excited/thoughtful/proud/curious",
  "sentiment": "positive/negative/neutral",
  "specific_details": ["detail1", "detail2"],
  "key_moments": ["moment1", "moment2"],
  "author_wants": "what they want from the audience",
  "engagement_opportunity": "best way to engage",
  "best_response_angles": ["angle1", "angle2", "angle3"],
  "extracted_facts": {facts_json},
  "avoid_generic": ["Congratulations!", "Great post!"]
}"#;
