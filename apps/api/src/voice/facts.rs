//! Deterministic fact extraction and the keyword classifier used when the
//! post analysis call fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::linkedin::Profile;
use crate::llm_client::prompts::truncate_chars;
use crate::voice::models::PostContext;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+(?:%|[kKmMbB]\b|\b)").unwrap());
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]+)""#).unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[•\-*]\s*(\S[^\n]*)").unwrap());

const MAX_NUMBERS: usize = 5;
const MAX_QUOTES: usize = 3;
const MAX_BULLETS: usize = 3;

/// Numbers (with k/m/b/% suffixes), quoted phrases and bullet lines from a post.
pub fn extract_post_facts(content: &str) -> Vec<String> {
    let mut facts: Vec<String> = NUMBER
        .find_iter(content)
        .take(MAX_NUMBERS)
        .map(|m| m.as_str().to_string())
        .collect();

    facts.extend(
        QUOTED
            .captures_iter(content)
            .take(MAX_QUOTES)
            .map(|c| c[1].trim().to_string()),
    );
    facts.extend(
        BULLET
            .captures_iter(content)
            .take(MAX_BULLETS)
            .map(|c| c[1].trim().to_string()),
    );
    facts
}

/// Headline, about text and the first two roles of a target profile.
pub fn extract_target_facts(profile: &Profile) -> Vec<String> {
    let mut facts = Vec::new();
    if !profile.headline.is_empty() {
        facts.push(format!("Headline: {}", truncate_chars(&profile.headline, 60)));
    }
    if !profile.about.is_empty() {
        facts.push(format!("About: {}", truncate_chars(&profile.about, 200)));
    }
    facts.extend(
        profile
            .experience
            .iter()
            .take(2)
            .filter(|e| !e.title.is_empty() && !e.company.is_empty())
            .map(|e| format!("{} at {}", e.title, e.company)),
    );
    facts
}

/// `- title at company` lines for prompts.
pub fn format_experience(profile: &Profile, limit: usize) -> String {
    let lines: Vec<String> = profile
        .experience
        .iter()
        .take(limit)
        .map(|e| {
            let title = if e.title.is_empty() { "Unknown" } else { &e.title };
            let company = if e.company.is_empty() { "Unknown" } else { &e.company };
            format!("- {title} at {company}")
        })
        .collect();
    if lines.is_empty() {
        "No experience data".to_string()
    } else {
        lines.join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword fallback
// ────────────────────────────────────────────────────────────────────────────

struct PostKind {
    post_type: &'static str,
    keywords: &'static [&'static str],
    tone: &'static str,
    sentiment: &'static str,
    angles: &'static [&'static str],
}

/// Checked in order; the first kind with a keyword hit wins.
const POST_KINDS: &[PostKind] = &[
    PostKind {
        post_type: "achievement",
        keywords: &["excited", "thrilled", "promoted", "proud", "milestone", "achieved", "joined", "hit"],
        tone: "proud",
        sentiment: "positive",
        angles: &["what made this possible", "what comes next", "the real cost behind the win"],
    },
    PostKind {
        post_type: "announcement",
        keywords: &["announce", "introducing", "launched", "launching", "released", "hiring"],
        tone: "excited",
        sentiment: "positive",
        angles: &["why it matters", "who it helps most", "what to watch for next"],
    },
    PostKind {
        post_type: "question",
        keywords: &["?", "what do you think", "curious", "thoughts"],
        tone: "curious",
        sentiment: "neutral",
        angles: &["answer from experience", "add a missing angle", "share a concrete example"],
    },
    PostKind {
        post_type: "story",
        keywords: &["years ago", "i remember", "back when", "story", "journey"],
        tone: "reflective",
        sentiment: "neutral",
        angles: &["relate a similar moment", "name the lesson underneath", "share perspective"],
    },
    PostKind {
        post_type: "insight",
        keywords: &["learned", "lesson", "realized", "how to", "framework", "tip", "mistake"],
        tone: "thoughtful",
        sentiment: "neutral",
        angles: &["add a nuance", "share where it broke for you", "extend the idea"],
    },
];

/// Post context built without the LLM: post type, tone and response angles
/// from keyword hits, plus the extracted facts.
pub fn fallback_post_context(content: &str, facts: Vec<String>) -> PostContext {
    let lower = content.to_lowercase();
    let kind = POST_KINDS
        .iter()
        .find(|k| k.keywords.iter().any(|kw| lower.contains(kw)));

    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    match kind {
        Some(kind) => PostContext {
            post_type: kind.post_type.to_string(),
            is_achievement: kind.post_type == "achievement",
            main_topic: "professional discussion".to_string(),
            emotional_tone: kind.tone.to_string(),
            sentiment: kind.sentiment.to_string(),
            best_response_angles: owned(kind.angles),
            extracted_facts: facts,
            ..PostContext::default()
        },
        None => PostContext {
            post_type: "general".to_string(),
            main_topic: "professional discussion".to_string(),
            emotional_tone: "neutral".to_string(),
            sentiment: "neutral".to_string(),
            best_response_angles: owned(&["share perspective", "ask question"]),
            extracted_facts: facts,
            ..PostContext::default()
        },
    }
}
