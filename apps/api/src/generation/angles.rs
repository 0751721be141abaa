//! Post sentiment detection and response-angle selection.
//!
//! Each sentiment carries trigger keywords and an ordered list of comment
//! angles. Detection is plain substring counting over the lowercased post.

use crate::voice::PostContext;

pub const DEFAULT_SENTIMENT: &str = "reflective_lessons";
pub const DEFAULT_ANGLE: &str = "LIVED_IT_DEEPER";
const ACHIEVEMENT_ANGLE: &str = "INEVITABLE_NOT_SURPRISING";

pub struct SentimentPattern {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub angles: &'static [&'static str],
}

/// Order matters: ties go to the earlier entry.
pub const SENTIMENT_PATTERNS: &[SentimentPattern] = &[
    SentimentPattern {
        name: "celebration_win",
        keywords: &["excited", "announce", "joined", "promoted", "launched", "hit", "reached", "achieved", "milestone", "thrilled"],
        angles: &["INEVITABLE_NOT_SURPRISING", "JUST_CHECKPOINT", "REAL_COST", "PROPHETIC_NOT_CONGRATS"],
    },
    SentimentPattern {
        name: "failure_setback",
        keywords: &["failed", "lost", "messed up", "mistake", "wrong", "didn't work", "crashed", "shut down"],
        angles: &["FAILURE_AS_CURRICULUM", "PAINFUL_LESSON", "FAILED_BIGGER_SOFTER", "PORTAL_NOT_PUNISHMENT"],
    },
    SentimentPattern {
        name: "advice_tactical",
        keywords: &["how to", "here's how", "steps", "framework", "process", "system", "strategy", "tip"],
        angles: &["HIDDEN_COST", "MINDSET_SHIFT", "REAL_RISK", "SECRET_NOBODY_ASKED"],
    },
    SentimentPattern {
        name: "reflective_lessons",
        keywords: &["learned", "realized", "discovered", "wish i knew", "looking back", "lesson", "years ago"],
        angles: &["LIVED_IT_DEEPER", "MISSING_CHAPTER", "FUTURE_SELF_LENS", "SCARRED_PEER"],
    },
    SentimentPattern {
        name: "vulnerable_emotional",
        keywords: &["struggling", "hard", "difficult", "vulnerable", "scared", "anxious", "burned out"],
        angles: &["WHISPERED_TRUTH", "EARNED_INSIGHT", "ME_TOO_DEEPER", "PRESENCE_NOT_ADVICE"],
    },
    SentimentPattern {
        name: "comeback_redemption",
        keywords: &["back", "returned", "rebuilt", "recovered", "overcame", "survived", "fought back"],
        angles: &["COST_OF_COMEBACK", "EARNED_THIS", "GHOST_OF_PAST", "REBUILD_BIGGER"],
    },
    SentimentPattern {
        name: "hiring_team",
        keywords: &["hiring", "join us", "we're looking", "team", "opportunity", "position", "role"],
        angles: &["REAL_REASON_JOIN", "FILTER_HARD", "CULTURE_AFTER_MONTH_6", "DO_WE_MEAN_IT"],
    },
    SentimentPattern {
        name: "hot_take_controversial",
        keywords: &["unpopular", "controversial", "hot take", "truth", "nobody talks about"],
        angles: &["REFRAME_SMARTER", "INTENSIFY_SURGICAL", "SEE_WHOLE_GAME", "NEW_ANGLE_NO_REACTION"],
    },
    SentimentPattern {
        name: "frustration_rant",
        keywords: &["frustrated", "tired of", "sick of", "enough", "why is", "still", "broken"],
        angles: &["PATTERN_NOT_MAD", "RESIGNED_GENIUS", "COLD_TRUTH_BOMB", "GASLIT_NOW_WHAT"],
    },
    SentimentPattern {
        name: "gratitude_inspirational",
        keywords: &["grateful", "thankful", "blessed", "appreciate", "inspired", "motivated"],
        angles: &["TIRED_BUT_GRATEFUL", "GRATITUDE_EARNED", "SUNRISE_NOT_FIREWORKS"],
    },
    SentimentPattern {
        name: "milestone_announcement",
        keywords: &["launched", "released", "started", "first", "milestone", "announcing"],
        angles: &["PROPHETIC_NOT_CONGRATS", "WHY_THEY_STARTED", "100_LAUNCHES_LATER", "WAIT_UNTIL_CHAPTER_3"],
    },
    SentimentPattern {
        name: "crowd_engagement",
        keywords: &["what do you think", "thoughts?", "curious", "would love to hear", "?"],
        angles: &["UNEXPECTED_REAL", "REAL_QUESTION_UNDERNEATH", "FLIP_WITH_QUESTION", "TRUTH_NOBODY_ELSE"],
    },
    SentimentPattern {
        name: "philosophical_abstract",
        keywords: &["meaning", "purpose", "existence", "identity", "time", "humanity"],
        angles: &["TANGIBLE_BRUTAL_TRUTH", "METAPHOR_BLEEDS_REALITY", "BIG_IDEA_10_SECOND_MOMENT"],
    },
    SentimentPattern {
        name: "crisis_loss_burnout",
        keywords: &["burnout", "crisis", "loss", "grief", "broke", "breaking point", "can't", "drowning"],
        angles: &["PRESENCE_NOT_ADVICE", "BEEN_THERE_QUIETER", "CHANGES_YOU_FOREVER"],
    },
    SentimentPattern {
        name: "self_promo_pitch",
        keywords: &["check out", "link in", "dm me", "book a call", "available", "limited spots"],
        angles: &["CALL_OUT_VALUE", "BUYER_WHO_SEES", "TRUTH_BEHIND_MARKETING"],
    },
];

pub fn pattern(name: &str) -> Option<&'static SentimentPattern> {
    SENTIMENT_PATTERNS.iter().find(|p| p.name == name)
}

/// The sentiment with the most keyword hits, or `reflective_lessons` when none hit.
pub fn detect_sentiment(post_content: &str) -> &'static str {
    let lower = post_content.to_lowercase();
    let mut best: Option<(&'static str, usize)> = None;
    for p in SENTIMENT_PATTERNS {
        let score = p.keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((p.name, score));
        }
    }
    best.map_or(DEFAULT_SENTIMENT, |(name, _)| name)
}

pub fn select_best_angle(sentiment: &str, context: &PostContext) -> &'static str {
    let Some(p) = pattern(sentiment).filter(|p| !p.angles.is_empty()) else {
        return DEFAULT_ANGLE;
    };
    if context.is_achievement() && p.angles.contains(&ACHIEVEMENT_ANGLE) {
        return ACHIEVEMENT_ANGLE;
    }
    p.angles[0]
}

/// Extra guidance for the angles that have one; `None` for the rest.
pub fn angle_instruction(angle: &str) -> Option<&'static str> {
    let text = match angle {
        "INEVITABLE_NOT_SURPRISING" => "Make the achievement feel inevitable, not surprising. Skip congratulations, write like you saw it coming, name the specific achievement and point at what comes next.",
        "JUST_CHECKPOINT" => "Treat the win as a checkpoint, not the endgame. Acknowledge it, relate it to a longer journey from your own experience, and point at the next challenge.",
        "REAL_COST" => "No praise. Make one sharp observation about what the win really cost and reference the specific win.",
        "HIDDEN_COST" => "Name the hidden cost or catch in the advice that nobody mentions, backed by your own experience or numbers.",
        "LIVED_IT_DEEPER" => "Write as someone who learned the same lesson at a higher price. Share the harder version from your experience, respectful but real.",
        "PATTERN_NOT_MAD" => "Resigned wisdom: you used to get angry about this, now you just see the pattern. Tired but clear.",
        "FILTER_HARD" => "Raise the bar on the hiring post. Define what the quality they ask for really means in practice.",
        "WHISPERED_TRUTH" => "Quiet presence, not loud sympathy. Make them feel understood, not rescued. No advice.",
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifteen_sentiments() {
        assert_eq!(SENTIMENT_PATTERNS.len(), 15);
        assert!(SENTIMENT_PATTERNS.iter().all(|p| !p.angles.is_empty()));
    }

    #[test]
    fn test_detect_sentiment_default() {
        assert_eq!(detect_sentiment("Monday notes on the weather"), DEFAULT_SENTIMENT);
    }

    #[test]
    fn test_detect_sentiment_counts_hits() {
        let post = "Thrilled and excited: we reached our milestone.";
        assert_eq!(detect_sentiment(post), "celebration_win");

        let post = "I failed. I lost the deal because of one mistake.";
        assert_eq!(detect_sentiment(post), "failure_setback");
    }

    #[test]
    fn test_detect_sentiment_tie_goes_to_table_order() {
        // "launched" and "milestone" hit both celebration_win and milestone_announcement.
        assert_eq!(detect_sentiment("launched milestone"), "celebration_win");
    }

    #[test]
    fn test_select_best_angle() {
        let plain = PostContext::default();
        assert_eq!(select_best_angle("failure_setback", &plain), "FAILURE_AS_CURRICULUM");
        assert_eq!(select_best_angle("unknown", &plain), DEFAULT_ANGLE);

        let achievement = PostContext {
            post_type: "achievement".to_string(),
            ..PostContext::default()
        };
        assert_eq!(
            select_best_angle("celebration_win", &achievement),
            "INEVITABLE_NOT_SURPRISING"
        );
        assert_eq!(
            select_best_angle("milestone_announcement", &achievement),
            "PROPHETIC_NOT_CONGRATS"
        );
    }

    #[test]
    fn test_angle_instruction() {
        assert!(angle_instruction("REAL_COST").is_some());
        assert!(angle_instruction("UNEXPECTED_REAL").is_none());
    }
}
