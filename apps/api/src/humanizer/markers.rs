//! Randomized conversational touches: openers, fillers and small imperfections.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::humanizer::substitutions::{capitalize_first, is_acronym, lowercase_first};
use crate::humanizer::tables::{CASUAL_EMOJIS, NATURAL_FILLERS, NATURAL_STARTERS};
use crate::humanizer::{HumanizeOptions, StyleHints};

/// Fillers are only inserted into text longer than this many words.
const FILLER_MIN_WORDS: usize = 8;

/// Maybe prepends an opener (the user's own or a generic one) and maybe inserts a filler word.
pub fn add_conversational_markers<R: Rng + ?Sized>(
    text: &str,
    style: &StyleHints,
    options: &HumanizeOptions,
    rng: &mut R,
) -> String {
    let mut text = text.trim().to_string();
    if text.is_empty() {
        return text;
    }

    if rng.gen_bool(options.starter_probability) {
        let starter = if !style.typical_comment_openings.is_empty()
            && rng.gen_bool(options.user_opening_probability)
        {
            style
                .typical_comment_openings
                .choose(rng)
                .map(|s| capitalize_first(s.trim()))
                .unwrap_or_default()
        } else {
            NATURAL_STARTERS.choose(rng).map(|s| s.to_string()).unwrap_or_default()
        };

        if !starter.is_empty() && !text.starts_with(&starter) {
            text = prepend_starter(&starter, &text);
        }
    }

    let word_total = text.split_whitespace().count();
    if word_total > FILLER_MIN_WORDS && rng.gen_bool(options.filler_probability) {
        if let Some(filler) = NATURAL_FILLERS.choose(rng) {
            let mut words: Vec<&str> = text.split_whitespace().collect();
            let pos = rng.gen_range(3..=5.min(words.len() - 1));
            words.insert(pos, filler);
            text = words.join(" ");
        }
    }

    text
}

/// Joins an opener onto the text and lowercases the old first letter, unless the
/// opener is a full sentence of its own ("Spot on.").
fn prepend_starter(starter: &str, text: &str) -> String {
    if starter.ends_with(['.', '!', '?']) {
        format!("{starter} {text}")
    } else {
        format!("{starter} {}", lowercase_first(text))
    }
}

/// Maybe drops the final period, doubles one sentence gap, lowercases the start
/// (casual tone only), adds a trailing ellipsis or appends an emoji.
pub fn add_natural_imperfections<R: Rng + ?Sized>(
    text: &str,
    style: &StyleHints,
    options: &HumanizeOptions,
    rng: &mut R,
) -> String {
    let mut text = text.trim().to_string();
    if text.is_empty() {
        return text;
    }

    if rng.gen_bool(options.drop_period_probability)
        && text.ends_with('.')
        && !text.ends_with("...")
    {
        text.pop();
    }

    if rng.gen_bool(options.double_space_probability) {
        let normalized = text.replace(".  ", ". ");
        let parts: Vec<&str> = normalized.split(". ").collect();
        if parts.len() > 1 {
            let at = rng.gen_range(0..parts.len() - 1);
            let head = parts[..=at].join(". ");
            let tail = parts[at + 1..].join(". ");
            text = format!("{head}.  {tail}");
        }
    }

    if style.is_casual() && rng.gen_bool(options.lowercase_probability) {
        let first_word = text.split_whitespace().next().unwrap_or("");
        if !is_acronym(first_word) {
            text = lowercase_first(&text);
        }
    }

    if rng.gen_bool(options.ellipsis_probability) && !text.ends_with(['?', '!']) {
        if !text.ends_with("...") {
            let base = text.trim_end_matches('.');
            text = format!("{base}...");
        }
    }

    if style.uses_emoji() && rng.gen_bool(options.emoji_probability) {
        if let Some(emoji) = CASUAL_EMOJIS.choose(rng) {
            text = format!("{text} {emoji}");
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn never() -> HumanizeOptions {
        HumanizeOptions::never()
    }

    #[test]
    fn test_markers_noop_when_disabled() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = "This is a sentence with more than eight words in it for sure.";
        let out = add_conversational_markers(text, &StyleHints::default(), &never(), &mut rng);
        assert_eq!(out, text);
    }

    #[test]
    fn test_user_opening_is_used() {
        let mut rng = StdRng::seed_from_u64(4);
        let options = HumanizeOptions {
            starter_probability: 1.0,
            user_opening_probability: 1.0,
            ..never()
        };
        let style = StyleHints {
            typical_comment_openings: vec!["love this,".to_string()],
            ..StyleHints::default()
        };
        let out = add_conversational_markers("The data is clear.", &style, &options, &mut rng);
        assert_eq!(out, "Love this, the data is clear.");
    }

    #[test]
    fn test_bare_opening_lowercases_following_text() {
        let options = HumanizeOptions {
            starter_probability: 1.0,
            user_opening_probability: 1.0,
            ..never()
        };
        let cases = [
            ("love this", "The data is clear.", "Love this the data is clear."),
            ("100% agree -", "The data is clear.", "100% agree - the data is clear."),
            ("so true", "AWS nailed it.", "So true AWS nailed it."),
        ];
        for (opening, text, expected) in cases {
            let style = StyleHints {
                typical_comment_openings: vec![opening.to_string()],
                ..StyleHints::default()
            };
            let mut rng = StdRng::seed_from_u64(4);
            assert_eq!(
                add_conversational_markers(text, &style, &options, &mut rng),
                expected,
                "opening: {opening}"
            );
        }
    }

    #[test]
    fn test_full_sentence_opening_keeps_capital() {
        let mut rng = StdRng::seed_from_u64(4);
        let options = HumanizeOptions {
            starter_probability: 1.0,
            user_opening_probability: 1.0,
            ..never()
        };
        let style = StyleHints {
            typical_comment_openings: vec!["Spot on.".to_string()],
            ..StyleHints::default()
        };
        let out = add_conversational_markers("The data is clear.", &style, &options, &mut rng);
        assert_eq!(out, "Spot on. The data is clear.");
    }

    #[test]
    fn test_filler_lands_after_third_to_fifth_word() {
        let options = HumanizeOptions {
            filler_probability: 1.0,
            ..never()
        };
        let text = "one two three four five six seven eight nine ten";
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = add_conversational_markers(text, &StyleHints::default(), &options, &mut rng);
            let words: Vec<&str> = out.split_whitespace().collect();
            assert!(words.len() > 10, "no filler in {out}");
            assert_eq!(&words[..3], &["one", "two", "three"]);
        }
    }

    #[test]
    fn test_short_text_gets_no_filler() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = HumanizeOptions {
            filler_probability: 1.0,
            ..never()
        };
        let out = add_conversational_markers("Nice work here.", &StyleHints::default(), &options, &mut rng);
        assert_eq!(out, "Nice work here.");
    }

    #[test]
    fn test_drop_final_period() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = HumanizeOptions {
            drop_period_probability: 1.0,
            ..never()
        };
        let out = add_natural_imperfections("Solid point.", &StyleHints::default(), &options, &mut rng);
        assert_eq!(out, "Solid point");
    }

    #[test]
    fn test_existing_ellipsis_is_not_shortened() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = HumanizeOptions {
            drop_period_probability: 1.0,
            ..never()
        };
        let out = add_natural_imperfections("Makes you think...", &StyleHints::default(), &options, &mut rng);
        assert_eq!(out, "Makes you think...");
    }

    #[test]
    fn test_double_space_between_sentences() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = HumanizeOptions {
            double_space_probability: 1.0,
            ..never()
        };
        let out = add_natural_imperfections("One thing. Another thing.", &StyleHints::default(), &options, &mut rng);
        assert_eq!(out, "One thing.  Another thing.");
    }

    #[test]
    fn test_lowercase_only_for_casual_tone() {
        let options = HumanizeOptions {
            lowercase_probability: 1.0,
            ..never()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let professional = StyleHints::default();
        assert_eq!(
            add_natural_imperfections("Great call.", &professional, &options, &mut rng),
            "Great call."
        );

        let casual = StyleHints {
            tone: "casual and direct".to_string(),
            ..StyleHints::default()
        };
        assert_eq!(
            add_natural_imperfections("Great call.", &casual, &options, &mut rng),
            "great call."
        );
        assert_eq!(
            add_natural_imperfections("AWS got this right.", &casual, &options, &mut rng),
            "AWS got this right."
        );
    }

    #[test]
    fn test_ellipsis_replaces_period_but_not_question() {
        let options = HumanizeOptions {
            ellipsis_probability: 1.0,
            ..never()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let style = StyleHints::default();
        assert_eq!(add_natural_imperfections("Makes sense.", &style, &options, &mut rng), "Makes sense...");
        assert_eq!(add_natural_imperfections("Makes sense", &style, &options, &mut rng), "Makes sense...");
        assert_eq!(add_natural_imperfections("Why though?", &style, &options, &mut rng), "Why though?");
    }

    #[test]
    fn test_emoji_only_for_emoji_users() {
        let options = HumanizeOptions {
            emoji_probability: 1.0,
            ..never()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let plain = StyleHints::default();
        assert_eq!(add_natural_imperfections("Nice.", &plain, &options, &mut rng), "Nice.");

        let emoji_user = StyleHints {
            emoji_usage: "moderate".to_string(),
            ..StyleHints::default()
        };
        let out = add_natural_imperfections("Nice.", &emoji_user, &options, &mut rng);
        assert!(CASUAL_EMOJIS.iter().any(|e| out == format!("Nice. {e}")), "got {out}");
    }
}
