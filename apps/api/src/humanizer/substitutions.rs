//! Deterministic (and one lightly randomized) table-driven rewrites.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Captures, Regex};

use crate::humanizer::tables::{
    AI_CLICHES, CASUAL_CONNECTORS, CONTRACTIONS, FORMAL_TRANSITIONS, NATURAL_REPLACEMENTS,
};

/// Below this many characters the cliché pass is considered to have destroyed the comment.
const MIN_SURVIVING_CHARS: usize = 10;

/// Builds a case-insensitive, word-bounded pattern where any whitespace run matches a space.
fn phrase_regex(phrase: &str) -> Regex {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"(?i)\b{body}\b")).expect("phrase table entries are valid regexes")
}

static CONNECTOR_RES: Lazy<Vec<(Regex, &'static [&'static str])>> = Lazy::new(|| {
    CASUAL_CONNECTORS
        .iter()
        .map(|(formal, casual)| (phrase_regex(formal), *casual))
        .collect()
});

static REPLACEMENT_RES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    NATURAL_REPLACEMENTS
        .iter()
        .map(|(phrase, natural)| (phrase_regex(phrase), *natural))
        .collect()
});

static CLICHE_RES: Lazy<Vec<Regex>> = Lazy::new(|| AI_CLICHES.iter().map(|c| phrase_regex(c)).collect());

static CONTRACTION_RES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CONTRACTIONS
        .iter()
        .map(|(long, short)| (phrase_regex(long), *short))
        .collect()
});

static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?;:])").unwrap());
static COMMA_BEFORE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r",+\s*([.!?])").unwrap());
static REPEATED_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*,)+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strips formal transitions ("Furthermore,", "In conclusion,") from the start of the text.
pub fn remove_formal_transitions(text: &str) -> String {
    let mut current = text.trim().to_string();
    for formal in FORMAL_TRANSITIONS {
        if let Some(rest) = current.strip_prefix(formal) {
            current = capitalize_first(rest.trim_start());
        }
    }
    current
}

/// Swaps the first occurrence of each formal connector for a randomly chosen casual one.
pub fn casualize_connectors<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let mut current = text.to_string();
    for (re, casual) in CONNECTOR_RES.iter() {
        if !re.is_match(&current) {
            continue;
        }
        let Some(choice) = casual.choose(rng) else {
            continue;
        };
        current = re
            .replacen(&current, 1, |caps: &Captures| match_case(&caps[0], choice))
            .into_owned();
    }
    current
}

/// Rewrites stock phrases and deletes AI clichés. Returns the input unchanged if the
/// result would be too short to be a comment.
pub fn remove_ai_cliches(text: &str) -> String {
    let mut current = text.to_string();

    for (re, natural) in REPLACEMENT_RES.iter() {
        current = re
            .replace_all(&current, |caps: &Captures| match_case(&caps[0], natural))
            .into_owned();
    }

    for re in CLICHE_RES.iter() {
        current = re.replace_all(&current, "").into_owned();
    }

    let cleaned = tidy_after_deletion(&current);
    if cleaned.chars().count() < MIN_SURVIVING_CHARS {
        return text.trim().to_string();
    }
    cleaned
}

/// Applies the contraction table ("do not" → "don't"), keeping a leading capital.
/// Affirmative forms stay long at the end of a clause ("what it is.").
pub fn apply_contractions(text: &str) -> String {
    let mut current = text.to_string();
    for (re, short) in CONTRACTION_RES.iter() {
        let replaced = re
            .replace_all(&current, |caps: &Captures| {
                let end = caps.get(0).map_or(current.len(), |m| m.end());
                if !short.ends_with("n't") && is_clause_final(&current[end..]) {
                    caps[0].to_string()
                } else {
                    match_case(&caps[0], short)
                }
            })
            .into_owned();
        current = replaced;
    }
    current
}

fn is_clause_final(rest: &str) -> bool {
    rest.trim_start()
        .chars()
        .next()
        .map_or(true, |c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '-'))
}

/// Collapses whitespace and repairs punctuation left dangling by deletions.
pub fn tidy_after_deletion(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let no_space = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    let commas = REPEATED_COMMA.replace_all(&no_space, ",");
    let ends = COMMA_BEFORE_END.replace_all(&commas, "$1");
    let trimmed = ends.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'));
    capitalize_first(trimmed.trim())
}

/// Uppercases the first character if the matched source text started with one.
fn match_case(source: &str, replacement: &str) -> String {
    let starts_upper = source.chars().next().is_some_and(char::is_uppercase);
    if starts_upper {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character unless the first word is "I", an "I'" contraction
/// or an acronym.
pub fn lowercase_first(text: &str) -> String {
    let first_word = text.split_whitespace().next().unwrap_or("");
    if is_acronym(first_word) || first_word == "I" || first_word.starts_with("I'") {
        return text.to_string();
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() > 1 && letters.iter().all(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_strips_leading_formal_transition() {
        assert_eq!(
            remove_formal_transitions("Furthermore, this shipped on time."),
            "This shipped on time."
        );
    }

    #[test]
    fn test_formal_transition_mid_text_is_kept() {
        let text = "We shipped it. Furthermore, it worked.";
        assert_eq!(remove_formal_transitions(text), text);
    }

    #[test]
    fn test_casualize_replaces_only_first_occurrence() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = casualize_connectors("thus it works, thus it ships", &mut rng);
        assert_eq!(out, "so it works, thus it ships");
    }

    #[test]
    fn test_casualize_keeps_capital() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = casualize_connectors("Hence the delay.", &mut rng);
        assert_eq!(out, "So the delay.");
    }

    #[test]
    fn test_casualize_is_word_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        // "thusly" is not "thus"
        assert_eq!(casualize_connectors("thusly", &mut rng), "thusly");
    }

    #[test]
    fn test_cliche_words_are_removed() {
        let out = remove_ai_cliches("We need to leverage this robust framework today.");
        assert_eq!(out, "We need to this framework today.");
    }

    #[test]
    fn test_cliche_phrase_removed_and_punctuation_tidied() {
        let out = remove_ai_cliches("Great point on hiring, thanks for sharing.");
        assert_eq!(out, "Great point on hiring.");
    }

    #[test]
    fn test_natural_replacement_runs_before_deletion() {
        let out = remove_ai_cliches("That was truly inspiring to read.");
        assert_eq!(out, "That was impressive to read.");
    }

    #[test]
    fn test_cliche_removal_falls_back_when_nothing_survives() {
        let text = "Truly fantastic!";
        assert_eq!(remove_ai_cliches(text), text);
    }

    #[test]
    fn test_contractions_table() {
        let cases = [
            ("I do not agree", "I don't agree"),
            ("It is what it is", "It's what it is"),
            ("That is how it is. It is fine", "That's how it is. It's fine"),
            ("We are not, and we do not.", "We aren't, and we don't."),
            ("they are not wrong", "they aren't wrong"),
            ("I am sure we will not", "I'm sure we won't"),
            ("That   is   fine", "That's fine"),
            ("you cannot fake it", "you can't fake it"),
        ];
        for (input, expected) in cases {
            assert_eq!(apply_contractions(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_contractions_are_word_bounded() {
        assert_eq!(apply_contractions("this island is nothing"), "this island is nothing");
    }

    #[test]
    fn test_lowercase_first_skips_acronyms_and_i() {
        assert_eq!(lowercase_first("AWS is great"), "AWS is great");
        assert_eq!(lowercase_first("I think so"), "I think so");
        assert_eq!(lowercase_first("I'm in"), "I'm in");
        assert_eq!(lowercase_first("Great stuff"), "great stuff");
    }

    #[test]
    fn test_tidy_after_deletion() {
        assert_eq!(tidy_after_deletion(" , this  is ,  fine ."), "This is, fine.");
    }
}
