//! Sentence-level rhythm: splitting, merge/split edits and the burstiness metric.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::humanizer::substitutions::{is_acronym, lowercase_first};

/// A run of terminators followed by whitespace or the end of the text. Dots inside
/// "3.5%" or "example.com" do not end a sentence.
static TERMINATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").unwrap());
static BUT_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),?\s+but\s+").unwrap());

/// Abbreviations whose dot never ends a sentence.
const ABBREVIATIONS: &[&str] = &["e.g.", "i.e.", "vs.", "mr.", "mrs.", "ms.", "dr."];

/// Sentences longer than this are candidates for a split at " but ".
const LONG_SENTENCE_WORDS: usize = 15;

/// Splits text into trimmed sentences, keeping their terminating punctuation.
/// A trailing fragment without a terminator is its own sentence; fragments with
/// no letters or digits (an emoji, a stray "...") stick to the sentence before them.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in TERMINATOR.find_iter(text) {
        let piece = text[start..m.end()].trim();
        if ends_with_abbreviation(piece) {
            continue;
        }
        push_sentence(&mut sentences, piece);
        start = m.end();
    }
    push_sentence(&mut sentences, text[start..].trim());
    sentences
}

fn ends_with_abbreviation(piece: &str) -> bool {
    let last = piece
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '"', '\''])
        .to_lowercase();
    ABBREVIATIONS.contains(&last.as_str())
}

fn push_sentence(sentences: &mut Vec<String>, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if piece.chars().any(char::is_alphanumeric) {
        sentences.push(piece.to_string());
    } else if let Some(last) = sentences.last_mut() {
        last.push(' ');
        last.push_str(piece);
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Randomly merges two adjacent sentences and/or splits one long sentence at " but ",
/// so sentence lengths stop looking uniform.
pub fn vary_sentence_structure<R: Rng + ?Sized>(
    text: &str,
    rng: &mut R,
    merge_probability: f64,
    split_probability: f64,
) -> String {
    let mut sentences = split_sentences(text);
    if sentences.len() < 2 {
        return text.trim().to_string();
    }

    let mut edited = false;
    if rng.gen_bool(merge_probability) {
        let idx = rng.gen_range(0..sentences.len() - 1);
        let second = sentences.remove(idx + 1);
        let first = sentences[idx].trim_end_matches(['.', '!', '?']).to_string();
        sentences[idx] = format!("{first} - {}", soften_start(&second));
        edited = true;
    }

    for i in 0..sentences.len() {
        if word_count(&sentences[i]) <= LONG_SENTENCE_WORDS {
            continue;
        }
        if !rng.gen_bool(split_probability) {
            continue;
        }
        if let Some((head, tail)) = split_at_but(&sentences[i]) {
            sentences[i] = head;
            sentences.insert(i + 1, tail);
            edited = true;
            break;
        }
    }

    if !edited {
        return text.trim().to_string();
    }
    sentences.join(" ")
}

/// Splits "x, but y." into ("x.", "But y."). Returns None when either side is empty.
fn split_at_but(sentence: &str) -> Option<(String, String)> {
    let m = BUT_SPLIT.find(sentence)?;
    let head = sentence[..m.start()].trim_end();
    let tail = sentence[m.end()..].trim_start();
    if head.is_empty() || tail.is_empty() {
        return None;
    }
    Some((format!("{head}."), format!("But {tail}")))
}

/// Lowercases the start of a sentence that is being joined onto another one.
fn soften_start(sentence: &str) -> String {
    let first_word = sentence.split_whitespace().next().unwrap_or("");
    if is_acronym(first_word) {
        sentence.to_string()
    } else {
        lowercase_first(sentence)
    }
}

/// Standard deviation of sentence word counts divided by their mean.
/// Higher reads as more human; 0.0 for fewer than two sentences.
pub fn burstiness_score(text: &str) -> f64 {
    let lengths: Vec<f64> = split_sentences(text)
        .iter()
        .map(|s| word_count(s) as f64)
        .collect();
    if lengths.len() < 2 {
        return 0.0;
    }

    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
    variance.sqrt() / mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_sentences_keeps_terminators() {
        let sentences = split_sentences("Love this. Really?! And the tail");
        assert_eq!(sentences, vec!["Love this.", "Really?!", "And the tail"]);
    }

    #[test]
    fn test_split_sentences_ignores_stray_punctuation() {
        assert_eq!(split_sentences("... Ok."), vec!["Ok."]);
    }

    #[test]
    fn test_split_sentences_ignores_inner_dots() {
        let cases: [(&str, &[&str]); 5] = [
            (
                "Revenue grew 3.5% this year. Great quarter.",
                &["Revenue grew 3.5% this year.", "Great quarter."],
            ),
            (
                "Small habits compound, e.g. daily reviews. Ship it.",
                &["Small habits compound, e.g. daily reviews.", "Ship it."],
            ),
            ("Read it on example.com before v2.1 lands.", &["Read it on example.com before v2.1 lands."]),
            ("Agreed (i.e. the hard way). Yes!", &["Agreed (i.e. the hard way).", "Yes!"]),
            ("Great post. 💯", &["Great post. 💯"]),
        ];
        for (text, expected) in cases {
            assert_eq!(split_sentences(text), expected, "text: {text}");
        }
    }

    #[test]
    fn test_unedited_text_is_returned_verbatim() {
        let mut rng = StdRng::seed_from_u64(2);
        let text = "Revenue grew 3.5% this year.  Great quarter for the team. 🚀";
        assert_eq!(vary_sentence_structure(text, &mut rng, 0.0, 0.0), text);
    }

    #[test]
    fn test_merge_keeps_decimals_intact() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = vary_sentence_structure("Churn fell to 2.5% here. The team loved it.", &mut rng, 1.0, 0.0);
        assert_eq!(out, "Churn fell to 2.5% here - the team loved it.");
    }

    #[test]
    fn test_single_sentence_is_left_alone() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            vary_sentence_structure("Just one sentence here.", &mut rng, 1.0, 1.0),
            "Just one sentence here."
        );
    }

    #[test]
    fn test_forced_merge_reduces_sentence_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = vary_sentence_structure("We shipped it. The team loved it.", &mut rng, 1.0, 0.0);
        assert_eq!(out, "We shipped it - the team loved it.");
        assert_eq!(split_sentences(&out).len(), 1);
    }

    #[test]
    fn test_forced_split_at_but() {
        let mut rng = StdRng::seed_from_u64(9);
        let text = "Short one. We spent the whole quarter rebuilding the billing pipeline from scratch, but the migration only took a weekend.";
        let out = vary_sentence_structure(text, &mut rng, 0.0, 1.0);
        assert_eq!(
            out,
            "Short one. We spent the whole quarter rebuilding the billing pipeline from scratch. But the migration only took a weekend."
        );
    }

    #[test]
    fn test_no_edits_when_probabilities_are_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        let text = "One. Two three. Four five six.";
        assert_eq!(vary_sentence_structure(text, &mut rng, 0.0, 0.0), text);
    }

    #[test]
    fn test_burstiness_uniform_is_zero() {
        assert_eq!(burstiness_score("One two. Three four. Five six."), 0.0);
    }

    #[test]
    fn test_burstiness_varied_is_positive() {
        let score = burstiness_score("Yes. This one is a much longer sentence with many words in it.");
        assert!(score > 0.5, "score was {score}");
    }

    #[test]
    fn test_burstiness_single_sentence_is_zero() {
        assert_eq!(burstiness_score("Only one sentence here"), 0.0);
    }
}
