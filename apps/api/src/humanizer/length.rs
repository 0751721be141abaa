use crate::humanizer::burstiness::{split_sentences, word_count};
use crate::humanizer::StyleHints;

/// Allowed drift around the user's average comment length.
const LENGTH_VARIANCE: f64 = 0.3;

/// Upper word bound for a comment: the profile's explicit range when it has one,
/// otherwise the average plus 30%.
pub fn max_words(style: &StyleHints) -> usize {
    match &style.length_range {
        Some(range) if range.max > 0 => range.max,
        _ => (style.avg_comment_length as f64 * (1.0 + LENGTH_VARIANCE)) as usize,
    }
}

/// Trims over-long text to whole leading sentences. Short text is never padded,
/// and text whose first sentence alone is too long comes back unchanged. Trailing
/// symbols such as an appended emoji survive the trim.
pub fn adjust_to_length(text: &str, style: &StyleHints) -> String {
    let max = max_words(style);
    if max == 0 || word_count(text) <= max {
        return text.to_string();
    }

    let (body, tail) = split_trailing_symbols(text);
    let budget = max.saturating_sub(word_count(tail));

    let mut kept: Vec<String> = Vec::new();
    let mut total = 0;
    for sentence in split_sentences(body) {
        let words = word_count(&sentence);
        if total + words > budget {
            break;
        }
        total += words;
        kept.push(sentence);
    }

    if kept.is_empty() {
        tracing::debug!(max, "First sentence exceeds the length band, leaving text as is");
        return text.to_string();
    }
    if !tail.is_empty() {
        kept.push(tail.to_string());
    }
    kept.join(" ")
}

/// Splits off the trailing words that hold no letters or digits ("🚀", "!!").
fn split_trailing_symbols(text: &str) -> (&str, &str) {
    let trimmed = text.trim_end();
    let mut body = trimmed;
    while let Some(pos) = body.rfind(char::is_whitespace) {
        if body[pos..].chars().any(char::is_alphanumeric) {
            break;
        }
        body = body[..pos].trim_end();
    }
    (body, trimmed[body.len()..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanizer::LengthRange;

    fn style_with_avg(avg: usize) -> StyleHints {
        StyleHints {
            avg_comment_length: avg,
            ..StyleHints::default()
        }
    }

    #[test]
    fn test_max_words_uses_thirty_percent_band() {
        assert_eq!(max_words(&style_with_avg(40)), 52);
        assert_eq!(max_words(&style_with_avg(10)), 13);
    }

    #[test]
    fn test_explicit_range_wins() {
        let style = StyleHints {
            length_range: Some(LengthRange { min: 5, max: 8 }),
            ..style_with_avg(40)
        };
        assert_eq!(max_words(&style), 8);
    }

    #[test]
    fn test_short_text_is_not_padded() {
        assert_eq!(adjust_to_length("Too short.", &style_with_avg(40)), "Too short.");
    }

    #[test]
    fn test_long_text_keeps_whole_sentences() {
        // avg 5 → max 6 words
        let text = "One two three. Four five six. Seven eight nine.";
        assert_eq!(adjust_to_length(text, &style_with_avg(5)), "One two three. Four five six.");
    }

    #[test]
    fn test_trailing_emoji_survives_trim() {
        // avg 6 → max 7 words, one of them the emoji
        let text = "One two three. Four five six. Seven eight nine. 💯";
        assert_eq!(adjust_to_length(text, &style_with_avg(6)), "One two three. Four five six. 💯");
    }

    #[test]
    fn test_split_trailing_symbols() {
        assert_eq!(split_trailing_symbols("Nice one 🚀 🔥 "), ("Nice one", "🚀 🔥"));
        assert_eq!(split_trailing_symbols("Makes you think..."), ("Makes you think...", ""));
        assert_eq!(split_trailing_symbols("🚀"), ("🚀", ""));
    }

    #[test]
    fn test_oversized_first_sentence_is_left_alone() {
        let text = "This opening sentence alone is already far too long. Short.";
        assert_eq!(adjust_to_length(text, &style_with_avg(3)), text);
    }
}
