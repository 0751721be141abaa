use once_cell::sync::Lazy;
use regex::Regex;

use crate::humanizer::StyleHints;

static FOUR_OR_MORE_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{4,}").unwrap());
static TWO_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[^.])\.\.([^.]|$)").unwrap());
static DOT_AFTER_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"([!?])\.+").unwrap());

/// Replaces punctuation the user never uses and collapses terminator runs.
/// A count of zero for `question_marks` or `exclamation_marks` means "never".
pub fn enforce_punctuation(text: &str, style: &StyleHints) -> String {
    let mut out = text.to_string();
    if style.question_marks == 0 {
        out = out.replace('?', ".");
    }
    if style.exclamation_marks == 0 {
        out = out.replace('!', ".");
    }

    out = DOT_AFTER_MARK.replace_all(&out, "$1").into_owned();
    out = FOUR_OR_MORE_DOTS.replace_all(&out, "...").into_owned();
    // two passes: overlapping matches such as "a..b..c" need the second one
    for _ in 0..2 {
        out = TWO_DOTS.replace_all(&out, "$1.$2").into_owned();
    }
    out
}
