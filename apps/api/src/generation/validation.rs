//! Rule checks for a finished comment against the user's voice profile.
//!
//! Nothing here rejects a comment; the report travels with it so the caller
//! can show or rank by `quality_score`.

use serde::{Deserialize, Serialize};

use crate::humanizer::burstiness::word_count;
use crate::voice::VoiceProfile;

const ISSUE_PENALTY: i32 = 30;
const WARNING_PENALTY: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub word_count: usize,
    pub quality_score: u32,
    pub target_range: String,
    pub strict_valid: bool,
}

pub fn validate_comment(text: &str, profile: &VoiceProfile) -> ValidationReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let words = word_count(text);
    let avg = profile.avg_comment_length;
    let (min_len, max_len) = match profile.length_range {
        Some(range) => (range.min, range.max),
        None => (avg.saturating_sub(25).max(20), avg + 25),
    };
    let strict_min = avg.saturating_sub(35).max(15);
    let strict_max = avg + 35;

    if words < strict_min || words > strict_max {
        issues.push(format!("Length {words} outside range {min_len}-{max_len}"));
    } else if words < min_len || words > max_len {
        warnings.push(format!("Length {words} slightly outside target {min_len}-{max_len}"));
    }

    if profile.question_marks == 0 && text.contains('?') {
        issues.push("Contains question mark (not allowed)".to_string());
    }
    if profile.exclamation_marks == 0 && text.contains('!') {
        issues.push("Contains exclamation mark (not allowed)".to_string());
    }

    if !profile.common_connectives.is_empty() {
        let lower = text.to_lowercase();
        let found = profile
            .common_connectives
            .iter()
            .any(|c| lower.contains(&c.to_lowercase()));
        if !found {
            let suggestions: Vec<&str> = profile
                .common_connectives
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            warnings.push(format!("Consider using connectives: {}", suggestions.join(", ")));
        }
    }

    let penalty = ISSUE_PENALTY * issues.len() as i32 + WARNING_PENALTY * warnings.len() as i32;
    let quality_score = (100 - penalty).max(0) as u32;

    ValidationReport {
        valid: issues.is_empty(),
        strict_valid: issues.is_empty() && warnings.is_empty(),
        word_count: words,
        quality_score,
        target_range: format!("{min_len}-{max_len}"),
        issues,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanizer::LengthRange;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn profile(avg: usize) -> VoiceProfile {
        VoiceProfile {
            avg_comment_length: avg,
            ..VoiceProfile::default()
        }
    }

    #[test]
    fn test_in_range_comment_is_strictly_valid() {
        let report = validate_comment(&words(40), &profile(40));
        assert!(report.valid);
        assert!(report.strict_valid);
        assert_eq!(report.quality_score, 100);
        assert_eq!(report.target_range, "20-65");
    }

    #[test]
    fn test_slightly_long_is_a_warning() {
        // Lenient band 20-65, strict band 15-75.
        let report = validate_comment(&words(70), &profile(40));
        assert!(report.valid);
        assert!(!report.strict_valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.quality_score, 90);
    }

    #[test]
    fn test_way_too_short_is_an_issue() {
        let report = validate_comment(&words(5), &profile(40));
        assert!(!report.valid);
        assert_eq!(report.quality_score, 70);
    }

    #[test]
    fn test_profile_range_overrides_lenient_band() {
        let mut p = profile(40);
        p.length_range = Some(LengthRange { min: 35, max: 45 });
        let report = validate_comment(&words(30), &p);
        assert_eq!(report.target_range, "35-45");
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_disallowed_punctuation_and_missing_connective() {
        let mut p = profile(10);
        p.common_connectives = vec!["and".to_string(), "because".to_string()];
        let text = format!("{}? {}!", words(10), words(10));
        let report = validate_comment(&text, &p);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.quality_score, 30);
    }

    #[test]
    fn test_quality_floors_at_zero() {
        let mut p = profile(100);
        p.common_connectives = vec!["because".to_string()];
        let report = validate_comment("Why? No!", &p);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.quality_score, 0);
    }
}
