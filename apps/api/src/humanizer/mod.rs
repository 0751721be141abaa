//! Humanization pipeline for LLM-written comments.
//!
//! Stages run in a fixed order: formal transitions, connectors, clichés,
//! contractions, sentence variation, conversational markers, imperfections,
//! punctuation rules and length trimming. The table-driven stages are pure; the
//! randomized ones draw from the `Humanizer`'s own RNG, so a seeded humanizer
//! always produces the same output for the same input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod burstiness;
pub mod length;
pub mod markers;
pub mod punctuation;
pub mod substitutions;
mod tables;

pub use burstiness::burstiness_score;

/// Word-count band the user actually writes in, when the profile records one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

/// The parts of a voice profile the pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleHints {
    pub avg_comment_length: usize,
    pub length_range: Option<LengthRange>,
    pub tone: String,
    pub typical_comment_openings: Vec<String>,
    pub emoji_usage: String,
    pub question_marks: u32,
    pub exclamation_marks: u32,
    pub allows_lowercase_start: bool,
}

impl Default for StyleHints {
    fn default() -> Self {
        Self {
            avg_comment_length: 40,
            length_range: None,
            tone: "professional".to_string(),
            typical_comment_openings: Vec::new(),
            emoji_usage: "none".to_string(),
            question_marks: 0,
            exclamation_marks: 0,
            allows_lowercase_start: false,
        }
    }
}

impl StyleHints {
    pub fn is_casual(&self) -> bool {
        self.allows_lowercase_start || self.tone.to_lowercase().contains("casual")
    }

    pub fn uses_emoji(&self) -> bool {
        let usage = self.emoji_usage.to_lowercase();
        usage.contains("moderate") || usage.contains("high") || usage.contains("frequent")
    }
}

/// Probabilities for each randomized edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizeOptions {
    pub merge_probability: f64,
    pub split_probability: f64,
    pub starter_probability: f64,
    pub user_opening_probability: f64,
    pub filler_probability: f64,
    pub drop_period_probability: f64,
    pub double_space_probability: f64,
    pub lowercase_probability: f64,
    pub ellipsis_probability: f64,
    pub emoji_probability: f64,
}

impl Default for HumanizeOptions {
    fn default() -> Self {
        Self {
            merge_probability: 0.30,
            split_probability: 0.25,
            starter_probability: 0.30,
            user_opening_probability: 0.60,
            filler_probability: 0.20,
            drop_period_probability: 0.40,
            double_space_probability: 0.30,
            lowercase_probability: 0.25,
            ellipsis_probability: 0.15,
            emoji_probability: 0.20,
        }
    }
}

impl HumanizeOptions {
    /// Every randomized edit disabled; only the table-driven stages run.
    pub fn never() -> Self {
        Self {
            merge_probability: 0.0,
            split_probability: 0.0,
            starter_probability: 0.0,
            user_opening_probability: 0.0,
            filler_probability: 0.0,
            drop_period_probability: 0.0,
            double_space_probability: 0.0,
            lowercase_probability: 0.0,
            ellipsis_probability: 0.0,
            emoji_probability: 0.0,
        }
    }

    /// Clamps every probability into [0, 1] so `gen_bool` never panics on caller input.
    pub fn clamped(mut self) -> Self {
        for p in [
            &mut self.merge_probability,
            &mut self.split_probability,
            &mut self.starter_probability,
            &mut self.user_opening_probability,
            &mut self.filler_probability,
            &mut self.drop_period_probability,
            &mut self.double_space_probability,
            &mut self.lowercase_probability,
            &mut self.ellipsis_probability,
            &mut self.emoji_probability,
        ] {
            *p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        }
        self
    }
}

pub struct Humanizer<R = StdRng> {
    rng: R,
    options: HumanizeOptions,
}

impl Humanizer<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), HumanizeOptions::default())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), HumanizeOptions::default())
    }
}

impl Default for Humanizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Humanizer<R> {
    pub fn with_rng(rng: R, options: HumanizeOptions) -> Self {
        Self {
            rng,
            options: options.clamped(),
        }
    }

    pub fn options(&self) -> &HumanizeOptions {
        &self.options
    }

    /// Runs the full pipeline. Non-empty input never yields empty output.
    pub fn humanize(&mut self, text: &str, style: &StyleHints) -> String {
        let original = text.trim();
        if original.is_empty() {
            return String::new();
        }

        let mut out = substitutions::remove_formal_transitions(original);
        out = substitutions::casualize_connectors(&out, &mut self.rng);
        out = substitutions::remove_ai_cliches(&out);
        out = substitutions::apply_contractions(&out);
        out = burstiness::vary_sentence_structure(
            &out,
            &mut self.rng,
            self.options.merge_probability,
            self.options.split_probability,
        );
        out = markers::add_conversational_markers(&out, style, &self.options, &mut self.rng);
        out = markers::add_natural_imperfections(&out, style, &self.options, &mut self.rng);
        out = punctuation::enforce_punctuation(&out, style);
        out = length::adjust_to_length(&out, style);

        let out = out.trim();
        if out.is_empty() {
            debug!("Humanizer produced empty text, returning the trimmed input");
            return original.to_string();
        }
        out.to_string()
    }
}
