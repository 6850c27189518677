use regex::Regex;

/// Floor and ceiling of the generic-result confidence band. Curated catalog
/// entries carry independent fixed scores above this ceiling.
pub const GENERIC_MIN: f64 = 0.1;
pub const GENERIC_MAX: f64 = 0.8;

const BASE_SCORE: f64 = 0.5;

/// Scores how much an arbitrary product-name string looks like a real,
/// searchable product identifier. Pure and deterministic: same input, same
/// output. Regexes are compiled once at construction; the model is a plain
/// value, not process-wide state.
#[derive(Debug, Clone)]
pub struct ConfidenceModel {
    well_formed: Regex,
    digit_run: Regex,
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceModel {
    pub fn new() -> Self {
        Self {
            // Input is lowercased before matching, so [a-z] suffices.
            well_formed: Regex::new(r"^[a-z][a-z0-9\-_.]*$").expect("static pattern"),
            digit_run: Regex::new(r"[0-9]{4,}").expect("static pattern"),
        }
    }

    /// Score a product name into [GENERIC_MIN, GENERIC_MAX].
    ///
    /// Normalization (trim + lowercase) affects only the score; callers echo
    /// the original string back in results.
    pub fn score(&self, product_name: &str) -> f64 {
        let normalized = product_name.trim().to_lowercase();
        self.score_normalized(&normalized)
    }

    /// Score a name that has already been trimmed and lowercased.
    pub fn score_normalized(&self, normalized: &str) -> f64 {
        let mut score = BASE_SCORE;
        let len = normalized.chars().count();

        if len >= 3 && self.well_formed.is_match(normalized) {
            score += 0.2;
        }

        if len < 2 || self.digit_run.is_match(normalized) {
            score -= 0.1;
        }

        score.clamp(GENERIC_MIN, GENERIC_MAX)
    }
}
