//! Confidence scoring: how much of the expected record was recovered.
//!
//! Required fields count 1 toward both the attempted total and, when found,
//! the succeeded total. The two optional instruction fields add 0.5 to the
//! succeeded total only and never to the attempted total — that asymmetry is
//! inherited from the original scorer and callers depend on its scale, so
//! the final ratio is clamped at 100 rather than re-weighted.

/// Accumulates per-field outcomes during one parse.
#[derive(Debug, Default)]
pub struct ConfidenceTally {
    attempted: f64,
    succeeded: f64,
}

/// Weight carried by an optional field when found.
const OPTIONAL_WEIGHT: f64 = 0.5;

impl ConfidenceTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required field was attempted; `found` says whether it succeeded.
    pub fn record_required(&mut self, found: bool) {
        self.attempted += 1.0;
        if found {
            self.succeeded += 1.0;
        }
    }

    /// An optional field contributes to the numerator only.
    pub fn record_optional(&mut self, found: bool) {
        if found {
            self.succeeded += OPTIONAL_WEIGHT;
        }
    }

    /// Final 0–100 score; 0 when nothing was attempted.
    pub fn score(&self) -> f64 {
        if self.attempted == 0.0 {
            return 0.0;
        }
        (self.succeeded / self.attempted * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tally_scores_zero() {
        assert_eq!(ConfidenceTally::new().score(), 0.0);
    }

    #[test]
    fn all_required_found_is_one_hundred() {
        let mut tally = ConfidenceTally::new();
        for _ in 0..12 {
            tally.record_required(true);
        }
        assert!((tally.score() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_extraction_scales_proportionally() {
        let mut tally = ConfidenceTally::new();
        for _ in 0..9 {
            tally.record_required(true);
        }
        for _ in 0..3 {
            tally.record_required(false);
        }
        assert!((tally.score() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn optional_fields_boost_numerator_only() {
        let mut tally = ConfidenceTally::new();
        tally.record_required(true);
        tally.record_required(false);
        tally.record_optional(true);
        // (1 + 0.5) / 2 = 75%
        assert!((tally.score() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_optional_changes_nothing() {
        let mut tally = ConfidenceTally::new();
        tally.record_required(true);
        tally.record_optional(false);
        assert!((tally.score() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_is_clamped_at_one_hundred() {
        let mut tally = ConfidenceTally::new();
        tally.record_required(true);
        tally.record_optional(true);
        tally.record_optional(true);
        assert!((tally.score() - 100.0).abs() < f64::EPSILON);
    }
}
