//! Rx-number extraction from lines 6–8.
//!
//! Accepts an explicit "RX# ..." prefix or the bare Walgreens-style
//! "<store>-<script>" digit pair. OCR swaps the dash for a slash often
//! enough that both are normalized to a dash.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const WINDOW: std::ops::RangeInclusive<usize> = 6..=8;

static EXPLICIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:RX\s*#|RX\s*NUMBER|PRESCRIPTION\s*#?)\s*:?\s*([0-9][0-9/-]{5,15})")
        .unwrap()
});

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{7,10})[-/](\d{3,5})\b").unwrap());

/// At least this many digits make a plausible Rx number.
const MIN_DIGITS: usize = 7;

pub fn extract(lines: &CanonicalLines) -> FieldOutcome<String> {
    for line in lines.window_lines(WINDOW) {
        if let Some(caps) = EXPLICIT.captures(line) {
            if let Some(number) = normalize(&caps[1]) {
                return FieldOutcome::Found(number);
            }
        }
        if let Some(caps) = BARE.captures(line) {
            if let Some(number) = normalize(&format!("{}-{}", &caps[1], &caps[2])) {
                return FieldOutcome::Found(number);
            }
        }
    }
    FieldOutcome::NotFound
}

/// Slash→dash normalization plus the digit-count floor.
fn normalize(raw: &str) -> Option<String> {
    let number = raw.trim_matches(|c: char| !c.is_ascii_digit()).replace('/', "-");
    let digits = number.chars().filter(char::is_ascii_digit).count();
    (digits >= MIN_DIGITS).then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::types::CanonicalLines;

    fn at_window(line: &str) -> CanonicalLines {
        let mut lines = vec!["JOHN SMITH".to_string(); 6];
        lines.push(line.to_string());
        CanonicalLines::new(lines)
    }

    #[test]
    fn explicit_rx_prefix() {
        assert_eq!(
            extract(&at_window("RX# 1234567-10613")),
            FieldOutcome::Found("1234567-10613".into())
        );
        assert_eq!(
            extract(&at_window("RX NUMBER: 3570300-03233")),
            FieldOutcome::Found("3570300-03233".into())
        );
        assert_eq!(
            extract(&at_window("PRESCRIPTION# 1363881-10613")),
            FieldOutcome::Found("1363881-10613".into())
        );
    }

    #[test]
    fn bare_store_script_pair() {
        assert_eq!(
            extract(&at_window("1302675-10613")),
            FieldOutcome::Found("1302675-10613".into())
        );
    }

    #[test]
    fn slash_normalized_to_dash() {
        assert_eq!(
            extract(&at_window("1319383/10613")),
            FieldOutcome::Found("1319383-10613".into())
        );
    }

    #[test]
    fn too_few_digits_rejected() {
        assert_eq!(extract(&at_window("RX# 12345")), FieldOutcome::NotFound);
    }

    #[test]
    fn outside_window_ignored() {
        // Rx number on line 2 is outside the 6–8 window.
        let lines = CanonicalLines::new(vec![
            "JOHN SMITH".into(),
            "DOXYCYCLINE 100MG".into(),
            "RX# 1234567-10613".into(),
        ]);
        assert_eq!(extract(&lines), FieldOutcome::NotFound);
    }

    #[test]
    fn short_sequence_is_not_found() {
        assert_eq!(
            extract(&CanonicalLines::new(vec!["JOHN SMITH".into()])),
            FieldOutcome::NotFound
        );
    }
}
