//! Strength extraction from canonical line 1.
//!
//! The strength rides on the drug-name line ("DOXYCYCLINE 100MG"), so only
//! that line is searched. Values outside 1–10000 are OCR artifacts.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

static STRENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(MG|MCG|G|ML|UNITS?)\b").unwrap()
});

const VALUE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10000.0;

pub fn extract(lines: &CanonicalLines) -> FieldOutcome<String> {
    let Some(line) = lines.line(1) else {
        return FieldOutcome::NotFound;
    };
    let Some(caps) = STRENGTH.captures(line) else {
        return FieldOutcome::NotFound;
    };
    let Ok(value) = caps[1].parse::<f64>() else {
        return FieldOutcome::NotFound;
    };
    if !VALUE_RANGE.contains(&value) {
        return FieldOutcome::NotFound;
    }
    FieldOutcome::Found(format!("{}{}", &caps[1], caps[2].to_uppercase()))
}
