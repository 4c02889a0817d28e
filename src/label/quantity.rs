//! Quantity extraction from lines 7–9.
//!
//! On most labels the quantity is its own short numeric line. OCR regularly
//! turns the "QTY" prefix into a two-letter smudge (RY, TY, PY, AV, W), so
//! those are accepted as prefixes too.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const WINDOW: std::ops::RangeInclusive<usize> = 7..=9;

/// A line that is nothing but a 1–3 digit count.
static BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,3})$").unwrap());

/// Garbled "QTY" prefixes.
static GARBLED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:RY|TY|PY|AV|W)\s*[:.]?\s*(\d{1,3})\b").unwrap());

static EXPLICIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:QTY|QUANTITY|#)\s*[:.]?\s*(\d{1,4})\b").unwrap());

const VALUE_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

pub fn extract(lines: &CanonicalLines) -> FieldOutcome<String> {
    for line in lines.window_lines(WINDOW) {
        for pattern in [&*BARE, &*GARBLED_PREFIX, &*EXPLICIT] {
            if let Some(caps) = pattern.captures(line) {
                if let Ok(value) = caps[1].parse::<u32>() {
                    if VALUE_RANGE.contains(&value) {
                        return FieldOutcome::Found(value.to_string());
                    }
                }
            }
        }
    }
    FieldOutcome::NotFound
}
