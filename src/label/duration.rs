//! Duration extraction ("10 DAYS", "AS NEEDED") from lines 2–7.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const WINDOW: std::ops::RangeInclusive<usize> = 2..=7;

/// "AS NEEDED", "PRN", and OCR-truncated "AS NEE[D]"; always wins.
static AS_NEEDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAS\s+NEE[A-Z]*|\bPRN\b").unwrap());

/// "<n> DAYS/WEEKS/MONTHS", tolerating a garbled "FOR" prefix ("OR", "TOR").
static COUNTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[FT]?OR\s+)?(\d+)\s+(DAYS?|WEEKS?|MONTHS?)\b").unwrap()
});

static DAY_SUPPLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s+DAY\s+SUPPLY\b").unwrap());

static UNTIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNTIL\s+(GONE|FINISHED)\b").unwrap());

pub fn extract(lines: &CanonicalLines) -> FieldOutcome<String> {
    let text = lines.window(WINDOW);
    if text.is_empty() {
        return FieldOutcome::NotFound;
    }

    if AS_NEEDED.is_match(&text) {
        return FieldOutcome::Found("AS NEEDED".into());
    }

    if let Some(caps) = DAY_SUPPLY.captures(&text) {
        return FieldOutcome::Found(format!("{} DAY SUPPLY", &caps[1]));
    }

    if let Some(caps) = COUNTED.captures(&text) {
        return FieldOutcome::Found(format!("{} {}", &caps[1], caps[2].to_uppercase()));
    }

    if let Some(caps) = UNTIL.captures(&text) {
        return FieldOutcome::Found(format!("UNTIL {}", caps[1].to_uppercase()));
    }

    FieldOutcome::NotFound
}
