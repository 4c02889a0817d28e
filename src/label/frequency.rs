//! Frequency extraction ("TWICE DAILY", "EVERY 6 HOURS") from lines 2–7.
//!
//! OCR mangles this field more than any other: "DAILY" arrives as "DAL",
//! "DAI)" or "PY", "EVERY" loses its E, and pharmacies also print bare
//! medical abbreviations (BID, PRN). Patterns run most-specific-first and
//! every hit goes through one normalization pass.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const WINDOW: std::ops::RangeInclusive<usize> = 2..=7;

/// OCR-tolerant spellings of a trailing "daily".
const DAILY_SUFFIX: &str = r"(?:DAILY\)?|PER\s+DAY|A\s+DAY|DAL|DAI\)?|PY|DAY)";

struct FrequencyPattern {
    regex: Regex,
    /// Build the canonical phrase from the captures.
    transform: fn(&regex::Captures<'_>) -> String,
}

static PATTERNS: LazyLock<Vec<FrequencyPattern>> = LazyLock::new(|| {
    vec![
        // "TWICE DAILY", "THREE TIMES PER DAY", OCR-garbled suffixes included
        FrequencyPattern {
            regex: Regex::new(&format!(
                r"(?i)\b(ONCE|TWICE|THREE\s+TIMES|FOUR\s+TIMES)\s+{DAILY_SUFFIX}"
            ))
            .unwrap(),
            transform: |caps| format!("{} DAILY", collapse_spaces(&caps[1])),
        },
        // "3 TIMES DAILY"
        FrequencyPattern {
            regex: Regex::new(&format!(r"(?i)\b(\d+)\s+TIMES\s+{DAILY_SUFFIX}")).unwrap(),
            transform: |caps| format!("{} TIMES DAILY", &caps[1]),
        },
        // "EVERY 6 HOURS", "EVERY 6 TO 8 HOURS"; OCR often drops the E of EVERY
        FrequencyPattern {
            regex: Regex::new(r"(?i)\b(?:E?VERY)\s+(\d+)(?:\s+TO\s+(\d+))?\s+HOURS?\b").unwrap(),
            transform: |caps| match caps.get(2) {
                Some(upper) => format!("EVERY {} TO {} HOURS", &caps[1], upper.as_str()),
                None => format!("EVERY {} HOURS", &caps[1]),
            },
        },
        // "EVERY MORNING" / "EVERY NIGHT" / "EVERY EVENING"
        FrequencyPattern {
            regex: Regex::new(r"(?i)\b(?:E?VERY)\s+(MORNING|NIGHT|EVENING)\b").unwrap(),
            transform: |caps| format!("EVERY {}", caps[1].to_uppercase()),
        },
        // Medical abbreviations
        FrequencyPattern {
            regex: Regex::new(r"(?i)\b(BID|TID|QID|QD|PRN|HS|AC|PC)\b").unwrap(),
            transform: |caps| caps[1].to_uppercase(),
        },
        // Bare schedule words
        FrequencyPattern {
            regex: Regex::new(r"(?i)\b(DAILY|WEEKLY|MONTHLY)\b").unwrap(),
            transform: |caps| caps[1].to_uppercase(),
        },
        // Bare "<n> HOURS" implies "every"
        FrequencyPattern {
            regex: Regex::new(r"(?i)\b(\d+)\s+HOURS\b").unwrap(),
            transform: |caps| format!("{} HOURS", &caps[1]),
        },
    ]
});

fn collapse_spaces(s: &str) -> String {
    s.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract(lines: &CanonicalLines) -> FieldOutcome<String> {
    let text = lines.window(WINDOW);
    if text.is_empty() {
        return FieldOutcome::NotFound;
    }

    for pattern in PATTERNS.iter() {
        if let Some(caps) = pattern.regex.captures(&text) {
            return FieldOutcome::Found(normalize(&(pattern.transform)(&caps)));
        }
    }

    FieldOutcome::NotFound
}

/// Repair truncations and artifacts in a matched frequency phrase and expand
/// medical abbreviations to full wording. Output is uppercase.
pub(crate) fn normalize(raw: &str) -> String {
    let mut text = collapse_spaces(raw);

    // Joined-line artifacts: the tail of "BY MOUTH" glued to the front.
    for artifact in ["MOUTH ", "BY "] {
        if let Some(stripped) = text.strip_prefix(artifact) {
            text = stripped.to_string();
        }
    }

    text = match text.as_str() {
        "BID" => "TWICE DAILY".into(),
        "TID" => "THREE TIMES DAILY".into(),
        "QID" => "FOUR TIMES DAILY".into(),
        "QD" => "ONCE DAILY".into(),
        "PRN" => "AS NEEDED".into(),
        "HS" => "AT BEDTIME".into(),
        "AC" => "BEFORE MEALS".into(),
        "PC" => "AFTER MEALS".into(),
        _ => text,
    };

    // Truncated "DAILY" after a count word.
    if matches!(text.as_str(), "ONCE" | "TWICE" | "THREE TIMES" | "FOUR TIMES") {
        text.push_str(" DAILY");
    }

    // Dropped "EVERY" before an hour interval.
    static HOURS_ONLY: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d+(?:\s+TO\s+\d+)?\s+HOURS$").unwrap());
    if HOURS_ONLY.is_match(&text) {
        text = format!("EVERY {text}");
    }

    text
}
