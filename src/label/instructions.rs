//! Instruction extraction from lines 2–7.
//!
//! Two fields come out of this window: `additional_instructions`, a
//! semicolon-joined digest of route, meal timing, and a "FOR <reason>"
//! clause; and the free-text `instructions`, the first whole line that reads
//! like a dosing sentence. Both are optional half-weight fields.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const WINDOW: std::ops::RangeInclusive<usize> = 2..=7;

/// Administration route tokens, first hit wins.
static ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(BY\s+MOUTH|ORALLY|SUBLINGUAL(?:LY)?|TOPICALLY)\b").unwrap()
});

/// Meal-timing tokens, first hit wins.
static MEAL_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(WITH\s+(?:MEALS?|FOOD)|AFTER\s+MEALS?|BEFORE\s+MEALS?|(?:ON\s+AN?\s+)?EMPTY\s+STOMACH)\b")
        .unwrap()
});

/// "FOR <reason>" with the rest of the line as the reason.
static REASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFOR\s+([A-Za-z].*)$").unwrap());

/// Reasons that are really durations leaking through.
static DURATION_SHAPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d+\s+(?:DAYS?|WEEKS?|MONTHS?)|AS\s+NEE|UNTIL\b)").unwrap()
});

const REASON_LEN: std::ops::RangeInclusive<usize> = 4..=40;

/// A line that reads like the label's dosing sentence.
static DOSING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:TAKE|GIVE|SWALLOW|INJECT|APPLY|USE)\b").unwrap());

/// Route + meal timing + reason, joined with "; ".
pub fn extract_additional(lines: &CanonicalLines) -> FieldOutcome<String> {
    let text = lines.window(WINDOW);
    if text.is_empty() {
        return FieldOutcome::NotFound;
    }

    let mut parts: Vec<String> = Vec::new();

    if let Some(caps) = ROUTE.captures(&text) {
        parts.push(collapse(&caps[1]));
    }
    if let Some(caps) = MEAL_TIMING.captures(&text) {
        parts.push(collapse(&caps[1]));
    }
    if let Some(reason) = find_reason(lines) {
        parts.push(format!("FOR {reason}"));
    }

    if parts.is_empty() {
        FieldOutcome::NotFound
    } else {
        FieldOutcome::Found(parts.join("; "))
    }
}

/// First line in the window that starts with a dosing verb, as-is.
pub fn extract_free_text(lines: &CanonicalLines) -> FieldOutcome<String> {
    for line in lines.window_lines(WINDOW) {
        if DOSING_LINE.is_match(line) {
            return FieldOutcome::Found(collapse(line));
        }
    }
    FieldOutcome::NotFound
}

/// The "FOR <reason>" clause: per-line so the reason stops at the line
/// break, cut at a slash (OCR tail noise), length-bounded, and rejected
/// when it is duration text in disguise.
fn find_reason(lines: &CanonicalLines) -> Option<String> {
    for line in lines.window_lines(WINDOW) {
        let Some(caps) = REASON.captures(line) else {
            continue;
        };
        let mut reason = caps[1].to_string();
        if let Some(slash) = reason.find('/') {
            reason.truncate(slash);
        }
        let reason = collapse(reason.trim_matches(|c: char| !c.is_alphabetic()));
        if REASON_LEN.contains(&reason.len()) && !DURATION_SHAPED.is_match(&reason) {
            return Some(reason);
        }
    }
    None
}

fn collapse(s: &str) -> String {
    s.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::types::CanonicalLines;

    fn label(body: &[&str]) -> CanonicalLines {
        let mut lines = vec!["JOHN SMITH", "DOXYCYCLINE 100MG"];
        lines.extend_from_slice(body);
        CanonicalLines::new(lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn route_only() {
        let lines = label(&["TAKE 1 TABLET BY MOUTH"]);
        assert_eq!(
            extract_additional(&lines),
            FieldOutcome::Found("BY MOUTH".into())
        );
    }

    #[test]
    fn route_meal_and_reason() {
        let lines = label(&["TAKE 1 TABLET BY MOUTH WITH FOOD", "FOR ANXIETY"]);
        assert_eq!(
            extract_additional(&lines),
            FieldOutcome::Found("BY MOUTH; WITH FOOD; FOR ANXIETY".into())
        );
    }

    #[test]
    fn reason_cut_at_slash() {
        let lines = label(&["FOR NAUSEA/VOM1T"]);
        assert_eq!(
            extract_additional(&lines),
            FieldOutcome::Found("FOR NAUSEA".into())
        );
    }

    #[test]
    fn duration_is_not_a_reason() {
        let lines = label(&["FOR 10 DAYS"]);
        assert_eq!(extract_additional(&lines), FieldOutcome::NotFound);
    }

    #[test]
    fn reason_length_bounds() {
        let lines = label(&["FOR AN EXTREMELY LONG DESCRIPTION OF A CONDITION THAT KEEPS GOING"]);
        assert_eq!(extract_additional(&lines), FieldOutcome::NotFound);
        let lines = label(&["FOR RA"]);
        assert_eq!(extract_additional(&lines), FieldOutcome::NotFound);
    }

    #[test]
    fn meal_timing_variants() {
        for (text, expected) in [
            ("TAKE WITH MEALS", "WITH MEALS"),
            ("TAKE AFTER MEALS", "AFTER MEALS"),
            ("BEFORE MEALS", "BEFORE MEALS"),
            ("ON AN EMPTY STOMACH", "ON AN EMPTY STOMACH"),
        ] {
            let lines = label(&[text]);
            assert_eq!(
                extract_additional(&lines),
                FieldOutcome::Found(expected.into()),
                "{text}"
            );
        }
    }

    #[test]
    fn free_text_takes_first_dosing_line() {
        let lines = label(&["SHAKE WELL", "TAKE 1 TABLET", "TWICE DAILY"]);
        assert_eq!(
            extract_free_text(&lines),
            FieldOutcome::Found("TAKE 1 TABLET".into())
        );
    }

    #[test]
    fn free_text_requires_leading_verb() {
        let lines = label(&["1 TABLET TO TAKE"]);
        assert_eq!(extract_free_text(&lines), FieldOutcome::NotFound);
    }

    #[test]
    fn empty_window() {
        let lines = label(&[]);
        assert_eq!(extract_additional(&lines), FieldOutcome::NotFound);
        assert_eq!(extract_free_text(&lines), FieldOutcome::NotFound);
    }
}
