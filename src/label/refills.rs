//! Refill count (lines 7–9) and refill-before date (lines 5–9).
//!
//! The refill line suffers predictable digit/letter confusion: B for 8,
//! S for 5, O for 0, and an all-letter P/O/Y/W smear where "NO" used to be.
//! Corrections are enumerated, not guessed.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const REFILLS_WINDOW: std::ops::RangeInclusive<usize> = 7..=9;
const DATE_KEYWORD_WINDOW: std::ops::RangeInclusive<usize> = 5..=8;
const DATE_FALLBACK_WINDOW: std::ops::RangeInclusive<usize> = 5..=9;

static NO_REFILLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNO\s+REFILLS?\b").unwrap());

static PARTIAL_REFILL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPARTIAL\s+REFILLS?\b").unwrap());

/// A short run (possibly OCR-confused letters) before a garbled "REFILLS".
static COUNT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([0-9BSOPYW]{1,2})\s+REF[A-Z]*\b").unwrap());

/// "REFILLS: 3" with the count after the token.
static COUNT_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bREFILLS?\s*[:.]?\s*(\d{1,2})\b").unwrap());

const COUNT_RANGE: std::ops::RangeInclusive<u32> = 0..=99;

pub fn extract_refills(lines: &CanonicalLines) -> FieldOutcome<String> {
    let text = lines.window(REFILLS_WINDOW);
    if text.is_empty() {
        return FieldOutcome::NotFound;
    }

    if NO_REFILLS.is_match(&text) {
        return FieldOutcome::Found("NO REFILLS".into());
    }
    if PARTIAL_REFILL.is_match(&text) {
        return FieldOutcome::Found("PARTIAL REFILL".into());
    }

    if let Some(caps) = COUNT_RUN.captures(&text) {
        let run = caps[1].to_uppercase();
        // A pure P/O/Y/W smear is an unreadable "NO".
        if !run.is_empty() && run.chars().all(|c| matches!(c, 'P' | 'O' | 'Y' | 'W')) {
            return FieldOutcome::Found("NO REFILLS".into());
        }
        if let Some(count) = correct_digits(&run) {
            if COUNT_RANGE.contains(&count) {
                return FieldOutcome::Found(count.to_string());
            }
        }
    }

    if let Some(caps) = COUNT_AFTER.captures(&text) {
        if let Ok(count) = caps[1].parse::<u32>() {
            if COUNT_RANGE.contains(&count) {
                return FieldOutcome::Found(count.to_string());
            }
        }
    }

    FieldOutcome::NotFound
}

/// Map the enumerated OCR letter confusions back to digits.
fn correct_digits(run: &str) -> Option<u32> {
    let corrected: String = run
        .chars()
        .map(|c| match c {
            'B' => '8',
            'S' => '5',
            'O' => '0',
            other => other,
        })
        .collect();
    if corrected.chars().all(|c| c.is_ascii_digit()) {
        corrected.parse().ok()
    } else {
        None
    }
}

static DATE: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}";

/// "(REFILLS) BEFORE/BY/VALID UNTIL/EXPIRES <date>".
static DATE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:REF[A-Z]*\s+)?(?:BEFORE|BY|VALID\s+UNTIL|EXPIRES?)\s*:?\s*({DATE})\b"
    ))
    .unwrap()
});

/// A line that is nothing but a date.
static DATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({DATE})$")).unwrap());

pub fn extract_refills_before_date(lines: &CanonicalLines) -> FieldOutcome<String> {
    let text = lines.window(DATE_KEYWORD_WINDOW);
    if let Some(caps) = DATE_KEYWORD.captures(&text) {
        return FieldOutcome::Found(caps[1].to_string());
    }

    // Some layouts print the date on its own line below the refill count.
    for line in lines.window_lines(DATE_FALLBACK_WINDOW) {
        if let Some(caps) = DATE_LINE.captures(line) {
            return FieldOutcome::Found(caps[1].to_string());
        }
    }

    FieldOutcome::NotFound
}
