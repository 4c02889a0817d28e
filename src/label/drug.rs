//! Drug-name extraction.
//!
//! The drug name normally sits on the line right under the patient name, but
//! OCR noise and label variants move it around, so extraction is an ordered
//! chain of candidate patterns over the priority line with a fallback sweep
//! over the rest of the label. Lines that cannot hold a drug name (addresses,
//! long digit runs, dosing text, manufacturer boilerplate, the patient's own
//! name) are skipped outright.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};
use crate::fuzzy;
use crate::knowledge::{lookup, KnowledgeBase};

/// Character-overlap ratio above which a word counts as the patient's name.
const NAME_OVERLAP_THRESHOLD: f64 = 0.7;

/// Maximum length difference for the overlap comparison to apply.
const NAME_LENGTH_SLOP: usize = 3;

/// Street-address lines: "1234 SOMETHING ST/AVE/RD/...".
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s+[A-Z]+\s+(?:ST|STREET|AVE|AVENUE|RD|ROAD|DR|DRIVE|LN|LANE|BLVD|WAY|CT|HWY|PKWY)\b")
        .unwrap()
});

/// Four or more consecutive digits (Rx numbers, zip codes, phone fragments).
static LONG_DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// Pharmacy/dosing vocabulary that never appears inside a drug-name line.
static NON_DRUG_VOCAB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:PHARMACY|DRUGS?|TAKE|GIVE|SWALLOW|INJECT|APPLY|USE|TABLETS?|CAPSULES?|DAILY|WEEKLY|MONTHLY|REFILLS?|QTY|QUANTITY|MOUTH|ORALLY|NEEDED|SUPPLY|DAYS?|WEEKS?|MONTHS?|HOURS?|EVERY|BEFORE|EXPIRES?)\b",
    )
    .unwrap()
});

/// Manufacturer boilerplate prefixes.
static MANUFACTURER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:MFG|MFR|MANUFACTURED|DIST|DISTRIBUTED)\b").unwrap());

/// Whole-line two-word candidate.
static TWO_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z/'.-]*\s+[A-Za-z][A-Za-z/'.-]*)$").unwrap()
});

/// Strict "Two Capitalized Words" shape accepted without a dictionary hit.
static TWO_CAPITALIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z/'.-]+\s+[A-Z][A-Za-z/'.-]+$").unwrap());

/// Whole-line three-word candidate.
static THREE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z/'.-]*\s+[A-Za-z][A-Za-z/'.-]*\s+[A-Za-z][A-Za-z/'.-]*)$")
        .unwrap()
});

/// "NAME 100MG"-style line: a name followed by a strength-looking tail.
static NAME_WITH_STRENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Za-z][A-Za-z/ '.-]*?)\s+\d+(?:\.\d+)?\s*(?:MG|MCG|G|ML|UNITS?)\b")
        .unwrap()
});

/// Two consecutive capitalized words anywhere in the line.
static TWO_CAPS_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,}[A-Za-z/'.-]*)\s+([A-Z]{2,}[A-Za-z/'.-]*)\b").unwrap()
});

/// A single capitalized word of at least four letters.
static SINGLE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][A-Za-z/'.-]{3,})\b").unwrap());

/// Extract the drug name, given the already-extracted patient name for
/// skip-filtering. Checks the priority line (right under the patient) first,
/// then sweeps the remaining lines.
pub async fn extract(
    lines: &CanonicalLines,
    patient_name: Option<&str>,
    kb: &dyn KnowledgeBase,
) -> FieldOutcome<String> {
    let start = usize::from(patient_name.is_some());

    if let Some(line) = lines.line(start) {
        if !should_skip(line, patient_name) {
            if let Some(name) = candidate_from_line(line, kb).await {
                tracing::debug!(line = start, %name, "drug name from priority line");
                return FieldOutcome::Found(name);
            }
        }
    }

    for index in 1..lines.len() {
        if index == start {
            continue;
        }
        let Some(line) = lines.line(index) else { break };
        if should_skip(line, patient_name) {
            continue;
        }
        if let Some(name) = candidate_from_line(line, kb).await {
            tracing::debug!(line = index, %name, "drug name from fallback line");
            return FieldOutcome::Found(name);
        }
    }

    FieldOutcome::NotFound
}

/// Lines that can never hold the drug name.
fn should_skip(line: &str, patient_name: Option<&str>) -> bool {
    if ADDRESS.is_match(line)
        || LONG_DIGIT_RUN.is_match(line)
        || NON_DRUG_VOCAB.is_match(line)
        || MANUFACTURER.is_match(line)
    {
        return true;
    }
    patient_name.is_some_and(|name| contains_patient_name(line, name))
}

/// Whether a line repeats (part of) the patient's name, exactly or by the
/// cheap character-overlap heuristic.
fn contains_patient_name(line: &str, patient_name: &str) -> bool {
    let line_upper = line.to_uppercase();
    for name_word in patient_name.split_whitespace() {
        let name_upper = name_word.to_uppercase();
        for word in line_upper.split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphabetic()).collect();
            if word.is_empty() {
                continue;
            }
            if word == name_upper {
                return true;
            }
            let len_diff = word.chars().count().abs_diff(name_upper.chars().count());
            if len_diff <= NAME_LENGTH_SLOP
                && fuzzy::char_overlap(&name_upper, &word) >= NAME_OVERLAP_THRESHOLD
            {
                return true;
            }
        }
    }
    false
}

/// Try the ordered candidate patterns against one line.
async fn candidate_from_line(line: &str, kb: &dyn KnowledgeBase) -> Option<String> {
    let line = line.trim();

    // 1. Whole line is two words: correct against the dictionary, or accept
    //    a strictly capitalized shape raw.
    if let Some(caps) = TWO_WORD.captures(line) {
        let candidate = &caps[1];
        if candidate.len() >= 8 {
            if let Some(corrected) = lookup::closest_medication(kb, candidate).await {
                return Some(corrected.to_uppercase());
            }
            if TWO_CAPITALIZED.is_match(line) {
                return Some(candidate.to_uppercase());
            }
        }
    }

    // 2. Whole line is three words.
    if let Some(caps) = THREE_WORD.captures(line) {
        let candidate = &caps[1];
        if candidate.len() >= 10 {
            if let Some(corrected) = lookup::closest_medication(kb, candidate).await {
                return Some(corrected.to_uppercase());
            }
        }
    }

    // 3. Name followed by a strength-looking tail.
    if let Some(caps) = NAME_WITH_STRENGTH.captures(line) {
        let name = caps[1].trim();
        if let Some(corrected) = lookup::closest_medication(kb, name).await {
            return Some(corrected.to_uppercase());
        }
        if lookup::strict_medication(kb, name).await {
            return Some(name.to_uppercase());
        }
        if let Some(found) = lookup::medication_from_phrase(kb, line).await {
            return Some(found.to_uppercase());
        }
        return Some(name.to_uppercase());
    }

    // 4. Two consecutive capitalized words without a strength tail.
    if let Some(caps) = TWO_CAPS_INLINE.captures(line) {
        let candidate = format!("{} {}", &caps[1], &caps[2]);
        if let Some(corrected) = lookup::closest_medication(kb, &candidate).await {
            return Some(corrected.to_uppercase());
        }
        if lookup::medication(kb, &candidate).await {
            return Some(candidate.to_uppercase());
        }
    }

    // 5. A lone capitalized word.
    if let Some(caps) = SINGLE_WORD.captures(line) {
        let word = &caps[1];
        if word.len() <= 30 {
            if lookup::medication(kb, word).await {
                return Some(word.to_uppercase());
            }
            if let Some(corrected) = lookup::closest_medication(kb, word).await {
                return Some(corrected.to_uppercase());
            }
            return Some(word.to_uppercase());
        }
    }

    None
}
