//! Patient-name locator and line restructurer.
//!
//! Prescription labels put the patient name at the very top. A medication
//! name showing up first means the photo framed the label badly, so the
//! caller must rescan rather than parse around it. The locator enforces that
//! ordering over the first few lines; the restructurer then drops everything
//! above the patient line so line 0 is the patient name by construction.

use std::sync::LazyLock;

use regex::Regex;

use super::types::CanonicalLines;
use super::ParseError;
use crate::knowledge::{lookup, KnowledgeBase};

/// How many leading lines are scanned for the patient name.
pub const PATIENT_SCAN_WINDOW: usize = 5;

/// Shortest and longest plausible full patient names.
const NAME_LEN: std::ops::RangeInclusive<usize> = 5..=30;

/// "WORD(>=3 letters) WORD(>=2 letters)" over a cleaned line.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([A-Z]{3,})\s+([A-Z]{2,})\b").unwrap());

/// A standalone capitalized word of at least 5 letters.
static LONE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z]{4,}\b").unwrap());

/// Strip everything except letters, spaces, hyphens, and parentheses.
/// OCR sprays digits and symbols into name lines; none of those characters
/// ever belong to a name.
fn clean_name_line(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphabetic() || *c == ' ' || *c == '-' || *c == '(' || *c == ')')
        .collect()
}

/// Whether a line holds no letters or digits at all (pure OCR garbage).
fn is_garbage_line(line: &str) -> bool {
    !line.chars().any(char::is_alphanumeric)
}

/// The "WORD WORD" name candidate on a cleaned line, if its combined length
/// is plausible for a full name.
pub(crate) fn name_candidate(line: &str) -> Option<(String, String)> {
    let cleaned = clean_name_line(line);
    let caps = NAME_PATTERN.captures(&cleaned)?;
    let first = caps[1].to_uppercase();
    let last = caps[2].to_uppercase();
    if NAME_LEN.contains(&(first.len() + 1 + last.len())) {
        Some((first, last))
    } else {
        None
    }
}

/// Scan the first [`PATIENT_SCAN_WINDOW`] lines for the patient-name line.
///
/// Returns the index of the line, or the fatal ordering errors: no plausible
/// patient line at all, or a medication name encountered before one.
pub async fn locate_patient_line(
    lines: &[String],
    kb: &dyn KnowledgeBase,
) -> Result<usize, ParseError> {
    for (index, line) in lines.iter().take(PATIENT_SCAN_WINDOW).enumerate() {
        if is_garbage_line(line) {
            continue;
        }

        if let Some((first, last)) = name_candidate(line) {
            // Exact roster hit wins outright.
            if lookup::known_local_patient(kb, &first, &last).await {
                tracing::debug!(index, "patient line: roster match");
                return Ok(index);
            }

            // A "name" that is really a drug means the label was captured
            // upside-down or cropped; demand a rescan.
            let full = format!("{first} {last}");
            if lookup::strict_medication(kb, &full).await
                || lookup::strict_medication(kb, &first).await
                || lookup::strict_medication(kb, &last).await
            {
                tracing::debug!(index, "medication name ahead of patient name");
                return Err(ParseError::DrugNameBeforePatientName);
            }

            if lookup::likely_person_name(kb, &first, &last).await {
                tracing::debug!(index, "patient line: person-name check");
                return Ok(index);
            }

            // Permissive fallback: shaped like a name, not a known drug.
            tracing::debug!(index, "patient line: accepted by shape");
            return Ok(index);
        }

        // No name shape on this line: a lone capitalized word that strictly
        // matches a medication still violates the layout contract.
        let cleaned = clean_name_line(line);
        if let Some(word) = LONE_WORD.find(&cleaned) {
            if lookup::strict_medication(kb, word.as_str()).await {
                tracing::debug!(index, word = word.as_str(), "lone medication name before patient");
                return Err(ParseError::DrugNameBeforePatientName);
            }
        }
    }

    Err(ParseError::PatientNameNotFound)
}

/// Drop all lines before the patient line. Line 0 of the result is the
/// patient name by construction.
pub fn restructure(mut lines: Vec<String>, patient_index: usize) -> CanonicalLines {
    CanonicalLines::new(lines.split_off(patient_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::mock::MockKb;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn finds_patient_on_first_line() {
        let kb = MockKb::new().with_patient("JOHN", "SMITH");
        let idx = locate_patient_line(&lines(&["JOHN SMITH", "DOXYCYCLINE 100MG"]), &kb)
            .await
            .unwrap();
        assert_eq!(idx, 0);
    }

    #[tokio::test]
    async fn skips_garbage_and_header_lines() {
        let kb = MockKb::new().with_patient("KYAH", "MONTES");
        let input = lines(&["*** ---", "!!@#", "KYAH MONTES", "CLINDAMYCIN 300MG"]);
        assert_eq!(locate_patient_line(&input, &kb).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn accepts_unknown_name_by_shape() {
        let kb = MockKb::new().with_medication("DOXYCYCLINE");
        let idx = locate_patient_line(&lines(&["CADE MONTES"]), &kb).await.unwrap();
        assert_eq!(idx, 0);
    }

    #[tokio::test]
    async fn accepts_via_person_name_check() {
        let kb = MockKb::new().with_person_name("JANE", "DOE");
        assert_eq!(locate_patient_line(&lines(&["JANE DOE"]), &kb).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn drug_shaped_name_line_demands_rescan() {
        // "DOXYCYCLINE 100MG" cleans to "DOXYCYCLINE MG"; the first word is a
        // strict medication match, so the layout contract is violated.
        let kb = MockKb::new().with_medication("DOXYCYCLINE");
        let err = locate_patient_line(&lines(&["DOXYCYCLINE 100MG", "JOHN SMITH"]), &kb)
            .await
            .unwrap_err();
        assert_eq!(err, ParseError::DrugNameBeforePatientName);
    }

    #[tokio::test]
    async fn lone_drug_word_demands_rescan() {
        let kb = MockKb::new().with_medication("LISINOPRIL");
        let err = locate_patient_line(&lines(&["LISINOPRIL", "JOHN SMITH"]), &kb)
            .await
            .unwrap_err();
        assert_eq!(err, ParseError::DrugNameBeforePatientName);
    }

    #[tokio::test]
    async fn empty_input_has_no_patient() {
        let kb = MockKb::new();
        let err = locate_patient_line(&[], &kb).await.unwrap_err();
        assert_eq!(err, ParseError::PatientNameNotFound);
    }

    #[tokio::test]
    async fn name_past_scan_window_is_missed() {
        let kb = MockKb::new().with_patient("JOHN", "SMITH");
        let input = lines(&["#1", "#2", "#3", "#4", "#5", "JOHN SMITH"]);
        let err = locate_patient_line(&input, &kb).await.unwrap_err();
        assert_eq!(err, ParseError::PatientNameNotFound);
    }

    #[tokio::test]
    async fn offline_knowledge_base_still_locates_by_shape() {
        let kb = MockKb::unavailable();
        assert_eq!(locate_patient_line(&lines(&["JOHN SMITH"]), &kb).await.unwrap(), 0);
    }

    #[test]
    fn name_candidate_rejects_out_of_bounds_length() {
        assert!(name_candidate("AB C").is_none());
        assert!(name_candidate("ABCDEFGHIJKLMNOPQRS TUVWXYZABCDEFGH").is_none());
        assert_eq!(
            name_candidate("JOHN SMITH"),
            Some(("JOHN".into(), "SMITH".into()))
        );
    }

    #[test]
    fn name_candidate_strips_ocr_noise() {
        assert_eq!(
            name_candidate("J0HN* SM1TH!"),
            // Digits are stripped, leaving JHN / SMTH — still name-shaped.
            Some(("JHN".into(), "SMTH".into()))
        );
    }

    #[test]
    fn restructure_drops_leading_lines() {
        let canonical = restructure(lines(&["HEADER", "JOHN SMITH", "DOXY"]), 1);
        assert_eq!(canonical.line(0), Some("JOHN SMITH"));
        assert_eq!(canonical.len(), 2);
    }
}
