//! Patient-name extraction from canonical line 0.
//!
//! The locator only decided *which* line holds the name; this pass decides
//! what the name actually is, correcting OCR misspellings against the local
//! patient roster before falling back to the raw text.

use super::locate::name_candidate;
use super::types::{CanonicalLines, FieldOutcome};
use crate::fuzzy;
use crate::knowledge::{lookup, KnowledgeBase};

/// Minimum similarity for adopting a roster spelling over the OCR text.
const CORRECTION_THRESHOLD: f64 = 0.8;

/// Extract the patient name from canonical line 0.
///
/// Correction order: best roster entry whose first/last similarity average
/// (or whole-name similarity) clears the threshold; exact roster membership;
/// strict-medication rejection; raw OCR text as-is.
pub async fn extract(lines: &CanonicalLines, kb: &dyn KnowledgeBase) -> FieldOutcome<String> {
    let Some(line) = lines.line(0) else {
        return FieldOutcome::NotFound;
    };
    let Some((first, last)) = name_candidate(line) else {
        return FieldOutcome::NotFound;
    };
    let full = format!("{first} {last}");

    // Aggressive pass: adopt the closest roster spelling.
    let roster = lookup::roster(kb).await;
    let mut best: Option<(f64, String)> = None;
    for entry in &roster {
        let first_sim = fuzzy::similarity(&first, &entry.first);
        let last_sim = fuzzy::similarity(&last, &entry.last);
        let average = (first_sim + last_sim) / 2.0;
        let entry_full = format!(
            "{} {}",
            entry.first.to_uppercase(),
            entry.last.to_uppercase()
        );
        let whole = fuzzy::similarity(&full, &entry_full);
        if average >= CORRECTION_THRESHOLD || whole >= CORRECTION_THRESHOLD {
            let score = average.max(whole);
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, entry_full));
            }
        }
    }
    if let Some((score, corrected)) = best {
        tracing::debug!(%corrected, score, "patient name corrected from roster");
        return FieldOutcome::Found(corrected);
    }

    if lookup::known_local_patient(kb, &first, &last).await {
        return FieldOutcome::Found(full);
    }

    // A candidate that is itself a drug name slipped past the locator's
    // permissive fallback; refuse it rather than report a bogus patient.
    if lookup::strict_medication(kb, &full).await {
        tracing::debug!(%full, "patient candidate rejected: matches a medication");
        return FieldOutcome::NotFound;
    }

    FieldOutcome::Found(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::mock::MockKb;
    use crate::label::types::CanonicalLines;

    fn canonical(raw: &[&str]) -> CanonicalLines {
        CanonicalLines::new(raw.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn corrects_ocr_misspelling_from_roster() {
        let kb = MockKb::new().with_patient("JOHN", "SMYTH");
        let outcome = extract(&canonical(&["JOHM SMITH"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::Found("JOHN SMYTH".into()));
    }

    #[tokio::test]
    async fn picks_closest_roster_entry() {
        let kb = MockKb::new()
            .with_patient("KYAH", "MONTES")
            .with_patient("KALI", "MONTES");
        let outcome = extract(&canonical(&["KYAH MONTE5"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::Found("KYAH MONTES".into()));
    }

    #[tokio::test]
    async fn exact_text_is_kept_verbatim() {
        let kb = MockKb::new().with_patient("JOHN", "SMITH");
        let outcome = extract(&canonical(&["JOHN SMITH", "DOXYCYCLINE"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::Found("JOHN SMITH".into()));
    }

    #[tokio::test]
    async fn unknown_name_accepted_raw() {
        let kb = MockKb::new();
        let outcome = extract(&canonical(&["CADE MONTES"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::Found("CADE MONTES".into()));
    }

    #[tokio::test]
    async fn distant_roster_entry_not_adopted() {
        let kb = MockKb::new().with_patient("GREGORY", "WILLIAMSON");
        let outcome = extract(&canonical(&["CADE MONTES"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::Found("CADE MONTES".into()));
    }

    #[tokio::test]
    async fn drug_name_candidate_rejected() {
        // Locator would normally catch this; the extractor re-checks.
        let kb = MockKb::new().with_medication("HYDROXYZINE HCL");
        let outcome = extract(&canonical(&["HYDROXYZINE HCL"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::NotFound);
    }

    #[tokio::test]
    async fn empty_sequence_is_not_found() {
        let kb = MockKb::new();
        assert_eq!(extract(&canonical(&[]), &kb).await, FieldOutcome::NotFound);
    }

    #[tokio::test]
    async fn offline_knowledge_base_keeps_raw_text() {
        let kb = MockKb::unavailable();
        let outcome = extract(&canonical(&["JOHN SMITH"]), &kb).await;
        assert_eq!(outcome, FieldOutcome::Found("JOHN SMITH".into()));
    }
}
