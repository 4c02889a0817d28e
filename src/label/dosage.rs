//! Dosage extraction ("1 TABLET", "2 CAPSULES") from lines 2–4.
//!
//! Patterns run most-specific-first: an instruction verb pins the quantity
//! unambiguously, "by mouth" after the quantity is nearly as strong, and a
//! bare quantity+unit is the last resort. A candidate equal to the already
//! extracted strength is an OCR echo of the drug line, not a dosage.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};

const WINDOW: std::ops::RangeInclusive<usize> = 2..=4;

const QUANTITY: &str = r"(\d+(?:\.\d+)?|ONE|TWO|THREE|FOUR|HALF)";
const UNIT: &str = r"(TABLETS?|CAPSULES?|PILLS?|TEASPOONS?|TABLESPOONS?|DROPS?|PUFFS?|ML|UNITS?)";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "TAKE 1 TABLET"
        Regex::new(&format!(
            r"(?i)\b(?:TAKE|GIVE|SWALLOW|INJECT)\s+{QUANTITY}\s+{UNIT}\b"
        ))
        .unwrap(),
        // "1 TABLET BY MOUTH"
        Regex::new(&format!(r"(?i)\b{QUANTITY}\s+{UNIT}\s+BY\s+MOUTH\b")).unwrap(),
        // bare "1 TABLET"
        Regex::new(&format!(r"(?i)\b{QUANTITY}\s+{UNIT}\b")).unwrap(),
    ]
});

pub fn extract(lines: &CanonicalLines, strength: Option<&str>) -> FieldOutcome<String> {
    let text = lines.window(WINDOW);
    if text.is_empty() {
        return FieldOutcome::NotFound;
    }

    for pattern in PATTERNS.iter() {
        for caps in pattern.captures_iter(&text) {
            let candidate = format!("{} {}", caps[1].to_uppercase(), caps[2].to_uppercase());
            // Strength echo ("100 MG" vs strength "100MG") is not a dosage.
            if let Some(strength) = strength {
                if candidate.replace(' ', "") == strength.replace(' ', "") {
                    continue;
                }
            }
            return FieldOutcome::Found(candidate);
        }
    }

    FieldOutcome::NotFound
}
