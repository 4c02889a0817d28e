//! Pharmacy name (whole label) and pharmacy phone (last 3 lines).
//!
//! Phone lines fare worst under OCR: digits drop out of area codes and
//! punctuation lands mid-number. The reconstruction patterns are anchored so
//! they can only fire on genuinely broken numbers; a clean number falls
//! through to the standard forms. Region-specific guesses (default area
//! code, city→chain mapping) come from the caller's [`RegionPolicy`].

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CanonicalLines, FieldOutcome};
use crate::policy::RegionPolicy;

/// "<name> PHARMACY" / "<name> DRUG(S)" lines.
static NAMED_PHARMACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Z][A-Za-z'&.-]+(?:\s+[A-Z][A-Za-z'&.-]+)?)\s+(PHARMACY|DRUGS?)\b")
        .unwrap()
});

/// Chains recognized without the "PHARMACY" suffix.
const KNOWN_CHAINS: &[&str] = &[
    "WALGREENS", "CVS", "WALMART", "RITE AID", "KROGER", "H-E-B", "COSTCO", "SAFEWAY", "PUBLIX",
];

pub fn extract_pharmacy(lines: &CanonicalLines, policy: &RegionPolicy) -> FieldOutcome<String> {
    for line in lines.iter() {
        if let Some(caps) = NAMED_PHARMACY.captures(line) {
            return FieldOutcome::Found(format!(
                "{} {}",
                caps[1].to_uppercase(),
                caps[2].to_uppercase()
            ));
        }
    }

    for line in lines.iter() {
        let upper = line.to_uppercase();
        if let Some(chain) = KNOWN_CHAINS.iter().find(|chain| upper.contains(*chain)) {
            return FieldOutcome::Found((*chain).to_string());
        }
    }

    // Last resort: the label only shows the store's city.
    for line in lines.iter() {
        if let Some(chain) = policy.chain_for_city(line) {
            return FieldOutcome::Found(chain.to_string());
        }
    }

    FieldOutcome::NotFound
}

/// How many trailing lines are searched for the phone number.
const PHONE_TAIL: usize = 3;

/// Rx-number-shaped text; such lines are never phone numbers.
static RX_SHAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{7,10}[-/]\d{3,5}").unwrap());

/// Area code lost a digit: "(32) 934-0415".
static TWO_DIGIT_AREA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{2})\)[ .-]*(\d{3})[ .-]*(\d{4})").unwrap());

/// Bare 7-digit local number, nothing else digit-like on the line.
static LOCAL_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\d]*(\d{3})[ .-]?(\d{4})[^\d]*$").unwrap());

/// Standard "(832) 934-0415".
static PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{3})\)[ .-]*(\d{3})[ .-]*(\d{4})").unwrap());

/// Standard "832-934-0415".
static DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{3})[-. ](\d{3})[-. ](\d{4})\b").unwrap());

/// Ten digits with stray punctuation between the groups.
static STRAY_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?(\d{3})\)?\D{0,2}(\d{3})\D{0,2}(\d{4})(?:\D|$)").unwrap()
});

pub fn extract_phone(lines: &CanonicalLines, policy: &RegionPolicy) -> FieldOutcome<String> {
    let candidates: Vec<&String> = lines
        .tail(PHONE_TAIL)
        .iter()
        .filter(|line| !RX_SHAPED.is_match(line))
        .collect();

    // Reconstruction of broken numbers runs before the standard forms.
    if let Some(repair) = policy.area_code_repair_digit {
        for line in &candidates {
            if let Some(caps) = TWO_DIGIT_AREA.captures(line) {
                return FieldOutcome::Found(format!(
                    "({repair}{}) {}-{}",
                    &caps[1], &caps[2], &caps[3]
                ));
            }
        }
    }
    if let Some(area) = policy.default_area_code.as_deref() {
        for line in &candidates {
            if let Some(caps) = LOCAL_ONLY.captures(line) {
                return FieldOutcome::Found(format!("({area}) {}-{}", &caps[1], &caps[2]));
            }
        }
    }

    for pattern in [&*PARENS, &*DASHED, &*STRAY_PUNCT] {
        for line in &candidates {
            if let Some(caps) = pattern.captures(line) {
                return FieldOutcome::Found(format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]));
            }
        }
    }

    FieldOutcome::NotFound
}
