//! Prescription-label parsing pipeline.
//!
//! Turns OCR text from a pharmacy label into a [`MedicationRecord`]. The
//! pipeline is deliberately heuristic: labels vary by pharmacy and OCR output
//! is noisy, so each field has its own extractor with OCR-tolerant patterns
//! and a line window where that field usually sits. Extraction never panics
//! on bad input; a field the extractors cannot read is simply absent and the
//! confidence score reflects it.

use thiserror::Error;

pub mod confidence;
pub mod dosage;
pub mod drug;
pub mod duration;
pub mod frequency;
pub mod instructions;
pub mod locate;
pub mod orchestrator;
pub mod patient;
pub mod pharmacy;
pub mod preprocess;
pub mod quantity;
pub mod refills;
pub mod rx_number;
pub mod strength;
pub mod types;

pub use orchestrator::{parse_label, LabelParser};
pub use types::{CanonicalLines, FieldOutcome, MedicationRecord};

/// Conditions under which a label cannot be parsed at all.
///
/// These are the only fatal outcomes; any other extraction miss degrades the
/// confidence score instead of failing the parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No line near the top of the label looks like a patient name.
    #[error("no patient name found near the top of the label")]
    PatientNameNotFound,
    /// A medication name appears above the patient name, which means the
    /// label was scanned upside down or cropped; the caller should rescan.
    #[error("drug name appears before the patient name; the label needs rescanning")]
    DrugNameBeforePatientName,
}
