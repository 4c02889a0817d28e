//! Heuristic parser for prescription-label OCR text.
//!
//! OCR output from a photographed pharmacy label is noisy and loosely
//! structured. This crate restructures the raw lines around the patient name,
//! then runs a fixed sequence of field extractors, each with OCR-tolerant
//! patterns scoped to the region of the label where that field usually
//! appears. The result is a [`MedicationRecord`] with a 0–100 confidence
//! score.
//!
//! Medication and patient lookups go through the [`KnowledgeBase`] trait so
//! callers can plug in their own roster and formulary. Lookup failures never
//! abort a parse; the pipeline degrades to its pattern heuristics.
//!
//! ```no_run
//! use rxlabel::{parse_label, KnowledgeBase, ParseError};
//!
//! async fn scan(kb: &dyn KnowledgeBase, ocr_text: &str) -> Result<(), ParseError> {
//!     let record = parse_label(ocr_text, kb).await?;
//!     println!("{:?} ({:.0}%)", record.drug_name, record.confidence);
//!     Ok(())
//! }
//! ```

pub mod fuzzy;
pub mod knowledge;
pub mod label;
pub mod policy;

pub use knowledge::{KnowledgeBase, LookupError, PatientName};
pub use label::{parse_label, FieldOutcome, LabelParser, MedicationRecord, ParseError};
pub use policy::RegionPolicy;
