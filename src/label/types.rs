//! Result model for label parsing.

use std::ops::RangeInclusive;

use serde::Serialize;

/// Outcome of one field extractor: the value, or nothing.
///
/// A missing optional field is an ordinary outcome, never an error; only the
/// locator (patient before drug) can abort a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> FieldOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, FieldOutcome::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            FieldOutcome::Found(v) => Some(v),
            FieldOutcome::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for FieldOutcome<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => FieldOutcome::Found(v),
            None => FieldOutcome::NotFound,
        }
    }
}

/// The restructured line sequence: line 0 is the patient-name line.
///
/// Built only by the locator after a successful patient scan; immutable
/// afterwards. All extractors read fixed windows of it.
#[derive(Debug, Clone)]
pub struct CanonicalLines {
    lines: Vec<String>,
}

impl CanonicalLines {
    /// Constructed by `locate::restructure` once the patient line is known.
    pub(crate) fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A single line, or `None` past the end. Extractor windows shorter than
    /// the sequence simply see fewer lines.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Lines in `range` (clamped to the sequence) joined with single spaces.
    pub fn window(&self, range: RangeInclusive<usize>) -> String {
        let start = (*range.start()).min(self.lines.len());
        let end = (*range.end() + 1).min(self.lines.len());
        self.lines[start..end].join(" ")
    }

    /// Lines in `range`, clamped, as individual strings.
    pub fn window_lines(&self, range: RangeInclusive<usize>) -> &[String] {
        let start = (*range.start()).min(self.lines.len());
        let end = (*range.end() + 1).min(self.lines.len());
        &self.lines[start..end]
    }

    /// The last `n` lines (fewer if the sequence is shorter).
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// The structured medication record assembled from one label.
///
/// Field names serialize in camelCase: the record crosses a JSON boundary to
/// the embedding application, which stores and displays it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRecord {
    pub patient_name: Option<String>,
    pub drug_name: Option<String>,
    pub strength: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub additional_instructions: Option<String>,
    pub instructions: Option<String>,
    pub rx_number: Option<String>,
    pub quantity: Option<String>,
    pub refills: Option<String>,
    pub refills_before_date: Option<String>,
    pub pharmacy: Option<String>,
    pub pharmacy_phone: Option<String>,
    /// 0–100: share of expected fields successfully extracted.
    pub confidence: f64,
}
