//! Parse orchestration: raw OCR text in, medication record out.
//!
//! One pass, fixed order: preprocess → locate patient → restructure → every
//! field extractor → confidence. The locator is the only stage that can
//! abort; each extractor failure just lowers the confidence score. Knowledge
//! Base lookups are awaited strictly in extractor order — drug extraction in
//! particular must see the already-extracted patient name for its skip
//! filter.

use super::confidence::ConfidenceTally;
use super::types::MedicationRecord;
use super::{
    drug, dosage, duration, frequency, instructions, locate, patient, pharmacy, preprocess,
    quantity, refills, rx_number, strength, ParseError,
};
use crate::knowledge::KnowledgeBase;
use crate::policy::RegionPolicy;

/// Label parser with its regional fallback policy.
///
/// Holds no state across calls; one instance can serve concurrent parses.
#[derive(Debug, Default)]
pub struct LabelParser {
    policy: RegionPolicy,
}

impl LabelParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RegionPolicy) -> Self {
        Self { policy }
    }

    /// Parse one label's OCR text against the Knowledge Base.
    pub async fn parse(
        &self,
        raw_text: &str,
        kb: &dyn KnowledgeBase,
    ) -> Result<MedicationRecord, ParseError> {
        let lines = preprocess::split_lines(raw_text);
        tracing::debug!(line_count = lines.len(), "label text preprocessed");

        let patient_index = locate::locate_patient_line(&lines, kb).await?;
        let lines = locate::restructure(lines, patient_index);
        tracing::debug!(patient_index, canonical_lines = lines.len(), "lines restructured");

        let mut tally = ConfidenceTally::new();
        let mut record = MedicationRecord::default();

        let patient_name = patient::extract(&lines, kb).await;
        tally.record_required(patient_name.is_found());
        record.patient_name = patient_name.into_option();

        let drug_name = drug::extract(&lines, record.patient_name.as_deref(), kb).await;
        tally.record_required(drug_name.is_found());
        record.drug_name = drug_name.into_option();

        let strength = strength::extract(&lines);
        tally.record_required(strength.is_found());
        record.strength = strength.into_option();

        let dosage = dosage::extract(&lines, record.strength.as_deref());
        tally.record_required(dosage.is_found());
        record.dosage = dosage.into_option();

        let frequency = frequency::extract(&lines);
        tally.record_required(frequency.is_found());
        record.frequency = frequency.into_option();

        let duration = duration::extract(&lines);
        tally.record_required(duration.is_found());
        record.duration = duration.into_option();

        let additional = instructions::extract_additional(&lines);
        tally.record_optional(additional.is_found());
        record.additional_instructions = additional.into_option();

        let free_text = instructions::extract_free_text(&lines);
        tally.record_optional(free_text.is_found());
        record.instructions = free_text.into_option();

        let rx = rx_number::extract(&lines);
        tally.record_required(rx.is_found());
        record.rx_number = rx.into_option();

        let qty = quantity::extract(&lines);
        tally.record_required(qty.is_found());
        record.quantity = qty.into_option();

        let refill_count = refills::extract_refills(&lines);
        tally.record_required(refill_count.is_found());
        record.refills = refill_count.into_option();

        let refill_date = refills::extract_refills_before_date(&lines);
        tally.record_required(refill_date.is_found());
        record.refills_before_date = refill_date.into_option();

        let pharmacy_name = pharmacy::extract_pharmacy(&lines, &self.policy);
        tally.record_required(pharmacy_name.is_found());
        record.pharmacy = pharmacy_name.into_option();

        let phone = pharmacy::extract_phone(&lines, &self.policy);
        tally.record_required(phone.is_found());
        record.pharmacy_phone = phone.into_option();

        record.confidence = tally.score();
        tracing::debug!(confidence = record.confidence, "label parse complete");
        Ok(record)
    }
}

/// Parse one label with the default regional policy.
pub async fn parse_label(
    raw_text: &str,
    kb: &dyn KnowledgeBase,
) -> Result<MedicationRecord, ParseError> {
    LabelParser::new().parse(raw_text, kb).await
}
