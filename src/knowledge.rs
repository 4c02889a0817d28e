//! Knowledge Base contract.
//!
//! The parser never owns patient or medication data; it queries an external
//! collaborator through this capability trait. Lookups may hit local storage
//! or, for the person-name check, a remote database — hence async. A failed
//! lookup is never fatal to a parse: the `lookup` helpers degrade every error
//! to a neutral answer and log it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A roster entry: one patient known to the local application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientName {
    pub first: String,
    pub last: String,
}

impl PatientName {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

/// A Knowledge Base lookup failed (storage error, remote check unreachable).
#[derive(Error, Debug, Clone)]
#[error("knowledge base lookup failed: {0}")]
pub struct LookupError(pub String);

/// Patient-roster and medication-name lookup service.
///
/// Implementations must tolerate concurrent read access: several labels may
/// be parsed at once against one handle. The parser only reads.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Exact (case-insensitive) membership in the local patient roster.
    async fn is_known_local_patient(&self, first: &str, last: &str) -> Result<bool, LookupError>;

    /// The full local roster, for fuzzy spelling correction.
    async fn local_patients(&self) -> Result<Vec<PatientName>, LookupError>;

    /// Strict medication membership: true only at ~90% internal similarity.
    /// Used to disambiguate drug names from person names.
    async fn is_medication_strict(&self, name: &str) -> Result<bool, LookupError>;

    /// Looser medication membership check.
    async fn is_medication(&self, name: &str) -> Result<bool, LookupError>;

    /// Nearest known medication name, if one is reasonably close.
    async fn find_closest_medication(&self, name: &str) -> Result<Option<String>, LookupError>;

    /// Whether (first, last) plausibly names a person. May consult a remote
    /// name database.
    async fn is_likely_person_name(&self, first: &str, last: &str) -> Result<bool, LookupError>;

    /// Pull a medication name out of a longer phrase, if the Knowledge Base
    /// recognizes one.
    async fn extract_medication_from_phrase(
        &self,
        phrase: &str,
    ) -> Result<Option<String>, LookupError>;
}

/// Degrading wrappers: every lookup error becomes a neutral answer.
///
/// A dead Knowledge Base weakens extraction (no corrections, no roster
/// matches) but never aborts a parse.
pub(crate) mod lookup {
    use super::{KnowledgeBase, PatientName};

    pub async fn known_local_patient(kb: &dyn KnowledgeBase, first: &str, last: &str) -> bool {
        kb.is_known_local_patient(first, last)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "patient roster lookup failed; assuming unknown");
                false
            })
    }

    pub async fn roster(kb: &dyn KnowledgeBase) -> Vec<PatientName> {
        kb.local_patients().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "roster fetch failed; skipping fuzzy name correction");
            Vec::new()
        })
    }

    pub async fn strict_medication(kb: &dyn KnowledgeBase, name: &str) -> bool {
        kb.is_medication_strict(name).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "strict medication lookup failed; assuming no");
            false
        })
    }

    pub async fn medication(kb: &dyn KnowledgeBase, name: &str) -> bool {
        kb.is_medication(name).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "medication lookup failed; assuming no");
            false
        })
    }

    pub async fn closest_medication(kb: &dyn KnowledgeBase, name: &str) -> Option<String> {
        match kb.find_closest_medication(name).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "medication correction failed; keeping OCR text");
                None
            }
        }
    }

    pub async fn likely_person_name(kb: &dyn KnowledgeBase, first: &str, last: &str) -> bool {
        kb.is_likely_person_name(first, last)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "person-name check failed; assuming unknown");
                false
            })
    }

    pub async fn medication_from_phrase(kb: &dyn KnowledgeBase, phrase: &str) -> Option<String> {
        match kb.extract_medication_from_phrase(phrase).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "phrase medication lookup failed");
                None
            }
        }
    }
}
