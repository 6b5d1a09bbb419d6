//! The recommendation record handed to persistence.

use chrono::{DateTime, Utc};
use painrx_common::{DrugSpec, ProtocolRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::slot::{DrugSlot, SlotRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    /// Accepted candidate awaiting clinician review.
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NoProtocolForScore,
    PainTrendAborted,
    NoViableCandidate,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProtocolForScore => write!(f, "no protocol for pain score"),
            Self::PainTrendAborted => write!(f, "generation aborted by pain trend"),
            Self::NoViableCandidate => write!(f, "no viable recommendation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub patient_id: String,
    pub pain_score: u8,
    /// Regimen hierarchy of the protocol row this candidate came from.
    pub hierarchy: Option<u32>,
    /// Label of the protocol row, e.g. "[4-6] Nurofen / Panadol".
    pub protocol: Option<String>,
    pub status: RecommendationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<DrugSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<DrugSlot>,
    /// Audit trail, in the order decisions were made.
    pub comments: Vec<String>,
    pub rejection_reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    /// A fresh candidate built from one protocol row.
    pub fn candidate(patient_id: &str, pain_score: u8, row: &ProtocolRow) -> Self {
        let slot_for = |role: SlotRole, spec: DrugSpec| {
            if spec.is_empty() {
                DrugSlot::vacant(role)
            } else {
                DrugSlot::from_spec(role, &spec)
            }
        };
        let primary = slot_for(SlotRole::Primary, row.primary());
        let alternative = slot_for(SlotRole::Alternative, row.alternative());

        Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            pain_score,
            hierarchy: Some(row.hierarchy),
            protocol: Some(row.label()),
            status: RecommendationStatus::Pending,
            failure: None,
            primary: Some(primary),
            alternative: Some(alternative),
            comments: Vec::new(),
            rejection_reasons: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// A failure record. Carries no slots.
    pub fn failed(patient_id: &str, pain_score: u8, kind: FailureKind, reasons: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            pain_score,
            hierarchy: None,
            protocol: None,
            status: RecommendationStatus::Failed,
            failure: Some(kind),
            primary: None,
            alternative: None,
            comments: vec![kind.to_string()],
            rejection_reasons: reasons,
            created_at: Utc::now(),
        }
    }

    pub fn slot(&self, role: SlotRole) -> Option<&DrugSlot> {
        match role {
            SlotRole::Primary => self.primary.as_ref(),
            SlotRole::Alternative => self.alternative.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, role: SlotRole) -> Option<&mut DrugSlot> {
        match role {
            SlotRole::Primary => self.primary.as_mut(),
            SlotRole::Alternative => self.alternative.as_mut(),
        }
    }

    pub fn is_slot_active(&self, role: SlotRole) -> bool {
        self.slot(role).is_some_and(DrugSlot::is_active)
    }

    pub fn active_roles(&self) -> Vec<SlotRole> {
        SlotRole::ALL
            .into_iter()
            .filter(|role| self.is_slot_active(*role))
            .collect()
    }

    /// At least one slot with an active ingredient survived the pipeline.
    pub fn is_viable(&self) -> bool {
        !self.active_roles().is_empty()
    }

    pub fn is_failed(&self) -> bool {
        self.status == RecommendationStatus::Failed
    }

    pub fn comment(&mut self, line: impl Into<String>) {
        self.comments.push(line.into());
    }

    /// Clear one slot, logging the reason as both a comment and a rejection
    /// reason. Returns false if the slot was already cleared.
    pub fn clear_slot(&mut self, role: SlotRole, reason: &str) -> bool {
        let Some(slot) = self.slot_mut(role) else {
            return false;
        };
        let drug = slot.drug_name.clone();
        if !slot.clear(reason) {
            return false;
        }
        self.comments.push(format!("{role} {drug} cleared: {reason}"));
        self.rejection_reasons.push(format!("{drug}: {reason}"));
        true
    }

    /// Clear every still-active slot with the same reason.
    pub fn clear_all(&mut self, reason: &str) -> usize {
        SlotRole::ALL
            .into_iter()
            .filter(|role| self.clear_slot(*role, reason))
            .count()
    }
}
