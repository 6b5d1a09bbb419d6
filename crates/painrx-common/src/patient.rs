//! Patient-side inputs to one recommendation run.
//! Produced by the ingestion subsystems; the engine only reads them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::clinical::{HepaticClass, RenalValue};

// ---------------------------------------------------------------------------
// Lab panel
// ---------------------------------------------------------------------------

/// Most recent lab results. Every value is optional; a rule that needs a
/// missing value fails loudly rather than guessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabPanel {
    /// GFR in mL/min or an already-assigned class letter.
    #[serde(default)]
    pub renal: Option<RenalValue>,
    /// Platelets, ×10³/µL.
    #[serde(default)]
    pub platelets: Option<f64>,
    /// White cells, ×10³/µL.
    #[serde(default)]
    pub white_cells: Option<f64>,
    /// Serum sodium, mmol/L.
    #[serde(default)]
    pub sodium: Option<f64>,
    /// Peripheral oxygen saturation, %.
    #[serde(default)]
    pub oxygen_saturation: Option<f64>,
    /// Child-Pugh class.
    #[serde(default)]
    pub hepatic: Option<HepaticClass>,
    /// Raw Child-Pugh points (5-15), used when no class has been assigned.
    #[serde(default)]
    pub hepatic_points: Option<u8>,
}

// ---------------------------------------------------------------------------
// Patient snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub patient_id: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub labs: LabPanel,
    /// Free-text substance tokens, e.g. "ibuprofen".
    #[serde(default)]
    pub allergies: BTreeSet<String>,
    /// ICD-10 style diagnosis codes, e.g. "K25.0".
    #[serde(default)]
    pub diagnoses: BTreeSet<String>,
}

impl PatientSnapshot {
    /// Age in completed years on `on`. Birth dates in the future yield 0.
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        let mut years = on.year() - self.birth_date.year();
        if (on.month(), on.day()) < (self.birth_date.month(), self.birth_date.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }

    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)?;
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Pain history
// ---------------------------------------------------------------------------

/// Pain scores for one patient, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PainHistory {
    scores: Vec<u8>,
}

impl PainHistory {
    pub fn new(scores: Vec<u8>) -> Self {
        Self { scores }
    }

    pub fn record(&mut self, score: u8) {
        self.scores.push(score);
    }

    pub fn scores(&self) -> &[u8] {
        &self.scores
    }

    /// The newest `n` scores, oldest first. Shorter if the history is shorter.
    pub fn latest(&self, n: usize) -> &[u8] {
        let start = self.scores.len().saturating_sub(n);
        &self.scores[start..]
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl From<Vec<u8>> for PainHistory {
    fn from(scores: Vec<u8>) -> Self {
        Self::new(scores)
    }
}
