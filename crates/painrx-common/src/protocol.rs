//! Protocol table rows.
//!
//! One row of the analgesic protocol table: the pain band it covers, the two
//! candidate drugs, and the free-text rule cells for every clinical dimension.
//! Rows are flat so that the same type loads from CSV, JSON and YAML.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolRow {
    /// Pain-level range as written in the table, e.g. "4-6".
    pub pain_range: String,
    /// Regimen hierarchy (1 = first line).
    #[serde(default)]
    pub hierarchy: u32,

    pub primary_drug: String,
    pub primary_ingredient: String,
    #[serde(default)]
    pub primary_dose_mg: Option<f64>,
    #[serde(default)]
    pub primary_interval_h: Option<f64>,

    #[serde(default)]
    pub alternative_drug: String,
    #[serde(default)]
    pub alternative_ingredient: String,
    #[serde(default)]
    pub alternative_dose_mg: Option<f64>,
    #[serde(default)]
    pub alternative_interval_h: Option<f64>,

    /// Route of administration, e.g. "oral".
    #[serde(default)]
    pub route: String,

    // ── Rule cells ─────────────────────────────────────────────────────────
    #[serde(default)]
    pub age_rule: String,
    #[serde(default)]
    pub weight_rule: String,
    #[serde(default)]
    pub renal_rule: String,
    #[serde(default)]
    pub hepatic_rule: String,
    #[serde(default)]
    pub platelet_rule: String,
    #[serde(default)]
    pub white_cell_rule: String,
    #[serde(default)]
    pub sodium_rule: String,
    #[serde(default)]
    pub saturation_rule: String,
    /// Free-text list of contraindicated diagnoses with ICD-10 codes.
    #[serde(default)]
    pub contraindications: String,
    /// Substances separated by "OR", e.g. "ibuprofen OR NSAID".
    #[serde(default)]
    pub allergy_avoidance: String,
}

/// One drug as the protocol prescribes it, before any rule adjusts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugSpec {
    pub name: String,
    pub active_ingredient: String,
    pub dose_mg: Option<f64>,
    pub interval_h: Option<f64>,
    pub route: String,
}

impl DrugSpec {
    /// A spec with no active ingredient means the protocol leaves the slot empty.
    pub fn is_empty(&self) -> bool {
        self.active_ingredient.trim().is_empty()
    }
}

impl ProtocolRow {
    pub fn primary(&self) -> DrugSpec {
        DrugSpec {
            name: self.primary_drug.trim().to_string(),
            active_ingredient: self.primary_ingredient.trim().to_string(),
            dose_mg: self.primary_dose_mg,
            interval_h: self.primary_interval_h,
            route: self.route.trim().to_string(),
        }
    }

    pub fn alternative(&self) -> DrugSpec {
        DrugSpec {
            name: self.alternative_drug.trim().to_string(),
            active_ingredient: self.alternative_ingredient.trim().to_string(),
            dose_mg: self.alternative_dose_mg,
            interval_h: self.alternative_interval_h,
            route: self.route.trim().to_string(),
        }
    }

    /// Short label used in log lines and comments.
    pub fn label(&self) -> String {
        if self.alternative_drug.trim().is_empty() {
            format!("[{}] {}", self.pain_range, self.primary_drug.trim())
        } else {
            format!(
                "[{}] {} / {}",
                self.pain_range,
                self.primary_drug.trim(),
                self.alternative_drug.trim()
            )
        }
    }
}
