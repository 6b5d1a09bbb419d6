//! Drug slots.
//!
//! A candidate recommendation holds exactly two slots, PRIMARY and
//! ALTERNATIVE. A slot starts active with the protocol's drug and may be
//! adjusted by rules until it is either finalised or cleared. Clearing is
//! one-way: a cleared slot never becomes active again and ignores further
//! adjustments.

use painrx_common::DrugSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    Primary,
    Alternative,
}

impl SlotRole {
    pub const ALL: [SlotRole; 2] = [SlotRole::Primary, SlotRole::Alternative];
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Alternative => write!(f, "alternative"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugSlot {
    pub role: SlotRole,
    pub drug_name: String,
    pub active_ingredient: String,
    pub dose_mg: Option<f64>,
    pub interval_h: Option<f64>,
    pub route: String,
    /// Adjustments applied to this slot, oldest first.
    pub annotations: Vec<String>,
    cleared: bool,
    clear_reason: Option<String>,
}

impl DrugSlot {
    pub fn from_spec(role: SlotRole, spec: &DrugSpec) -> Self {
        Self {
            role,
            drug_name: spec.name.clone(),
            active_ingredient: spec.active_ingredient.clone(),
            dose_mg: spec.dose_mg,
            interval_h: spec.interval_h,
            route: spec.route.clone(),
            annotations: Vec::new(),
            cleared: false,
            clear_reason: None,
        }
    }

    /// A slot the protocol leaves unfilled. Starts cleared.
    pub fn vacant(role: SlotRole) -> Self {
        Self {
            role,
            drug_name: String::new(),
            active_ingredient: String::new(),
            dose_mg: None,
            interval_h: None,
            route: String::new(),
            annotations: vec![format!("no {role} drug in protocol")],
            cleared: true,
            clear_reason: Some("no drug in protocol".to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cleared
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn clear_reason(&self) -> Option<&str> {
        self.clear_reason.as_deref()
    }

    /// Clear the slot. Returns false if it was already cleared, in which case
    /// the original reason is kept.
    pub fn clear(&mut self, reason: impl Into<String>) -> bool {
        if self.cleared {
            return false;
        }
        self.cleared = true;
        self.clear_reason = Some(reason.into());
        true
    }

    /// Returns false (and changes nothing) on a cleared slot.
    pub fn set_dose(&mut self, mg: f64, note: impl Into<String>) -> bool {
        if self.cleared {
            return false;
        }
        self.dose_mg = Some(mg);
        self.annotations.push(note.into());
        true
    }

    /// Returns false (and changes nothing) on a cleared slot.
    pub fn set_interval(&mut self, hours: f64, note: impl Into<String>) -> bool {
        if self.cleared {
            return false;
        }
        self.interval_h = Some(hours);
        self.annotations.push(note.into());
        true
    }
}

impl fmt::Display for DrugSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cleared {
            return write!(f, "{}: (cleared)", self.role);
        }
        write!(f, "{}: {} ({})", self.role, self.drug_name, self.active_ingredient)?;
        if let Some(dose) = self.dose_mg {
            write!(f, " {dose} mg")?;
        }
        if let Some(interval) = self.interval_h {
            write!(f, " q{interval}h")?;
        }
        if !self.route.is_empty() {
            write!(f, " {}", self.route)?;
        }
        Ok(())
    }
}
