//! Cross-rule correction aggregation.
//!
//! Several rules may each suggest a dose or interval for the same active
//! ingredient. Suggestions are collected while the pipeline runs and merged
//! once it completes: the lowest dose and the longest interval win,
//! whatever order the rules ran in.

use std::collections::BTreeMap;
use tracing::debug;

use crate::slot::DrugSlot;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Suggestion {
    value: f64,
    source: &'static str,
}

/// Request-scoped; create one per candidate recommendation.
#[derive(Debug, Clone, Default)]
pub struct CorrectionAggregator {
    doses: BTreeMap<String, Vec<Suggestion>>,
    intervals: BTreeMap<String, Vec<Suggestion>>,
}

fn key(ingredient: &str) -> String {
    ingredient.trim().to_lowercase()
}

impl CorrectionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dose(&mut self, ingredient: &str, mg: f64, source: &'static str) {
        self.doses
            .entry(key(ingredient))
            .or_default()
            .push(Suggestion { value: mg, source });
    }

    pub fn record_interval(&mut self, ingredient: &str, hours: f64, source: &'static str) {
        self.intervals
            .entry(key(ingredient))
            .or_default()
            .push(Suggestion { value: hours, source });
    }

    /// Lowest dose suggested for the ingredient.
    pub fn resolved_dose(&self, ingredient: &str) -> Option<f64> {
        self.doses
            .get(&key(ingredient))?
            .iter()
            .map(|s| s.value)
            .reduce(f64::min)
    }

    /// Longest interval suggested for the ingredient.
    pub fn resolved_interval(&self, ingredient: &str) -> Option<f64> {
        self.intervals
            .get(&key(ingredient))?
            .iter()
            .map(|s| s.value)
            .reduce(f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.doses.is_empty() && self.intervals.is_empty()
    }

    /// Write the merged corrections into `slot`. Cleared slots are skipped.
    pub fn finalize(&self, slot: &mut DrugSlot) {
        if slot.is_cleared() {
            return;
        }
        let ingredient = slot.active_ingredient.clone();

        if let Some(mg) = self.resolved_dose(&ingredient) {
            let sources = self.sources(&self.doses, &ingredient);
            debug!("{}: final dose {} mg from {}", ingredient, mg, sources);
            slot.set_dose(mg, format!("dose {mg} mg (lowest of: {sources})"));
        }
        if let Some(hours) = self.resolved_interval(&ingredient) {
            let sources = self.sources(&self.intervals, &ingredient);
            debug!("{}: final interval {} h from {}", ingredient, hours, sources);
            slot.set_interval(hours, format!("every {hours} h (longest of: {sources})"));
        }
    }

    fn sources(&self, map: &BTreeMap<String, Vec<Suggestion>>, ingredient: &str) -> String {
        map.get(&key(ingredient))
            .map(|list| {
                list.iter()
                    .map(|s| format!("{} {}", s.source, s.value))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
