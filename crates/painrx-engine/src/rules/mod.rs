//! Rule appliers.
//!
//! Each applier evaluates one clinical dimension of a protocol row against
//! the patient and reports what it did as a `RuleOutcome`. Appliers run in
//! the fixed order returned by [`default_appliers`].

pub mod age;
pub mod contraindication;
pub mod hepatic;
pub mod lab_threshold;
pub mod pain_trend;
pub mod platelets;
pub mod renal;
pub mod saturation;
pub mod sensitivity;
pub mod sodium;
pub mod weight;
pub mod white_cells;

use painrx_common::{EngineConfig, PainHistory, PainRxError, PatientSnapshot, ProtocolRow, Result};
use painrx_protocol::Directive;
use tracing::{debug, warn};

use crate::corrections::CorrectionAggregator;
use crate::recommendation::Recommendation;
use crate::slot::SlotRole;

pub use age::AgeRule;
pub use contraindication::ContraindicationRule;
pub use hepatic::HepaticRule;
pub use pain_trend::PainTrendRule;
pub use platelets::PlateletRule;
pub use renal::RenalRule;
pub use saturation::SaturationRule;
pub use sensitivity::SensitivityRule;
pub use sodium::SodiumRule;
pub use weight::WeightRule;
pub use white_cells::WhiteCellRule;

/// What one applier invocation did.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    NoOp,
    AdjustDose(f64),
    AdjustInterval(f64),
    Avoid(String),
    StopGeneration(String),
}

/// How often the pipeline invokes an applier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Once per candidate, before any slot is looked at.
    PerRecommendation,
    /// Once for every still-active slot.
    PerSlot,
}

/// Everything an applier may read or change.
pub struct RuleContext<'a> {
    pub recommendation: &'a mut Recommendation,
    pub row: &'a ProtocolRow,
    pub patient: &'a PatientSnapshot,
    pub history: &'a PainHistory,
    /// Patient age in completed years on the assessment date.
    pub age: u32,
    pub corrections: &'a mut CorrectionAggregator,
    pub config: &'a EngineConfig,
}

pub trait RuleApplier: Send + Sync {
    /// Short name used in comments, logs and correction sources.
    fn name(&self) -> &'static str;

    fn scope(&self) -> RuleScope {
        RuleScope::PerSlot
    }

    /// Evaluate the rule for one slot. `PerRecommendation` appliers receive
    /// `SlotRole::Primary` and should ignore it.
    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome>;
}

/// The eleven appliers in evaluation order.
pub fn default_appliers() -> Vec<Box<dyn RuleApplier>> {
    vec![
        Box::new(PainTrendRule),
        Box::new(AgeRule),
        Box::new(ContraindicationRule),
        Box::new(SensitivityRule),
        Box::new(PlateletRule),
        Box::new(WhiteCellRule),
        Box::new(SaturationRule),
        Box::new(SodiumRule),
        Box::new(HepaticRule),
        Box::new(WeightRule),
        Box::new(RenalRule),
    ]
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Whether a directive's adjustment is written to the slot immediately or
/// only handed to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustMode {
    ApplyAndRegister,
    RegisterOnly,
}

impl RuleContext<'_> {
    pub fn drug_name(&self, role: SlotRole) -> String {
        self.recommendation
            .slot(role)
            .map(|s| s.drug_name.clone())
            .unwrap_or_default()
    }

    pub fn ingredient(&self, role: SlotRole) -> String {
        self.recommendation
            .slot(role)
            .map(|s| s.active_ingredient.clone())
            .unwrap_or_default()
    }

    /// "Nurofen and Panadol", or just "Nurofen" when there is no alternative.
    pub fn both_drug_names(&self) -> String {
        let primary = self.row.primary_drug.trim();
        let alternative = self.row.alternative_drug.trim();
        if alternative.is_empty() {
            primary.to_string()
        } else {
            format!("{primary} and {alternative}")
        }
    }

    pub fn is_active(&self, role: SlotRole) -> bool {
        self.recommendation.is_slot_active(role)
    }
}

/// A required lab value, or the fatal error when it is absent.
pub fn require<T>(value: Option<T>, rule: &'static str, name: &'static str) -> Result<T> {
    value.ok_or(PainRxError::MissingClinicalValue { rule, value: name })
}

/// Clear one slot and report it.
pub fn avoid_slot(ctx: &mut RuleContext<'_>, role: SlotRole, rule: &'static str, reason: String) -> RuleOutcome {
    let reason = format!("{rule}: {reason}");
    if ctx.recommendation.clear_slot(role, &reason) {
        debug!("Cleared {} slot ({})", role, reason);
    }
    RuleOutcome::Avoid(reason)
}

/// Clear every slot and report it.
pub fn avoid_all(ctx: &mut RuleContext<'_>, rule: &'static str, reason: String) -> RuleOutcome {
    let reason = format!("{rule}: {reason}");
    let cleared = ctx.recommendation.clear_all(&reason);
    debug!("Cleared {} slot(s) ({})", cleared, reason);
    RuleOutcome::Avoid(reason)
}

/// Carry out a dose or interval directive for one slot.
///
/// `Avoid` is not handled here; each rule decides how wide an avoid reaches.
pub fn apply_directive(
    ctx: &mut RuleContext<'_>,
    role: SlotRole,
    rule: &'static str,
    directive: Directive,
    mode: AdjustMode,
) -> RuleOutcome {
    let ingredient = ctx.ingredient(role);
    match directive {
        Directive::SetDose(mg) => {
            set_dose(ctx, role, rule, &ingredient, mg, mode);
            RuleOutcome::AdjustDose(mg)
        }
        Directive::ReduceByPercent(pct) => {
            let current = ctx.recommendation.slot(role).and_then(|s| s.dose_mg);
            let Some(current) = current else {
                warn!("{rule}: cannot reduce {} by {pct}%, protocol gives no dose", ingredient);
                return RuleOutcome::NoOp;
            };
            let mg = current * (1.0 - pct / 100.0);
            set_dose(ctx, role, rule, &ingredient, mg, mode);
            RuleOutcome::AdjustDose(mg)
        }
        Directive::SetInterval(hours) => {
            ctx.corrections.record_interval(&ingredient, hours, rule);
            if mode == AdjustMode::ApplyAndRegister {
                if let Some(slot) = ctx.recommendation.slot_mut(role) {
                    slot.set_interval(hours, format!("{rule}: every {hours} h"));
                }
            }
            ctx.recommendation
                .comment(format!("{rule}: {ingredient} interval {hours} h"));
            RuleOutcome::AdjustInterval(hours)
        }
        Directive::Avoid | Directive::NoOp => RuleOutcome::NoOp,
    }
}

fn set_dose(
    ctx: &mut RuleContext<'_>,
    role: SlotRole,
    rule: &'static str,
    ingredient: &str,
    mg: f64,
    mode: AdjustMode,
) {
    ctx.corrections.record_dose(ingredient, mg, rule);
    if mode == AdjustMode::ApplyAndRegister {
        if let Some(slot) = ctx.recommendation.slot_mut(role) {
            slot.set_dose(mg, format!("{rule}: {mg} mg"));
        }
    }
    ctx.recommendation
        .comment(format!("{rule}: {ingredient} dose {mg} mg"));
}
