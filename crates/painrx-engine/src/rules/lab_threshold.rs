//! Shared logic for the blood-count and vital-sign rules.

use painrx_protocol::{parse_clauses, threshold_integer, parse_directive, Directive, MatchKey};
use tracing::{debug, warn};

use super::{apply_directive, avoid_all, AdjustMode, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// Evaluate comparison clauses (`<100K/µL - avoid`) against `value`.
///
/// The first satisfied clause decides. Avoid clears every slot; any other
/// directive adjusts this slot.
pub fn apply_comparison_clauses(
    ctx: &mut RuleContext<'_>,
    role: SlotRole,
    rule: &'static str,
    cell: &str,
    value: f64,
    label: &str,
) -> RuleOutcome {
    let clauses = parse_clauses(cell);
    if clauses.is_empty() {
        warn!("{rule}: no threshold clause in '{}'", cell);
        return RuleOutcome::NoOp;
    }

    for clause in clauses {
        let MatchKey::Compare { op, threshold } = clause.key else {
            warn!("{rule}: class clause in '{}' ignored", cell);
            continue;
        };
        if !op.holds(value, threshold) {
            continue;
        }

        debug!("{rule}: {} {} {}{} matched", label, value, op.symbol(), threshold);
        return match parse_directive(&clause.directive) {
            Directive::Avoid => {
                let reason = format!(
                    "{} avoided, {label} {value} {}{threshold}",
                    ctx.both_drug_names(),
                    op.symbol()
                );
                avoid_all(ctx, rule, reason)
            }
            directive => apply_directive(ctx, role, rule, directive, AdjustMode::ApplyAndRegister),
        };
    }
    RuleOutcome::NoOp
}

/// The cell's threshold is a lower bound; below it every slot is cleared.
pub fn apply_lower_bound(
    ctx: &mut RuleContext<'_>,
    rule: &'static str,
    cell: &str,
    value: f64,
    label: &str,
) -> RuleOutcome {
    let Some(bound) = threshold_integer(cell) else {
        warn!("{rule}: no lower bound in '{}'", cell);
        return RuleOutcome::NoOp;
    };
    if value >= f64::from(bound) {
        return RuleOutcome::NoOp;
    }
    let reason = format!("{} avoided, {label} {value} below {bound}", ctx.both_drug_names());
    avoid_all(ctx, rule, reason)
}
