use painrx_common::Result;
use painrx_protocol::is_not_applicable;

use super::lab_threshold::apply_comparison_clauses;
use super::{require, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// White-cell count limits, same clause form as platelets.
pub struct WhiteCellRule;

impl RuleApplier for WhiteCellRule {
    fn name(&self) -> &'static str {
        "white cells"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.white_cell_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let count = require(ctx.patient.labs.white_cells, self.name(), "white_cells")?;
        Ok(apply_comparison_clauses(ctx, role, self.name(), &row.white_cell_rule, count, "white cells"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{row, Harness};

    #[test]
    fn test_neutropenia_clears_both() {
        let mut r = row();
        r.white_cell_rule = "<4 K/uL - avoid".to_string();
        let mut h = Harness::with_row(r);
        h.patient.labs.white_cells = Some(2.5);
        assert!(matches!(h.run(&WhiteCellRule, SlotRole::Primary).unwrap(), RuleOutcome::Avoid(_)));
        assert!(!h.rec.is_viable());
    }

    #[test]
    fn test_high_count_clause() {
        let mut r = row();
        r.white_cell_rule = ">11 - 12h".to_string();
        let mut h = Harness::with_row(r);
        h.patient.labs.white_cells = Some(14.0);
        assert_eq!(
            h.run(&WhiteCellRule, SlotRole::Alternative).unwrap(),
            RuleOutcome::AdjustInterval(12.0)
        );
        assert_eq!(h.slot(SlotRole::Alternative).interval_h, Some(12.0));
        assert_eq!(h.slot(SlotRole::Primary).interval_h, Some(8.0));
    }
}
