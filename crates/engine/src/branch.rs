// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branch evaluation and next-step selection

use lf_core::{BranchCondition, Plan, Step, StepId, StepResult};

/// Mutable state accumulated across one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    spend: f64,
}

impl RunState {
    pub fn add_spend(&mut self, cost: f64) {
        self.spend += cost;
    }

    pub fn spend(&self) -> f64 {
        self.spend
    }
}

/// Whether `condition` holds for the just-resolved step
pub fn condition_holds(condition: &BranchCondition, result: &StepResult, state: &RunState) -> bool {
    match condition {
        BranchCondition::TooManyResults { threshold } => result.lead_count() > *threshold,
        BranchCondition::TooFewResults { threshold } => result.lead_count() < *threshold,
        BranchCondition::DataSourceFailed { source } => first_attempt(result)
            .is_some_and(|(used, success)| used == source.as_str() && !success),
        BranchCondition::BudgetExceeded { max } => state.spend() > *max,
        BranchCondition::Fallback => true,
    }
}

/// First fallback attempt recorded in the step's source meta
fn first_attempt(result: &StepResult) -> Option<(&str, bool)> {
    let attempt = result.source_meta.as_ref()?.get("attempts")?.get(0)?;
    let source = attempt.get("source")?.as_str()?;
    let success = attempt
        .get("success")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    Some((source, success))
}

/// Target of the first matching branch, else the next declared step
pub fn select_next<'p>(
    plan: &'p Plan,
    step: &Step,
    result: &StepResult,
    state: &RunState,
) -> Option<&'p StepId> {
    let matched = step
        .branches
        .iter()
        .find(|b| condition_holds(&b.condition, result, state));

    match matched {
        Some(branch) => {
            tracing::debug!(
                step_id = %step.id,
                condition = branch.condition.name(),
                target = %branch.target,
                "branch taken"
            );
            plan.step(&branch.target).map(|s| &s.id)
        }
        None => plan.next_after(&step.id).map(|s| &s.id),
    }
}

#[cfg(test)]
#[path = "branch_tests.rs"]
mod tests;
