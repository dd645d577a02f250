// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan validation

use lf_core::{BranchCondition, Plan};

/// Structural problems plus branches that can never fire
///
/// A `fallback` branch always matches, so anything listed after it on
/// the same step is dead.
pub fn plan_problems(plan: &Plan) -> Vec<String> {
    let mut problems = plan.problems();

    for step in &plan.steps {
        let Some(fallback) = step
            .branches
            .iter()
            .position(|b| matches!(b.condition, BranchCondition::Fallback))
        else {
            continue;
        };
        for branch in &step.branches[fallback + 1..] {
            problems.push(format!(
                "step '{}': {} branch to '{}' follows a fallback branch",
                step.id,
                branch.condition.name(),
                branch.target
            ));
        }
    }
    problems
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
