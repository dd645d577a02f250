// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan data model
//!
//! A plan is an ordered list of steps with declared dependencies and
//! optional branches. Plans are plain data; execution state lives in
//! the `StepResult`s produced by a run.

mod result;
mod step;

pub use result::{ExecutionResult, RunStatus, StepResult, StepStatus};
pub use step::{Branch, BranchCondition, Step, ToolId};

use crate::id::{PlanId, StepId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
    /// Free-form goal metadata
    #[serde(default)]
    pub goal: serde_json::Value,
    /// Free-form context metadata
    #[serde(default)]
    pub context: serde_json::Value,
}

impl Plan {
    pub fn new(id: impl Into<PlanId>, title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            steps,
            goal: serde_json::Value::Null,
            context: serde_json::Value::Null,
        }
    }

    pub fn with_goal(mut self, goal: serde_json::Value) -> Self {
        self.goal = goal;
        self
    }

    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == id)
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// Step declared right after `id`
    pub fn next_after(&self, id: &StepId) -> Option<&Step> {
        self.position(id).and_then(|i| self.steps.get(i + 1))
    }

    /// Structural problems that make the plan unrunnable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.id.0.trim().is_empty() {
            problems.push("plan id is empty".to_string());
        }

        let mut seen: Vec<&StepId> = Vec::new();
        for step in &self.steps {
            if step.id.0.trim().is_empty() {
                problems.push("step with empty id".to_string());
            }
            if seen.contains(&&step.id) {
                problems.push(format!("duplicate step id '{}'", step.id));
            }
            seen.push(&step.id);
        }

        for step in &self.steps {
            for dep in &step.depends_on {
                if dep == &step.id {
                    problems.push(format!("step '{}' depends on itself", step.id));
                } else if self.step(dep).is_none() {
                    problems.push(format!("step '{}' depends on unknown step '{}'", step.id, dep));
                }
            }
            for branch in &step.branches {
                if self.step(&branch.target).is_none() {
                    problems.push(format!(
                        "step '{}' branches to unknown step '{}'",
                        step.id, branch.target
                    ));
                }
            }
        }
        problems
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
