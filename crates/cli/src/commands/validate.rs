// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lf validate <plan>` - Check a plan definition

use crate::output::{self, OutputFormat};
use clap::Args;
use lf_core::{Plan, Step};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Plan definition file
    pub plan: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct PlanSummary {
    id: String,
    title: String,
    steps: Vec<StepSummary>,
}

#[derive(Serialize)]
struct StepSummary {
    id: String,
    tool: String,
    depends_on: Vec<String>,
    branches: Vec<String>,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            title: plan.title.clone(),
            steps: plan.steps.iter().map(StepSummary::from).collect(),
        }
    }
}

impl From<&Step> for StepSummary {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id.to_string(),
            tool: step.tool.to_string(),
            depends_on: step.depends_on.iter().map(|d| d.to_string()).collect(),
            branches: step
                .branches
                .iter()
                .map(|b| format!("{} -> {}", b.condition.name(), b.target))
                .collect(),
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plan {}: {}", self.id, self.title)?;
        write!(f, "\nSteps: {}", self.steps.len())?;
        for step in &self.steps {
            write!(f, "\n  {:<12} {}", step.id, step.tool)?;
            if !step.depends_on.is_empty() {
                write!(f, "  needs {}", step.depends_on.join(", "))?;
            }
            for branch in &step.branches {
                write!(f, "\n    {}", branch)?;
            }
        }
        Ok(())
    }
}

pub fn validate(args: ValidateArgs) -> anyhow::Result<()> {
    let plan = lf_runbook::load_plan(&args.plan)?;
    tracing::debug!(plan_id = %plan.id, steps = plan.steps.len(), "plan is valid");
    output::print(&PlanSummary::from(&plan), args.format)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
