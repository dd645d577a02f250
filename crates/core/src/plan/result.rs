// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step and run results

use crate::id::{PlanId, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl StepStatus {
    pub fn name(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Succeeded => "succeeded",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one step within one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: StepId,
    pub status: StepStatus,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Tool-reported provenance, e.g. the fallback attempt chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepResult {
    pub fn pending(step_id: StepId) -> Self {
        Self {
            step_id,
            status: StepStatus::Pending,
            attempts: 0,
            error: None,
            output: None,
            source_meta: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// A step that never ran
    pub fn skipped(step_id: StepId, reason: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: StepStatus::Skipped,
            error: Some(reason.into()),
            finished_at: Some(at),
            ..Self::pending(step_id)
        }
    }

    /// Leads the step reported: `leads_found`, else the `leads` array length, else 0
    pub fn lead_count(&self) -> u64 {
        let Some(output) = &self.output else {
            return 0;
        };
        output
            .get("leads_found")
            .or_else(|| output.get("leadsFound"))
            .and_then(|v| v.as_u64())
            .or_else(|| {
                output
                    .get("leads")
                    .and_then(|v| v.as_array())
                    .map(|leads| leads.len() as u64)
            })
            .unwrap_or(0)
    }
}

/// Overall status of a plan run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Partial,
    Failed,
}

impl RunStatus {
    /// `failed` if any step failed, `succeeded` if all succeeded, else `partial`
    pub fn derive(steps: &[StepResult]) -> Self {
        if steps.iter().any(|s| s.status == StepStatus::Failed) {
            RunStatus::Failed
        } else if steps.iter().all(|s| s.status == StepStatus::Succeeded) {
            RunStatus::Succeeded
        } else {
            RunStatus::Partial
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::Succeeded => "succeeded",
            RunStatus::Partial => "partial",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete outcome of one plan run
///
/// The status is derived from the step results at construction and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub plan_id: PlanId,
    status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    steps: Vec<StepResult>,
}

impl ExecutionResult {
    pub fn new(
        plan_id: PlanId,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        steps: Vec<StepResult>,
    ) -> Self {
        Self {
            plan_id,
            status: RunStatus::derive(&steps),
            started_at,
            finished_at,
            steps,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn step(&self, id: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.step_id == id)
    }
}
