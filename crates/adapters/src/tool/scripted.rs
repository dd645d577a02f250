// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic tool driven by a per-step script
//!
//! Attempt `n` of a step plays the `n`th scripted entry for that step,
//! repeating the last entry once the script runs out. Steps without a
//! script succeed with an empty payload.
//!
//! ```toml
//! [[steps.search]]
//! fail = "places api unavailable"
//!
//! [[steps.search]]
//! leads_found = 12
//! cost = 1.5
//! ```

use super::{Tool, ToolContext, ToolError, ToolOutcome};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted invocation outcome
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptedAttempt {
    /// Report `success = false` with this message
    pub fail: Option<String>,
    /// Raise `ToolError::Failed` with this message
    pub error: Option<String>,
    pub leads_found: Option<u64>,
    pub data: Option<serde_json::Value>,
    pub source_meta: Option<serde_json::Value>,
    pub cost: f64,
    /// Simulated latency; cancellable
    #[serde(with = "humantime_serde")]
    pub delay: Option<Duration>,
}

impl ScriptedAttempt {
    pub fn leads(count: u64) -> Self {
        Self {
            leads_found: Some(count),
            ..Self::default()
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            fail: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_source_meta(mut self, meta: serde_json::Value) -> Self {
        self.source_meta = Some(meta);
        self
    }

    fn outcome(&self) -> Result<ToolOutcome, ToolError> {
        if let Some(message) = &self.error {
            return Err(ToolError::Failed(message.clone()));
        }

        let mut outcome = match &self.fail {
            Some(message) => ToolOutcome::failed(message.clone()),
            None => {
                let mut data = self
                    .data
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({}));
                if let (Some(count), Some(map)) = (self.leads_found, data.as_object_mut()) {
                    map.insert("leads_found".into(), count.into());
                }
                ToolOutcome::ok(data)
            }
        };
        outcome.source_meta = self.source_meta.clone();
        outcome.cost = self.cost;
        Ok(outcome)
    }
}

/// Per-step scripts keyed by step id
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolScript {
    pub steps: HashMap<String, Vec<ScriptedAttempt>>,
}

/// Recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub step_id: String,
    pub attempt: u32,
    pub input: serde_json::Value,
}

#[derive(Clone, Default)]
pub struct ScriptedTool {
    script: Arc<ToolScript>,
    calls: Arc<Mutex<Vec<ToolCall>>>,
}

impl ScriptedTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_script(script: ToolScript) -> Self {
        Self {
            script: Arc::new(script),
            calls: Arc::default(),
        }
    }

    /// Script the attempts of one step
    pub fn on(mut self, step_id: &str, attempts: Vec<ScriptedAttempt>) -> Self {
        Arc::make_mut(&mut self.script)
            .steps
            .insert(step_id.to_string(), attempts);
        self
    }

    /// All recorded invocations
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Recorded invocations of one step
    pub fn calls_for(&self, step_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.step_id == step_id)
            .count()
    }

    fn attempt_for(&self, step_id: &str, attempt: u32) -> Option<ScriptedAttempt> {
        let attempts = self.script.steps.get(step_id)?;
        let index = (attempt.max(1) as usize - 1).min(attempts.len().saturating_sub(1));
        attempts.get(index).cloned()
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    async fn invoke(
        &self,
        input: &serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ToolCall {
                step_id: ctx.step_id.to_string(),
                attempt: ctx.attempt,
                input: input.clone(),
            });

        let Some(scripted) = self.attempt_for(ctx.step_id.as_str(), ctx.attempt) else {
            return Ok(ToolOutcome::ok(serde_json::json!({})));
        };

        if let Some(delay) = scripted.delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = ctx.cancel.cancelled() => return Err(ToolError::Cancelled),
            }
        }

        scripted.outcome()
    }
}
