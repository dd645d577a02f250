// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step tool adapters
//!
//! A tool is the action a plan step invokes. The engine only inspects
//! `success`, the lead count in `data`, the fallback chain in
//! `source_meta`, and `cost`.

mod scripted;

pub use scripted::{ScriptedAttempt, ScriptedTool, ToolCall, ToolScript};

use crate::source::SourceError;
use async_trait::async_trait;
use lf_core::{Plan, Principal, StepId, StepResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a tool raises instead of reporting `success = false`
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Failed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("cancelled")]
    Cancelled,
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// What a tool reports back for one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_meta: Option<serde_json::Value>,
    /// Spend attributed to this invocation
    #[serde(default)]
    pub cost: f64,
}

impl ToolOutcome {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_source_meta(mut self, meta: serde_json::Value) -> Self {
        self.source_meta = Some(meta);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }
}

/// Everything a tool may look at besides its own input
#[derive(Debug, Clone)]
pub struct ToolContext<'a> {
    pub step_id: &'a StepId,
    pub attempt: u32,
    pub principal: &'a Principal,
    pub plan: &'a Plan,
    /// Results of steps resolved earlier in this run
    pub prior_results: &'a [StepResult],
    /// Cancelled when the run gives up on this invocation
    pub cancel: CancellationToken,
}

impl ToolContext<'_> {
    /// Output of an earlier step in this run
    pub fn output_of(&self, step_id: &str) -> Option<&serde_json::Value> {
        self.prior_results
            .iter()
            .find(|r| r.step_id == step_id)
            .and_then(|r| r.output.as_ref())
    }
}

/// Adapter for a step action (search, enrichment, list save, ...)
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    async fn invoke(
        &self,
        input: &serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError>;
}

#[async_trait]
impl<T: Tool + ?Sized> Tool for std::sync::Arc<T> {
    async fn invoke(
        &self,
        input: &serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        (**self).invoke(input, ctx).await
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
