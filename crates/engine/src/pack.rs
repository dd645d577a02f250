// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic packs run through the task runner
//!
//! A pack is an entry point an external scheduler triggers on its own
//! cadence. The runner gives every pack run the task runner's
//! timeout, retry and lifecycle events.

use crate::runner::{BoxError, ExecContext, TaskOptions, TaskRecord, TaskRunner};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lf_core::Principal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("pack failed: {0}")]
    Failed(String),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Inputs a pack run sees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackContext {
    pub principal: Principal,
    pub triggered_at: DateTime<Utc>,
    /// Pack-specific settings
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// A suggested follow-up for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackReport {
    pub nudges: Vec<Nudge>,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}

#[async_trait]
pub trait Pack: Send + Sync + 'static {
    fn id(&self) -> &str;

    async fn run(&self, ctx: &PackContext) -> Result<PackReport, PackError>;
}

/// Outcome of one pack run
#[derive(Debug, Clone)]
pub struct PackRun {
    pub task: TaskRecord,
    /// Present when the task succeeded
    pub report: Option<PackReport>,
}

/// Runs packs as tasks with feature id `pack:<id>`
#[derive(Clone)]
pub struct PackRunner {
    runner: TaskRunner,
    options: TaskOptions,
}

impl PackRunner {
    pub fn new(runner: TaskRunner) -> Self {
        let options = runner.defaults();
        Self { runner, options }
    }

    pub fn with_options(mut self, options: TaskOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, pack: Arc<dyn Pack>, ctx: PackContext) -> PackRun {
        let feature_id = format!("pack:{}", pack.id());
        let payload = serde_json::to_value(&ctx).unwrap_or(serde_json::Value::Null);

        let executor = move |_payload: serde_json::Value, _exec: ExecContext| {
            let pack = Arc::clone(&pack);
            let ctx = ctx.clone();
            async move {
                let report = pack.run(&ctx).await?;
                Ok::<_, BoxError>(serde_json::to_value(report)?)
            }
        };

        let task = self
            .runner
            .run_with(&feature_id, payload, &executor, self.options)
            .await;
        let report: Option<PackReport> = task
            .output
            .clone()
            .and_then(|output| serde_json::from_value(output).ok());

        if let Some(report) = &report {
            tracing::info!(
                feature_id = %feature_id,
                nudges = report.nudges.len(),
                "pack completed"
            );
        }
        PackRun { task, report }
    }
}

#[cfg(test)]
#[path = "pack_tests.rs"]
mod tests;
