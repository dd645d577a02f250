// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervised background runs

use crate::error::EngineError;
use lf_core::{ExecutionResult, PlanId};
use tokio::task::JoinHandle;

/// Handle to a plan run started with [`crate::PlanExecutor::spawn`]
///
/// Dropping the handle detaches the run; it keeps going.
#[derive(Debug)]
pub struct RunHandle {
    plan_id: PlanId,
    handle: JoinHandle<Result<ExecutionResult, EngineError>>,
}

impl RunHandle {
    pub(crate) fn new(
        plan_id: PlanId,
        handle: JoinHandle<Result<ExecutionResult, EngineError>>,
    ) -> Self {
        Self { plan_id, handle }
    }

    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the run at its next suspension point
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the run; a panicked or aborted run is `RunAborted`
    pub async fn join(self) -> Result<ExecutionResult, EngineError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                let message = if e.is_cancelled() {
                    "cancelled".to_string()
                } else {
                    "run task panicked".to_string()
                };
                tracing::error!(plan_id = %self.plan_id, error = %e, "background run aborted");
                Err(EngineError::RunAborted {
                    plan_id: self.plan_id.to_string(),
                    message,
                })
            }
        }
    }
}
