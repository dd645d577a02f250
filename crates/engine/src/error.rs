// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the plan engine

use thiserror::Error;

/// Errors that can occur before or around a plan run
///
/// Step failures are never errors; they are recorded in the result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid plan {plan_id}: {}", problems.join("; "))]
    InvalidPlan {
        plan_id: String,
        problems: Vec<String>,
    },
    #[error("run of plan {plan_id} aborted: {message}")]
    RunAborted { plan_id: String, message: String },
}
