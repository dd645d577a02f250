// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence sink for finished plan runs

mod noop;

pub use noop::NoOpSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSink, RecordedRun};

use async_trait::async_trait;
use lf_core::{ExecutionResult, Plan, Principal};
use thiserror::Error;

/// Errors from a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// A finished run as handed to the sink
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRecord<'a> {
    pub plan: &'a Plan,
    pub principal: &'a Principal,
    pub result: &'a ExecutionResult,
}

/// Adapter persisting execution results
///
/// Failures are logged by the engine and never change the run outcome.
#[async_trait]
pub trait ExecutionSink: Send + Sync + 'static {
    async fn record(&self, record: &ExecutionRecord<'_>) -> Result<(), SinkError>;
}
