// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op sink

use super::{ExecutionRecord, ExecutionSink, SinkError};
use async_trait::async_trait;

/// Sink that discards every record
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSink;

impl NoOpSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecutionSink for NoOpSink {
    async fn record(&self, _record: &ExecutionRecord<'_>) -> Result<(), SinkError> {
        Ok(())
    }
}
