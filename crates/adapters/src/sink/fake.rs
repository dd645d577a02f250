// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExecutionRecord, ExecutionSink, SinkError};
use async_trait::async_trait;
use lf_core::ExecutionResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded run
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub user_id: String,
    pub account_id: Option<String>,
    pub result: ExecutionResult,
}

/// Fake sink that keeps every record in memory
#[derive(Clone, Default)]
pub struct FakeSink {
    runs: Arc<Mutex<Vec<RecordedRun>>>,
    fail: Arc<AtomicBool>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail after recording
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ExecutionSink for FakeSink {
    async fn record(&self, record: &ExecutionRecord<'_>) -> Result<(), SinkError> {
        self.runs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRun {
                user_id: record.principal.user_id.clone(),
                account_id: record.principal.account_id.clone(),
                result: record.result.clone(),
            });

        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError::WriteFailed("database unavailable".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
