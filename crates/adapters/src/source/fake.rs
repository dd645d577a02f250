// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lead source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Lead, LeadSource, SearchParams, SourceError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recorded search
#[derive(Debug, Clone)]
pub struct SourceCall {
    pub source: String,
    pub params: SearchParams,
}

/// Fake source returning a fixed answer
#[derive(Clone)]
pub struct FakeLeadSource {
    id: String,
    answer: Result<Vec<Lead>, SourceError>,
    calls: Arc<Mutex<Vec<SourceCall>>>,
}

impl FakeLeadSource {
    /// Source returning `count` generated leads
    pub fn returning(id: impl Into<String>, count: usize) -> Self {
        let id = id.into();
        let leads = (0..count)
            .map(|i| Lead::new(format!("{id} lead {i}")))
            .collect();
        Self {
            id,
            answer: Ok(leads),
            calls: Arc::default(),
        }
    }

    /// Source failing every search
    pub fn failing(id: impl Into<String>, error: SourceError) -> Self {
        Self {
            id: id.into(),
            answer: Err(error),
            calls: Arc::default(),
        }
    }

    /// Get all recorded searches
    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LeadSource for FakeLeadSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Lead>, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SourceCall {
                source: self.id.clone(),
                params: params.clone(),
            });
        self.answer.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
