// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::source::{Lead, LeadSource, SearchParams, SourceError};
use crate::tool::{Tool, ToolContext, ToolError, ToolOutcome};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any Tool
#[derive(Clone)]
pub struct TracedTool<T> {
    name: &'static str,
    inner: T,
}

impl<T> TracedTool<T> {
    pub fn new(name: &'static str, inner: T) -> Self {
        Self { name, inner }
    }
}

#[async_trait]
impl<T: Tool> Tool for TracedTool<T> {
    async fn invoke(
        &self,
        input: &serde_json::Value,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        let span = tracing::info_span!(
            "tool.invoke",
            tool = self.name,
            step_id = %ctx.step_id,
            attempt = ctx.attempt,
        );

        async {
            tracing::info!(user_id = %ctx.principal.user_id, "starting");

            let start = std::time::Instant::now();
            let result = self.inner.invoke(input, ctx).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(outcome) if outcome.success => {
                    tracing::info!(elapsed_ms, cost = outcome.cost, "succeeded")
                }
                Ok(outcome) => tracing::warn!(
                    elapsed_ms,
                    error = outcome.error_message.as_deref().unwrap_or(""),
                    "reported failure"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "invoke failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any LeadSource
#[derive(Clone)]
pub struct TracedSource<S> {
    inner: S,
}

impl<S> TracedSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: LeadSource> LeadSource for TracedSource<S> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Lead>, SourceError> {
        let span = tracing::info_span!("source.search", source = self.inner.id());

        async {
            tracing::debug!(query = %params.query, location = ?params.location, "searching");

            let start = std::time::Instant::now();
            let result = self.inner.search(params).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(leads) => tracing::info!(elapsed_ms, count = leads.len(), "searched"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "search failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
