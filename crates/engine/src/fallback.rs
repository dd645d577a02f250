// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered multi-source lead search
//!
//! Sources are tried in chain order until one returns at least
//! `min_results` leads without error. Every attempt is kept in the
//! returned meta, whether or not a source eventually wins.

use async_trait::async_trait;
use lf_adapters::{
    Lead, LeadSource, SearchParams, Tool, ToolContext, ToolError, ToolOutcome, TracedSource,
};
use lf_core::FallbackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Error code reported when no source in the chain succeeds
pub const ALL_SOURCES_FAILED: &str = "ALL_SOURCES_FAILED";

/// Primary source followed by ordered fallbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceChain {
    pub primary: String,
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

impl SourceChain {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: Vec::new(),
        }
    }

    pub fn with_fallback(mut self, source: impl Into<String>) -> Self {
        self.fallbacks.push(source.into());
        self
    }

    /// Source ids in try order, capped at the primary plus `max_fallbacks`
    pub fn ordered(&self, max_fallbacks: usize) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str())
            .chain(self.fallbacks.iter().map(String::as_str).take(max_fallbacks))
    }
}

/// One source tried during a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackAttempt {
    pub source: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub lead_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMeta {
    pub attempts: Vec<FallbackAttempt>,
    pub fallback_used: bool,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub source_used: String,
    pub leads: Vec<Lead>,
    pub meta: SearchMeta,
}

/// Registry of lead sources plus chain limits
#[derive(Clone)]
pub struct FallbackSearch {
    sources: HashMap<String, Arc<dyn LeadSource>>,
    min_results: usize,
    max_fallbacks: usize,
}

impl Default for FallbackSearch {
    fn default() -> Self {
        Self::new(&FallbackConfig::default())
    }
}

impl FallbackSearch {
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            sources: HashMap::new(),
            min_results: config.min_results,
            max_fallbacks: config.max_fallbacks,
        }
    }

    /// Register a source wrapped in [`TracedSource`]
    pub fn with_source(mut self, source: impl LeadSource) -> Self {
        self.register(Arc::new(TracedSource::new(source)));
        self
    }

    /// Register a source under its own id, replacing any previous one
    pub fn register(&mut self, source: Arc<dyn LeadSource>) {
        self.sources.insert(source.id().to_string(), source);
    }

    pub async fn search(&self, chain: &SourceChain, params: &SearchParams) -> SearchOutcome {
        let mut attempts = Vec::new();

        for source_id in chain.ordered(self.max_fallbacks) {
            let Some(source) = self.sources.get(source_id) else {
                tracing::warn!(source = source_id, "unknown source in chain");
                attempts.push(FallbackAttempt {
                    source: source_id.to_string(),
                    success: false,
                    error: Some("unknown source".to_string()),
                    lead_count: 0,
                });
                continue;
            };

            match source.search(params).await {
                Ok(leads) if leads.len() >= self.min_results => {
                    tracing::debug!(source = source_id, count = leads.len(), "source accepted");
                    attempts.push(FallbackAttempt {
                        source: source_id.to_string(),
                        success: true,
                        error: None,
                        lead_count: leads.len(),
                    });
                    return SearchOutcome {
                        source_used: source_id.to_string(),
                        leads,
                        meta: SearchMeta {
                            attempts,
                            fallback_used: source_id != chain.primary,
                            success: true,
                            error_code: None,
                        },
                    };
                }
                Ok(leads) => {
                    tracing::debug!(
                        source = source_id,
                        count = leads.len(),
                        min = self.min_results,
                        "too few results"
                    );
                    attempts.push(FallbackAttempt {
                        source: source_id.to_string(),
                        success: false,
                        error: None,
                        lead_count: leads.len(),
                    });
                }
                Err(e) => {
                    attempts.push(FallbackAttempt {
                        source: source_id.to_string(),
                        success: false,
                        error: Some(e.to_string()),
                        lead_count: 0,
                    });
                }
            }
        }

        tracing::warn!(primary = %chain.primary, tried = attempts.len(), "all sources failed");
        SearchOutcome {
            source_used: chain.primary.clone(),
            leads: Vec::new(),
            meta: SearchMeta {
                attempts,
                fallback_used: false,
                success: false,
                error_code: Some(ALL_SOURCES_FAILED.to_string()),
            },
        }
    }
}

/// Step input accepted by [`SearchTool`]
#[derive(Debug, Deserialize)]
struct SearchInput {
    #[serde(flatten)]
    params: SearchParams,
    #[serde(default)]
    primary: Option<String>,
    #[serde(default)]
    fallbacks: Option<Vec<String>>,
}

/// Plan tool running a fallback search
///
/// Input: `{ "query", "location"?, "limit"?, "primary"?, "fallbacks"? }`;
/// chain fields override the tool's default chain. Output data carries
/// `leads_found`, `leads` and `source_used`; `source_meta` carries the
/// [`SearchMeta`].
#[derive(Clone)]
pub struct SearchTool {
    search: FallbackSearch,
    chain: SourceChain,
}

impl SearchTool {
    pub fn new(search: FallbackSearch, chain: SourceChain) -> Self {
        Self { search, chain }
    }
}

#[async_trait]
impl Tool for SearchTool {
    async fn invoke(
        &self,
        input: &serde_json::Value,
        _ctx: &ToolContext<'_>,
    ) -> Result<ToolOutcome, ToolError> {
        let input: SearchInput = serde_json::from_value(input.clone())
            .map_err(|e| ToolError::InvalidInput(e.to_string()))?;

        let chain = SourceChain {
            primary: input.primary.unwrap_or_else(|| self.chain.primary.clone()),
            fallbacks: input
                .fallbacks
                .unwrap_or_else(|| self.chain.fallbacks.clone()),
        };

        let outcome = self.search.search(&chain, &input.params).await;
        let meta = serde_json::to_value(&outcome.meta)
            .map_err(|e| ToolError::Failed(e.to_string()))?;
        let data = serde_json::json!({
            "leads_found": outcome.leads.len(),
            "leads": outcome.leads,
            "source_used": outcome.source_used,
        });

        let result = if outcome.meta.success {
            ToolOutcome::ok(data)
        } else {
            ToolOutcome {
                data: Some(data),
                ..ToolOutcome::failed(ALL_SOURCES_FAILED)
            }
        };
        Ok(result.with_source_meta(meta))
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
