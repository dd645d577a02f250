// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_adapters::{FakeLeadSource, SourceError};
use lf_core::{Plan, Principal, StepId};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use yare::parameterized;

fn search_with(sources: Vec<FakeLeadSource>) -> FallbackSearch {
    sources
        .into_iter()
        .fold(FallbackSearch::default(), |search, source| search.with_source(source))
}

fn chain() -> SourceChain {
    SourceChain::new("places")
        .with_fallback("apollo")
        .with_fallback("yelp")
}

#[tokio::test]
async fn third_source_wins_past_error_and_short_result() {
    let search = search_with(vec![
        FakeLeadSource::failing("places", SourceError::Unavailable("503".into())),
        FakeLeadSource::returning("apollo", 2),
        FakeLeadSource::returning("yelp", 5),
    ]);

    let outcome = search.search(&chain(), &SearchParams::new("dentists")).await;

    assert_eq!(outcome.source_used, "yelp");
    assert_eq!(outcome.leads.len(), 5);
    assert!(outcome.meta.success);
    assert!(outcome.meta.fallback_used);
    assert!(outcome.meta.error_code.is_none());

    let attempts = &outcome.meta.attempts;
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[0].error.as_deref(), Some("source unavailable: 503"));
    assert_eq!((attempts[1].success, attempts[1].lead_count), (false, 2));
    assert_eq!((attempts[2].success, attempts[2].lead_count), (true, 5));
}

#[tokio::test]
async fn primary_success_stops_the_chain() {
    let apollo = FakeLeadSource::returning("apollo", 10);
    let search = search_with(vec![FakeLeadSource::returning("places", 3), apollo.clone()]);

    let outcome = search.search(&chain(), &SearchParams::new("dentists")).await;

    assert_eq!(outcome.source_used, "places");
    assert!(!outcome.meta.fallback_used);
    assert_eq!(outcome.meta.attempts.len(), 1);
    assert!(apollo.calls().is_empty());
}

#[tokio::test]
async fn exhausted_chain_reports_all_sources_failed() {
    let search = search_with(vec![
        FakeLeadSource::returning("places", 1),
        FakeLeadSource::failing("apollo", SourceError::RateLimited("429".into())),
    ]);

    let outcome = search.search(&chain(), &SearchParams::new("dentists")).await;

    assert_eq!(outcome.source_used, "places");
    assert!(outcome.leads.is_empty());
    assert!(!outcome.meta.success);
    assert!(!outcome.meta.fallback_used);
    assert_eq!(outcome.meta.error_code.as_deref(), Some(ALL_SOURCES_FAILED));
    // yelp was never registered
    let attempts = &outcome.meta.attempts;
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[2].source, "yelp");
    assert_eq!(attempts[2].error.as_deref(), Some("unknown source"));
}

#[parameterized(
    no_fallbacks = { 0, 1 },
    one_fallback = { 1, 2 },
    default_cap = { 3, 4 },
    cap_above_chain = { 9, 6 },
)]
fn chain_is_capped(max_fallbacks: usize, expected: usize) {
    let chain = SourceChain::new("a")
        .with_fallback("b")
        .with_fallback("c")
        .with_fallback("d")
        .with_fallback("e")
        .with_fallback("f");
    assert_eq!(chain.ordered(max_fallbacks).count(), expected);
}

#[tokio::test]
async fn threshold_comes_from_config() {
    let config = FallbackConfig {
        min_results: 1,
        max_fallbacks: 3,
    };
    let search = FallbackSearch::new(&config).with_source(FakeLeadSource::returning("places", 1));

    let outcome = search
        .search(&SourceChain::new("places"), &SearchParams::new("dentists"))
        .await;
    assert!(outcome.meta.success);
}

async fn invoke_tool(tool: &SearchTool, input: serde_json::Value) -> ToolOutcome {
    let plan = Plan::new("plan-1", "Dentists", Vec::new());
    let principal = Principal::new("user-1");
    let step_id = StepId::from("search");
    let ctx = ToolContext {
        step_id: &step_id,
        attempt: 1,
        principal: &principal,
        plan: &plan,
        prior_results: &[],
        cancel: CancellationToken::new(),
    };
    tool.invoke(&input, &ctx).await.unwrap()
}

#[tokio::test]
async fn search_tool_reports_leads_and_chain() {
    let search = search_with(vec![
        FakeLeadSource::returning("places", 0),
        FakeLeadSource::returning("apollo", 4),
    ]);
    let tool = SearchTool::new(search, chain());

    let outcome = invoke_tool(&tool, json!({ "query": "dentists", "location": "Austin" })).await;

    assert!(outcome.success);
    let data = outcome.data.unwrap();
    assert_eq!(data["leads_found"], 4);
    assert_eq!(data["source_used"], "apollo");
    let meta = outcome.source_meta.unwrap();
    assert_eq!(meta["attempts"][0]["source"], "places");
    assert_eq!(meta["attempts"][0]["success"], false);
    assert_eq!(meta["fallback_used"], true);
}

#[tokio::test]
async fn search_tool_input_overrides_chain() {
    let search = search_with(vec![FakeLeadSource::returning("yelp", 3)]);
    let tool = SearchTool::new(search, chain());

    let outcome = invoke_tool(&tool, json!({ "query": "dentists", "primary": "yelp" })).await;

    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()["source_used"], "yelp");
}

#[tokio::test]
async fn search_tool_fails_when_every_source_fails() {
    let tool = SearchTool::new(FallbackSearch::default(), SourceChain::new("places"));

    let outcome = invoke_tool(&tool, json!({ "query": "dentists" })).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_message.as_deref(), Some(ALL_SOURCES_FAILED));
    assert_eq!(outcome.data.unwrap()["leads_found"], 0);
    assert_eq!(outcome.source_meta.unwrap()["error_code"], ALL_SOURCES_FAILED);
}

#[tokio::test]
async fn search_tool_rejects_input_without_query() {
    let tool = SearchTool::new(FallbackSearch::default(), chain());
    let plan = Plan::new("plan-1", "Dentists", Vec::new());
    let principal = Principal::new("user-1");
    let step_id = StepId::from("search");
    let ctx = ToolContext {
        step_id: &step_id,
        attempt: 1,
        principal: &principal,
        plan: &plan,
        prior_results: &[],
        cancel: CancellationToken::new(),
    };

    let err = tool.invoke(&json!({ "location": "Austin" }), &ctx).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidInput(_)));
}
