// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::{Step, ToolId};
use serde_json::json;

#[test]
fn interpolate_known_and_unknown_vars() {
    let vars: HashMap<String, String> = [("query".to_string(), "dentists".to_string())]
        .into_iter()
        .collect();

    assert_eq!(interpolate("{query} in {city}", &vars), "dentists in {city}");
    assert_eq!(interpolate("no placeholders", &vars), "no placeholders");
}

#[test]
fn inputs_take_scalar_goal_values() {
    let mut plan = Plan::new(
        "p",
        "t",
        vec![Step::new("search", ToolId::SearchLeads).with_input(json!({
            "query": "{query}",
            "tags": ["{region}", "fixed"],
            "limit": 10,
            "nested": { "radius": "{radius}km" },
        }))],
    )
    .with_goal(json!({
        "query": "roofers",
        "region": "tx",
        "radius": 15,
        "filters": { "ignored": true },
    }));

    interpolate_inputs(&mut plan);

    assert_eq!(
        plan.steps[0].input,
        json!({
            "query": "roofers",
            "tags": ["tx", "fixed"],
            "limit": 10,
            "nested": { "radius": "15km" },
        })
    );
}

#[test]
fn missing_goal_leaves_inputs_untouched() {
    let input = json!({ "query": "{query}" });
    let mut plan = Plan::new(
        "p",
        "t",
        vec![Step::new("search", ToolId::SearchLeads).with_input(input.clone())],
    );

    interpolate_inputs(&mut plan);
    assert_eq!(plan.steps[0].input, input);
}
