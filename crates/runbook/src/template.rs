// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Goal interpolation into step inputs

use lf_core::Plan;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Interpolate `{name}` placeholders with values from the vars map
///
/// Unknown variables are left as-is.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            vars.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Fill string inputs of every step from the plan's scalar goal values
pub fn interpolate_inputs(plan: &mut Plan) {
    let vars = goal_vars(&plan.goal);
    if vars.is_empty() {
        return;
    }
    for step in &mut plan.steps {
        fill(&mut step.input, &vars);
    }
}

fn goal_vars(goal: &serde_json::Value) -> HashMap<String, String> {
    let Some(map) = goal.as_object() else {
        return HashMap::new();
    };
    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

fn fill(value: &mut serde_json::Value, vars: &HashMap<String, String>) {
    match value {
        serde_json::Value::String(s) => *s = interpolate(s, vars),
        serde_json::Value::Array(items) => items.iter_mut().for_each(|v| fill(v, vars)),
        serde_json::Value::Object(map) => map.values_mut().for_each(|v| fill(v, vars)),
        _ => {}
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
