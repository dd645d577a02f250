// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan TOML parsing
//!
//! ```toml
//! id = "dentists-austin"
//! title = "Dentists in Austin"
//!
//! [goal]
//! query = "dentists"
//! location = "Austin, TX"
//!
//! [[step]]
//! id = "search"
//! tool = "search_leads"
//! input = { query = "{query}", location = "{location}" }
//!
//! [[step.branch]]
//! when = "too_many_results"
//! threshold = 50
//! goto = "narrow"
//! ```

use crate::template::interpolate_inputs;
use crate::validate::plan_problems;
use lf_core::{Branch, Plan, Step, StepId, ToolId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a plan
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid plan: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const STEP_KEYS: [&str; 6] = ["id", "label", "tool", "input", "depends_on", "branch"];

/// Parse and validate a plan from TOML content
///
/// String inputs have `{name}` placeholders filled from the plan's
/// `[goal]` table before validation.
pub fn parse_plan(content: &str) -> Result<Plan, ParseError> {
    let table: toml::Table = toml::from_str(content)?;

    let id = required_str(&table, "id", "id")?;
    let title = optional_str(&table, "title", "title")?.unwrap_or_default();

    let steps = match table.get("step") {
        Some(value) => value
            .as_array()
            .ok_or_else(|| ParseError::InvalidFormat("step must be an array of tables".into()))?
            .iter()
            .enumerate()
            .map(|(index, value)| parse_step(index, value))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let mut plan = Plan::new(id, title, steps);
    if let Some(goal) = table.get("goal") {
        plan.goal = to_json(goal, "goal")?;
    }
    if let Some(context) = table.get("context") {
        plan.context = to_json(context, "context")?;
    }

    interpolate_inputs(&mut plan);

    let problems = plan_problems(&plan);
    if !problems.is_empty() {
        return Err(ParseError::Invalid(problems));
    }
    Ok(plan)
}

/// Read and parse a plan file
pub fn load_plan(path: impl AsRef<Path>) -> Result<Plan, ParseError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan(&content)
}

fn parse_step(index: usize, value: &toml::Value) -> Result<Step, ParseError> {
    let path = format!("step[{index}]");
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("{path} must be a table")))?;

    if let Some(key) = table.keys().find(|k| !STEP_KEYS.contains(&k.as_str())) {
        return Err(ParseError::InvalidFormat(format!(
            "{path}: unknown field '{key}'"
        )));
    }

    let id = required_str(table, "id", &format!("{path}.id"))?;
    let tool: ToolId = table
        .get("tool")
        .ok_or_else(|| ParseError::MissingField(format!("{path}.tool")))?
        .clone()
        .try_into()
        .map_err(|e| ParseError::InvalidFormat(format!("{path}.tool: {e}")))?;

    let mut step = Step::new(id, tool);
    if let Some(label) = optional_str(table, "label", &format!("{path}.label"))? {
        step = step.with_label(label);
    }
    if let Some(input) = table.get("input") {
        step.input = to_json(input, &format!("{path}.input"))?;
    }
    if let Some(deps) = table.get("depends_on") {
        step.depends_on = deps
            .clone()
            .try_into::<Vec<StepId>>()
            .map_err(|e| ParseError::InvalidFormat(format!("{path}.depends_on: {e}")))?;
    }
    if let Some(branches) = table.get("branch") {
        step.branches = branches
            .clone()
            .try_into::<Vec<Branch>>()
            .map_err(|e| ParseError::InvalidFormat(format!("{path}.branch: {e}")))?;
    }
    Ok(step)
}

fn required_str(table: &toml::Table, key: &str, path: &str) -> Result<String, ParseError> {
    optional_str(table, key, path)?.ok_or_else(|| ParseError::MissingField(path.to_string()))
}

fn optional_str(table: &toml::Table, key: &str, path: &str) -> Result<Option<String>, ParseError> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ParseError::InvalidFormat(format!("{path} must be a string"))),
    }
}

fn to_json(value: &toml::Value, path: &str) -> Result<serde_json::Value, ParseError> {
    value
        .clone()
        .try_into()
        .map_err(|e| ParseError::InvalidFormat(format!("{path}: {e}")))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
