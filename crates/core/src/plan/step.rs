// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Steps, tools and branches

use crate::id::StepId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The action a step invokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    SearchLeads,
    LookupDomain,
    EnrichEmails,
    SaveList,
    SetupMonitor,
}

impl ToolId {
    pub const ALL: [ToolId; 5] = [
        ToolId::SearchLeads,
        ToolId::LookupDomain,
        ToolId::EnrichEmails,
        ToolId::SaveList,
        ToolId::SetupMonitor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::SearchLeads => "search_leads",
            ToolId::LookupDomain => "lookup_domain",
            ToolId::EnrichEmails => "enrich_emails",
            ToolId::SaveList => "save_list",
            ToolId::SetupMonitor => "setup_monitor",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition guarding a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum BranchCondition {
    /// Reported lead count above the threshold
    TooManyResults { threshold: u64 },
    /// Reported lead count below the threshold
    TooFewResults { threshold: u64 },
    /// The first fallback attempt used this source and it failed
    DataSourceFailed { source: String },
    /// Accumulated run spend above the maximum
    BudgetExceeded { max: f64 },
    /// Always true; list last
    Fallback,
}

impl BranchCondition {
    pub fn name(&self) -> &'static str {
        match self {
            BranchCondition::TooManyResults { .. } => "too_many_results",
            BranchCondition::TooFewResults { .. } => "too_few_results",
            BranchCondition::DataSourceFailed { .. } => "data_source_failed",
            BranchCondition::BudgetExceeded { .. } => "budget_exceeded",
            BranchCondition::Fallback => "fallback",
        }
    }
}

/// A conditional edge evaluated after its owning step resolves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(flatten)]
    pub condition: BranchCondition,
    #[serde(rename = "goto")]
    pub target: StepId,
}

impl Branch {
    pub fn new(condition: BranchCondition, target: impl Into<StepId>) -> Self {
        Self {
            condition,
            target: target.into(),
        }
    }
}

/// One tool invocation within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    #[serde(default)]
    pub label: String,
    pub tool: ToolId,
    #[serde(default)]
    pub input: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<StepId>,
    #[serde(default, rename = "branch", skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
}

impl Step {
    pub fn new(id: impl Into<StepId>, tool: ToolId) -> Self {
        let id = id.into();
        Self {
            label: id.0.clone(),
            id,
            tool,
            input: serde_json::Value::Null,
            depends_on: Vec::new(),
            branches: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = input;
        self
    }

    pub fn depends_on(mut self, id: impl Into<StepId>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    pub fn with_branch(mut self, condition: BranchCondition, target: impl Into<StepId>) -> Self {
        self.branches.push(Branch::new(condition, target));
        self
    }
}
