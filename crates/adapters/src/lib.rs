// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the collaborators a plan run talks to

pub mod sink;
pub mod source;
pub mod tool;
pub mod traced;

pub use sink::{ExecutionRecord, ExecutionSink, NoOpSink, SinkError};
pub use source::{Lead, LeadSource, SearchParams, SourceError};
pub use tool::{
    ScriptedAttempt, ScriptedTool, Tool, ToolCall, ToolContext, ToolError, ToolOutcome,
    ToolScript,
};
pub use traced::{TracedSource, TracedTool};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use sink::{FakeSink, RecordedRun};
#[cfg(any(test, feature = "test-support"))]
pub use source::{FakeLeadSource, SourceCall};
