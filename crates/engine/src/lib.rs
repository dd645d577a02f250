// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! leadflow execution engine
//!
//! Task runner, fallback search chain, and the plan executor.

mod branch;
mod dispatch;
mod error;
mod executor;
mod fallback;
mod pack;
mod runner;
mod spawn;

pub use branch::{condition_holds, select_next, RunState};
pub use dispatch::ToolTable;
pub use error::EngineError;
pub use executor::{PlanExecutor, RunContext, PLAN_SOURCE, UNREACHABLE};
pub use fallback::{
    FallbackAttempt, FallbackSearch, SearchMeta, SearchOutcome, SearchTool, SourceChain,
    ALL_SOURCES_FAILED,
};
pub use pack::{Nudge, Pack, PackContext, PackError, PackReport, PackRun, PackRunner};
pub use runner::{
    BoxError, ExecContext, NoHooks, NormalizedError, TaskExecutor, TaskHooks, TaskOptions,
    TaskRecord, TaskRunner, TaskStatus, TASK_SOURCE,
};
pub use spawn::RunHandle;
