// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lf-core: Core types for the leadflow execution core
//!
//! This crate provides:
//! - The plan data model (plans, steps, branches, step and run results)
//! - An in-process event bus with wildcard topic patterns
//! - The retry policy shared by the task runner and the plan engine
//! - TOML runtime configuration

pub mod clock;
pub mod config;
pub mod event;
pub mod events;
pub mod id;
pub mod plan;
pub mod principal;
pub mod retry;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, EventsConfig, FallbackConfig, PlanConfig, RuntimeConfig, TaskConfig};
pub use event::{kinds, Event};
pub use events::{
    EventBus, EventFilter, EventHandler, EventPattern, HandlerError, HandlerResult,
    PublishOptions, PublishReport, SubscribeOptions, Subscription, LIFECYCLE_HANDLER_TIMEOUT,
};
pub use id::{EventId, IdGen, PlanId, SequentialIdGen, StepId, SubscriptionId, TaskId, UuidIdGen};
pub use plan::{
    Branch, BranchCondition, ExecutionResult, Plan, RunStatus, Step, StepResult, StepStatus,
    ToolId,
};
pub use principal::Principal;
pub use retry::{Backoff, RetryPolicy};
