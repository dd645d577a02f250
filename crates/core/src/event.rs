// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published on the bus

use crate::clock::Clock;
use crate::id::{EventId, IdGen};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known event kinds emitted by the execution core
pub mod kinds {
    pub const PLAN_STARTED: &str = "plan.started";
    pub const PLAN_COMPLETED: &str = "plan.completed";

    pub const STEP_STARTED: &str = "step.started";
    pub const STEP_RETRYING: &str = "step.retrying";
    pub const STEP_SUCCEEDED: &str = "step.succeeded";
    pub const STEP_FAILED: &str = "step.failed";
    pub const STEP_SKIPPED: &str = "step.skipped";

    pub const TASK_QUEUED: &str = "task.queued";
    pub const TASK_STARTED: &str = "task.started";
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_FAILED: &str = "task.failed";
}

/// A typed, timestamped notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Dotted type string, e.g. `step.succeeded`
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    /// Producer tag, e.g. `plan-engine`
    pub source: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(
        kind: impl Into<String>,
        source: impl Into<String>,
        payload: serde_json::Value,
        ids: &dyn IdGen,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            id: EventId(ids.next()),
            kind: kind.into(),
            timestamp: clock.now(),
            source: source.into(),
            payload,
        }
    }

    /// Plan id carried in the payload, if any
    pub fn plan_id(&self) -> Option<&str> {
        self.payload.get("plan_id").and_then(|v| v.as_str())
    }

    /// Step id carried in the payload, if any
    pub fn step_id(&self) -> Option<&str> {
        self.payload.get("step_id").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
