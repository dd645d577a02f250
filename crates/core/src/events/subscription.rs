// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event pattern matching and subscriptions

use super::bus::Inner;
use crate::event::Event;
use crate::id::{PlanId, SubscriptionId};
use std::fmt;
use std::sync::{Arc, Weak};

/// Pattern for matching event kinds
/// Supports:
///   - Exact: "task.completed"
///   - Single wildcard: "task.*" matches "task.completed", "task.failed"
///   - Deep wildcard: "plan.**" matches "plan" and every deeper kind
///   - Global: "*" matches everything
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    /// Check if this pattern matches an event kind
    pub fn matches(&self, kind: &str) -> bool {
        // Empty pattern matches nothing
        if self.0.is_empty() {
            return false;
        }

        if self.0 == "*" || self.0 == "**" {
            return true;
        }

        let pattern_parts: Vec<&str> = self.0.split('.').collect();
        let kind_parts: Vec<&str> = kind.split('.').collect();

        Self::match_segments(&pattern_parts, &kind_parts)
    }

    fn match_segments(pattern: &[&str], kind: &[&str]) -> bool {
        match (pattern.first(), kind.first()) {
            (None, None) => true,
            // ** matches zero or more remaining segments
            (Some(&"**"), _) => true,
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &kind[1..]),
            (Some(p), Some(k)) if p == k => Self::match_segments(&pattern[1..], &kind[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Display for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Predicate applied after the pattern matched
#[derive(Clone)]
pub struct EventFilter(Arc<dyn Fn(&Event) -> bool + Send + Sync>);

impl EventFilter {
    pub fn new(predicate: impl Fn(&Event) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Only events whose payload carries this plan id
    pub fn plan(plan_id: &PlanId) -> Self {
        let plan_id = plan_id.0.clone();
        Self::new(move |event| event.plan_id() == Some(plan_id.as_str()))
    }

    pub fn matches(&self, event: &Event) -> bool {
        (self.0)(event)
    }
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventFilter(..)")
    }
}

/// Options for a bus registration
#[derive(Clone, Debug, Default)]
pub struct SubscribeOptions {
    /// Owner tag, reported in logs
    pub subscriber_id: Option<String>,
    pub filter: Option<EventFilter>,
    /// Remove the registration after its first delivery
    pub once: bool,
}

impl SubscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope a subscription to a single plan run
    pub fn for_plan(plan_id: &PlanId) -> Self {
        Self::new().with_filter(EventFilter::plan(plan_id))
    }

    pub fn with_subscriber(mut self, subscriber_id: impl Into<String>) -> Self {
        self.subscriber_id = Some(subscriber_id.into());
        self
    }

    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// Handle to one registration on the bus
///
/// Dropping the handle does not unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub pattern: EventPattern,
    pub subscriber_id: Option<String>,
    pub(super) bus: Weak<Inner>,
}

impl Subscription {
    /// Remove this registration. Returns false if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        match self.bus.upgrade() {
            Some(inner) => inner.remove(&self.id),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("subscriber_id", &self.subscriber_id)
            .finish()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
