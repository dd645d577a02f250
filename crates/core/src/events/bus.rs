// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing events to subscribers

use super::handler::{EventHandler, HandlerError};
use super::subscription::{EventPattern, SubscribeOptions, Subscription};
use crate::clock::{Clock, SystemClock};
use crate::event::Event;
use crate::id::{EventId, IdGen, SubscriptionId, UuidIdGen};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handler time limit for lifecycle events when the bus sets none
pub const LIFECYCLE_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for a single publish
#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    /// Wait for every handler before returning
    pub await_handlers: bool,
    /// Per-handler time limit
    pub timeout: Option<Duration>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            await_handlers: true,
            timeout: None,
        }
    }
}

impl PublishOptions {
    /// Return as soon as handlers are started
    pub fn fire_and_forget() -> Self {
        Self {
            await_handlers: false,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A handler failure collected during publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryError {
    pub subscription_id: SubscriptionId,
    pub message: String,
}

/// Outcome of a publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub event_id: EventId,
    pub handler_count: usize,
    pub error_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DeliveryError>,
}

struct Registration {
    id: SubscriptionId,
    pattern: EventPattern,
    options: SubscribeOptions,
    handler: Arc<dyn EventHandler>,
}

impl Registration {
    fn accepts(&self, event: &Event) -> bool {
        self.pattern.matches(&event.kind)
            && self
                .options
                .filter
                .as_ref()
                .map_or(true, |filter| filter.matches(event))
    }
}

pub(super) struct Inner {
    registrations: RwLock<Vec<Registration>>,
    ids: Box<dyn IdGen>,
    clock: Box<dyn Clock>,
    handler_timeout: Option<Duration>,
}

impl Inner {
    pub(super) fn remove(&self, id: &SubscriptionId) -> bool {
        let mut regs = self.registrations.write().unwrap_or_else(|e| e.into_inner());
        let before = regs.len();
        regs.retain(|r| &r.id != id);
        regs.len() != before
    }
}

type Delivery = (SubscriptionId, JoinHandle<Result<(), HandlerError>>);

/// The event bus routes events to matching subscribers
///
/// Cloning is cheap; clones share the same subscriber table.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_parts(UuidIdGen, SystemClock, None)
    }

    /// Bus with injected id generation, clock, and a default handler timeout
    pub fn with_parts(
        ids: impl IdGen + 'static,
        clock: impl Clock + 'static,
        handler_timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registrations: RwLock::new(Vec::new()),
                ids: Box::new(ids),
                clock: Box::new(clock),
                handler_timeout,
            }),
        }
    }

    /// Register a handler for events matching `pattern`
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: impl EventHandler,
        options: SubscribeOptions,
    ) -> Subscription {
        let id = SubscriptionId(self.inner.ids.next());
        let pattern = EventPattern::new(pattern);
        let subscription = Subscription {
            id: id.clone(),
            pattern: pattern.clone(),
            subscriber_id: options.subscriber_id.clone(),
            bus: Arc::downgrade(&self.inner),
        };

        tracing::debug!(
            subscription = %id,
            pattern = %pattern,
            subscriber = options.subscriber_id.as_deref().unwrap_or("-"),
            once = options.once,
            "subscribed"
        );

        let mut regs = self
            .inner
            .registrations
            .write()
            .unwrap_or_else(|e| e.into_inner());
        regs.push(Registration {
            id,
            pattern,
            options,
            handler: Arc::new(handler),
        });

        subscription
    }

    /// Remove a registration. Returns false if it did not exist.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.inner.remove(id)
    }

    /// Build an event stamped with this bus's clock and id generator
    pub fn event(
        &self,
        kind: impl Into<String>,
        source: impl Into<String>,
        payload: serde_json::Value,
    ) -> Event {
        Event::new(
            kind,
            source,
            payload,
            self.inner.ids.as_ref(),
            self.inner.clock.as_ref(),
        )
    }

    /// Build and publish an event with the bus defaults
    pub async fn emit(
        &self,
        kind: impl Into<String>,
        source: impl Into<String>,
        payload: serde_json::Value,
    ) -> PublishReport {
        let event = self.event(kind, source, payload);
        self.publish(event, self.default_options()).await
    }

    /// Options carrying the bus-wide handler timeout
    pub fn default_options(&self) -> PublishOptions {
        PublishOptions {
            await_handlers: true,
            timeout: self.inner.handler_timeout,
        }
    }

    /// Build and publish a lifecycle event on behalf of a producer
    ///
    /// Handlers are awaited in order but never past the bus timeout, or
    /// [`LIFECYCLE_HANDLER_TIMEOUT`] when the bus has none.
    pub async fn notify(
        &self,
        kind: impl Into<String>,
        source: impl Into<String>,
        payload: serde_json::Value,
    ) -> PublishReport {
        let event = self.event(kind, source, payload);
        let limit = self.inner.handler_timeout.unwrap_or(LIFECYCLE_HANDLER_TIMEOUT);
        self.publish(event, PublishOptions::default().with_timeout(limit))
            .await
    }

    /// Publish an event to all matching subscribers
    ///
    /// Never fails because of a handler: errors, timeouts and panics are
    /// logged and tallied in the report.
    pub async fn publish(&self, event: Event, options: PublishOptions) -> PublishReport {
        let handlers = self.collect(&event);
        let event_id = event.id.clone();
        let handler_count = handlers.len();

        let mut deliveries: Vec<Delivery> = Vec::with_capacity(handler_count);
        for (subscription_id, handler) in handlers {
            let event = event.clone();
            let timeout = options.timeout;
            let task = tokio::spawn(async move {
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, handler.handle(event))
                        .await
                        .unwrap_or(Err(HandlerError::TimedOut(limit))),
                    None => handler.handle(event).await,
                }
            });
            deliveries.push((subscription_id, task));
        }

        if !options.await_handlers {
            let kind = event.kind.clone();
            tokio::spawn(async move {
                settle(&kind, deliveries).await;
            });
            return PublishReport {
                event_id,
                handler_count,
                error_count: 0,
                errors: Vec::new(),
            };
        }

        let errors = settle(&event.kind, deliveries).await;
        PublishReport {
            event_id,
            handler_count,
            error_count: errors.len(),
            errors,
        }
    }

    /// Snapshot matching handlers, dropping `once` registrations as they are taken
    fn collect(&self, event: &Event) -> Vec<(SubscriptionId, Arc<dyn EventHandler>)> {
        let mut regs = self
            .inner
            .registrations
            .write()
            .unwrap_or_else(|e| e.into_inner());

        let matched: Vec<(SubscriptionId, Arc<dyn EventHandler>, bool)> = regs
            .iter()
            .filter(|r| r.accepts(event))
            .map(|r| (r.id.clone(), Arc::clone(&r.handler), r.options.once))
            .collect();

        if matched.iter().any(|(_, _, once)| *once) {
            regs.retain(|r| {
                !matched
                    .iter()
                    .any(|(id, _, once)| *once && *id == r.id)
            });
        }

        matched
            .into_iter()
            .map(|(id, handler, _)| (id, handler))
            .collect()
    }

    /// Whether any registration's pattern matches this kind
    pub fn has_subscribers(&self, kind: &str) -> bool {
        self.subscriber_count(kind) > 0
    }

    /// Number of registrations whose pattern matches this kind
    pub fn subscriber_count(&self, kind: &str) -> usize {
        self.inner
            .registrations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.pattern.matches(kind))
            .count()
    }

    /// Total number of live registrations
    pub fn subscription_count(&self) -> usize {
        self.inner
            .registrations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Registrations owned by a subscriber id
    pub fn subscriptions_of(&self, subscriber_id: &str) -> Vec<SubscriptionId> {
        self.inner
            .registrations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.options.subscriber_id.as_deref() == Some(subscriber_id))
            .map(|r| r.id.clone())
            .collect()
    }

    /// Remove every registration
    pub fn clear(&self) {
        self.inner
            .registrations
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Await every delivery and collect failures
async fn settle(kind: &str, deliveries: Vec<Delivery>) -> Vec<DeliveryError> {
    let mut errors = Vec::new();
    for (subscription_id, task) in deliveries {
        let outcome = match task.await {
            Ok(result) => result,
            Err(join_error) => Err(HandlerError::Panicked(join_error.to_string())),
        };
        if let Err(e) = outcome {
            tracing::warn!(event = kind, subscription = %subscription_id, error = %e, "event handler failed");
            errors.push(DeliveryError {
                subscription_id,
                message: e.to_string(),
            });
        }
    }
    errors
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
