// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events system for loose coupling and observability
//!
//! This module provides:
//! - `EventBus` - Route events to matching handlers using patterns
//! - `EventPattern` - Dotted topic patterns with `*` and `**` wildcards
//! - `EventHandler` - Async handler trait, implemented for closures

mod bus;
mod handler;
mod subscription;

pub use bus::{DeliveryError, EventBus, PublishOptions, PublishReport, LIFECYCLE_HANDLER_TIMEOUT};
pub use handler::{EventHandler, HandlerError, HandlerResult};
pub use subscription::{EventFilter, EventPattern, SubscribeOptions, Subscription};
