// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event handler trait

use crate::event::Event;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Why a handler did not complete cleanly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),
    #[error("handler timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError::Failed(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError::Failed(message.to_string())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// Receives events delivered by the bus
///
/// Any `Fn(Event) -> impl Future<Output = HandlerResult>` closure is a handler.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    async fn handle(&self, event: Event) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> EventHandler for F
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, event: Event) -> HandlerResult {
        (self)(event).await
    }
}
