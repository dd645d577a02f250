// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic task runner with timeout, retry and lifecycle hooks
//!
//! A task is any unit of async work identified by a feature id. Each
//! attempt races the executor against the configured timeout; failed
//! attempts are retried under the shared [`RetryPolicy`] until the cap
//! is reached or an error says it is not worth retrying.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lf_core::{kinds, Clock, EventBus, IdGen, RetryPolicy, SystemClock, TaskConfig, TaskId, UuidIdGen};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Event source tag for task lifecycle events
pub const TASK_SOURCE: &str = "task-runner";

/// Error type executors may return
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Uniform error shape recorded for failed attempts
///
/// Executors may return one directly to pick the code or to mark the
/// failure as permanent.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct NormalizedError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub retryable: bool,
}

impl NormalizedError {
    pub const TIMEOUT: &'static str = "TIMEOUT";
    pub const EXECUTION_ERROR: &'static str = "EXECUTION_ERROR";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            stack: None,
            retryable: true,
        }
    }

    /// Stop retrying once this error is seen
    pub fn permanent(mut self) -> Self {
        self.retryable = false;
        self
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::new(Self::TIMEOUT, format!("timed out after {limit:?}"))
    }

    pub fn is_timeout(&self) -> bool {
        self.code == Self::TIMEOUT
    }

    /// Normalize an arbitrary executor error
    pub fn normalize(err: &(dyn std::error::Error + Send + Sync + 'static)) -> Self {
        if let Some(normalized) = err.downcast_ref::<NormalizedError>() {
            return normalized.clone();
        }

        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            code: Self::EXECUTION_ERROR.to_string(),
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
            retryable: true,
        }
    }
}

/// Per-attempt context handed to the executor
#[derive(Debug, Clone)]
pub struct ExecContext {
    pub task_id: TaskId,
    pub feature_id: String,
    pub attempt: u32,
    /// Cancelled when this attempt times out
    pub cancel: CancellationToken,
}

/// A unit of work the runner can retry
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(
        &self,
        payload: serde_json::Value,
        ctx: ExecContext,
    ) -> Result<serde_json::Value, BoxError>;
}

#[async_trait]
impl<F, Fut> TaskExecutor for F
where
    F: Fn(serde_json::Value, ExecContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, BoxError>> + Send,
{
    async fn execute(
        &self,
        payload: serde_json::Value,
        ctx: ExecContext,
    ) -> Result<serde_json::Value, BoxError> {
        (self)(payload, ctx).await
    }
}

/// Lifecycle callbacks; every method defaults to a no-op
#[async_trait]
pub trait TaskHooks: Send + Sync {
    /// Before each attempt
    async fn before_task(&self, _ctx: &ExecContext) {}

    /// After each failed attempt
    async fn on_error(&self, _ctx: &ExecContext, _error: &NormalizedError) {}

    /// Once, at final resolution
    async fn after_task(&self, _record: &TaskRecord) {}

    fn log(&self, _level: tracing::Level, _message: &str) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl TaskHooks for NoHooks {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Succeeded,
    Failed,
    Timeout,
}

impl TaskStatus {
    pub fn name(&self) -> &'static str {
        match self {
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Timeout => "timeout",
        }
    }
}

/// Final record of one task run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub feature_id: String,
    pub input: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    pub status: TaskStatus,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<NormalizedError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Retry and timeout settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOptions {
    pub policy: RetryPolicy,
    pub timeout: Duration,
}

impl TaskOptions {
    pub fn from_config(config: &TaskConfig) -> Self {
        Self {
            policy: config.retry_policy(),
            timeout: config.timeout,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self::from_config(&TaskConfig::default())
    }
}

/// Runs tasks; clones share hooks, bus and id generation
#[derive(Clone)]
pub struct TaskRunner {
    bus: Option<EventBus>,
    hooks: Arc<dyn TaskHooks>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGen>,
    defaults: TaskOptions,
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner {
    pub fn new() -> Self {
        Self {
            bus: None,
            hooks: Arc::new(NoHooks),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdGen),
            defaults: TaskOptions::default(),
        }
    }

    /// Publish `task.*` lifecycle events on this bus
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_hooks(mut self, hooks: impl TaskHooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_ids(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn with_defaults(mut self, defaults: TaskOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> TaskOptions {
        self.defaults
    }

    /// Run with the runner's default options
    pub async fn run(
        &self,
        feature_id: &str,
        payload: serde_json::Value,
        executor: &dyn TaskExecutor,
    ) -> TaskRecord {
        self.run_with(feature_id, payload, executor, self.defaults)
            .await
    }

    pub async fn run_with(
        &self,
        feature_id: &str,
        payload: serde_json::Value,
        executor: &dyn TaskExecutor,
        options: TaskOptions,
    ) -> TaskRecord {
        let task_id = TaskId(self.ids.next());
        let span = tracing::info_span!("task", task_id = %task_id, feature_id);

        self.run_inner(task_id, feature_id, payload, executor, options)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        task_id: TaskId,
        feature_id: &str,
        payload: serde_json::Value,
        executor: &dyn TaskExecutor,
        options: TaskOptions,
    ) -> TaskRecord {
        let started_at = self.clock.now();
        let start = tokio::time::Instant::now();
        let policy = options.policy;

        self.emit(
            kinds::TASK_QUEUED,
            serde_json::json!({ "task_id": task_id, "feature_id": feature_id }),
        )
        .await;

        let mut attempts = 0;
        let mut last_error: Option<NormalizedError> = None;

        for attempt in 1..=policy.max_attempts {
            attempts = attempt;
            let ctx = ExecContext {
                task_id: task_id.clone(),
                feature_id: feature_id.to_string(),
                attempt,
                cancel: CancellationToken::new(),
            };

            self.hooks.before_task(&ctx).await;
            self.hooks.log(
                tracing::Level::INFO,
                &format!("attempt {attempt} of {}", policy.max_attempts),
            );
            self.emit(
                kinds::TASK_STARTED,
                serde_json::json!({
                    "task_id": task_id,
                    "feature_id": feature_id,
                    "attempt": attempt,
                }),
            )
            .await;

            let outcome =
                tokio::time::timeout(options.timeout, executor.execute(payload.clone(), ctx.clone()))
                    .await;

            let error = match outcome {
                Ok(Ok(output)) => {
                    let record = TaskRecord {
                        id: task_id.clone(),
                        feature_id: feature_id.to_string(),
                        input: payload,
                        output: Some(output),
                        status: TaskStatus::Succeeded,
                        attempts,
                        error: None,
                        started_at,
                        finished_at: self.clock.now(),
                        duration_ms: start.elapsed().as_millis() as u64,
                    };
                    tracing::info!(attempts, elapsed_ms = record.duration_ms, "task succeeded");
                    self.finish(kinds::TASK_COMPLETED, &record).await;
                    return record;
                }
                Ok(Err(e)) => NormalizedError::normalize(e.as_ref()),
                Err(_) => {
                    ctx.cancel.cancel();
                    NormalizedError::timeout(options.timeout)
                }
            };

            tracing::warn!(attempt, code = %error.code, error = %error.message, "attempt failed");
            self.hooks.on_error(&ctx, &error).await;

            let retry = error.retryable && policy.has_next(attempt);
            last_error = Some(error);
            if !retry {
                break;
            }

            let delay = policy.delay_after(attempt);
            self.hooks
                .log(tracing::Level::DEBUG, &format!("retrying in {delay:?}"));
            policy.pause(attempt).await;
        }

        let status = match &last_error {
            Some(e) if e.is_timeout() => TaskStatus::Timeout,
            _ => TaskStatus::Failed,
        };
        let record = TaskRecord {
            id: task_id,
            feature_id: feature_id.to_string(),
            input: payload,
            output: None,
            status,
            attempts,
            error: last_error,
            started_at,
            finished_at: self.clock.now(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::warn!(attempts, status = status.name(), "task gave up");
        self.finish(kinds::TASK_FAILED, &record).await;
        record
    }

    async fn finish(&self, kind: &str, record: &TaskRecord) {
        self.hooks.log(
            tracing::Level::INFO,
            &format!("task {} {}", record.id, record.status.name()),
        );
        let payload = serde_json::to_value(record).unwrap_or(serde_json::Value::Null);
        self.emit(kind, payload).await;
        self.hooks.after_task(record).await;
    }

    /// Best-effort publish; handler failures are logged by the bus
    async fn emit(&self, kind: &str, payload: serde_json::Value) {
        let Some(bus) = &self.bus else {
            return;
        };
        let report = bus.notify(kind, TASK_SOURCE, payload).await;
        if report.error_count > 0 {
            tracing::debug!(kind, errors = report.error_count, "task event handlers failed");
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
