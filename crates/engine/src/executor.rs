// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan executor
//!
//! Walks a plan one step at a time. Each step is either skipped because
//! an immediate dependency did not succeed, or run through the retry
//! policy against its tool. After a step resolves, its branches pick the
//! next step; steps the walk never reached are swept as skipped. Every
//! transition is published on the run's bus.

use crate::branch::{select_next, RunState};
use crate::dispatch::ToolTable;
use crate::error::EngineError;
use crate::spawn::RunHandle;
use lf_adapters::{ExecutionRecord, ExecutionSink, NoOpSink, ToolContext, ToolError};
use lf_core::{
    kinds, Clock, EventBus, ExecutionResult, Plan, PlanConfig, PlanId, Principal, RetryPolicy,
    Step, StepResult, StepStatus, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Event source tag for plan and step events
pub const PLAN_SOURCE: &str = "plan-engine";

/// Skip reason for steps the walk never reached
pub const UNREACHABLE: &str = "unreachable via execution path";

/// Who a run acts for and where its events go
#[derive(Clone)]
pub struct RunContext {
    pub principal: Principal,
    pub bus: EventBus,
}

impl RunContext {
    pub fn new(principal: Principal, bus: EventBus) -> Self {
        Self { principal, bus }
    }
}

/// Runs plans against a tool table
///
/// Cloning is cheap; clones share tools, sink and clock.
#[derive(Clone)]
pub struct PlanExecutor {
    tools: ToolTable,
    sink: Arc<dyn ExecutionSink>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    step_timeout: Option<Duration>,
}

impl PlanExecutor {
    pub fn new(tools: ToolTable) -> Self {
        Self::from_config(tools, &PlanConfig::default())
    }

    pub fn from_config(tools: ToolTable, config: &PlanConfig) -> Self {
        Self {
            tools,
            sink: Arc::new(NoOpSink),
            clock: Arc::new(SystemClock),
            policy: config.retry_policy(),
            step_timeout: config.step_timeout,
        }
    }

    pub fn with_sink(mut self, sink: impl ExecutionSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_step_timeout(mut self, limit: Duration) -> Self {
        self.step_timeout = Some(limit);
        self
    }

    /// Run a plan to completion
    ///
    /// Only a malformed plan is an error; step failures are part of the
    /// returned result.
    pub async fn execute(
        &self,
        plan: &Plan,
        ctx: &RunContext,
    ) -> Result<ExecutionResult, EngineError> {
        let problems = plan.problems();
        if !problems.is_empty() {
            tracing::warn!(plan_id = %plan.id, ?problems, "rejecting plan");
            return Err(EngineError::InvalidPlan {
                plan_id: plan.id.to_string(),
                problems,
            });
        }

        let span = tracing::info_span!(
            "plan",
            plan_id = %plan.id,
            user_id = %ctx.principal.user_id,
        );
        Ok(self.walk(plan, ctx).instrument(span).await)
    }

    /// Run a plan in the background
    pub fn spawn(&self, plan: Plan, ctx: RunContext) -> RunHandle {
        let executor = self.clone();
        let plan_id = plan.id.clone();
        let handle = tokio::spawn(async move { executor.execute(&plan, &ctx).await });
        RunHandle::new(plan_id, handle)
    }

    async fn walk(&self, plan: &Plan, ctx: &RunContext) -> ExecutionResult {
        let started_at = self.clock.now();
        let emitter = Emitter {
            bus: &ctx.bus,
            plan_id: &plan.id,
        };

        tracing::info!(steps = plan.steps.len(), "plan started");
        emitter
            .emit(
                kinds::PLAN_STARTED,
                serde_json::json!({
                    "title": plan.title,
                    "step_count": plan.steps.len(),
                    "user_id": ctx.principal.user_id,
                    "account_id": ctx.principal.account_id,
                }),
            )
            .await;

        let mut results: Vec<StepResult> = Vec::with_capacity(plan.steps.len());
        let mut state = RunState::default();
        let mut current = plan.first();

        while let Some(step) = current {
            let result = match unmet_dependencies(step, &results) {
                Some(reason) => self.skip(step, reason, &emitter).await,
                None => {
                    self.run_step(plan, step, ctx, &results, &mut state, &emitter)
                        .await
                }
            };

            let next = select_next(plan, step, &result, &state);
            results.push(result);

            current = match next {
                Some(id) if results.iter().any(|r| &r.step_id == id) => {
                    tracing::warn!(step_id = %id, "next step already resolved, ending walk");
                    None
                }
                Some(id) => plan.step(id),
                None => None,
            };
        }

        for step in &plan.steps {
            if !results.iter().any(|r| r.step_id == step.id) {
                let skipped = self.skip(step, UNREACHABLE.to_string(), &emitter).await;
                results.push(skipped);
            }
        }

        let result = ExecutionResult::new(plan.id.clone(), started_at, self.clock.now(), results);
        tracing::info!(status = result.status().name(), "plan finished");

        let record = ExecutionRecord {
            plan,
            principal: &ctx.principal,
            result: &result,
        };
        if let Err(e) = self.sink.record(&record).await {
            tracing::warn!(error = %e, "failed to record execution");
        }

        emitter
            .emit(
                kinds::PLAN_COMPLETED,
                serde_json::json!({
                    "status": result.status(),
                    "result": result,
                }),
            )
            .await;

        result
    }

    async fn skip(&self, step: &Step, reason: String, emitter: &Emitter<'_>) -> StepResult {
        tracing::info!(step_id = %step.id, reason = %reason, "step skipped");
        emitter
            .emit(
                kinds::STEP_SKIPPED,
                serde_json::json!({ "step_id": step.id, "reason": reason }),
            )
            .await;
        StepResult::skipped(step.id.clone(), reason, self.clock.now())
    }

    async fn run_step(
        &self,
        plan: &Plan,
        step: &Step,
        ctx: &RunContext,
        prior: &[StepResult],
        state: &mut RunState,
        emitter: &Emitter<'_>,
    ) -> StepResult {
        let span = tracing::info_span!("step", step_id = %step.id, tool = step.tool.as_str());

        async {
            let started_at = self.clock.now();
            emitter
                .emit(
                    kinds::STEP_STARTED,
                    serde_json::json!({
                        "step_id": step.id,
                        "label": step.label,
                        "tool": step.tool,
                    }),
                )
                .await;

            let tool = self.tools.get(step.tool);
            let mut attempt = 1;
            let mut last_error;
            let mut last_output;
            let mut last_meta;

            loop {
                let cancel = CancellationToken::new();
                let tool_ctx = ToolContext {
                    step_id: &step.id,
                    attempt,
                    principal: &ctx.principal,
                    plan,
                    prior_results: prior,
                    cancel: cancel.clone(),
                };

                let invocation = tool.invoke(&step.input, &tool_ctx);
                let outcome = match self.step_timeout {
                    Some(limit) => match tokio::time::timeout(limit, invocation).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            cancel.cancel();
                            Err(ToolError::Failed(format!("timed out after {limit:?}")))
                        }
                    },
                    None => invocation.await,
                };

                match outcome {
                    Ok(outcome) if outcome.success => {
                        state.add_spend(outcome.cost);
                        let result = StepResult {
                            status: StepStatus::Succeeded,
                            attempts: attempt,
                            output: outcome.data,
                            source_meta: outcome.source_meta,
                            started_at: Some(started_at),
                            finished_at: Some(self.clock.now()),
                            ..StepResult::pending(step.id.clone())
                        };
                        let lead_count = result.lead_count();
                        tracing::info!(attempt, lead_count, "step succeeded");
                        emitter
                            .emit(
                                kinds::STEP_SUCCEEDED,
                                serde_json::json!({
                                    "step_id": step.id,
                                    "attempts": attempt,
                                    "lead_count": lead_count,
                                }),
                            )
                            .await;
                        return result;
                    }
                    Ok(outcome) => {
                        last_error = outcome
                            .error_message
                            .unwrap_or_else(|| "tool reported failure".to_string());
                        last_output = outcome.data;
                        last_meta = outcome.source_meta;
                    }
                    Err(e) => {
                        last_error = e.to_string();
                        last_output = None;
                        last_meta = None;
                    }
                }

                tracing::warn!(attempt, error = %last_error, "attempt failed");
                if !self.policy.has_next(attempt) {
                    break;
                }

                attempt += 1;
                emitter
                    .emit(
                        kinds::STEP_RETRYING,
                        serde_json::json!({
                            "step_id": step.id,
                            "attempt": attempt,
                            "error": last_error,
                        }),
                    )
                    .await;
                self.policy.pause(attempt - 1).await;
            }

            emitter
                .emit(
                    kinds::STEP_FAILED,
                    serde_json::json!({
                        "step_id": step.id,
                        "attempts": attempt,
                        "error": last_error,
                    }),
                )
                .await;

            StepResult {
                status: StepStatus::Failed,
                attempts: attempt,
                error: Some(last_error),
                output: last_output,
                source_meta: last_meta,
                started_at: Some(started_at),
                finished_at: Some(self.clock.now()),
                ..StepResult::pending(step.id.clone())
            }
        }
        .instrument(span)
        .await
    }
}

/// Skip reason if any immediate dependency did not succeed
///
/// Only direct dependencies are checked; a skipped parent is reported
/// as skipped, not by its own root cause.
fn unmet_dependencies(step: &Step, results: &[StepResult]) -> Option<String> {
    let mut failed = Vec::new();
    let mut skipped = Vec::new();
    let mut missing = Vec::new();

    for dep in &step.depends_on {
        match results.iter().find(|r| &r.step_id == dep).map(|r| r.status) {
            Some(StepStatus::Succeeded) => {}
            Some(StepStatus::Failed) => failed.push(dep.as_str()),
            Some(StepStatus::Skipped) => skipped.push(dep.as_str()),
            Some(StepStatus::Pending | StepStatus::Running) | None => missing.push(dep.as_str()),
        }
    }

    let groups: Vec<String> = [("failed", failed), ("skipped", skipped), ("missing", missing)]
        .into_iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(label, ids)| format!("{label} [{}]", ids.join(", ")))
        .collect();

    (!groups.is_empty()).then(|| format!("dependencies not met: {}", groups.join("; ")))
}

/// Publishes run events tagged with the plan id
struct Emitter<'a> {
    bus: &'a EventBus,
    plan_id: &'a PlanId,
}

impl Emitter<'_> {
    async fn emit(&self, kind: &str, mut payload: serde_json::Value) {
        if let Some(map) = payload.as_object_mut() {
            map.insert("plan_id".into(), self.plan_id.as_str().into());
        }
        let report = self.bus.notify(kind, PLAN_SOURCE, payload).await;
        if report.error_count > 0 {
            tracing::debug!(kind, errors = report.error_count, "run event handlers failed");
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
