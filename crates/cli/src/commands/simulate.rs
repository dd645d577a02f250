// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lf simulate <plan>` - Run a plan against scripted tools
//!
//! Steps without a script entry succeed with empty output. Events are
//! printed as they are published; the final result follows.

use crate::output::OutputFormat;
use anyhow::Context;
use clap::Args;
use lf_adapters::{ScriptedTool, ToolScript};
use lf_core::{
    Event, EventBus, ExecutionResult, HandlerError, Principal, RunStatus, RuntimeConfig,
    SequentialIdGen, SubscribeOptions, SystemClock,
};
use lf_engine::{PlanExecutor, RunContext, ToolTable};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Args)]
pub struct SimulateArgs {
    /// Plan definition file
    pub plan: PathBuf,

    /// Tool script with per-step attempts (TOML)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Skip retry backoff and scripted delays
    #[arg(long)]
    pub no_delay: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// User the run acts for
    #[arg(long, default_value = "simulator")]
    pub user: String,

    /// Account the run acts for
    #[arg(long)]
    pub account: Option<String>,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    events: &'a [Event],
    result: &'a ExecutionResult,
}

pub async fn simulate(args: SimulateArgs, config: &RuntimeConfig) -> anyhow::Result<()> {
    let plan = lf_runbook::load_plan(&args.plan)?;
    let mut script = match &args.script {
        Some(path) => load_script(path)?,
        None => ToolScript::default(),
    };

    let mut policy = config.plan.retry_policy();
    if args.no_delay {
        policy = policy.with_base_delay(Duration::ZERO);
        for attempt in script.steps.values_mut().flatten() {
            attempt.delay = None;
        }
    }

    let tools = ToolTable::uniform(ScriptedTool::from_script(script)).traced();
    let executor = PlanExecutor::from_config(tools, &config.plan).with_policy(policy);

    let bus = EventBus::with_parts(
        SequentialIdGen::new("evt"),
        SystemClock,
        config.events.handler_timeout,
    );
    let events: Arc<Mutex<Vec<Event>>> = Arc::default();
    let recorder = Arc::clone(&events);
    let format = args.format;
    bus.subscribe(
        "**",
        move |event: Event| {
            let recorder = Arc::clone(&recorder);
            async move {
                if format == OutputFormat::Text {
                    println!("{}", event_line(&event));
                }
                recorder
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(event);
                Ok::<(), HandlerError>(())
            }
        },
        SubscribeOptions::new(),
    );

    let mut principal = Principal::new(args.user);
    if let Some(account) = args.account {
        principal = principal.with_account(account);
    }

    let result = executor
        .execute(&plan, &RunContext::new(principal, bus))
        .await?;

    match format {
        OutputFormat::Text => print_result(&result),
        OutputFormat::Json => {
            let events = events.lock().unwrap_or_else(|e| e.into_inner()).clone();
            let report = SimulationReport {
                events: &events,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if result.status() == RunStatus::Failed {
        anyhow::bail!("plan {} failed", plan.id);
    }
    Ok(())
}

fn load_script(path: &Path) -> anyhow::Result<ToolScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid script {}", path.display()))
}

/// One line per event: kind, step, then a few notable payload fields
fn event_line(event: &Event) -> String {
    let mut line = event.kind.clone();
    if let Some(step) = event.step_id() {
        line.push(' ');
        line.push_str(step);
    }
    for key in ["attempt", "status", "error", "reason"] {
        let Some(value) = event.payload.get(key) else {
            continue;
        };
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => continue,
            other => other.to_string(),
        };
        line.push_str(&format!(" {key}={text}"));
    }
    line
}

fn print_result(result: &ExecutionResult) {
    println!();
    println!("Plan {}: {}", result.plan_id, result.status());
    for step in result.steps() {
        let detail = match (&step.error, step.status) {
            (Some(error), _) => error.clone(),
            (None, lf_core::StepStatus::Succeeded) => format!("leads={}", step.lead_count()),
            (None, _) => String::new(),
        };
        let line = format!(
            "  {:<12} {:<10} attempts={} {}",
            step.step_id.as_str(),
            step.status.name(),
            step.attempts,
            detail
        );
        println!("{}", line.trim_end());
    }
}
