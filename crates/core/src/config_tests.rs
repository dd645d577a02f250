// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn empty_config_uses_defaults() {
    let config = RuntimeConfig::from_toml_str("").unwrap();
    assert_eq!(config, RuntimeConfig::default());
    assert_eq!(config.task.retry_policy(), RetryPolicy::task_default());
    assert_eq!(config.plan.retry_policy(), RetryPolicy::plan_default());
    assert_eq!(config.fallback.min_results, 3);
    assert_eq!(config.events.handler_timeout, None);
}

#[test]
fn durations_parse_as_humantime() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        [task]
        timeout = "2m"
        base_delay = "250ms"
        exponential = false

        [events]
        handler_timeout = "5s"
        "#,
    )
    .unwrap();

    assert_eq!(config.task.timeout, Duration::from_secs(120));
    assert_eq!(config.task.retry_policy().backoff, Backoff::Constant);
    assert_eq!(
        config.task.retry_policy().delay_after(3),
        Duration::from_millis(250)
    );
    assert_eq!(config.events.handler_timeout, Some(Duration::from_secs(5)));
    // Untouched keys keep their defaults
    assert_eq!(config.task.max_attempts, 3);
}

#[test]
fn zero_attempts_rejected() {
    let err = RuntimeConfig::from_toml_str("[plan]\nmax_attempts = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unknown_keys_rejected() {
    let err = RuntimeConfig::from_toml_str("[task]\nretries = 4\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[fallback]\nmin_results = 5").unwrap();

    let config = RuntimeConfig::load(file.path()).unwrap();
    assert_eq!(config.fallback.min_results, 5);
}

#[test]
fn missing_file_reports_path() {
    let err = RuntimeConfig::load(Path::new("/nonexistent/leadflow.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/leadflow.toml"));
}

#[test]
fn plan_step_timeout_is_optional() {
    assert_eq!(RuntimeConfig::default().plan.step_timeout, None);

    let config = RuntimeConfig::from_toml_str("[plan]\nstep_timeout = \"90s\"\n").unwrap();
    assert_eq!(config.plan.step_timeout, Some(Duration::from_secs(90)));
}
