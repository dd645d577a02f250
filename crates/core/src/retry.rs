// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy shared by the task runner and the plan engine
//!
//! A policy is an attempt cap plus a backoff function. Attempts are
//! numbered from 1; the delay for attempt `n` is the pause taken after
//! attempt `n` failed and before attempt `n + 1` starts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the pause between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// `base` every time
    Constant,
    /// `base * attempt`
    Linear,
    /// `base * 2^(attempt - 1)`
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff,
        }
    }

    /// Ad-hoc task default: 3 attempts, 1s base, exponential
    pub fn task_default() -> Self {
        Self::new(3, Duration::from_secs(1), Backoff::Exponential)
    }

    /// Plan step default: 2 retries after the first attempt, 1s base, linear
    pub fn plan_default() -> Self {
        Self::new(3, Duration::from_millis(1000), Backoff::Linear)
    }

    /// Single attempt, no waiting
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO, Backoff::Constant)
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Pause after `attempt` failed
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff {
            Backoff::Constant => self.base_delay,
            Backoff::Linear => self.base_delay.saturating_mul(attempt),
            Backoff::Exponential => {
                let factor = 2u32.checked_pow(attempt - 1).unwrap_or(u32::MAX);
                self.base_delay.saturating_mul(factor)
            }
        }
    }

    /// Whether another attempt follows `attempt`
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Suspend for the pause after `attempt` failed
    pub async fn pause(&self, attempt: u32) {
        let delay = self.delay_after(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::task_default()
    }
}
