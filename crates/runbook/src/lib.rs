// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Plan definitions in TOML

mod parser;
mod template;
mod validate;

pub use parser::{load_plan, parse_plan, ParseError};
pub use template::{interpolate, interpolate_inputs};
pub use validate::plan_problems;
