//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .lf()
        .args(&["--help"])
        .passes()
        .stdout_has("validate")
        .stdout_has("simulate");
}

#[test]
fn simulate_help_lists_flags() {
    Project::empty()
        .lf()
        .args(&["simulate", "--help"])
        .passes()
        .stdout_has("--script")
        .stdout_has("--no-delay")
        .stdout_has("--format");
}
