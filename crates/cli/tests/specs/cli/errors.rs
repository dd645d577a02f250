//! Error reporting specs

use crate::prelude::*;

#[test]
fn missing_plan_file_fails() {
    Project::empty()
        .lf()
        .args(&["validate", "absent.toml"])
        .fails()
        .stderr_has("absent.toml");
}

#[test]
fn unknown_command_fails() {
    Project::empty().lf().args(&["launch"]).fails();
}

#[test]
fn bad_config_fails_before_running() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);
    temp.file("lf.toml", "[plan]\nmax_attempts = 0\n");

    temp.lf()
        .args(&["--config", "lf.toml", "simulate", "plan.toml"])
        .fails()
        .stderr_has("plan.max_attempts must be at least 1");
}
