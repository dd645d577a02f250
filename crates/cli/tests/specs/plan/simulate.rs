//! Plan simulation specs

use crate::prelude::*;

#[test]
fn unscripted_plan_succeeds() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);

    temp.lf()
        .args(&["simulate", "plan.toml"])
        .passes()
        .stdout_has("plan.started")
        .stdout_has("step.succeeded search")
        .stdout_has("step.succeeded save")
        .stdout_has("plan.completed status=succeeded")
        .stdout_has("Plan dentists-austin: succeeded");
}

#[test]
fn failing_step_skips_dependents_and_fails_the_run() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);
    temp.file(
        "script.toml",
        r#"
[[steps.search]]
error = "places api down"
"#,
    );

    temp.lf()
        .args(&["simulate", "plan.toml", "--script", "script.toml", "--no-delay"])
        .fails()
        .stdout_has("step.retrying search attempt=2")
        .stdout_has("step.failed search error=places api down")
        .stdout_has("dependencies not met: failed [search]")
        .stderr_has("plan dentists-austin failed");
}

#[test]
fn branch_leaves_unchosen_step_unreachable() {
    let temp = Project::empty();
    temp.file("plan.toml", BRANCHING_PLAN);
    temp.file(
        "script.toml",
        r#"
[[steps.search]]
leads_found = 10
"#,
    );

    temp.lf()
        .args(&["simulate", "plan.toml", "--script", "script.toml"])
        .passes()
        .stdout_has("step.succeeded narrow")
        .stdout_lacks("step.started widen")
        .stdout_has("unreachable via execution path")
        .stdout_has("Plan roofers: partial");
}

#[test]
fn json_report_carries_events_and_result() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);
    temp.file(
        "script.toml",
        r#"
[[steps.search]]
leads_found = 4
"#,
    );

    let stdout = temp
        .lf()
        .args(&[
            "simulate",
            "plan.toml",
            "--script",
            "script.toml",
            "--format",
            "json",
            "--account",
            "acct-9",
        ])
        .passes()
        .stdout();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let events = report["events"].as_array().unwrap();
    assert_eq!(events.first().unwrap()["type"], "plan.started");
    assert_eq!(events.first().unwrap()["payload"]["account_id"], "acct-9");
    assert_eq!(events.last().unwrap()["type"], "plan.completed");
    assert_eq!(report["result"]["status"], "succeeded");
    assert_eq!(report["result"]["steps"][0]["output"]["leads_found"], 4);
}

#[test]
fn config_controls_retry_attempts() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);
    temp.file("lf.toml", "[plan]\nmax_attempts = 1\n");
    temp.file(
        "script.toml",
        r#"
[[steps.search]]
fail = "quota exceeded"
"#,
    );

    temp.lf()
        .args(&[
            "--config",
            "lf.toml",
            "simulate",
            "plan.toml",
            "--script",
            "script.toml",
        ])
        .fails()
        .stdout_lacks("step.retrying")
        .stdout_has("step.failed search error=quota exceeded");
}
