//! Plan validation specs

use crate::prelude::*;

#[test]
fn valid_plan_prints_summary() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);

    temp.lf()
        .args(&["validate", "plan.toml"])
        .passes()
        .stdout_has("Plan dentists-austin: Dentists in Austin")
        .stdout_has("Steps: 2")
        .stdout_has("needs search");
}

#[test]
fn branches_are_listed() {
    let temp = Project::empty();
    temp.file("plan.toml", BRANCHING_PLAN);

    temp.lf()
        .args(&["validate", "plan.toml"])
        .passes()
        .stdout_has("too_many_results -> narrow");
}

#[test]
fn json_summary_is_machine_readable() {
    let temp = Project::empty();
    temp.file("plan.toml", SEARCH_AND_SAVE);

    let stdout = temp
        .lf()
        .args(&["validate", "plan.toml", "--format", "json"])
        .passes()
        .stdout();
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["id"], "dentists-austin");
    assert_eq!(summary["steps"][1]["depends_on"][0], "search");
}

#[test]
fn unknown_dependency_is_rejected() {
    let temp = Project::empty();
    temp.file(
        "plan.toml",
        r#"
id = "broken"

[[step]]
id = "save"
tool = "save_list"
depends_on = ["ghost"]
"#,
    );

    temp.lf()
        .args(&["validate", "plan.toml"])
        .fails()
        .stderr_has("step 'save' depends on unknown step 'ghost'");
}

#[test]
fn branch_after_fallback_is_rejected() {
    let temp = Project::empty();
    temp.file(
        "plan.toml",
        r#"
id = "dead-branch"

[[step]]
id = "search"
tool = "search_leads"

[[step.branch]]
when = "fallback"
goto = "save"

[[step.branch]]
when = "too_few_results"
threshold = 3
goto = "save"

[[step]]
id = "save"
tool = "save_list"
"#,
    );

    temp.lf()
        .args(&["validate", "plan.toml"])
        .fails()
        .stderr_has("follows a fallback branch");
}
