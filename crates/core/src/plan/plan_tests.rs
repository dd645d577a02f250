// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use serde_json::json;

fn three_step_plan() -> Plan {
    Plan::new(
        "plan-1",
        "Dentists in Austin",
        vec![
            Step::new("search", ToolId::SearchLeads),
            Step::new("enrich", ToolId::EnrichEmails).depends_on("search"),
            Step::new("save", ToolId::SaveList).depends_on("enrich"),
        ],
    )
}

fn result_with(status: StepStatus) -> StepResult {
    StepResult {
        status,
        ..StepResult::pending(StepId::from("s"))
    }
}

#[test]
fn navigation_follows_declaration_order() {
    let plan = three_step_plan();
    assert_eq!(plan.first().unwrap().id, "search");
    assert_eq!(
        plan.next_after(&StepId::from("search")).unwrap().id,
        "enrich"
    );
    assert!(plan.next_after(&StepId::from("save")).is_none());
    assert_eq!(plan.position(&StepId::from("save")), Some(2));
}

#[test]
fn well_formed_plan_has_no_problems() {
    assert!(three_step_plan().problems().is_empty());
}

#[test]
fn problems_name_bad_references() {
    let plan = Plan::new(
        "plan-1",
        "broken",
        vec![
            Step::new("a", ToolId::SearchLeads).depends_on("a"),
            Step::new("a", ToolId::SaveList),
            Step::new("b", ToolId::SaveList)
                .depends_on("ghost")
                .with_branch(BranchCondition::Fallback, "nowhere"),
        ],
    );

    let problems = plan.problems();
    assert!(problems.iter().any(|p| p.contains("duplicate step id 'a'")));
    assert!(problems.iter().any(|p| p.contains("depends on itself")));
    assert!(problems.iter().any(|p| p.contains("unknown step 'ghost'")));
    assert!(problems.iter().any(|p| p.contains("unknown step 'nowhere'")));
}

#[test]
fn lead_count_reads_reported_fields() {
    let mut result = result_with(StepStatus::Succeeded);
    assert_eq!(result.lead_count(), 0);

    result.output = Some(json!({ "leads_found": 12 }));
    assert_eq!(result.lead_count(), 12);

    result.output = Some(json!({ "leadsFound": 7 }));
    assert_eq!(result.lead_count(), 7);

    result.output = Some(json!({ "leads": [{}, {}, {}] }));
    assert_eq!(result.lead_count(), 3);
}

#[test]
fn execution_result_derives_status() {
    let now = Utc::now();
    let result = ExecutionResult::new(
        PlanId::from("p"),
        now,
        now,
        vec![
            result_with(StepStatus::Succeeded),
            result_with(StepStatus::Skipped),
        ],
    );
    assert_eq!(result.status(), RunStatus::Partial);
    assert_eq!(RunStatus::derive(result.steps()), result.status());
}

#[test]
fn empty_run_succeeds() {
    assert_eq!(RunStatus::derive(&[]), RunStatus::Succeeded);
}

#[test]
fn branch_conditions_round_trip_through_serde() {
    let branch: Branch = serde_json::from_value(json!({
        "when": "too_many_results",
        "threshold": 50,
        "goto": "narrow",
    }))
    .unwrap();
    assert_eq!(
        branch.condition,
        BranchCondition::TooManyResults { threshold: 50 }
    );
    assert_eq!(branch.target, "narrow");

    let fallback: Branch =
        serde_json::from_value(json!({ "when": "fallback", "goto": "end" })).unwrap();
    assert_eq!(fallback.condition, BranchCondition::Fallback);
}

use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::Pending),
        Just(StepStatus::Running),
        Just(StepStatus::Succeeded),
        Just(StepStatus::Failed),
        Just(StepStatus::Skipped),
    ]
}

proptest! {
    #[test]
    fn status_derivation_rules(statuses in proptest::collection::vec(any_status(), 0..12)) {
        let steps: Vec<StepResult> = statuses.iter().copied().map(result_with).collect();
        let derived = RunStatus::derive(&steps);

        let any_failed = statuses.contains(&StepStatus::Failed);
        let all_succeeded = statuses.iter().all(|s| *s == StepStatus::Succeeded);

        prop_assert_eq!(derived == RunStatus::Failed, any_failed);
        prop_assert_eq!(derived == RunStatus::Succeeded, all_succeeded);
        if !any_failed && statuses.contains(&StepStatus::Skipped) {
            prop_assert_eq!(derived, RunStatus::Partial);
        }
    }
}
