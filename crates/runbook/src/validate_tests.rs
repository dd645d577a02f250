// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::{Step, ToolId};

#[test]
fn fallback_listed_last_is_fine() {
    let plan = Plan::new(
        "p",
        "ok",
        vec![
            Step::new("search", ToolId::SearchLeads)
                .with_branch(BranchCondition::TooFewResults { threshold: 3 }, "widen")
                .with_branch(BranchCondition::Fallback, "save"),
            Step::new("widen", ToolId::SearchLeads),
            Step::new("save", ToolId::SaveList),
        ],
    );
    assert!(plan_problems(&plan).is_empty());
}

#[test]
fn branch_after_fallback_is_dead() {
    let plan = Plan::new(
        "p",
        "dead branch",
        vec![
            Step::new("search", ToolId::SearchLeads)
                .with_branch(BranchCondition::Fallback, "save")
                .with_branch(BranchCondition::TooFewResults { threshold: 3 }, "widen"),
            Step::new("widen", ToolId::SearchLeads),
            Step::new("save", ToolId::SaveList),
        ],
    );
    assert_eq!(
        plan_problems(&plan),
        vec!["step 'search': too_few_results branch to 'widen' follows a fallback branch"]
    );
}

#[test]
fn structural_problems_are_included() {
    let plan = Plan::new(
        "",
        "empty id",
        vec![Step::new("a", ToolId::SaveList).depends_on("a")],
    );
    let problems = plan_problems(&plan);
    assert!(problems.contains(&"plan id is empty".to_string()));
    assert!(problems.contains(&"step 'a' depends on itself".to_string()));
}
