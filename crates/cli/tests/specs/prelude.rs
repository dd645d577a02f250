//! Shared helpers for CLI specs

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

pub const SEARCH_AND_SAVE: &str = r#"
id = "dentists-austin"
title = "Dentists in Austin"

[[step]]
id = "search"
tool = "search_leads"
input = { query = "dentists" }

[[step]]
id = "save"
tool = "save_list"
depends_on = ["search"]
"#;

pub const BRANCHING_PLAN: &str = r#"
id = "roofers"
title = "Roofers"

[[step]]
id = "search"
tool = "search_leads"

[[step.branch]]
when = "too_many_results"
threshold = 5
goto = "narrow"

[[step]]
id = "widen"
tool = "search_leads"

[[step]]
id = "narrow"
tool = "search_leads"

[[step]]
id = "save"
tool = "save_list"
"#;

/// A scratch directory for plan, script and config files
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn lf(&self) -> CliRun {
        let mut cmd = Command::cargo_bin("lf").unwrap();
        cmd.current_dir(self.path()).env_remove("RUST_LOG");
        CliRun { cmd }
    }
}

pub struct CliRun {
    cmd: Command,
}

impl CliRun {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome {
            assert: self.cmd.assert().success(),
        }
    }

    pub fn fails(mut self) -> Outcome {
        Outcome {
            assert: self.cmd.assert().failure(),
        }
    }
}

pub struct Outcome {
    assert: assert_cmd::assert::Assert,
}

impl Outcome {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }
}
