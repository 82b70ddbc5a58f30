//! Test doubles: an in-memory git backend and real-repository fixtures.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use super::{Clock, CommitAuthor, GitBackend, GitCli, StageScope};
use crate::error::Error;

/// In-memory backend recording every mutation.
#[derive(Default)]
pub struct FakeGit {
    pub staged: String,
    pub user: Option<String>,
    pub history: HashMap<String, (String, CommitAuthor)>,
    pub fail_history: bool,
    pub commit_failures: RefCell<u32>,
    pub staged_calls: RefCell<Vec<String>>,
    pub commits: RefCell<Vec<String>>,
}

impl GitBackend for FakeGit {
    fn staged_files(&self) -> Result<String, Error> {
        Ok(self.staged.clone())
    }

    fn first_commit(&self, path: &str) -> Result<Option<String>, Error> {
        if self.fail_history {
            return Err(Error::Backend {
                command: "log".to_string(),
                message: "fatal: not a git repository".to_string(),
            });
        }
        Ok(self.history.get(path).map(|(hash, _)| hash.clone()))
    }

    fn commit_author(&self, commit: &str, path: &str) -> Result<CommitAuthor, Error> {
        match self.history.get(path) {
            Some((hash, author)) if hash == commit => Ok(author.clone()),
            _ => Err(Error::other("unknown commit")),
        }
    }

    fn user_name(&self) -> Result<Option<String>, Error> {
        Ok(self.user.clone())
    }

    fn stage(&self, scope: StageScope<'_>) -> Result<(), Error> {
        let entry = match scope {
            StageScope::All => "--all".to_string(),
            StageScope::Paths(paths) => paths.join(" "),
        };
        self.staged_calls.borrow_mut().push(entry);
        Ok(())
    }

    fn commit_no_verify(&self, message: &str) -> Result<(), Error> {
        let mut failures = self.commit_failures.borrow_mut();
        if *failures > 0 {
            *failures -= 1;
            return Err(Error::Backend {
                command: "commit".to_string(),
                message: "index.lock exists".to_string(),
            });
        }
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Environment that keeps git away from user and system config.
const ISOLATED_ENV: [(&str, &str); 2] = [
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
];

/// A throwaway repository driven by the real git binary.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    /// `git init`, optionally configuring a local identity.
    pub fn init(user: Option<&str>) -> Self {
        let repo = Self {
            dir: TempDir::new().unwrap(),
        };
        repo.git(&["init", "-q"]);
        if let Some(name) = user {
            repo.git(&["config", "user.name", name]);
            repo.git(&["config", "user.email", &format!("{name}@example.com")]);
        }
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cli(&self) -> GitCli {
        ISOLATED_ENV
            .iter()
            .fold(GitCli::new(self.path()), |git, (k, v)| git.env(*k, *v))
    }

    pub fn write(&self, path: &str, content: &str) {
        let full = self.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }

    pub fn git(&self, args: &[&str]) -> String {
        self.git_with_env(&[], args)
    }

    pub fn git_with_env(&self, env: &[(&str, &str)], args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .envs(ISOLATED_ENV)
            .envs(env.iter().copied())
            .current_dir(self.path())
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}
