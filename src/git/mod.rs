//! Git backend: the command surface the hook needs, and its `git` CLI
//! implementation.

#[cfg(test)]
pub(crate) mod fake;
pub mod metadata;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::error::Error;

pub use metadata::{Clock, MetadataResolver, SystemClock};

/// Author of a commit, as seen for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    /// Author timestamp, seconds since the epoch.
    pub timestamp: i64,
}

/// What to stage before recommitting.
#[derive(Debug, Clone, Copy)]
pub enum StageScope<'a> {
    All,
    Paths(&'a [String]),
}

/// Version-control queries and mutations used by the hook.
pub trait GitBackend {
    /// Newline-separated staged paths, relative to the repository root.
    fn staged_files(&self) -> Result<String, Error>;

    /// Short hash of the oldest commit touching `path`, if any.
    fn first_commit(&self, path: &str) -> Result<Option<String>, Error>;

    fn commit_author(&self, commit: &str, path: &str) -> Result<CommitAuthor, Error>;

    /// Configured `user.name`, or `None` when it is unset.
    fn user_name(&self) -> Result<Option<String>, Error>;

    fn stage(&self, scope: StageScope<'_>) -> Result<(), Error>;

    /// Create a commit with `message`, skipping hooks.
    fn commit_no_verify(&self, message: &str) -> Result<(), Error>;
}

/// [`GitBackend`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    envs: Vec<(String, String)>,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable for every git invocation.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Open the repository containing `dir`, rooted at its top level.
    pub fn discover(dir: &Path) -> Result<Self, Error> {
        let output = Self::new(dir).output(&["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(Error::NotARepository(dir.to_path_buf()));
        }
        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self::new(top))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hooks directory, honoring worktrees and `core.hooksPath`.
    pub fn hooks_dir(&self) -> Result<PathBuf, Error> {
        let out = self.run(&["rev-parse", "--git-path", "hooks"])?;
        Ok(self.root.join(out.trim()))
    }

    /// Whether HEAD points at a commit. False in a repository with no
    /// commits yet.
    pub fn has_head(&self) -> Result<bool, Error> {
        let output = self.output(&["rev-parse", "--verify", "-q", "HEAD"])?;
        Ok(output.status.success())
    }

    fn output(&self, args: &[&str]) -> Result<Output, Error> {
        debug!(?args, "git");
        Command::new("git")
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&self.root)
            .output()
            .map_err(Error::BackendUnavailable)
    }

    /// Run a git command, returning stdout on success.
    fn run(&self, args: &[&str]) -> Result<String, Error> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn failure(args: &[&str], output: &Output) -> Error {
    let command = args
        .iter()
        .find(|a| !a.starts_with('-') && !a.contains('='))
        .unwrap_or(&"")
        .to_string();
    Error::Backend {
        command,
        message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

impl GitBackend for GitCli {
    fn staged_files(&self) -> Result<String, Error> {
        self.run(&[
            "-c",
            "core.quotePath=false",
            "diff",
            "--cached",
            "--name-only",
            "--diff-filter=ACMR",
        ])
    }

    fn first_commit(&self, path: &str) -> Result<Option<String>, Error> {
        if !self.has_head()? {
            return Ok(None);
        }
        let out = self.run(&["log", "--reverse", "--format=%h", "--", path])?;
        Ok(out
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string))
    }

    fn commit_author(&self, commit: &str, path: &str) -> Result<CommitAuthor, Error> {
        let out = self.run(&["log", "-1", "--format=%an%x00%at", commit, "--", path])?;
        parse_author(out.trim()).ok_or_else(|| Error::Backend {
            command: "log".to_string(),
            message: format!("unexpected author output for {commit}: {out:?}"),
        })
    }

    fn user_name(&self) -> Result<Option<String>, Error> {
        let args = ["config", "user.name"];
        let output = self.output(&args)?;
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        match output.status.code() {
            Some(0) if !name.is_empty() => Ok(Some(name)),
            // git config exits 1 when the key is missing
            Some(0) | Some(1) if output.stderr.is_empty() => Ok(None),
            _ => Err(failure(&args, &output)),
        }
    }

    fn stage(&self, scope: StageScope<'_>) -> Result<(), Error> {
        match scope {
            StageScope::All => self.run(&["add", "--all"])?,
            StageScope::Paths(paths) => {
                let mut args = vec!["add", "--"];
                args.extend(paths.iter().map(String::as_str));
                self.run(&args)?
            }
        };
        Ok(())
    }

    fn commit_no_verify(&self, message: &str) -> Result<(), Error> {
        self.run(&["commit", "--no-verify", "-m", message])?;
        Ok(())
    }
}

/// Parse `%an%x00%at` output.
fn parse_author(out: &str) -> Option<CommitAuthor> {
    let (name, timestamp) = out.split_once('\0')?;
    Some(CommitAuthor {
        name: name.trim().to_string(),
        timestamp: timestamp.trim().parse().ok()?,
    })
}
