//! `commit-msg` control flow.
//!
//! Selects staged files, renders a fresh header for each of them in memory,
//! writes the results, then replaces the pending commit with one that
//! includes the annotated content. The hook exits non-zero after a
//! successful recommit so git drops the original attempt.
//!
//! Rendering happens before any write, so a backend failure aborts with the
//! working tree untouched. Once writing starts there is no rollback: if the
//! process dies between the writes and the recommit, the tree is left
//! annotated with the original commit still pending.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::CommitConfig;
use crate::error::Error;
use crate::git::metadata::read_message;
use crate::git::{Clock, GitBackend, MetadataResolver, StageScope};
use crate::header::{inject, DelimiterCatalog};
use crate::selector::FileSelector;

/// Original commit proceeds unmodified.
pub const EXIT_PASS_THROUGH: i32 = 0;
/// Replacement commit created; the original must be rejected.
pub const EXIT_RECOMMITTED: i32 = 1;
/// Fatal failure, including a recommit that never landed.
pub const EXIT_FAILED: i32 = 2;

/// File name git uses for the merge message.
const MERGE_MSG_NAME: &str = "MERGE_MSG";

/// Why the hook left the commit alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    MergeCommit,
    NoCandidates,
    /// Every candidate failed to read, render or write.
    NothingAnnotated,
}

#[derive(Debug)]
pub enum HookOutcome {
    PassThrough(PassReason),
    Recommitted(BatchReport),
}

impl HookOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            HookOutcome::PassThrough(_) => EXIT_PASS_THROUGH,
            HookOutcome::Recommitted(_) => EXIT_RECOMMITTED,
        }
    }
}

/// A file the batch had to skip.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: Error,
}

/// Per-file results of one hook run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub annotated: Vec<String>,
    pub failures: Vec<FileFailure>,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) annotated, {} failed",
            self.annotated.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.path, failure.error)?;
        }
        Ok(())
    }
}

/// Rendered content waiting to be written.
struct PendingWrite {
    path: String,
    content: String,
}

pub struct CommitOrchestrator<'a, B: GitBackend + ?Sized, C: Clock> {
    backend: &'a B,
    catalog: &'a DelimiterCatalog,
    config: &'a CommitConfig,
    root: PathBuf,
    clock: C,
}

impl<'a, B: GitBackend + ?Sized, C: Clock> CommitOrchestrator<'a, B, C> {
    pub fn new(
        backend: &'a B,
        catalog: &'a DelimiterCatalog,
        config: &'a CommitConfig,
        root: impl Into<PathBuf>,
        clock: C,
    ) -> Self {
        Self {
            backend,
            catalog,
            config,
            root: root.into(),
            clock,
        }
    }

    /// Run the hook for the message file git passed in.
    pub fn run(&self, message_path: &Path) -> Result<HookOutcome, Error> {
        if self.is_merge(message_path) {
            info!(path = %message_path.display(), "Merge commit, skipping");
            return Ok(HookOutcome::PassThrough(PassReason::MergeCommit));
        }

        let candidates = FileSelector::new(self.backend, self.catalog).list_candidates()?;
        if candidates.is_empty() {
            info!("No files need a header");
            return Ok(HookOutcome::PassThrough(PassReason::NoCandidates));
        }

        let message = read_message(&self.root.join(message_path))?;
        let mut report = BatchReport::default();

        info!(count = candidates.len(), "Processing files");
        let pending = self.render_all(&candidates, &message, &mut report)?;
        self.write_all(pending, &mut report);

        if report.annotated.is_empty() {
            warn!(%report, "No file was annotated, keeping the original commit");
            return Ok(HookOutcome::PassThrough(PassReason::NothingAnnotated));
        }

        self.recommit(&message, &report.annotated)?;
        info!(%report, "Recommitted with headers");
        Ok(HookOutcome::Recommitted(report))
    }

    fn is_merge(&self, message_path: &Path) -> bool {
        message_path == self.config.merge_msg_path.as_path()
            || message_path.file_name().and_then(|n| n.to_str()) == Some(MERGE_MSG_NAME)
    }

    /// Render every candidate. Backend errors abort the whole batch; file
    /// errors only skip the file.
    fn render_all(
        &self,
        candidates: &[String],
        message: &str,
        report: &mut BatchReport,
    ) -> Result<Vec<PendingWrite>, Error> {
        let resolver = MetadataResolver::new(self.backend, &self.clock);
        let mut pending = Vec::with_capacity(candidates.len());

        for path in candidates {
            match self.render_one(path, message, &resolver) {
                Ok(write) => pending.push(write),
                Err(e) if e.is_backend() => return Err(e),
                Err(error) => {
                    warn!(path = %path, error = %error, "Skipping file");
                    report.failures.push(FileFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        Ok(pending)
    }

    fn render_one(
        &self,
        path: &str,
        message: &str,
        resolver: &MetadataResolver<'_, B, &C>,
    ) -> Result<PendingWrite, Error> {
        let full_path = self.root.join(path);

        info!(path, "Reading");
        let content =
            std::fs::read_to_string(&full_path).map_err(|source| Error::FileUnreadable {
                path: full_path.clone(),
                source,
            })?;

        let profile = self
            .catalog
            .for_path(Path::new(path))
            .ok_or_else(|| Error::UnknownFileType(path.to_string()))?;
        let metadata = resolver.resolve_with_description(path, message)?;

        info!(path, "Rendering header");
        Ok(PendingWrite {
            path: path.to_string(),
            content: inject(&content, &metadata, profile),
        })
    }

    fn write_all(&self, pending: Vec<PendingWrite>, report: &mut BatchReport) {
        for write in pending {
            let full_path = self.root.join(&write.path);
            match std::fs::write(&full_path, write.content) {
                Ok(()) => {
                    info!(path = %write.path, "Written");
                    report.annotated.push(write.path);
                }
                Err(source) => {
                    let error = Error::FileUnwritable {
                        path: full_path,
                        source,
                    };
                    warn!(path = %write.path, error = %error, "Skipping file");
                    report.failures.push(FileFailure {
                        path: write.path,
                        error,
                    });
                }
            }
        }
    }

    /// Stage and commit, retrying up to `recommit_retries` extra times.
    fn recommit(&self, message: &str, annotated: &[String]) -> Result<(), Error> {
        let scope = if self.config.stage_all {
            StageScope::All
        } else {
            StageScope::Paths(annotated)
        };

        let attempts = self.config.recommit_retries + 1;
        let mut last_error = None;
        for attempt in 1..=attempts {
            let result = self
                .backend
                .stage(scope)
                .and_then(|()| self.backend.commit_no_verify(message));
            match result {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "Recommit failed");
                    last_error = Some(e);
                }
            }
        }

        Err(Error::Recommit(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }
}
