//! The `commit-msg` hook entry point.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;
use crate::git::{GitCli, SystemClock};
use crate::header::DelimiterCatalog;
use crate::orchestrator::{CommitOrchestrator, HookOutcome, PassReason};

/// Run the hook and return the process exit code.
pub fn run(root: &Path, config: &Config, message_file: &Path) -> Result<i32, Error> {
    let git = GitCli::new(root);
    let catalog = DelimiterCatalog::with_overrides(&config.profiles);
    let orchestrator = CommitOrchestrator::new(&git, &catalog, &config.commit, root, SystemClock);

    let outcome = orchestrator.run(message_file)?;
    match &outcome {
        HookOutcome::PassThrough(PassReason::NothingAnnotated) => {
            println!("headstamp: no file could be annotated, committing as is.");
        }
        HookOutcome::PassThrough(_) => {}
        HookOutcome::Recommitted(report) => {
            println!("headstamp: {}", report);
            println!("headstamp: commit recreated with headers; the original attempt is aborted.");
        }
    }

    Ok(outcome.exit_code())
}
