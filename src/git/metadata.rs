//! Per-file provenance from git history and the pending commit message.

use std::path::Path;

use chrono::{Local, NaiveDateTime, TimeZone};
use tracing::debug;

use super::GitBackend;
use crate::error::Error;
use crate::header::GitMetadataRecord;

/// Source of "now" for `LastEditTime`.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Read the pending commit message, trimmed.
pub fn read_message(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map(|msg| msg.trim().to_string())
        .map_err(|source| Error::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })
}

/// Convert an epoch timestamp to local time.
fn local_time(epoch_secs: i64) -> Result<NaiveDateTime, Error> {
    Local
        .timestamp_opt(epoch_secs, 0)
        .earliest()
        .map(|dt| dt.naive_local())
        .ok_or_else(|| Error::other(format!("Invalid commit timestamp: {epoch_secs}")))
}

/// Builds a [`GitMetadataRecord`] for each file.
pub struct MetadataResolver<'a, B: GitBackend + ?Sized, C: Clock> {
    backend: &'a B,
    clock: C,
}

impl<'a, B: GitBackend + ?Sized, C: Clock> MetadataResolver<'a, B, C> {
    pub fn new(backend: &'a B, clock: C) -> Self {
        Self { backend, clock }
    }

    /// Resolve metadata for `path`, describing it with the message at
    /// `message_path`.
    pub fn resolve(&self, path: &str, message_path: &Path) -> Result<GitMetadataRecord, Error> {
        let description = read_message(message_path)?;
        self.resolve_with_description(path, &description)
    }

    pub fn resolve_with_description(
        &self,
        path: &str,
        description: &str,
    ) -> Result<GitMetadataRecord, Error> {
        let developer = self.developer()?;
        let last_edited_at = self.clock.now();

        let (author, created_at) = match self.backend.first_commit(path)? {
            Some(commit) => {
                let first = self.backend.commit_author(&commit, path)?;
                debug!(path, commit = %commit, author = %first.name, "Found first commit");
                (first.name, local_time(first.timestamp)?)
            }
            None => {
                debug!(path, "No history, attributing file to current developer");
                (developer.clone(), last_edited_at)
            }
        };

        Ok(GitMetadataRecord {
            description: description.to_string(),
            author,
            developer,
            created_at,
            last_edited_at,
        })
    }

    fn developer(&self) -> Result<String, Error> {
        Ok(self
            .backend
            .user_name()?
            .unwrap_or_else(whoami::username))
    }
}
