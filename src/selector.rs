//! Staged file selection.

use std::path::Path;

use tracing::{debug, info};

use crate::error::Error;
use crate::git::GitBackend;
use crate::header::DelimiterCatalog;

/// Characters that disqualify a file name.
const UNSAFE_CHARS: [char; 4] = ['(', ')', '<', '>'];

/// Picks the staged files that should carry a header.
pub struct FileSelector<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
    catalog: &'a DelimiterCatalog,
}

impl<'a, B: GitBackend + ?Sized> FileSelector<'a, B> {
    pub fn new(backend: &'a B, catalog: &'a DelimiterCatalog) -> Self {
        Self { backend, catalog }
    }

    /// Staged paths with a known extension and a shell-safe file name, in
    /// the order git reports them.
    pub fn list_candidates(&self) -> Result<Vec<String>, Error> {
        let staged = self.backend.staged_files()?;
        let staged: Vec<&str> = staged
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        info!(count = staged.len(), files = ?staged, "Staged files");

        let candidates: Vec<String> = staged
            .into_iter()
            .filter(|path| self.is_candidate(path))
            .map(str::to_string)
            .collect();
        debug!(?candidates, "Selected files");
        Ok(candidates)
    }

    pub fn is_candidate(&self, path: &str) -> bool {
        let path = Path::new(path);
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        !name.contains(UNSAFE_CHARS) && self.catalog.for_path(path).is_some()
    }
}
