//! Preview headers without touching the working tree.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Error;
use crate::git::{GitCli, MetadataResolver, SystemClock};
use crate::header::{inject, DelimiterCatalog};

/// Print each file with a freshly rendered header.
pub fn run(cwd: &Path, config: &Config, files: &[PathBuf], message: &str) -> Result<(), Error> {
    let git = GitCli::new(cwd);
    let catalog = DelimiterCatalog::with_overrides(&config.profiles);
    let resolver = MetadataResolver::new(&git, SystemClock);

    for file in files {
        let display = file.to_string_lossy();
        let profile = catalog
            .for_path(file)
            .ok_or_else(|| Error::UnknownFileType(display.to_string()))?;
        let content = std::fs::read_to_string(cwd.join(file)).map_err(|source| {
            Error::FileUnreadable {
                path: file.clone(),
                source,
            }
        })?;
        let metadata = resolver.resolve_with_description(&display, message.trim())?;

        if files.len() > 1 {
            println!("==> {} <==", display);
        }
        print!("{}", inject(&content, &metadata, profile));
    }

    Ok(())
}
