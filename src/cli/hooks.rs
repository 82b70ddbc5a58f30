//! Git hook installation and management.

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Error;

/// Marker identifying our lines inside a hook script.
const MARKER: &str = "headstamp";

/// Hook script section. The non-zero exit after a recommit must reach git.
const COMMIT_MSG_HOOK: &str = r#"#!/bin/sh
# headstamp provenance headers (auto-installed)
# Recreates the commit with headers, then rejects the original attempt

headstamp commit-msg "$1" || exit $?
"#;

fn hook_path(hooks_dir: &Path) -> PathBuf {
    hooks_dir.join("commit-msg")
}

/// Check if the headstamp hook is already installed.
pub fn hook_installed(hooks_dir: &Path) -> bool {
    fs::read_to_string(hook_path(hooks_dir))
        .map(|content| content.contains(MARKER))
        .unwrap_or(false)
}

/// Install the commit-msg hook into `hooks_dir`, preserving an existing one.
///
/// `hooks_dir` comes from [`GitCli::hooks_dir`](crate::git::GitCli::hooks_dir),
/// so worktrees and `core.hooksPath` are honored.
pub fn install_hook(hooks_dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(hooks_dir)?;
    let path = hook_path(hooks_dir);

    let final_content = if path.exists() {
        let existing = fs::read_to_string(&path)?;

        if existing.contains(MARKER) {
            info!("commit-msg hook already installed");
            return Ok(());
        }

        // Append without repeating the shebang
        let section = COMMIT_MSG_HOOK.trim_start_matches("#!/bin/sh\n");
        format!("{}\n\n{}", existing.trim_end(), section)
    } else {
        COMMIT_MSG_HOOK.to_string()
    };

    fs::write(&path, &final_content)?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
    }

    info!(path = %path.display(), "Installed commit-msg hook");
    Ok(())
}

/// Remove our section from the commit-msg hook. Returns whether anything
/// was removed.
pub fn uninstall_hook(hooks_dir: &Path) -> Result<bool, Error> {
    let path = hook_path(hooks_dir);
    if !path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&path)?;
    if !content.contains(MARKER) {
        return Ok(false);
    }

    let cleaned = remove_section(&content);
    if cleaned.trim().is_empty() || cleaned.trim() == "#!/bin/sh" {
        fs::remove_file(&path)?;
    } else {
        fs::write(&path, format!("{}\n", cleaned.trim_end()))?;
    }
    info!(path = %path.display(), "Removed commit-msg hook");

    Ok(true)
}

fn remove_section(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.contains(MARKER) && !line.starts_with("# Recreates the commit"))
        .collect::<Vec<_>>()
        .join("\n")
}
