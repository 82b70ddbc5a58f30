//! Configuration management for headstamp.
//!
//! Handles loading `.headstamp.toml` from the repository root, falling back to
//! `~/.headstamp.toml` and then to built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Config file name, both in the repository and in the home directory.
pub const CONFIG_FILE: &str = ".headstamp.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Hook and recommit behavior.
    #[serde(default)]
    pub commit: CommitConfig,

    /// Extra delimiter profiles layered over the built-in catalog.
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Message path git hands to `commit-msg` during a merge.
    #[serde(default = "default_merge_msg_path")]
    pub merge_msg_path: PathBuf,

    /// Stage every working-tree change before recommitting, or only the
    /// annotated files.
    #[serde(default = "default_true")]
    pub stage_all: bool,

    /// Extra attempts after a failed recommit.
    #[serde(default = "default_recommit_retries")]
    pub recommit_retries: u32,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            merge_msg_path: default_merge_msg_path(),
            stage_all: true,
            recommit_retries: default_recommit_retries(),
        }
    }
}

/// A user-supplied comment delimiter profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub file_type: String,
    pub open: String,
    pub close: String,
    #[serde(default = "default_true")]
    pub close_needs_leading_space: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_merge_msg_path() -> PathBuf {
    PathBuf::from(".git/MERGE_MSG")
}

fn default_recommit_retries() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            commit: CommitConfig::default(),
            profiles: Vec::new(),
        }
    }
}

impl Config {
    /// Path to the repository-level config file.
    pub fn path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_FILE)
    }

    /// Path to the per-user fallback config file.
    pub fn global_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE))
    }

    /// Load config for a repository, repo file first, then the global one.
    pub fn load(repo_root: &Path) -> Result<Self, Error> {
        let repo_path = Self::path(repo_root);
        if repo_path.exists() {
            return Self::load_from(&repo_path);
        }
        match Self::global_path() {
            Some(global) if global.exists() => Self::load_from(&global),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
