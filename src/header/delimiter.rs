//! Comment delimiter profiles keyed by file type.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ProfileConfig;

/// Comment syntax for one file type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterProfile {
    pub file_type: String,
    pub open: String,
    pub close: String,
    /// Block comments end with ` */`; markup comments attach `-->` directly.
    pub close_needs_leading_space: bool,
}

impl DelimiterProfile {
    pub fn new(file_type: &str, open: &str, close: &str, close_needs_leading_space: bool) -> Self {
        Self {
            file_type: file_type.to_string(),
            open: open.to_string(),
            close: close.to_string(),
            close_needs_leading_space,
        }
    }

    /// The close marker as it appears on the last rendered line.
    pub fn rendered_close(&self) -> String {
        if self.close_needs_leading_space {
            format!(" {}", self.close)
        } else {
            self.close.clone()
        }
    }
}

impl From<&ProfileConfig> for DelimiterProfile {
    fn from(cfg: &ProfileConfig) -> Self {
        Self::new(
            &cfg.file_type,
            &cfg.open,
            &cfg.close,
            cfg.close_needs_leading_space,
        )
    }
}

/// Read-only lookup table from file extension to delimiter profile.
#[derive(Debug, Clone)]
pub struct DelimiterCatalog {
    profiles: BTreeMap<String, DelimiterProfile>,
}

impl Default for DelimiterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DelimiterCatalog {
    /// The built-in `js`, `ts` and `vue` profiles.
    pub fn builtin() -> Self {
        let profiles = [
            DelimiterProfile::new("js", "/*", "*/", true),
            DelimiterProfile::new("ts", "/*", "*/", true),
            DelimiterProfile::new("vue", "<!--", "-->", false),
        ];
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.file_type.clone(), p))
                .collect(),
        }
    }

    /// Built-in profiles extended (or overridden) by configured ones.
    pub fn with_overrides(extra: &[ProfileConfig]) -> Self {
        let mut catalog = Self::builtin();
        for cfg in extra {
            let profile = DelimiterProfile::from(cfg);
            catalog.profiles.insert(profile.file_type.clone(), profile);
        }
        catalog
    }

    pub fn lookup(&self, file_type: &str) -> Option<&DelimiterProfile> {
        self.profiles.get(file_type)
    }

    /// Look up the profile for a path by its extension.
    pub fn for_path(&self, path: &Path) -> Option<&DelimiterProfile> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.lookup(ext))
    }

    pub fn file_types(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}
