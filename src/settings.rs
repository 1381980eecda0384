//! Per-directory settings, stored as JSON next to the images.
//!
//! Keeping the file inside the working directory means hotkey bindings
//! travel with the collection they were made for.

use crate::error::{Result, SortError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "snapsort_settings.json";

/// Persisted state: the folder-to-hotkey assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub folder_hotkeys: BTreeMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location under `root`.
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_from(&settings_path(root))
    }

    /// Loads settings from an explicit file.
    ///
    /// A missing file yields the defaults. A file that fails to parse is
    /// reported as `Config` so the caller can fall back to defaults and
    /// surface the condition; other read errors propagate as I/O.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map_err(|e| SortError::Config(format!("malformed settings file: {}", e)))
    }

    /// Writes settings to the default location under `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        self.save_to(&settings_path(root))
    }

    /// Writes settings to an explicit file, pretty-printed for hand
    /// editing.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}
