//! Editor preferences persisted between sessions.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Small per-user state the editor restores on launch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Directory holding the book document and its `resources` folder.
    pub book_dir: Option<PathBuf>,
    /// Whether the table of contents window was open.
    pub show_toc: bool,
}

#[derive(Debug, Error, Diagnostic)]
pub enum PersistError {
    #[error("io error: {0}")]
    #[diagnostic(code("storybook.prefs_io"))]
    Io(#[from] std::io::Error),
    #[error("preferences malformed: {0}")]
    #[diagnostic(code("storybook.prefs_parse"))]
    Parse(#[from] serde_json::Error),
}

impl EditorPreferences {
    /// Loads preferences; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }
}
