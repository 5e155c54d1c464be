//! Whole-document persistence for the story book.
//!
//! The book is saved write-through: every committed mutation is followed by
//! a full overwrite of the document. A coarse lock guards the read/write
//! path against re-entrant initialization; there is exactly one writer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::book::StoryBook;
use crate::error::BookResult;

/// File name of the persisted book document.
pub const BOOK_FILE_NAME: &str = "game.story";

/// Gateway to the persisted book document at a fixed path.
#[derive(Debug)]
pub struct BookStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl BookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store rooted in `dir` with the conventional document name.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(BOOK_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the whole book document.
    pub fn read_book(&self) -> BookResult<StoryBook> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overwrites the whole book document, creating parent directories.
    ///
    /// The document is written to a temp file and renamed into place so a
    /// crash mid-write cannot leave a truncated book behind.
    pub fn save_book(&self, book: &StoryBook) -> BookResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(book)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload)?;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
