use crate::error::{Result, SortError};
use std::fs;
use std::path::{Path, PathBuf};

pub mod classify;

/// File extensions offered for triage, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "webp"];

/// Navigation direction through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

/// Checks whether a path carries a supported image extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scans a directory (non-recursive) for image files.
///
/// Returns the matches sorted lexicographically. Entries that cannot be
/// stat'ed are skipped; an unreadable directory is a `Scan` error.
pub fn scan_images(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| SortError::Scan {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Lists the sub-directories of the root that act as classification targets.
///
/// Hidden directories are ignored. Returns names sorted lexicographically.
pub fn scan_folders(root: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|e| SortError::Scan {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !name.starts_with('.') {
                folders.push(name.to_string());
            }
        }
    }

    folders.sort();
    Ok(folders)
}

/// Ordered list of pending image paths plus a cursor.
///
/// The cursor is `None` exactly when the queue is empty; otherwise it is
/// a valid index and the path there is the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQueue {
    files: Vec<PathBuf>,
    cursor: Option<usize>,
}

impl ImageQueue {
    pub fn new(files: Vec<PathBuf>) -> Self {
        let cursor = if files.is_empty() { None } else { Some(0) };
        Self { files, cursor }
    }

    /// The path under the cursor, if any.
    pub fn current(&self) -> Option<&Path> {
        self.cursor.map(|i| self.files[i].as_path())
    }

    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.files
    }

    /// Moves the cursor one step and clamps at either end.
    ///
    /// Returns `true` when the cursor actually moved; stepping past the
    /// first or last entry is a no-op.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let Some(i) = self.cursor else {
            return false;
        };
        let next = match direction {
            Direction::Forward if i + 1 < self.files.len() => i + 1,
            Direction::Back if i > 0 => i - 1,
            _ => return false,
        };
        self.cursor = Some(next);
        true
    }

    /// Removes the entry under the cursor and returns it.
    ///
    /// When the removed entry was the last in the list the cursor wraps
    /// back to the head, so triaging near the tail jumps to the first
    /// remaining image.
    pub fn remove_current(&mut self) -> Option<PathBuf> {
        let i = self.cursor?;
        let removed = self.files.remove(i);
        self.cursor = if self.files.is_empty() {
            None
        } else if i >= self.files.len() {
            Some(0)
        } else {
            Some(i)
        };
        Some(removed)
    }

    /// Inserts a path keeping sort order and selects it.
    pub fn reinsert(&mut self, path: PathBuf) {
        let i = self.files.binary_search(&path).unwrap_or_else(|e| e);
        self.files.insert(i, path);
        self.cursor = Some(i);
    }
}
