use super::{Direction, ImageQueue};
use crate::error::{Result, SortError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One completed move, as recorded in the undo ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Result of a classification attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file was moved and the queue advanced.
    Moved,
    /// Another classification is in progress; the request was dropped.
    Busy,
    /// The queue is empty; nothing to move.
    NoCurrent,
}

/// Result of an undo attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone,
    /// The ledger was empty.
    Nothing,
}

/// Moves the current image into target folders and reverses moves.
///
/// Owns the image queue and the undo ledger. Callers must release any
/// open decode handles on the current image before classifying; the
/// engine itself never opens the files it moves.
#[derive(Debug)]
pub struct ClassifyEngine {
    root: PathBuf,
    queue: ImageQueue,
    ledger: Vec<MoveRecord>,
    processed: usize,
    busy: bool,
}

impl ClassifyEngine {
    pub fn new(root: PathBuf, queue: ImageQueue) -> Self {
        Self {
            root,
            queue,
            ledger: Vec::new(),
            processed: 0,
            busy: false,
        }
    }

    pub fn queue(&self) -> &ImageQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut ImageQueue {
        &mut self.queue
    }

    /// Number of images classified so far (moves minus undos).
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    /// Moves the current image into `folder` under the working root.
    ///
    /// Re-entrant calls are rejected with `MoveOutcome::Busy` while a
    /// move is in progress; the flag is cleared on every exit path.
    /// The destination directory is created lazily and colliding names
    /// get a `_1`, `_2`, ... suffix, so existing files are never
    /// overwritten. On `SourceMissing` and `MoveFailed` the queue and
    /// ledger are left untouched.
    pub fn move_current_to(&mut self, folder: &str) -> Result<MoveOutcome> {
        if self.busy {
            return Ok(MoveOutcome::Busy);
        }
        self.busy = true;
        let result = self.do_move(folder);
        self.busy = false;
        result
    }

    fn do_move(&mut self, folder: &str) -> Result<MoveOutcome> {
        let Some(source) = self.queue.current().map(Path::to_path_buf) else {
            return Ok(MoveOutcome::NoCurrent);
        };
        if !source.exists() {
            return Err(SortError::SourceMissing(source));
        }

        let folder_dir = self.root.join(folder);
        fs::create_dir_all(&folder_dir)?;

        let destination = unique_destination(&folder_dir, &source);
        move_file(&source, &destination).map_err(|e| SortError::MoveFailed {
            from: source.clone(),
            to: destination.clone(),
            source: e,
        })?;

        self.ledger.push(MoveRecord {
            source,
            destination,
        });
        self.queue.remove_current();
        self.processed += 1;
        Ok(MoveOutcome::Moved)
    }

    /// Reverses the most recent move.
    ///
    /// The popped record is consumed even when the restore fails: a
    /// vanished destination yields `UndoTargetMissing` and the entry is
    /// gone. The counter and queue are only touched on success.
    pub fn undo_last(&mut self) -> Result<UndoOutcome> {
        let Some(record) = self.ledger.pop() else {
            return Ok(UndoOutcome::Nothing);
        };

        if !record.destination.exists() {
            return Err(SortError::UndoTargetMissing(record.destination));
        }

        if let Some(parent) = record.source.parent() {
            fs::create_dir_all(parent)?;
        }
        move_file(&record.destination, &record.source).map_err(|e| SortError::MoveFailed {
            from: record.destination.clone(),
            to: record.source.clone(),
            source: e,
        })?;

        self.processed = self.processed.saturating_sub(1);
        self.queue.reinsert(record.source);
        Ok(UndoOutcome::Undone)
    }

    /// Steps past a file that vanished from disk without touching the
    /// queue entry count. Returns `false` when already at the end.
    pub fn skip_missing(&mut self) -> bool {
        self.queue.advance(Direction::Forward)
    }
}

/// Moves a file, falling back to copy-then-delete when rename fails
/// (rename cannot cross filesystems).
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Picks a destination name inside `dir` that does not collide with an
/// existing file, appending `_1`, `_2`, ... before the extension.
fn unique_destination(dir: &Path, source: &Path) -> PathBuf {
    let file_name = source.file_name().unwrap_or_default();
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1u64;
    loop {
        let name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
