//! The `Sorter` controller: one owned struct tying the queue, the
//! classification engine, the binding table, playback, and the timers
//! together behind the operations the front-end calls.
//!
//! All methods run on the event-loop thread. Recoverable conditions
//! (vanished files, undecodable images, empty ledger) become status-line
//! messages; only unexpected I/O failures propagate as errors.

use crate::debounce::ResizeDebouncer;
use crate::domain::classify::{ClassifyEngine, MoveOutcome, UndoOutcome};
use crate::domain::{scan_folders, scan_images, Direction, ImageQueue};
use crate::error::{Result, SortError};
use crate::hotkeys::{BindOutcome, BindingTable, KeyToken};
use crate::playback::PlaybackEngine;
use crate::sched::{Scheduler, TimerId};
use crate::settings::{settings_path, Settings};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Name and size of the file under the cursor, for the info line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub bytes: u64,
}

pub struct Sorter {
    root: PathBuf,
    settings_file: PathBuf,
    engine: ClassifyEngine,
    folders: Vec<String>,
    bindings: BindingTable,
    playback: PlaybackEngine,
    debouncer: ResizeDebouncer,
    sched: Scheduler,
    viewport: (u32, u32),
    loaded: Option<PathBuf>,
    status: String,
}

impl Sorter {
    /// Scans `root` and assembles the controller.
    ///
    /// An unreadable directory is fatal. A broken settings file is not:
    /// the bindings start empty and the condition lands in the status
    /// line.
    pub fn new(root: PathBuf, settings_file: Option<PathBuf>) -> Result<Self> {
        let files = scan_images(&root)?;
        let folders = scan_folders(&root)?;
        let settings_file = settings_file.unwrap_or_else(|| settings_path(&root));

        let mut status = format!("{} images found", files.len());
        let settings = match Settings::load_from(&settings_file) {
            Ok(s) => s,
            Err(e) => {
                status = e.to_string();
                Settings::default()
            }
        };

        let mut bindings = BindingTable::new();
        for (folder, key) in &settings.folder_hotkeys {
            if let Some(token) = KeyToken::new(key.clone()) {
                // BTreeMap iteration order makes duplicate keys in a
                // hand-edited file resolve deterministically.
                bindings.rebind(folder, token);
            }
        }
        bindings.rebuild_index(&folders);

        let queue = ImageQueue::new(files);
        Ok(Self {
            engine: ClassifyEngine::new(root.clone(), queue),
            root,
            settings_file,
            folders,
            bindings,
            playback: PlaybackEngine::new(),
            debouncer: ResizeDebouncer::new(),
            sched: Scheduler::new(),
            viewport: (0, 0),
            loaded: None,
            status,
        })
    }

    // ---- display surface -------------------------------------------------

    pub fn display(&self) -> Option<&RgbaImage> {
        self.playback.display()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Lets the front-end surface its own messages (refused folder
    /// operations, capture hints) on the shared status line.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn key_for(&self, folder: &str) -> Option<&KeyToken> {
        self.bindings.key_for(folder)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.engine.queue().current()
    }

    /// Position and name of the current image plus its on-disk size.
    pub fn current_file_info(&self) -> Option<FileInfo> {
        let path = self.current_path()?;
        let name = path.file_name()?.to_string_lossy().into_owned();
        let bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Some(FileInfo { name, bytes })
    }

    pub fn processed(&self) -> usize {
        self.engine.processed()
    }

    pub fn remaining(&self) -> usize {
        self.engine.queue().len()
    }

    /// Total images in this session: already classified plus pending.
    pub fn total(&self) -> usize {
        self.engine.processed() + self.engine.queue().len()
    }

    pub fn position(&self) -> Option<usize> {
        self.engine.queue().position()
    }

    // ---- navigation and classification -----------------------------------

    /// Steps the cursor and shows the image there. Clamped at both ends.
    pub fn navigate(&mut self, direction: Direction, now: Instant) -> Result<()> {
        if self.engine.queue_mut().advance(direction) {
            self.status.clear();
        } else if !self.engine.queue().is_empty() {
            self.status = match direction {
                Direction::Forward => "Already at the last image".to_string(),
                Direction::Back => "Already at the first image".to_string(),
            };
        }
        self.show_current(now);
        Ok(())
    }

    /// Classifies the current image into the folder at `index` in the
    /// sorted folder list. Out-of-range indices are ignored.
    pub fn classify(&mut self, index: usize, now: Instant) -> Result<()> {
        let Some(folder) = self.folders.get(index).cloned() else {
            return Ok(());
        };
        self.classify_into(&folder, now)
    }

    /// Dispatches a classification key: the binding table first, then
    /// the digit-position fallback for unbound `0`-`9` keys.
    pub fn classify_by_key(&mut self, key: &KeyToken, now: Instant) -> Result<()> {
        if let Some(index) = self.bindings.lookup(key) {
            return self.classify(index, now);
        }
        if let Some(digit) = key.digit() {
            if digit < self.folders.len() {
                return self.classify(digit, now);
            }
        }
        Ok(())
    }

    fn classify_into(&mut self, folder: &str, now: Instant) -> Result<()> {
        // Decode handles on the current image are released before the
        // move; the file must not be open when it is renamed.
        self.playback.teardown(&mut self.sched);
        self.loaded = None;

        match self.engine.move_current_to(folder) {
            Ok(MoveOutcome::Moved) => {
                self.status = format!("Moved to {}", folder);
            }
            Ok(MoveOutcome::Busy) => {}
            Ok(MoveOutcome::NoCurrent) => {
                self.status = "No image to classify".to_string();
            }
            Err(SortError::SourceMissing(path)) => {
                self.status = format!("File no longer exists: {}", path.display());
                self.engine.skip_missing();
            }
            Err(e @ SortError::MoveFailed { .. }) => {
                self.status = e.to_string();
            }
            Err(e) => return Err(e),
        }
        self.show_current(now);
        Ok(())
    }

    /// Reverses the most recent move and selects the restored image.
    pub fn undo(&mut self, now: Instant) -> Result<()> {
        self.playback.teardown(&mut self.sched);
        self.loaded = None;

        match self.engine.undo_last() {
            Ok(UndoOutcome::Undone) => {
                self.status = "Move undone".to_string();
            }
            Ok(UndoOutcome::Nothing) => {
                self.status = "Nothing to undo".to_string();
            }
            Err(e @ SortError::UndoTargetMissing(_)) => {
                self.status = e.to_string();
            }
            Err(e) => return Err(e),
        }
        self.show_current(now);
        Ok(())
    }

    // ---- hotkey bindings -------------------------------------------------

    /// Binds `key` to `folder`. A `Conflict` outcome changes nothing;
    /// the front-end confirms with the user and calls `rebind`.
    pub fn bind(&mut self, folder: &str, key: KeyToken) -> Result<BindOutcome> {
        if !self.folders.iter().any(|f| f == folder) {
            return Err(SortError::UnknownFolder(folder.to_string()));
        }
        let label = key.to_string();
        let outcome = self.bindings.bind(folder, key);
        if outcome == BindOutcome::Bound {
            self.after_binding_change()?;
            self.status = format!("Bound [{}] to {}", label, folder);
        }
        Ok(outcome)
    }

    /// Applies a binding after the user confirmed taking the key away
    /// from its current holder.
    pub fn rebind(&mut self, folder: &str, key: KeyToken) -> Result<()> {
        if !self.folders.iter().any(|f| f == folder) {
            return Err(SortError::UnknownFolder(folder.to_string()));
        }
        let label = key.to_string();
        self.bindings.rebind(folder, key);
        self.after_binding_change()?;
        self.status = format!("Bound [{}] to {}", label, folder);
        Ok(())
    }

    pub fn unbind(&mut self, folder: &str) -> Result<()> {
        if self.bindings.unbind(folder).is_some() {
            self.after_binding_change()?;
            self.status = format!("Unbound {}", folder);
        }
        Ok(())
    }

    fn after_binding_change(&mut self) -> Result<()> {
        self.bindings.rebuild_index(&self.folders);
        self.save_settings()
    }

    // ---- folder management -----------------------------------------------

    /// Creates a new classification folder under the root.
    pub fn add_folder(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(SortError::Config(format!("invalid folder name: {name:?}")));
        }
        if self.folders.iter().any(|f| f == name) || self.root.join(name).exists() {
            return Err(SortError::FolderExists(name.to_string()));
        }
        fs::create_dir(self.root.join(name))?;
        let i = self
            .folders
            .binary_search(&name.to_string())
            .unwrap_or_else(|e| e);
        self.folders.insert(i, name.to_string());
        self.bindings.rebuild_index(&self.folders);
        self.status = format!("Created folder {}", name);
        Ok(())
    }

    /// Renames a folder on disk, keeping its binding.
    pub fn rename_folder(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        let Some(i) = self.folders.iter().position(|f| f == old) else {
            return Err(SortError::UnknownFolder(old.to_string()));
        };
        if new.is_empty() || new.contains(['/', '\\']) || new.starts_with('.') {
            return Err(SortError::Config(format!("invalid folder name: {new:?}")));
        }
        if self.folders.iter().any(|f| f == new) || self.root.join(new).exists() {
            return Err(SortError::FolderExists(new.to_string()));
        }

        fs::rename(self.root.join(old), self.root.join(new))?;
        self.folders.remove(i);
        let i = self
            .folders
            .binary_search(&new.to_string())
            .unwrap_or_else(|e| e);
        self.folders.insert(i, new.to_string());
        self.bindings.rename_folder(old, new);
        self.after_binding_change()?;
        self.status = format!("Renamed {} to {}", old, new);
        Ok(())
    }

    /// Deletes a folder and everything in it. The front-end is
    /// responsible for confirming first; the last folder cannot go.
    pub fn delete_folder(&mut self, name: &str) -> Result<()> {
        let Some(i) = self.folders.iter().position(|f| f == name) else {
            return Err(SortError::UnknownFolder(name.to_string()));
        };
        if self.folders.len() == 1 {
            return Err(SortError::LastFolder);
        }

        fs::remove_dir_all(self.root.join(name))?;
        self.folders.remove(i);
        self.bindings.unbind(name);
        self.after_binding_change()?;
        self.status = format!("Deleted folder {}", name);
        Ok(())
    }

    // ---- viewport and timers ---------------------------------------------

    /// Reports a new viewport size in pixels.
    ///
    /// The first layout applies immediately so the initial image shows
    /// without waiting out a quiet period; later resizes are debounced.
    pub fn viewport_resized(&mut self, width: u32, height: u32, now: Instant) {
        let first_layout = self.viewport == (0, 0);
        self.viewport = (width, height);
        if first_layout {
            if self.loaded.is_some() {
                self.playback.rescale(self.viewport);
            } else {
                self.show_current(now);
            }
        } else {
            self.debouncer.request(self.viewport, &mut self.sched, now);
        }
    }

    /// Routes a due timer to its owner. Timers that belong to neither
    /// the animation nor the debouncer are stale and ignored.
    pub fn on_timer(&mut self, id: TimerId, now: Instant) {
        if self.playback.owns_timer(id) {
            self.playback.on_timer(id, self.viewport, &mut self.sched, now);
            return;
        }
        if let Some((w, h)) = self.debouncer.fire(id) {
            if w == 0 || h == 0 {
                // Not laid out yet; check again after another quiet period.
                self.debouncer.request(self.viewport, &mut self.sched, now);
            } else {
                self.playback.rescale((w, h));
            }
        }
    }

    /// Timers due at `now`, for the event loop to feed back to
    /// `on_timer`.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerId> {
        self.sched.take_due(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.sched.next_deadline()
    }

    /// Persists bindings and releases playback resources.
    pub fn shutdown(&mut self) -> Result<()> {
        self.playback.teardown(&mut self.sched);
        self.loaded = None;
        self.save_settings()
    }

    fn save_settings(&self) -> Result<()> {
        let mut settings = Settings::default();
        for (folder, key) in self.bindings.iter() {
            settings
                .folder_hotkeys
                .insert(folder.to_string(), key.as_str().to_string());
        }
        settings.save_to(&self.settings_file)
    }

    /// Loads the image under the cursor, skipping forward past files
    /// that fail to decode. Re-loading the already-shown image is a
    /// no-op so a clamped navigation does not restart an animation.
    fn show_current(&mut self, now: Instant) {
        loop {
            let Some(path) = self.engine.queue().current().map(Path::to_path_buf) else {
                self.playback.teardown(&mut self.sched);
                self.loaded = None;
                if self.engine.queue().is_empty() && self.engine.processed() > 0 {
                    self.status = "All images sorted".to_string();
                }
                return;
            };
            if self.loaded.as_deref() == Some(path.as_path()) {
                return;
            }
            match self.playback.load(&path, self.viewport, &mut self.sched, now) {
                Ok(()) => {
                    self.loaded = Some(path);
                    return;
                }
                Err(e) => {
                    self.status = e.to_string();
                    self.loaded = None;
                    if !self.engine.queue_mut().advance(Direction::Forward) {
                        return;
                    }
                }
            }
        }
    }
}
