//! Snapsort - a terminal image triage library
//!
//! This crate provides the core functionality for the snapsort
//! application: scanning a directory of images, moving them into
//! sub-folders via single-key hotkeys, undoing moves, and playing
//! animated images while doing so.

pub mod cli;
pub mod controller;
pub mod debounce;
pub mod domain;
pub mod error;
pub mod hotkeys;
pub mod playback;
pub mod sched;
pub mod settings;
pub mod tui;

// Re-export primary types for convenience
pub use controller::{FileInfo, Sorter};
pub use domain::classify::{ClassifyEngine, MoveOutcome, MoveRecord, UndoOutcome};
pub use domain::{is_image_file, scan_folders, scan_images, Direction, ImageQueue};
pub use error::{Result, SortError};
pub use hotkeys::{BindOutcome, BindingTable, KeyToken};
pub use playback::PlaybackEngine;
pub use sched::{Scheduler, TimerId};
pub use settings::Settings;
