//! Command-line arguments.

use crate::error::{Result, SortError};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "snapsort",
    version,
    about = "Sort a directory of images into sub-folders with single-key shortcuts"
)]
pub struct Args {
    /// Directory containing the images to sort
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Settings file to use instead of <directory>/snapsort_settings.json
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if !self.directory.exists() {
            return Err(SortError::Config(format!(
                "directory does not exist: {}",
                self.directory.display()
            )));
        }
        if !self.directory.is_dir() {
            return Err(SortError::Config(format!(
                "not a directory: {}",
                self.directory.display()
            )));
        }
        Ok(())
    }
}
