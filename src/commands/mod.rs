//! Subcommand handlers

pub mod completions;
pub mod config;
pub mod library;
pub mod marks;
pub mod play;

use std::path::PathBuf;

use anyhow::{Context, Result};

use loopmark::cli::VideoArg;
use loopmark::store::JsonFileStore;
use loopmark::{Config, VideoIdentity};

/// Store rooted at `--data-dir`, or the configured data directory.
pub fn open_store(data_dir: Option<PathBuf>, config: &Config) -> Result<JsonFileStore> {
    let root = match data_dir {
        Some(dir) => dir,
        None => config.data_dir()?,
    };
    Ok(JsonFileStore::new(root))
}

/// Identity for the video named on the command line.
pub fn resolve_video(arg: &VideoArg) -> Result<VideoIdentity> {
    if arg.id {
        VideoIdentity::parse(&arg.location)
            .with_context(|| format!("'{}' is not a stored video identity", arg.location))
    } else {
        Ok(VideoIdentity::from_location(&arg.location))
    }
}
