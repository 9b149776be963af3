//! Library and purge handlers

use std::path::PathBuf;

use anyhow::Result;

use loopmark::cli::VideoArg;
use loopmark::status::format_time;
use loopmark::theme::current_theme;
use loopmark::Config;

use super::{open_store, resolve_video};

/// List stored videos with mark count, position and last-played time.
pub fn handle_list(data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(data_dir, &config)?;
    let records = store.list()?;
    let theme = current_theme();

    if records.is_empty() {
        println!(
            "{}",
            theme.secondary_text(&format!("No videos stored in {}", store.root().display()))
        );
        return Ok(());
    }

    for (id, record) in &records {
        let position = record
            .position
            .map(format_time)
            .unwrap_or_else(|| "-".to_string());
        let last_played = record
            .last_played
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{}  {}",
            theme.accent_text(id.as_str()),
            theme.secondary_text(&format!(
                "{} mark(s), at {}, last played {}",
                record.marks.len(),
                position,
                last_played
            ))
        );
    }
    Ok(())
}

/// Remove everything stored for a video.
pub fn handle_purge(data_dir: Option<PathBuf>, video: &VideoArg) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(data_dir, &config)?;
    let id = resolve_video(video)?;
    store.purge(&id)?;

    let theme = current_theme();
    println!("{}", theme.success_text(&format!("Purged {}", id)));
    Ok(())
}
