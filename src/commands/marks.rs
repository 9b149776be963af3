//! Marks subcommands handler

use std::path::PathBuf;

use anyhow::{bail, Result};

use loopmark::cli::VideoArg;
use loopmark::playback::{MarkList, MarkToggle};
use loopmark::status::format_time;
use loopmark::theme::current_theme;
use loopmark::Config;

use super::{open_store, resolve_video};

/// Print the marks of a video, one per line.
pub fn handle_list(data_dir: Option<PathBuf>, video: &VideoArg) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(data_dir, &config)?;
    let id = resolve_video(video)?;
    let record = store.read_record(&id)?;
    let theme = current_theme();

    if record.marks.is_empty() {
        println!("{}", theme.secondary_text(&format!("No marks for {}", id)));
        return Ok(());
    }

    println!("{}", theme.primary_text(&format!("Marks for {}:", id)));
    for (i, mark) in record.marks.iter().enumerate() {
        println!(
            "  {:>3}  {}  {}",
            i + 1,
            theme.accent_text(&format_time(*mark)),
            theme.secondary_text(&format!("{:.3}s", mark))
        );
    }
    Ok(())
}

/// Add marks, skipping any that would sit on top of an existing one.
pub fn handle_add(data_dir: Option<PathBuf>, video: &VideoArg, seconds: &[f64]) -> Result<()> {
    if let Some(bad) = seconds.iter().find(|s| !(s.is_finite() && **s >= 0.0)) {
        bail!("Mark time must be a non-negative number of seconds, got {}", bad);
    }

    let config = Config::load()?;
    let tolerance = config.marks.proximity_tolerance;
    let store = open_store(data_dir, &config)?;
    let id = resolve_video(video)?;
    let mut record = store.read_record(&id)?;
    let mut marks = MarkList::from_values(record.marks.iter().copied(), tolerance);
    let theme = current_theme();

    for &time in seconds {
        if marks.find(time, tolerance).is_some() {
            println!(
                "{}",
                theme.secondary_text(&format!("Skipped {}: a mark is already there", format_time(time)))
            );
            continue;
        }
        let _ = marks.toggle(time, tolerance);
        println!("{}", theme.success_text(&format!("Added {}", format_time(time))));
    }

    record.marks = marks.to_vec();
    store.write_record(&id, &record)?;
    Ok(())
}

/// Remove the mark near each given time.
pub fn handle_remove(data_dir: Option<PathBuf>, video: &VideoArg, seconds: &[f64]) -> Result<()> {
    let config = Config::load()?;
    let tolerance = config.marks.proximity_tolerance;
    let store = open_store(data_dir, &config)?;
    let id = resolve_video(video)?;
    let mut record = store.read_record(&id)?;
    let mut marks = MarkList::from_values(record.marks.iter().copied(), tolerance);
    let theme = current_theme();

    for &time in seconds {
        if marks.find(time, tolerance).is_none() {
            println!(
                "{}",
                theme.secondary_text(&format!("No mark near {}", format_time(time)))
            );
            continue;
        }
        if let MarkToggle::Removed(removed) = marks.toggle(time, tolerance) {
            println!("{}", theme.success_text(&format!("Removed {}", format_time(removed))));
        }
    }

    record.marks = marks.to_vec();
    store.write_record(&id, &record)?;
    Ok(())
}

/// Remove every mark, keeping position and last-played.
pub fn handle_clear(data_dir: Option<PathBuf>, video: &VideoArg) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(data_dir, &config)?;
    let id = resolve_video(video)?;
    let mut record = store.read_record(&id)?;
    let count = record.marks.len();

    record.marks.clear();
    store.write_record(&id, &record)?;

    let theme = current_theme();
    println!(
        "{}",
        theme.success_text(&format!("Cleared {} mark(s) for {}", count, id))
    );
    Ok(())
}
