//! Config subcommands handler

use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use loopmark::config::{migrate_config, MigrateResult};
use loopmark::theme::current_theme;
use loopmark::Config;

/// Print the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let theme = current_theme();
    println!(
        "{}",
        theme.secondary_text(&format!("# {}", Config::config_path()?.display()))
    );
    println!("{}", theme.primary_text(&toml::to_string_pretty(&config)?));
    Ok(())
}

/// Add fields missing from the config file, keeping the user's layout.
///
/// A missing file is created with every default. Changes are previewed and
/// confirmed unless `yes` is set; without a terminal nothing is written.
#[cfg(not(tarpaulin_include))]
pub fn handle_migrate(yes: bool) -> Result<()> {
    let theme = current_theme();
    let config_path = Config::config_path()?;
    let file_exists = config_path.exists();

    let content = if file_exists {
        fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?
    } else {
        String::new()
    };

    let result = migrate_config(&content)?;
    if !result.has_changes() {
        println!("{}", theme.primary_text("Config is already up to date."));
        return Ok(());
    }

    let question = if file_exists {
        println!("{}", theme.primary_text(&summary(&result)));
        format!("Apply these changes to {}?", config_path.display())
    } else {
        println!(
            "{}",
            theme.primary_text("Config file does not exist. Will create it with default settings.")
        );
        format!("Create {}?", config_path.display())
    };
    println!();
    for line in preview_lines(&result, !file_exists) {
        match line {
            PreviewLine::Added(text) => println!("{}", theme.success_text(&format!("+ {}", text))),
            PreviewLine::Context(text) => println!("  {}", text),
        }
    }
    println!();

    if !yes && !prompt_confirmation(&question)? {
        println!("{}", theme.primary_text("No changes made."));
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&config_path, &result.content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{}", theme.success_text("Config updated."));
    Ok(())
}

fn summary(result: &MigrateResult) -> String {
    match result.sections_added.len() {
        0 => format!("Found {} missing field(s):", result.added_fields.len()),
        sections => format!(
            "Found {} missing field(s) in {} new section(s):",
            result.added_fields.len(),
            sections
        ),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PreviewLine<'a> {
    Added(&'a str),
    Context(&'a str),
}

/// Lines of the migrated file worth showing.
///
/// Added fields are shown with their section header; untouched fields are
/// left out. For a new file every non-blank line counts as added.
fn preview_lines<'a>(result: &'a MigrateResult, is_new_file: bool) -> Vec<PreviewLine<'a>> {
    let mut lines = Vec::new();
    let mut section = "";
    let mut header: Option<&'a str> = None;

    for line in result.content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            section = &trimmed[1..trimmed.len() - 1];
            header = Some(line);
            continue;
        }

        let added = is_new_file
            || trimmed.split_once('=').is_some_and(|(key, _)| {
                result
                    .added_fields
                    .iter()
                    .any(|f| *f == format!("{}.{}", section, key.trim()))
            });
        if !added {
            continue;
        }

        if let Some(h) = header.take() {
            let new_section = is_new_file || result.sections_added.iter().any(|s| s == section);
            lines.push(if new_section {
                PreviewLine::Added(h)
            } else {
                PreviewLine::Context(h)
            });
        }
        lines.push(PreviewLine::Added(line));
    }
    lines
}

/// Ask a yes/no question on the terminal. Non-interactive stdin answers no.
fn prompt_confirmation(message: &str) -> Result<bool> {
    let theme = current_theme();

    if !atty::is(atty::Stream::Stdin) {
        println!(
            "{}",
            theme.secondary_text("Non-interactive mode: use --yes to apply changes automatically")
        );
        return Ok(false);
    }

    print!("{} [y/N] ", theme.primary_text(message));
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
