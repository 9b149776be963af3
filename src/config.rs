//! Configuration file handling.
//!
//! The config lives at `<config dir>/loopmark/config.toml`. Every field has a
//! default, so a missing file, a partial file, or an older file all load.
//! [`migrate_config`] fills in fields added since a file was written while
//! keeping the user's comments and layout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const APP_DIR: &str = "loopmark";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub marks: MarksConfig,
    pub looping: LoopConfig,
    pub seeking: SeekingConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

/// Mark placement and auto-pause behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarksConfig {
    /// Distance (seconds) within which toggling removes an existing mark
    pub proximity_tolerance: f64,
    /// Forward window (seconds) in which a just-passed mark pauses playback
    pub pause_tolerance: f64,
    /// Slack (seconds) when looking for the next/previous mark to jump to
    pub jump_tolerance: f64,
    /// Default fine-tune step (seconds)
    pub finetune_step: f64,
    /// Pause and snap when playback crosses a mark outside loop mode
    pub pause_at_marks: bool,
}

impl Default for MarksConfig {
    fn default() -> Self {
        Self {
            proximity_tolerance: 0.5,
            pause_tolerance: 0.25,
            jump_tolerance: 0.1,
            finetune_step: 0.1,
            pause_at_marks: true,
        }
    }
}

/// When a jump seek resumes playback that was running before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    /// Resume only while loop mode is on
    #[default]
    LoopOnly,
    /// Resume after mark and segment jumps in any mode
    Always,
}

/// Loop mode tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Seconds a segment loops before auto-advancing
    pub duration_secs: f64,
    /// Minimum seconds between two boundary corrections
    pub boundary_debounce_secs: f64,
    pub resume_after_jump: ResumePolicy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30.0,
            boundary_debounce_secs: 1.0,
            resume_after_jump: ResumePolicy::LoopOnly,
        }
    }
}

/// Skip-forward/backward step sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekingConfig {
    /// Step sizes (seconds) cycled through by the step toggle
    pub step_options: Vec<f64>,
    /// Index into `step_options` used at startup
    pub default_step_index: usize,
}

impl Default for SeekingConfig {
    fn default() -> Self {
        Self {
            step_options: vec![0.5, 5.0, 30.0],
            default_step_index: 1,
        }
    }
}

/// Player session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sampler period in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
        }
    }
}

/// Where persisted state goes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse and validate TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config.validated())
    }

    /// Write to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Directory holding persisted per-video state.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        let dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(dir.join(APP_DIR))
    }

    /// Replace out-of-range values with defaults, logging each fix.
    pub fn validated(mut self) -> Self {
        let marks_default = MarksConfig::default();
        sanitize_tolerance(
            &mut self.marks.proximity_tolerance,
            marks_default.proximity_tolerance,
            "marks.proximity_tolerance",
        );
        sanitize_tolerance(
            &mut self.marks.pause_tolerance,
            marks_default.pause_tolerance,
            "marks.pause_tolerance",
        );
        sanitize_tolerance(
            &mut self.marks.jump_tolerance,
            marks_default.jump_tolerance,
            "marks.jump_tolerance",
        );
        if !(self.marks.finetune_step.is_finite() && self.marks.finetune_step > 0.0) {
            warn!(
                "marks.finetune_step {} is invalid, using {}",
                self.marks.finetune_step, marks_default.finetune_step
            );
            self.marks.finetune_step = marks_default.finetune_step;
        }

        let loop_default = LoopConfig::default();
        if !(self.looping.duration_secs.is_finite() && self.looping.duration_secs > 0.0) {
            warn!(
                "looping.duration_secs {} is invalid, using {}",
                self.looping.duration_secs, loop_default.duration_secs
            );
            self.looping.duration_secs = loop_default.duration_secs;
        }
        sanitize_tolerance(
            &mut self.looping.boundary_debounce_secs,
            loop_default.boundary_debounce_secs,
            "looping.boundary_debounce_secs",
        );

        self.seeking
            .step_options
            .retain(|s| s.is_finite() && *s > 0.0);
        if self.seeking.step_options.is_empty() {
            warn!("seeking.step_options has no usable entries, using defaults");
            self.seeking = SeekingConfig::default();
        }
        if self.seeking.default_step_index >= self.seeking.step_options.len() {
            warn!(
                "seeking.default_step_index {} out of range, using 0",
                self.seeking.default_step_index
            );
            self.seeking.default_step_index = 0;
        }

        if self.session.tick_interval_ms == 0 {
            warn!("session.tick_interval_ms must be positive, using default");
            self.session.tick_interval_ms = SessionConfig::default().tick_interval_ms;
        }

        self
    }
}

fn sanitize_tolerance(value: &mut f64, default: f64, name: &str) {
    if !(value.is_finite() && *value >= 0.0) {
        warn!("{} {} is invalid, using {}", name, value, default);
        *value = default;
    }
}

/// Outcome of [`migrate_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct MigrateResult {
    /// The migrated file content
    pub content: String,
    /// Fields added, as `section.key`
    pub added_fields: Vec<String>,
    /// Sections that did not exist before
    pub sections_added: Vec<String>,
}

impl MigrateResult {
    pub fn has_changes(&self) -> bool {
        !self.added_fields.is_empty()
    }
}

/// Add every missing default field to `content`, preserving existing values,
/// comments and ordering.
pub fn migrate_config(content: &str) -> Result<MigrateResult> {
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .context("Config file is not valid TOML")?;
    let defaults: toml_edit::DocumentMut = toml::to_string_pretty(&Config::default())?
        .parse()
        .context("Default config did not serialize to valid TOML")?;

    let mut added_fields = Vec::new();
    let mut sections_added = Vec::new();

    for (section, default_item) in defaults.iter() {
        let Some(default_table) = default_item.as_table() else {
            continue;
        };

        if !doc.contains_key(section) {
            doc.insert(section, toml_edit::Item::Table(toml_edit::Table::new()));
            sections_added.push(section.to_string());
        }
        let Some(table) = doc[section].as_table_mut() else {
            warn!("config key '{}' is not a table, leaving it alone", section);
            continue;
        };

        for (key, value) in default_table.iter() {
            if !table.contains_key(key) {
                table.insert(key, value.clone());
                added_fields.push(format!("{}.{}", section, key));
            }
        }
    }

    // Sections that ended up empty (all-optional) are not worth writing
    sections_added.retain(|s| added_fields.iter().any(|f| f.starts_with(&format!("{}.", s))));
    for section in defaults.iter().map(|(s, _)| s.to_string()) {
        let empty = doc
            .get(&section)
            .and_then(|i| i.as_table())
            .map(|t| t.is_empty())
            .unwrap_or(false);
        if empty && !content.contains(&format!("[{}]", section)) {
            doc.remove(&section);
        }
    }

    Ok(MigrateResult {
        content: doc.to_string(),
        added_fields,
        sections_added,
    })
}
