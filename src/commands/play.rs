//! Headless playback session driven by line commands on stdin.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use loopmark::cli::PlayArgs;
use loopmark::player::SimulatedPlayer;
use loopmark::playback::ControllerSnapshot;
use loopmark::status::{build_timeline, format_status};
use loopmark::theme::current_theme;
use loopmark::{Command, Config, PlayerSession};

use super::{open_store, resolve_video};

/// Width of the printed timeline in characters.
const TIMELINE_WIDTH: usize = 60;

/// One parsed line of input.
#[derive(Debug)]
enum PlayInput {
    Send(Command),
    Wait(Duration),
    Status,
    Quit,
}

/// Map an input line to an action.
///
/// A line holding only spaces toggles play/pause; an empty line asks for
/// status.
fn parse_play_input(line: &str) -> Result<PlayInput, String> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    if line.trim().is_empty() {
        return Ok(if line.is_empty() {
            PlayInput::Status
        } else {
            PlayInput::Send(Command::TogglePlayPause)
        });
    }

    let mut parts = line.split_whitespace();
    let word = parts.next().unwrap_or_default();
    let arg = parts.next();
    let seconds = || -> Result<f64, String> {
        let value = arg.ok_or_else(|| format!("'{}' needs a number of seconds", word))?;
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| format!("'{}' is not a valid number of seconds", value))
    };

    let command = match word {
        "space" => Command::TogglePlayPause,
        "m" => Command::ToggleMark,
        "c" => Command::ClearMarks,
        "l" => Command::ToggleLoop,
        "n" => Command::NextSegment,
        "p" => Command::PreviousSegment,
        "]" => Command::JumpToNextMark,
        "[" => Command::JumpToPreviousMark,
        ">" => Command::SeekForward,
        "<" => Command::SeekBackward,
        "s" => Command::CycleSeekStep,
        "+" => Command::FinetuneMarkRight,
        "-" => Command::FinetuneMarkLeft,
        "t" => Command::StartTimer,
        "g" => Command::SeekTo(seconds()?),
        "w" => {
            let wait = Duration::try_from_secs_f64(seconds()?).map_err(|e| e.to_string())?;
            return Ok(PlayInput::Wait(wait));
        }
        "q" | "quit" => return Ok(PlayInput::Quit),
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(PlayInput::Send(command))
}

fn print_snapshot(snapshot: &ControllerSnapshot) {
    let theme = current_theme();
    println!(
        "{}",
        theme.accent_text(&build_timeline(
            TIMELINE_WIDTH,
            snapshot.current_time,
            snapshot.duration,
            &snapshot.marks,
            snapshot.loop_bounds,
        ))
    );
    println!("{}", theme.primary_text(&format_status(snapshot)));
}

#[cfg(not(tarpaulin_include))]
pub fn handle(data_dir: Option<PathBuf>, args: &PlayArgs) -> Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        bail!("--duration must be a positive number of seconds");
    }

    let config = Config::load()?;
    let store = open_store(data_dir, &config)?;
    let video = resolve_video(&args.video)?;
    let player = SimulatedPlayer::new(args.duration)
        .with_seek_latency(Duration::from_millis(args.seek_latency_ms));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async move {
        let (handle, task) = PlayerSession::spawn(player, store, video, &config);
        let theme = current_theme();
        print_snapshot(&handle.snapshot().await?);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match parse_play_input(&line) {
                Ok(PlayInput::Send(command)) => handle.send(command).await?,
                Ok(PlayInput::Wait(duration)) => tokio::time::sleep(duration).await,
                Ok(PlayInput::Status) => {}
                Ok(PlayInput::Quit) => break,
                Err(message) => {
                    eprintln!("{}", theme.error_text(&message));
                    continue;
                }
            }
            print_snapshot(&handle.snapshot().await?);
        }

        handle.close().await?;
        let last = task.await.context("Player session panicked")?;
        print_snapshot(&last);
        Ok::<(), anyhow::Error>(())
    })
}
