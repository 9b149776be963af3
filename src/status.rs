//! Plain-text rendering of controller state for the CLI.
//!
//! Produces a one-line timeline with the playhead, marks and the looped
//! segment, followed by a status line.

use crate::playback::ControllerSnapshot;

const PLAYHEAD: char = '⏺';
const MARK: char = '◆';
const TRACK: char = '─';
const LOOPED: char = '═';

/// Format seconds as `MM:SS.t` (tenths). Negative or garbage input shows as 0.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let tenths = (seconds * 10.0).floor() as u64;
    let mins = tenths / 600;
    let secs = (tenths / 10) % 60;
    format!("{:02}:{:02}.{}", mins, secs, tenths % 10)
}

fn column(time: f64, duration: f64, width: usize) -> usize {
    if duration > 0.0 && width > 0 {
        (((time / duration).clamp(0.0, 1.0) * width as f64) as usize).min(width - 1)
    } else {
        0
    }
}

/// Build the timeline characters.
///
/// The looped segment (if any) is drawn with a double line, marks with a
/// diamond, and the playhead on top of everything.
pub fn build_timeline(
    width: usize,
    current_time: f64,
    duration: f64,
    marks: &[f64],
    loop_bounds: Option<(f64, f64)>,
) -> String {
    if width == 0 {
        return String::new();
    }
    let mut bar = vec![TRACK; width];

    if let Some((start, end)) = loop_bounds {
        let from = column(start, duration, width);
        let to = column(end, duration, width);
        for c in bar.iter_mut().take(to + 1).skip(from) {
            *c = LOOPED;
        }
    }
    for &mark in marks {
        bar[column(mark, duration, width)] = MARK;
    }
    bar[column(current_time, duration, width)] = PLAYHEAD;

    bar.into_iter().collect()
}

/// One-line summary of the controller state.
pub fn format_status(snapshot: &ControllerSnapshot) -> String {
    let mut parts = Vec::new();

    let transport = if snapshot.is_seek_in_progress {
        "seeking"
    } else if snapshot.is_playing {
        "playing"
    } else {
        "paused"
    };
    parts.push(format!(
        "{} {}/{}",
        transport,
        format_time(snapshot.current_time),
        format_time(snapshot.duration)
    ));

    parts.push(format!(
        "marks {} segment {}/{}",
        snapshot.marks.len(),
        if snapshot.segment_count > 0 {
            snapshot.segment_index + 1
        } else {
            0
        },
        snapshot.segment_count
    ));

    if let Some((start, end)) = snapshot.loop_bounds {
        parts.push(format!(
            "loop {}-{} next in {:.0}s",
            format_time(start),
            format_time(end),
            snapshot.loop_time_remaining.max(0.0)
        ));
    }

    parts.push(format!("step {}s", snapshot.seek_step));

    if snapshot.session_timer_running {
        parts.push(format!("timer {}", format_time(snapshot.session_elapsed)));
    }

    parts.join("  ")
}
