//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Long version string: version, git sha and build date.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("LOOPMARK_BUILD_DATE"),
    ")"
);

/// Loop segments of a video between marks you drop on its timeline.
#[derive(Debug, Parser)]
#[command(name = "loopmark", version, long_version = LONG_VERSION, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store per-video state here instead of the configured data directory
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect or edit the marks of a video
    #[command(subcommand)]
    Marks(MarksCommands),

    /// List every video with stored state
    Library,

    /// Forget everything stored for a video
    Purge(VideoArg),

    /// Run a headless playback session driven by stdin
    #[command(long_about = "Run a headless playback session driven by stdin.\n\n\
        Each line is one command:\n  \
        space  play / pause          m  toggle mark\n  \
        c      clear marks           l  toggle loop\n  \
        n / p  next / previous segment\n  \
        ] / [  jump to next / previous mark\n  \
        > / <  seek forward / backward\n  \
        s      cycle seek step       + / -  nudge mark right / left\n  \
        t      start session timer   g SECS  seek to time\n  \
        w SECS wait                  q  quit\n\n\
        An empty line prints the current status.")]
    Play(PlayArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// A video given by location, or by an identity already derived from one.
#[derive(Debug, Args)]
pub struct VideoArg {
    /// Path or URL of the video
    pub location: String,

    /// Treat LOCATION as a stored identity (as printed by `library`)
    #[arg(long)]
    pub id: bool,
}

#[derive(Debug, Subcommand)]
pub enum MarksCommands {
    /// Print the marks of a video
    List(VideoArg),

    /// Add marks at the given times (seconds)
    Add {
        #[command(flatten)]
        video: VideoArg,
        #[arg(required = true, value_name = "SECONDS", allow_negative_numbers = true)]
        seconds: Vec<f64>,
    },

    /// Remove the mark nearest each given time (seconds)
    Remove {
        #[command(flatten)]
        video: VideoArg,
        #[arg(required = true, value_name = "SECONDS")]
        seconds: Vec<f64>,
    },

    /// Remove every mark of a video
    Clear(VideoArg),
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub video: VideoArg,

    /// Length of the simulated video in seconds
    #[arg(long, value_name = "SECS")]
    pub duration: f64,

    /// Delay before the simulated player acknowledges a seek
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub seek_latency_ms: u64,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Add settings missing from the config file
    Migrate {
        /// Apply without asking
        #[arg(short, long)]
        yes: bool,
    },
}
