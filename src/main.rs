//! loopmark CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use loopmark::cli::{Cli, Commands, ConfigCommands, MarksCommands};

/// Log to stderr so command output on stdout stays clean. `RUST_LOG` overrides.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Marks(cmd) => match cmd {
            MarksCommands::List(video) => commands::marks::handle_list(data_dir, &video),
            MarksCommands::Add { video, seconds } => {
                commands::marks::handle_add(data_dir, &video, &seconds)
            }
            MarksCommands::Remove { video, seconds } => {
                commands::marks::handle_remove(data_dir, &video, &seconds)
            }
            MarksCommands::Clear(video) => commands::marks::handle_clear(data_dir, &video),
        },
        Commands::Library => commands::library::handle_list(data_dir),
        Commands::Purge(video) => commands::library::handle_purge(data_dir, &video),
        Commands::Play(args) => commands::play::handle(data_dir, &args),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Migrate { yes } => commands::config::handle_migrate(yes),
        },
        Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(())
        }
    }
}
