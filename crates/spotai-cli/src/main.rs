use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod commands;
mod display;
mod input;
mod logging;

use app::AppContext;
use commands::play::PlayOptions;
use spotai_infrastructure::ConfigService;

#[derive(Parser, Debug)]
#[command(name = "spotai")]
#[command(about = "SPOTAI - Spot the AI-generated video", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Play a game (default)
    Play {
        /// Seed for the round order
        #[arg(long)]
        seed: Option<u64>,
        /// Keep the deck in its canonical order
        #[arg(long)]
        no_shuffle: bool,
        /// Countdown budget in seconds
        #[arg(long)]
        seconds: Option<u32>,
    },
    /// Show global per-round statistics
    Stats,
    /// List the round deck
    Deck,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose)?;

    let config_service = match cli.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::new_default()?,
    };

    let command = cli.command.unwrap_or(Commands::Play {
        seed: None,
        no_shuffle: false,
        seconds: None,
    });
    if let Commands::Init { force } = command {
        return commands::init::run(&config_service, force).await;
    }

    let ctx = AppContext::bootstrap(&config_service).await?;
    match command {
        Commands::Play {
            seed,
            no_shuffle,
            seconds,
        } => {
            commands::play::run(
                ctx,
                PlayOptions {
                    seed,
                    no_shuffle,
                    seconds,
                },
            )
            .await?
        }
        Commands::Stats => commands::stats::run(ctx).await?,
        Commands::Deck => commands::deck::run(&ctx)?,
        Commands::Init { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["spotai"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_play_flags() {
        let cli = Cli::try_parse_from([
            "spotai",
            "play",
            "--seed",
            "7",
            "--no-shuffle",
            "--seconds",
            "60",
            "--config",
            "/tmp/spotai.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Play {
                seed: Some(7),
                no_shuffle: true,
                seconds: Some(60),
            })
        );
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/spotai.toml")));
    }

    #[test]
    fn test_init_subcommand() {
        let cli = Cli::try_parse_from(["spotai", "init", "--force"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Init { force: true }));
    }

    #[test]
    fn test_stats_subcommand() {
        let cli = Cli::try_parse_from(["spotai", "-v", "stats"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Stats));
        assert!(cli.verbose);
    }
}
