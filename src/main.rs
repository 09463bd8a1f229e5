//! Trim Studio - cut a time range out of an MP3 from the terminal.
//!
//! The `trim` binary offers two ways to work:
//!
//! 1. **Scripted**: `trim trim song.mp3 --start 0:15 --end 1:00.5` re-encodes the
//!    selected range with ffmpeg into a new MP3 named after the source and the
//!    range.
//!
//! 2. **Interactive**: `trim session` walks through picking a file, adjusting
//!    the range, choosing where the result goes, and then plays it back in a
//!    small terminal player (optional `player` feature) that recovers from
//!    audio engine faults.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;

mod cli;
mod logging;

#[cfg(feature = "player")]
mod player;

#[derive(Parser)]
#[command(name = "trim")]
#[command(about = "Trim MP3 files to a time range and listen to the result")]
#[command(version)]
struct Cli {
    /// Also print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and check for ffmpeg
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the duration of an audio file
    Probe {
        file: String,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract a time range of an MP3 into a new file
    Trim {
        file: String,
        /// Range start, e.g. 15, 0:15 or 1:02:03.5 (defaults to the beginning)
        #[arg(short, long)]
        start: Option<String>,
        /// Range end (defaults to the end of the file)
        #[arg(short, long)]
        end: Option<String>,
        /// Folder for the trimmed file (defaults to the configured output_dir)
        #[arg(short, long)]
        out_dir: Option<String>,
        /// Open the result in the player when done
        #[arg(short, long)]
        play: bool,
    },
    /// Interactively pick, trim and play an MP3
    Session {
        /// Folder to pick files from
        #[arg(default_value = ".")]
        dir: String,
    },
    /// Play an MP3 in the terminal player
    Play { file: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "ffmpeg_path",
            "ffprobe_path",
            "output_dir",
            "max_load_retries",
            "load_retry_delay_ms",
            "recreate_engine_on_retry",
            "repair_delay_ms",
            "reload_on_stale_resume",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

impl Commands {
    /// Whether the command draws a full-screen UI at some point.
    fn takes_over_terminal(&self) -> bool {
        match self {
            Commands::Play { .. } | Commands::Session { .. } => true,
            Commands::Trim { play, .. } => *play,
            _ => false,
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, !cli.command.takes_over_terminal())?;
    log::debug!("Logging to {}", logging::log_file_path().display());

    match cli.command {
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Probe { file, json } => {
            cli::probe::handle_probe(&file, json)?;
        }
        Commands::Trim {
            file,
            start,
            end,
            out_dir,
            play,
        } => {
            cli::trim::handle_trim(cli::trim::TrimArgs {
                file: &file,
                start: start.as_deref(),
                end: end.as_deref(),
                out_dir: out_dir.as_deref(),
                play,
            })?;
        }
        Commands::Session { dir } => {
            cli::session::handle_session(&dir)?;
        }
        Commands::Play { file } => {
            cli::play::handle_play(&file)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trim_arguments() {
        let cli = Cli::parse_from([
            "trim", "trim", "song.mp3", "--start", "0:15", "--end", "1:00.5", "--play",
        ]);
        assert!(cli.command.takes_over_terminal());
        match cli.command {
            Commands::Trim {
                file, start, end, ..
            } => {
                assert_eq!(file, "song.mp3");
                assert_eq!(start.as_deref(), Some("0:15"));
                assert_eq!(end.as_deref(), Some("1:00.5"));
            }
            _ => panic!("expected trim"),
        }
    }

    #[test]
    fn test_config_set_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["trim", "config", "set", "root_dir", "x"]).is_err());
        assert!(Cli::try_parse_from(["trim", "config", "set", "output_dir", "~/x"]).is_ok());
    }

    #[test]
    fn test_probe_does_not_take_over_terminal() {
        let cli = Cli::parse_from(["trim", "probe", "song.mp3", "--json"]);
        assert!(!cli.command.takes_over_terminal());
    }
}
