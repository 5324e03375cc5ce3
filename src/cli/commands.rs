//! Command definitions for the Blinker CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// Blinker - a 20-20-20 screen-break reminder
#[derive(Parser, Debug)]
#[command(
    name = "blinker",
    version,
    about = "Reminds you to look away from the screen",
    long_about = "Every 20 minutes Blinker asks you to take a 20 second break from the screen,\n\
                  then tells you when to get back to work. Menu clicks are read as JSON lines\n\
                  on stdin and acknowledged as JSON lines on stdout.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this preferences file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub settings_file: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the work/break cycle, driven by menu events on stdin
    Run,

    /// Show the persisted preferences
    Settings,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["blinker"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.settings_file.is_none());
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["blinker", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_run_command() {
            let cli = Cli::parse_from(["blinker", "run"]);
            assert!(matches!(cli.command, Some(Commands::Run)));
        }

        #[test]
        fn test_parse_settings_file_after_subcommand() {
            let cli = Cli::parse_from(["blinker", "settings", "--settings-file", "/tmp/b.json"]);
            assert!(matches!(cli.command, Some(Commands::Settings)));
            assert_eq!(cli.settings_file, Some(PathBuf::from("/tmp/b.json")));
        }

        #[test]
        fn test_parse_verbose_before_subcommand() {
            let cli = Cli::parse_from(["blinker", "--verbose", "run"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Some(Commands::Run)));
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["blinker", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_rejects_unknown_shell() {
            assert!(Cli::try_parse_from(["blinker", "completions", "tcsh"]).is_err());
        }

        #[test]
        fn test_rejects_unknown_command() {
            assert!(Cli::try_parse_from(["blinker", "start"]).is_err());
        }
    }
}
