//! Blinker - a 20-20-20 screen-break reminder
//!
//! Every 20 minutes of screen time, Blinker asks you to look away for
//! 20 seconds, then tells you to get back to work. The cycle starts as soon
//! as the daemon does and can be paused from the host menu.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use blinker::cli::{Cli, Commands, Display};
use blinker::daemon::{host, Daemon};
use blinker::notification::{DesktopNotificationHost, NotificationGate};
use blinker::settings::{default_settings_path, SettingsStore};
use blinker::types::CycleConfig;

/// Application name shown by the notification service
const APP_NAME: &str = "Blinker";

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries menu acknowledgements.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run) => {
            let path = settings_path(cli.settings_file)?;
            run_daemon(path).await?;
        }
        Some(Commands::Settings) => {
            let path = settings_path(cli.settings_file)?;
            show_settings(path)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Resolves the preferences file from the flag or the platform config dir.
fn settings_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(default_settings_path)
        .context("Could not determine the configuration directory; pass --settings-file")
}

/// Loads (creating if needed) and prints the preferences.
fn show_settings(path: PathBuf) -> Result<()> {
    let mut store = SettingsStore::new(path);
    store.initialize()?;
    let values = store.snapshot()?;
    Display::show_settings(store.path(), &values);
    Ok(())
}

/// Runs the daemon against stdin/stdout until `quit` or Ctrl-C.
async fn run_daemon(path: PathBuf) -> Result<()> {
    let config = CycleConfig::default();
    config.validate().map_err(anyhow::Error::msg)?;

    let (ack_tx, ack_rx) = crossbeam_channel::unbounded();
    let writer =
        host::spawn_ack_writer(ack_rx).context("Failed to start the acknowledgement writer")?;

    let events = host::spawn_stdin_reader().context("Failed to start the menu event reader")?;

    let gate = NotificationGate::new(Arc::new(DesktopNotificationHost::new(APP_NAME)));
    let mut daemon = Daemon::new(config, SettingsStore::new(path), gate, ack_tx);
    daemon.startup();
    daemon.run(events).await?;

    // The daemon dropped the last acknowledgement sender, so the writer drains and exits.
    match writer.join() {
        Ok(written) => {
            let written = written.context("Failed to write menu acknowledgements")?;
            tracing::debug!(written, "Acknowledgement writer finished");
        }
        Err(_) => anyhow::bail!("Acknowledgement writer panicked"),
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
