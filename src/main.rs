//! hourglass - a task timer for the terminal
//!
//! Give each task a target time and let an alarm tell you when it is up,
//! or track how long a task really takes:
//! - `set` and `start` run a fixed timer, then ring until Ctrl-C
//! - `track` measures a session until Ctrl-C and keeps a running average

use anyhow::Result;
use clap::{CommandFactory, Parser};

use hourglass::cli::{Cli, Commands, Display};
use hourglass::{HourglassError, Interrupts, RodioSoundPlayer, RunOptions, TaskOperations};

/// Exit status when an interrupt arrives with nothing to cancel.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    let interrupts = Interrupts::new();

    // Execute command, racing it against an unclaimed Ctrl-C
    tokio::select! {
        result = execute(cli, interrupts.clone()) => {
            if let Err(e) = result {
                Display::show_error(&e.to_string());
                std::process::exit(1);
            }
        }
        _ = interrupts.listen() => {
            tracing::debug!("interrupted with nothing to cancel");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
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
async fn execute(cli: Cli, interrupts: Interrupts) -> Result<()> {
    let config = cli.config();
    tracing::debug!(task_file = %config.task_file.display(), "configuration resolved");

    let ops = TaskOperations::from_config(&config, interrupts);

    match cli.command {
        Some(Commands::Init) => {
            let path = ops.create_task_file().await?;
            Display::show_task_file_created(&path);
        }
        Some(Commands::Set { task, time }) => {
            let record = ops.set_task(&task, &time).await?;
            Display::show_task_set(&task, &record);
        }
        Some(Commands::Remove { task }) => {
            ops.remove_task(&task).await?;
            Display::show_task_removed(&task);
        }
        Some(Commands::View { tasks }) => {
            let selected = ops.view_tasks(tasks.as_slice()).await?;
            Display::show_tasks(&selected);
        }
        Some(Commands::Track { task }) => {
            let report = ops.run_tracked_session(&task).await?;
            Display::show_tracked(&task, &report);
        }
        Some(Commands::Start { task, silent }) => {
            // Report an unknown task before opening the audio device
            ops.target_of(&task).await?;
            let player = RodioSoundPlayer::new().map_err(HourglassError::Playback)?;
            let report = ops
                .run_fixed_timer(&task, RunOptions { silent }, &player)
                .await?;
            Display::show_alarm_stopped(report.alarm_elapsed);
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
