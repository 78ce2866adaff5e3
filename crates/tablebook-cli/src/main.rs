use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod check;
mod run;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "tablebook")]
#[command(about = "Books a table through an inline.app reservation widget")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the booking (default when no command is given)
    Run {
        /// Run the browser without a window, overriding HEADLESS
        #[arg(long)]
        headless: bool,
        /// Directory for failure screenshots, overriding TABLEBOOK_SCREENSHOT_DIR
        #[arg(long)]
        screenshot_dir: Option<PathBuf>,
    },
    /// Validate configuration and print the booking request without opening a browser
    Check,
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = tablebook_core::load_app_config();
    let log_level = config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str());
    if let Err(err) = init_tracing(log_level) {
        eprintln!("invalid log filter '{log_level}': {err}");
        return ExitCode::FAILURE;
    }

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration; no browser was opened");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command {
        Some(Commands::Check) => {
            check::print_request(&config);
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Run {
            headless,
            screenshot_dir,
        }) => run::run_booking(run::apply_overrides(config, headless, screenshot_dir)),
        None => run::run_booking(config),
    };

    outcome.unwrap_or_else(|err| {
        tracing::error!(error = %err, "tablebook failed");
        ExitCode::FAILURE
    })
}
