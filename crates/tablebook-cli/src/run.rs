//! The `run` command: one booking attempt with a real Chromium.

use std::path::PathBuf;
use std::process::ExitCode;

use tablebook_browser::ChromiumLauncher;
use tablebook_core::AppConfig;
use tablebook_workflow::{BookingWorkflow, RunResult};

/// Applies command-line flags on top of the environment configuration.
pub(crate) fn apply_overrides(
    mut config: AppConfig,
    headless: bool,
    screenshot_dir: Option<PathBuf>,
) -> AppConfig {
    if headless {
        config.request = config.request.with_headless(true);
    }
    if let Some(dir) = screenshot_dir {
        config.screenshot_dir = dir;
    }
    config
}

/// One-line outcome for the terminal.
pub(crate) fn summary_line(result: &RunResult) -> String {
    match result {
        RunResult::Success(receipt) => {
            format!("booked {} on {}", receipt.time_slot, receipt.date)
        }
        RunResult::Failure(failure) => match &failure.screenshot {
            Some(path) => format!("{failure} (screenshot: {})", path.display()),
            None => failure.to_string(),
        },
    }
}

/// # Errors
///
/// Returns an error if the async runtime cannot be started. Booking failures
/// are reported through the exit code, not as errors.
pub(crate) fn run_booking(config: AppConfig) -> anyhow::Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let workflow = BookingWorkflow::from_config(config, ChromiumLauncher::new());
    let result = runtime.block_on(workflow.run());

    let summary = summary_line(&result);
    if result.is_success() {
        tracing::info!(summary = %summary, "run finished");
        println!("{summary}");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(summary = %summary, "run finished");
        println!("{summary}");
        Ok(ExitCode::FAILURE)
    }
}
