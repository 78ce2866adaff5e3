use std::path::PathBuf;
use std::time::Duration;

use tablebook_browser::SessionOptions;
use tablebook_core::AppConfig;

use crate::pacing::Pacing;

/// Run-wide knobs that do not belong to the booking request itself.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Upper bound for every element wait.
    pub element_timeout: Duration,
    /// Pause after confirmation before the session is closed.
    pub settle_delay: Duration,
    /// Directory for `error_<timestamp>.png` screenshots.
    pub screenshot_dir: PathBuf,
    pub pacing: Pacing,
    pub chrome_path: Option<PathBuf>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_millis(5000),
            settle_delay: Duration::from_secs(3),
            screenshot_dir: PathBuf::from("."),
            pacing: Pacing::default(),
            chrome_path: None,
        }
    }
}

impl WorkflowSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            element_timeout: Duration::from_millis(config.element_timeout_ms),
            settle_delay: Duration::from_secs(config.settle_secs),
            screenshot_dir: config.screenshot_dir.clone(),
            pacing: Pacing::new(config.pacing_mode, config.pacing_scale),
            chrome_path: config.chrome_path.clone(),
        }
    }

    /// Browser options for a run; everything but display mode and binary is fixed.
    #[must_use]
    pub fn session_options(&self, headless: bool) -> SessionOptions {
        SessionOptions::default()
            .with_headless(headless)
            .with_executable(self.chrome_path.clone())
    }
}
