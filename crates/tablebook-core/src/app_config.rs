use std::path::PathBuf;

use crate::request::BookingRequest;
use crate::selectors::WidgetSelectors;

/// How pacing pauses pick their duration within an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingMode {
    /// Always the midpoint of the interval.
    #[default]
    Midpoint,
    /// Uniformly sampled from the interval.
    Jitter,
}

impl std::fmt::Display for PacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacingMode::Midpoint => write!(f, "midpoint"),
            PacingMode::Jitter => write!(f, "jitter"),
        }
    }
}

/// Everything the process reads from its environment, validated once.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub request: BookingRequest,
    pub log_level: String,
    pub screenshot_dir: PathBuf,
    pub element_timeout_ms: u64,
    pub settle_secs: u64,
    pub pacing_mode: PacingMode,
    pub pacing_scale: f64,
    pub chrome_path: Option<PathBuf>,
    pub selectors: WidgetSelectors,
}
