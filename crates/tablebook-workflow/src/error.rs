use chrono::NaiveDate;
use tablebook_browser::BrowserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepError {
    #[error("{target} did not become visible within {timeout_ms}ms")]
    NotVisible { target: String, timeout_ms: u64 },

    #[error("{target} has no option \"{value}\"")]
    OptionMissing { target: String, value: String },

    #[error("no calendar day \"{day}\" found for {date}")]
    DayNotFound { day: u32, date: NaiveDate },

    #[error("no acceptable time slot among: {}", tried.join(", "))]
    NoAcceptableSlot { tried: Vec<String> },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl StepError {
    /// Returns `true` when the failure points at a broken session rather than
    /// at the page refusing the booking.
    #[must_use]
    pub fn is_unexpected(&self) -> bool {
        matches!(self, StepError::Browser(err) if !err.is_step_local())
    }
}
