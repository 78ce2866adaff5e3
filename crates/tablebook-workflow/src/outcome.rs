use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::step::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The page did not allow the step: missing control, no day, no open slot.
    Step,
    /// The session broke, the browser would not launch, or a step panicked.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Step => f.write_str("step failure"),
            FailureKind::Unexpected => f.write_str("unexpected error"),
        }
    }
}

/// What was booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    pub time_slot: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub step: Step,
    pub kind: FailureKind,
    pub cause: String,
    /// Diagnostic screenshot, when one could be written.
    pub screenshot: Option<PathBuf>,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({}): {}", self.step, self.kind, self.cause)
    }
}

/// Outcome of one booking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Success(BookingReceipt),
    Failure(RunFailure),
}

impl RunResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success(_))
    }

    #[must_use]
    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            RunResult::Success(_) => None,
            RunResult::Failure(failure) => Some(failure),
        }
    }
}
