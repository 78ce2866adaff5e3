//! The booking run: six forward-only steps against one browser session.

pub mod error;
pub mod locators;
pub mod outcome;
pub mod pacing;
pub mod settings;
pub mod slots;
pub mod step;
pub mod workflow;

pub use error::StepError;
pub use outcome::{BookingReceipt, FailureKind, RunFailure, RunResult};
pub use pacing::Pacing;
pub use settings::WorkflowSettings;
pub use slots::SlotAvailability;
pub use step::Step;
pub use workflow::{BookingWorkflow, WorkflowState};
