//! Sequencer for the six booking steps.
//!
//! [`BookingWorkflow::run`] owns the browser session for the whole run. Steps
//! execute strictly in [`Step::next`] order; the first failure stops the run,
//! writes one diagnostic screenshot and is reported as [`RunResult::Failure`].
//! The session is closed on every path, including a panic inside a step.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use futures::FutureExt;
use tablebook_browser::{BrowserSession, Locator, SessionLauncher};
use tablebook_core::{AppConfig, BookingRequest, WidgetSelectors};

use crate::error::StepError;
use crate::locators;
use crate::outcome::{BookingReceipt, FailureKind, RunFailure, RunResult};
use crate::settings::WorkflowSettings;
use crate::slots::{self, SlotAvailability};
use crate::step::Step;

/// Where a run stands. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Running(Step),
    Succeeded,
    Failed(RunFailure),
}

/// Decisions made by earlier steps.
#[derive(Debug, Default)]
struct Progress {
    current: Option<Step>,
    date: Option<NaiveDate>,
    time_slot: Option<String>,
}

impl Progress {
    fn receipt(&self) -> Option<BookingReceipt> {
        Some(BookingReceipt {
            time_slot: self.time_slot.clone()?,
            date: self.date?,
        })
    }
}

pub struct BookingWorkflow<L> {
    request: BookingRequest,
    selectors: WidgetSelectors,
    settings: WorkflowSettings,
    launcher: L,
    today: NaiveDate,
}

impl<L: SessionLauncher> BookingWorkflow<L> {
    #[must_use]
    pub fn new(
        request: BookingRequest,
        selectors: WidgetSelectors,
        settings: WorkflowSettings,
        launcher: L,
    ) -> Self {
        Self {
            request,
            selectors,
            settings,
            launcher,
            today: Local::now().date_naive(),
        }
    }

    #[must_use]
    pub fn from_config(config: AppConfig, launcher: L) -> Self {
        let settings = WorkflowSettings::from_config(&config);
        Self::new(config.request, config.selectors, settings, launcher)
    }

    /// Overrides the local date used when the request has no target date.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs the booking once and reports how it ended.
    ///
    /// Never returns an error: launch failures, step failures, broken
    /// sessions and panics all become [`RunResult::Failure`].
    pub async fn run(self) -> RunResult {
        self.log_banner();

        let options = self.settings.session_options(self.request.headless());
        let session = match self.launcher.launch(&options).await {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(error = %err, "failed to launch browser");
                return RunResult::Failure(RunFailure {
                    step: Step::OpenPage,
                    kind: FailureKind::Unexpected,
                    cause: format!("failed to launch browser: {err}"),
                    screenshot: None,
                });
            }
        };

        let mut progress = Progress::default();
        let driven = AssertUnwindSafe(self.drive(&session, &mut progress))
            .catch_unwind()
            .await;
        let result = match driven {
            Ok(Ok(receipt)) => RunResult::Success(receipt),
            Ok(Err(failure)) => RunResult::Failure(failure),
            Err(payload) => {
                let step = progress.current.unwrap_or(Step::OpenPage);
                let cause = format!("step panicked: {}", panic_message(payload.as_ref()));
                RunResult::Failure(
                    self.fail(&session, step, FailureKind::Unexpected, cause)
                        .await,
                )
            }
        };

        if let Err(err) = session.close().await {
            tracing::warn!(error = %err, "failed to close browser session");
        }

        match &result {
            RunResult::Success(receipt) => tracing::info!(
                time_slot = %receipt.time_slot,
                date = %receipt.date,
                "booking confirmed"
            ),
            RunResult::Failure(failure) => tracing::error!(
                step = %failure.step,
                kind = %failure.kind,
                cause = %failure.cause,
                screenshot = ?failure.screenshot,
                "booking failed"
            ),
        }
        result
    }

    fn log_banner(&self) {
        let date = self.request.resolve_date(self.today);
        tracing::info!(
            target_url = %self.request.target_url(),
            party_size = %self.request.party_size(),
            preferred_times = %self.request.preferred_times().join(", "),
            date = %date,
            headless = self.request.headless(),
            "starting booking run"
        );
    }

    async fn drive<S: BrowserSession>(
        &self,
        session: &S,
        progress: &mut Progress,
    ) -> Result<BookingReceipt, RunFailure> {
        let mut state = WorkflowState::Running(Step::OpenPage);
        loop {
            match state {
                WorkflowState::Running(step) => {
                    progress.current = Some(step);
                    tracing::info!(step = %step, "step started");
                    state = match self.execute(step, session, progress).await {
                        Ok(()) => {
                            tracing::info!(step = %step, "step completed");
                            step.next()
                                .map_or(WorkflowState::Succeeded, WorkflowState::Running)
                        }
                        Err(err) => {
                            let kind = if err.is_unexpected() {
                                FailureKind::Unexpected
                            } else {
                                FailureKind::Step
                            };
                            WorkflowState::Failed(
                                self.fail(session, step, kind, err.to_string()).await,
                            )
                        }
                    };
                }
                WorkflowState::Succeeded => {
                    let Some(receipt) = progress.receipt() else {
                        return Err(self
                            .fail(
                                session,
                                Step::ConfirmBooking,
                                FailureKind::Unexpected,
                                "run finished without a selected date and time slot".to_owned(),
                            )
                            .await);
                    };
                    tokio::time::sleep(self.settings.settle_delay).await;
                    return Ok(receipt);
                }
                WorkflowState::Failed(failure) => return Err(failure),
            }
        }
    }

    async fn execute<S: BrowserSession>(
        &self,
        step: Step,
        session: &S,
        progress: &mut Progress,
    ) -> Result<(), StepError> {
        match step {
            Step::OpenPage => self.open_page(session).await,
            Step::SelectPartySize => self.select_party_size(session).await,
            Step::SelectDate => {
                let date = self.request.resolve_date(self.today);
                progress.date = Some(date);
                self.select_date(session, date).await
            }
            Step::SelectTimeSlot => {
                let slot = self.select_time_slot(session).await?;
                progress.time_slot = Some(slot);
                Ok(())
            }
            Step::FillBookingForm => self.fill_booking_form(session).await,
            Step::ConfirmBooking => self.confirm_booking(session).await,
        }
    }

    /// Screenshot and build the failure record. Called at most once per run.
    async fn fail<S: BrowserSession>(
        &self,
        session: &S,
        step: Step,
        kind: FailureKind,
        cause: String,
    ) -> RunFailure {
        tracing::error!(step = %step, kind = %kind, cause = %cause, "step failed");
        let path = self
            .settings
            .screenshot_dir
            .join(screenshot_name(Local::now().naive_local()));
        let screenshot = match session.screenshot(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "saved diagnostic screenshot");
                Some(path)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    path = %path.display(),
                    "failed to save diagnostic screenshot"
                );
                None
            }
        };
        RunFailure {
            step,
            kind,
            cause,
            screenshot,
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.settings.element_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    async fn pace(&self, min_secs: f64, max_secs: f64) {
        self.settings.pacing.pause(min_secs, max_secs).await;
    }

    async fn require_visible<S: BrowserSession>(
        &self,
        session: &S,
        locator: &Locator,
    ) -> Result<(), StepError> {
        if session
            .wait_visible(locator, self.settings.element_timeout)
            .await?
        {
            Ok(())
        } else {
            Err(StepError::NotVisible {
                target: locator.to_string(),
                timeout_ms: self.timeout_ms(),
            })
        }
    }

    async fn open_page<S: BrowserSession>(&self, session: &S) -> Result<(), StepError> {
        tracing::info!(url = %self.request.target_url(), "loading booking page");
        session.navigate(self.request.target_url()).await?;
        self.pace(1.0, 2.0).await;
        Ok(())
    }

    async fn select_party_size<S: BrowserSession>(&self, session: &S) -> Result<(), StepError> {
        let picker = locators::party_size(&self.selectors);
        self.require_visible(session, &picker).await?;

        let value = self.request.party_size().to_string();
        if !session.has_option(&picker, &value).await? {
            return Err(StepError::OptionMissing {
                target: picker.to_string(),
                value,
            });
        }
        session.select_option(&picker, &value).await?;
        tracing::info!(party_size = %value, "party size selected");
        self.pace(0.8, 1.5).await;
        Ok(())
    }

    async fn select_date<S: BrowserSession>(
        &self,
        session: &S,
        date: NaiveDate,
    ) -> Result<(), StepError> {
        if (date.year(), date.month()) != (self.today.year(), self.today.month()) {
            tracing::warn!(
                date = %date,
                today = %self.today,
                "target date is outside the current month; calendar days are matched by number only"
            );
        }

        let picker = locators::date_picker(&self.selectors);
        self.require_visible(session, &picker).await?;
        self.pace(0.3, 0.8).await;
        session.click(&picker, self.settings.element_timeout).await?;
        self.pace(0.5, 1.0).await;

        self.require_visible(session, &locators::calendar(&self.selectors))
            .await?;

        let day = locators::calendar_day(&self.selectors, date);
        if !session
            .wait_visible(&day, self.settings.element_timeout)
            .await?
        {
            return Err(StepError::DayNotFound {
                day: date.day(),
                date,
            });
        }
        self.pace(0.3, 0.7).await;
        session.click(&day, self.settings.element_timeout).await?;
        tracing::info!(date = %date, "date selected");
        self.pace(0.8, 1.5).await;
        Ok(())
    }

    /// Greedy first-fit over the preferred times.
    async fn select_time_slot<S: BrowserSession>(&self, session: &S) -> Result<String, StepError> {
        let times = self.request.preferred_times();
        tracing::info!(preferred_times = %times.join(", "), "looking for an open time slot");

        for time in times {
            let slot = locators::time_slot(time);
            let visible = session.is_visible(&slot).await?;
            let context = if visible {
                session.parent_text(&slot).await?
            } else {
                None
            };
            match slots::classify(visible, context.as_deref(), &self.selectors.waitlist_marker) {
                SlotAvailability::Open => {
                    self.pace(0.3, 0.8).await;
                    session.click(&slot, self.settings.element_timeout).await?;
                    tracing::info!(time_slot = %time, "time slot selected");
                    self.pace(1.0, 2.0).await;
                    return Ok(time.clone());
                }
                SlotAvailability::Waitlisted => {
                    tracing::warn!(time_slot = %time, "time slot is waitlist-only, skipping");
                    self.pace(0.3, 0.6).await;
                }
                SlotAvailability::Unavailable => {
                    tracing::debug!(time_slot = %time, "time slot not shown");
                }
            }
        }

        Err(StepError::NoAcceptableSlot {
            tried: times.to_vec(),
        })
    }

    async fn fill_booking_form<S: BrowserSession>(&self, session: &S) -> Result<(), StepError> {
        self.pace(0.5, 1.0).await;
        session
            .click(
                &locators::form_transition(&self.selectors),
                self.settings.element_timeout,
            )
            .await?;
        self.pace(1.5, 2.5).await;

        let fields = [
            (
                "name",
                locators::name_field(&self.selectors),
                self.request.customer_name(),
            ),
            (
                "phone",
                locators::phone_field(&self.selectors),
                self.request.customer_phone().as_str(),
            ),
            (
                "email",
                locators::email_field(&self.selectors),
                self.request.customer_email().unwrap_or(""),
            ),
        ];
        let last = fields.len() - 1;
        for (index, (field, locator, value)) in fields.iter().enumerate() {
            self.pace(0.3, 0.7).await;
            session
                .fill(locator, value, self.settings.element_timeout)
                .await?;
            tracing::info!(field = *field, "form field filled");
            if index == last {
                self.pace(0.8, 1.5).await;
            } else {
                self.pace(0.5, 1.0).await;
            }
        }
        Ok(())
    }

    async fn confirm_booking<S: BrowserSession>(&self, session: &S) -> Result<(), StepError> {
        self.pace(0.8, 1.5).await;
        session
            .click(
                &locators::confirm(&self.selectors),
                self.settings.element_timeout,
            )
            .await?;
        self.pace(2.0, 3.0).await;
        Ok(())
    }
}

/// `error_<YYYYmmdd_HHMMSS>.png`
fn screenshot_name(now: NaiveDateTime) -> String {
    format!("error_{}.png", now.format("%Y%m%d_%H%M%S"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
