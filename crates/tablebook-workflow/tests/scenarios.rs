//! End-to-end runs of `BookingWorkflow` against a scripted page.
//!
//! Every test runs on a paused tokio clock, so pacing pauses, the settle
//! delay and element timeouts complete instantly while still advancing
//! simulated time.

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use tablebook_browser::{Locator, ScriptedCall, ScriptedElement, ScriptedLauncher};
use tablebook_core::{ConfigError, PacingMode, WidgetSelectors};
use tablebook_workflow::{
    locators, BookingReceipt, BookingWorkflow, FailureKind, Pacing, RunResult, Step,
    WorkflowSettings,
};

use common::{
    open_slot, raw_request, request, target_date, waitlisted_slot, widget_page, workflow,
    BOOKING_URL,
};

fn selectors() -> WidgetSelectors {
    WidgetSelectors::default()
}

fn slot(time: &str) -> Locator {
    locators::time_slot(time)
}

fn expect_failure(result: &RunResult) -> &tablebook_workflow::RunFailure {
    result
        .failure()
        .unwrap_or_else(|| panic!("expected failure, got: {result:?}"))
}

fn fills(calls: &[ScriptedCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| match call {
            ScriptedCall::Fill { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn waitlisted_first_choice_falls_through_to_open_second_choice() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), waitlisted_slot("14:30"))
        .with_element(slot("16:00"), open_slot("16:00"));
    let (workflow, launcher) = workflow(request(), &session);

    let result = workflow.run().await;

    assert_eq!(
        result,
        RunResult::Success(BookingReceipt {
            time_slot: "16:00".to_owned(),
            date: target_date(),
        })
    );
    assert_eq!(
        session.calls(),
        vec![
            ScriptedCall::Navigate(BOOKING_URL.to_owned()),
            ScriptedCall::SelectOption {
                select: locators::party_size(&s),
                value: "2".to_owned(),
            },
            ScriptedCall::Click(locators::date_picker(&s)),
            ScriptedCall::Click(locators::calendar_day(&s, target_date())),
            ScriptedCall::Click(slot("16:00")),
            ScriptedCall::Click(locators::form_transition(&s)),
            ScriptedCall::Fill {
                field: locators::name_field(&s),
                text: "王小明".to_owned(),
            },
            ScriptedCall::Fill {
                field: locators::phone_field(&s),
                text: "0912345678".to_owned(),
            },
            ScriptedCall::Fill {
                field: locators::email_field(&s),
                text: "ming@example.com".to_owned(),
            },
            ScriptedCall::Click(locators::confirm(&s)),
            ScriptedCall::Close,
        ]
    );
    assert!(session.screenshots().is_empty());
    assert_eq!(session.close_count(), 1);

    let launches = launcher.launches();
    assert_eq!(launches.len(), 1);
    assert!(launches[0].headless);
}

#[tokio::test(start_paused = true)]
async fn first_open_slot_wins_and_later_slots_are_not_touched() {
    let mut raw = raw_request();
    raw.preferred_times = vec![
        "12:00".to_owned(),
        "14:30".to_owned(),
        "16:00".to_owned(),
        "18:00".to_owned(),
    ];
    let session = widget_page(target_date())
        .with_element(slot("12:00"), ScriptedElement::hidden())
        .with_element(slot("14:30"), waitlisted_slot("14:30"))
        .with_element(slot("16:00"), open_slot("16:00"))
        .with_element(slot("18:00"), open_slot("18:00"));
    let (workflow, _) = workflow(raw.validate().unwrap(), &session);

    let result = workflow.run().await;

    assert!(result.is_success(), "got: {result:?}");
    let slot_clicks: Vec<Locator> = session
        .clicks()
        .into_iter()
        .filter(|l| matches!(l, Locator::Text { .. }) && *l != locators::form_transition(&selectors()))
        .collect();
    assert_eq!(slot_clicks, vec![slot("16:00")]);
}

#[tokio::test(start_paused = true)]
async fn absent_email_is_filled_as_empty_string() {
    let mut raw = raw_request();
    raw.customer_email = None;
    let session = widget_page(target_date()).with_element(slot("14:30"), open_slot("14:30"));
    let (workflow, _) = workflow(raw.validate().unwrap(), &session);

    let result = workflow.run().await;

    assert!(result.is_success(), "got: {result:?}");
    assert_eq!(
        fills(&session.calls()),
        vec!["王小明".to_owned(), "0912345678".to_owned(), String::new()]
    );
}

#[tokio::test(start_paused = true)]
async fn missing_target_date_books_today() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let mut raw = raw_request();
    raw.target_date = None;
    let session = widget_page(today).with_element(slot("14:30"), open_slot("14:30"));
    let (workflow, _) = workflow(raw.validate().unwrap(), &session);

    let result = workflow.with_today(today).run().await;

    assert_eq!(
        result,
        RunResult::Success(BookingReceipt {
            time_slot: "14:30".to_owned(),
            date: today,
        })
    );
    assert!(session
        .clicks()
        .contains(&Locator::css_with_text(r#"[data-cy="bt-cal-day"]"#, "15")));
}

#[tokio::test(start_paused = true)]
async fn pacing_and_settle_advance_simulated_time() {
    let session = widget_page(target_date())
        .with_element(slot("14:30"), waitlisted_slot("14:30"))
        .with_element(slot("16:00"), open_slot("16:00"));
    let (workflow, _) = workflow(request(), &session);

    let start = tokio::time::Instant::now();
    let result = workflow.run().await;
    let elapsed = start.elapsed();

    assert!(result.is_success(), "got: {result:?}");
    // Midpoints of every pause plus the 3s settle delay come to 21.65s.
    assert!(
        elapsed > Duration::from_secs(21) && elapsed < Duration::from_secs(22),
        "got: {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn pacing_scale_shrinks_pauses_but_not_settle_delay() {
    let session = widget_page(target_date())
        .with_element(slot("14:30"), waitlisted_slot("14:30"))
        .with_element(slot("16:00"), open_slot("16:00"));
    let settings = WorkflowSettings {
        pacing: Pacing::new(PacingMode::Midpoint, 0.5),
        ..common::settings()
    };
    let workflow = BookingWorkflow::new(
        request(),
        selectors(),
        settings,
        ScriptedLauncher::new(session.clone()),
    )
    .with_today(common::today());

    let start = tokio::time::Instant::now();
    let result = workflow.run().await;
    let elapsed = start.elapsed();

    assert!(result.is_success(), "got: {result:?}");
    assert!(
        elapsed > Duration::from_secs(12) && elapsed < Duration::from_secs(13),
        "got: {elapsed:?}"
    );
}

// ---------------------------------------------------------------------------
// Validation gate
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn invalid_phone_is_rejected_before_any_browser_work() {
    let session = widget_page(target_date());
    let launcher = ScriptedLauncher::new(session.clone());

    let mut raw = raw_request();
    raw.customer_phone = "12345678".to_owned();
    let result = raw.validate();

    assert!(
        matches!(&result, Err(ConfigError::Validation(msg)) if msg.contains("phone")),
        "got: {result:?}"
    );
    assert!(launcher.launches().is_empty());
    assert!(session.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Step failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn missing_calendar_day_fails_select_date() {
    let session = widget_page(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
        .with_element(slot("14:30"), open_slot("14:30"));
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectDate);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(
        failure.cause.contains("no calendar day \"1\""),
        "got: {}",
        failure.cause
    );

    let shots = session.screenshots();
    assert_eq!(shots.len(), 1);
    assert_eq!(failure.screenshot.as_ref(), Some(&shots[0]));
    assert_eq!(shots[0].parent(), Some(common::screenshot_dir().as_path()));
    let name = shots[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(
        name.starts_with("error_") && name.ends_with(".png") && name.len() == "error_20250601_120000.png".len(),
        "got: {name}"
    );

    assert_eq!(session.close_count(), 1);
    assert!(!session.clicks().contains(&slot("14:30")));
    assert!(fills(&session.calls()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn all_slots_waitlisted_or_hidden_fails_select_time_slot() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), waitlisted_slot("14:30"))
        .with_element(slot("16:00"), ScriptedElement::hidden());
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectTimeSlot);
    assert_eq!(failure.kind, FailureKind::Step);
    assert_eq!(failure.cause, "no acceptable time slot among: 14:30, 16:00");
    assert_eq!(session.screenshots().len(), 1);
    assert_eq!(session.close_count(), 1);

    let clicks = session.clicks();
    assert!(!clicks.contains(&locators::form_transition(&s)));
    assert!(!clicks.contains(&locators::confirm(&s)));
    assert!(fills(&session.calls()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn unavailable_party_size_fails_select_party_size() {
    let s = selectors();
    let session = widget_page(target_date()).with_element(
        locators::party_size(&s),
        ScriptedElement::visible().with_options(["1"]),
    );
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectPartySize);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(failure.cause.contains("no option \"2\""), "got: {}", failure.cause);
    assert!(session.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn hidden_party_picker_times_out_as_step_failure() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(locators::party_size(&s), ScriptedElement::hidden());
    let (workflow, _) = workflow(request(), &session);

    let start = tokio::time::Instant::now();
    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectPartySize);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(
        failure.cause.contains("did not become visible within 5000ms"),
        "got: {}",
        failure.cause
    );
    assert!(start.elapsed() >= Duration::from_secs(5));
    assert_eq!(session.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_form_transition_fails_fill_booking_form() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), open_slot("14:30"))
        .with_element(locators::form_transition(&s), ScriptedElement::hidden());
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::FillBookingForm);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(failure.cause.contains("完成預訂"), "got: {}", failure.cause);
    assert!(!session.clicks().contains(&locators::confirm(&s)));
    assert_eq!(session.screenshots().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn hidden_calendar_fails_select_date() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), open_slot("14:30"))
        .with_element(locators::calendar(&s), ScriptedElement::hidden());
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectDate);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(
        failure
            .cause
            .contains("css=#calendar-picker did not become visible within 5000ms"),
        "got: {}",
        failure.cause
    );
    assert_eq!(session.screenshots().len(), 1);
    assert_eq!(session.close_count(), 1);

    let clicks = session.clicks();
    assert_eq!(clicks, vec![locators::date_picker(&s)]);
    assert!(fills(&session.calls()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_email_field_fails_fill_booking_form() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), open_slot("14:30"))
        .without_element(&locators::email_field(&s));
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::FillBookingForm);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(failure.cause.contains("css=#email"), "got: {}", failure.cause);
    assert_eq!(session.screenshots().len(), 1);
    assert_eq!(session.close_count(), 1);

    assert_eq!(fills(&session.calls()), ["王小明", "0912345678"]);
    assert!(session.clicks().contains(&locators::form_transition(&s)));
    assert!(!session.clicks().contains(&locators::confirm(&s)));
}

#[tokio::test(start_paused = true)]
async fn missing_confirm_button_fails_confirm_booking() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), open_slot("14:30"))
        .without_element(&locators::confirm(&s));
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::ConfirmBooking);
    assert_eq!(failure.kind, FailureKind::Step);
    assert!(failure.cause.contains("確認訂位"), "got: {}", failure.cause);
    assert_eq!(session.screenshots().len(), 1);
    assert_eq!(session.close_count(), 1);

    assert_eq!(fills(&session.calls()).len(), 3);
    assert!(!session.clicks().contains(&locators::confirm(&s)));
    assert!(matches!(session.calls().last(), Some(ScriptedCall::Close)));
}

#[tokio::test(start_paused = true)]
async fn screenshot_failure_keeps_original_cause() {
    let session = widget_page(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
        .with_screenshot_error("disk full");
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectDate);
    assert!(failure.screenshot.is_none());
    assert!(failure.cause.contains("no calendar day"), "got: {}", failure.cause);
    assert_eq!(session.close_count(), 1);
}

// ---------------------------------------------------------------------------
// Unexpected failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn launch_failure_reports_open_page_without_screenshot() {
    let launcher = ScriptedLauncher::failing("chrome not found");
    let workflow = BookingWorkflow::new(
        request(),
        selectors(),
        common::settings(),
        launcher.clone(),
    );

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::OpenPage);
    assert_eq!(failure.kind, FailureKind::Unexpected);
    assert!(failure.screenshot.is_none());
    assert!(failure.cause.contains("chrome not found"), "got: {}", failure.cause);
    assert_eq!(launcher.launches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn navigation_error_is_unexpected_and_still_closes() {
    let session = widget_page(target_date()).with_navigation_error("net::ERR_NAME_NOT_RESOLVED");
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::OpenPage);
    assert_eq!(failure.kind, FailureKind::Unexpected);
    assert_eq!(session.screenshots().len(), 1);
    assert_eq!(session.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn browser_crash_mid_step_is_unexpected() {
    let session = widget_page(target_date())
        .with_element(slot("14:30"), open_slot("14:30"))
        .with_click_crash(slot("14:30"));
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::SelectTimeSlot);
    assert_eq!(failure.kind, FailureKind::Unexpected);
    assert_eq!(session.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn panic_inside_step_is_caught_and_session_closed() {
    let s = selectors();
    let session = widget_page(target_date())
        .with_element(slot("14:30"), open_slot("14:30"))
        .with_click_panic(locators::confirm(&s));
    let (workflow, _) = workflow(request(), &session);

    let result = workflow.run().await;

    let failure = expect_failure(&result);
    assert_eq!(failure.step, Step::ConfirmBooking);
    assert_eq!(failure.kind, FailureKind::Unexpected);
    assert!(failure.cause.starts_with("step panicked:"), "got: {}", failure.cause);
    assert_eq!(session.screenshots().len(), 1);
    assert_eq!(session.close_count(), 1);
    assert!(session.is_closed());
}
