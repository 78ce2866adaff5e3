#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use tablebook_browser::{ScriptedElement, ScriptedLauncher, ScriptedSession};
use tablebook_core::{BookingRequest, RawBookingRequest, WidgetSelectors};
use tablebook_workflow::{locators, BookingWorkflow, WorkflowSettings};

pub const BOOKING_URL: &str = "https://inline.app/booking/demo-group/demo-store";

pub fn raw_request() -> RawBookingRequest {
    RawBookingRequest {
        target_url: BOOKING_URL.to_owned(),
        customer_name: "王小明".to_owned(),
        customer_phone: "0912345678".to_owned(),
        customer_email: Some("ming@example.com".to_owned()),
        party_size: 2,
        preferred_times: vec!["14:30".to_owned(), "16:00".to_owned()],
        target_date: Some("2025-06-01".to_owned()),
        headless: true,
    }
}

pub fn request() -> BookingRequest {
    raw_request().validate().expect("fixture request must be valid")
}

pub fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 28).unwrap()
}

pub fn screenshot_dir() -> PathBuf {
    PathBuf::from("diagnostics")
}

/// The inline.app widget with every control present but no time slots.
pub fn widget_page(date: NaiveDate) -> ScriptedSession {
    let s = WidgetSelectors::default();
    ScriptedSession::new()
        .with_element(
            locators::party_size(&s),
            ScriptedElement::visible().with_options(["1", "2", "3", "4"]),
        )
        .with_element(locators::date_picker(&s), ScriptedElement::visible())
        .with_element(locators::calendar(&s), ScriptedElement::visible())
        .with_element(locators::calendar_day(&s, date), ScriptedElement::visible())
        .with_element(locators::form_transition(&s), ScriptedElement::visible())
        .with_element(locators::name_field(&s), ScriptedElement::visible())
        .with_element(locators::phone_field(&s), ScriptedElement::visible())
        .with_element(locators::email_field(&s), ScriptedElement::visible())
        .with_element(locators::confirm(&s), ScriptedElement::visible())
}

pub fn open_slot(time: &str) -> ScriptedElement {
    ScriptedElement::visible().with_parent_text(format!("{time} 可訂位"))
}

pub fn waitlisted_slot(time: &str) -> ScriptedElement {
    ScriptedElement::visible().with_parent_text(format!("{time} 登記候補"))
}

pub fn settings() -> WorkflowSettings {
    WorkflowSettings {
        screenshot_dir: screenshot_dir(),
        ..WorkflowSettings::default()
    }
}

pub fn workflow(
    request: BookingRequest,
    session: &ScriptedSession,
) -> (BookingWorkflow<ScriptedLauncher>, ScriptedLauncher) {
    let launcher = ScriptedLauncher::new(session.clone());
    let workflow = BookingWorkflow::new(
        request,
        WidgetSelectors::default(),
        settings(),
        launcher.clone(),
    )
    .with_today(today());
    (workflow, launcher)
}
