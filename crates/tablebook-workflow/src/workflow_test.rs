use super::*;

#[test]
fn screenshot_name_uses_local_timestamp() {
    let now = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(9, 5, 7)
        .unwrap();
    assert_eq!(screenshot_name(now), "error_20250601_090507.png");
}

#[test]
fn panic_message_reads_str_and_string_payloads() {
    let payload: Box<dyn Any + Send> = Box::new("boom");
    assert_eq!(panic_message(payload.as_ref()), "boom");

    let payload: Box<dyn Any + Send> = Box::new(String::from("clicked into the void"));
    assert_eq!(panic_message(payload.as_ref()), "clicked into the void");

    let payload: Box<dyn Any + Send> = Box::new(42_u32);
    assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
}

#[test]
fn receipt_needs_date_and_slot() {
    let mut progress = Progress::default();
    assert!(progress.receipt().is_none());

    progress.date = NaiveDate::from_ymd_opt(2025, 6, 1);
    assert!(progress.receipt().is_none());

    progress.time_slot = Some("16:00".to_owned());
    let receipt = progress.receipt().expect("receipt");
    assert_eq!(receipt.time_slot, "16:00");
    assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
}
