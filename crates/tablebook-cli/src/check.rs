//! The `check` command: show what a run would do.

use tablebook_core::{AppConfig, WidgetSelectors};

pub(crate) fn describe_request(config: &AppConfig) -> String {
    let request = &config.request;
    let selectors = if config.selectors == WidgetSelectors::default() {
        "inline.app defaults"
    } else {
        "custom profile"
    };
    let rows = [
        ("booking url", request.target_url().to_owned()),
        ("name", request.customer_name().to_owned()),
        ("phone", request.customer_phone().masked()),
        (
            "email",
            request.customer_email().unwrap_or("(none)").to_owned(),
        ),
        ("party size", request.party_size().to_string()),
        ("preferred times", request.preferred_times().join(", ")),
        (
            "date",
            request
                .target_date()
                .map_or_else(|| "today".to_owned(), |d| d.to_string()),
        ),
        ("headless", request.headless().to_string()),
        (
            "pacing",
            format!("{} x{}", config.pacing_mode, config.pacing_scale),
        ),
        ("element timeout", format!("{}ms", config.element_timeout_ms)),
        ("screenshot dir", config.screenshot_dir.display().to_string()),
        ("selectors", selectors.to_owned()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{:<16} {value}", format!("{label}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn print_request(config: &AppConfig) {
    tracing::info!("configuration is valid");
    println!("{}", describe_request(config));
}
