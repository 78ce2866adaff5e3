//! Where the booking widget's controls live on the page.
//!
//! The defaults describe the inline.app booking widget. A YAML file can
//! override any subset of fields for a widget with different markup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSelectors {
    /// `<select>` holding the party size options.
    pub party_size: String,
    /// Control that opens the calendar.
    pub date_picker: String,
    /// Calendar popup that must be visible before a day can be chosen.
    pub calendar: String,
    /// Individual day cells inside the calendar.
    pub calendar_day: String,
    /// Text that marks a time slot as standby-only.
    pub waitlist_marker: String,
    /// Label of the control leading from slot selection to the contact form.
    pub form_transition_text: String,
    pub name_field: String,
    pub phone_field: String,
    pub email_field: String,
    pub confirm_role: String,
    pub confirm_label: String,
}

impl Default for WidgetSelectors {
    fn default() -> Self {
        Self {
            party_size: "#adult-picker".to_string(),
            date_picker: "#date-picker".to_string(),
            calendar: "#calendar-picker".to_string(),
            calendar_day: r#"[data-cy="bt-cal-day"]"#.to_string(),
            waitlist_marker: "登記候補".to_string(),
            form_transition_text: "完成預訂".to_string(),
            name_field: "#name".to_string(),
            phone_field: "#phone".to_string(),
            email_field: "#email".to_string(),
            confirm_role: "button".to_string(),
            confirm_label: "確認訂位".to_string(),
        }
    }
}

/// Load a selector profile from YAML, filling unspecified fields with the
/// inline.app defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or leaves a
/// selector blank.
pub fn load_selectors(path: &Path) -> Result<WidgetSelectors, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SelectorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_selectors(&content)
}

fn parse_selectors(content: &str) -> Result<WidgetSelectors, ConfigError> {
    let selectors: WidgetSelectors =
        serde_yaml::from_str(content).map_err(ConfigError::SelectorsFileParse)?;
    validate_selectors(&selectors)?;
    Ok(selectors)
}

fn validate_selectors(selectors: &WidgetSelectors) -> Result<(), ConfigError> {
    let fields = [
        ("party_size", &selectors.party_size),
        ("date_picker", &selectors.date_picker),
        ("calendar", &selectors.calendar),
        ("calendar_day", &selectors.calendar_day),
        ("waitlist_marker", &selectors.waitlist_marker),
        ("form_transition_text", &selectors.form_transition_text),
        ("name_field", &selectors.name_field),
        ("phone_field", &selectors.phone_field),
        ("email_field", &selectors.email_field),
        ("confirm_role", &selectors.confirm_role),
        ("confirm_label", &selectors.confirm_label),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{name}' must be non-empty"
            )));
        }
    }
    Ok(())
}
