//! Maps a [`WidgetSelectors`] profile onto page [`Locator`]s.

use chrono::{Datelike, NaiveDate};
use tablebook_browser::Locator;
use tablebook_core::WidgetSelectors;

#[must_use]
pub fn party_size(selectors: &WidgetSelectors) -> Locator {
    Locator::css(&selectors.party_size)
}

#[must_use]
pub fn date_picker(selectors: &WidgetSelectors) -> Locator {
    Locator::css(&selectors.date_picker)
}

#[must_use]
pub fn calendar(selectors: &WidgetSelectors) -> Locator {
    Locator::css(&selectors.calendar)
}

/// Day cell whose text is exactly the day of month, so "1" never matches "11".
#[must_use]
pub fn calendar_day(selectors: &WidgetSelectors, date: NaiveDate) -> Locator {
    Locator::css_with_text(&selectors.calendar_day, date.day().to_string())
}

#[must_use]
pub fn time_slot(time: &str) -> Locator {
    Locator::text(time)
}

#[must_use]
pub fn form_transition(selectors: &WidgetSelectors) -> Locator {
    Locator::text(&selectors.form_transition_text)
}

#[must_use]
pub fn name_field(selectors: &WidgetSelectors) -> Locator {
    Locator::css(&selectors.name_field)
}

#[must_use]
pub fn phone_field(selectors: &WidgetSelectors) -> Locator {
    Locator::css(&selectors.phone_field)
}

#[must_use]
pub fn email_field(selectors: &WidgetSelectors) -> Locator {
    Locator::css(&selectors.email_field)
}

#[must_use]
pub fn confirm(selectors: &WidgetSelectors) -> Locator {
    Locator::role(&selectors.confirm_role, &selectors.confirm_label)
}
