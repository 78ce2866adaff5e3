//! Time-slot acceptance.
//!
//! Preferred times are tried in priority order and the first open one wins.
//! A slot is open when its button is visible and the surrounding element does
//! not carry the waitlist marker.

/// How a single preferred time looks on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAvailability {
    Open,
    Waitlisted,
    /// Not rendered, hidden, or its context could not be read.
    Unavailable,
}

#[must_use]
pub fn classify(visible: bool, context: Option<&str>, waitlist_marker: &str) -> SlotAvailability {
    match (visible, context) {
        (false, _) | (true, None) => SlotAvailability::Unavailable,
        (true, Some(text)) if text.contains(waitlist_marker) => SlotAvailability::Waitlisted,
        (true, Some(_)) => SlotAvailability::Open,
    }
}
