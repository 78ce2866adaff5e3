use std::fmt;

/// One stage of the booking run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    OpenPage,
    SelectPartySize,
    SelectDate,
    SelectTimeSlot,
    FillBookingForm,
    ConfirmBooking,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::OpenPage,
        Step::SelectPartySize,
        Step::SelectDate,
        Step::SelectTimeSlot,
        Step::FillBookingForm,
        Step::ConfirmBooking,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Step::OpenPage => "OpenPage",
            Step::SelectPartySize => "SelectPartySize",
            Step::SelectDate => "SelectDate",
            Step::SelectTimeSlot => "SelectTimeSlot",
            Step::FillBookingForm => "FillBookingForm",
            Step::ConfirmBooking => "ConfirmBooking",
        }
    }

    /// The step that follows this one, or `None` after confirmation.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        match self {
            Step::OpenPage => Some(Step::SelectPartySize),
            Step::SelectPartySize => Some(Step::SelectDate),
            Step::SelectDate => Some(Step::SelectTimeSlot),
            Step::SelectTimeSlot => Some(Step::FillBookingForm),
            Step::FillBookingForm => Some(Step::ConfirmBooking),
            Step::ConfirmBooking => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
