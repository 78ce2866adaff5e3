//! The booking request and its validation.
//!
//! A [`BookingRequest`] can only be obtained through
//! [`RawBookingRequest::validate`], so holding one means every invariant has
//! already been checked and no browser work is needed to reject bad input.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::ConfigError;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09[0-9]{8}$").expect("valid phone regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

const MIN_NAME_CHARS: usize = 2;

/// Number of diners, guaranteed to be within `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartySize(u8);

impl PartySize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when `value` is outside `1..=4`.
    pub fn new(value: i64) -> Result<Self, ConfigError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "party size {value} is out of range; must be between {} and {}",
                    Self::MIN,
                    Self::MAX
                ))
            })
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PartySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Taiwanese mobile number: `09` followed by eight digits.
#[derive(Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] unless `raw` is `09` followed by
    /// eight ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if PHONE_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ConfigError::Validation(format!(
                "phone '{raw}' must be 09 followed by 8 digits"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Phone with the middle digits hidden, for log lines.
    #[must_use]
    pub fn masked(&self) -> String {
        format!("{}****{}", &self.0[..4], &self.0[8..])
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PhoneNumber").field(&self.masked()).finish()
    }
}

/// Unvalidated request fields as read from configuration.
#[derive(Debug, Clone, Default)]
pub struct RawBookingRequest {
    pub target_url: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub party_size: i64,
    pub preferred_times: Vec<String>,
    pub target_date: Option<String>,
    pub headless: bool,
}

impl RawBookingRequest {
    /// Check every invariant and produce an immutable [`BookingRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on the first violated invariant.
    pub fn validate(self) -> Result<BookingRequest, ConfigError> {
        let target_url = validate_url(&self.target_url)?;

        let customer_name = self.customer_name.trim().to_string();
        if customer_name.chars().count() < MIN_NAME_CHARS {
            return Err(ConfigError::Validation(format!(
                "customer name must be at least {MIN_NAME_CHARS} characters"
            )));
        }

        let customer_phone = PhoneNumber::parse(self.customer_phone.trim())?;

        let customer_email = self
            .customer_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let party_size = PartySize::new(self.party_size)?;

        let preferred_times = validate_times(self.preferred_times)?;

        let target_date = self
            .target_date
            .as_deref()
            .map(parse_target_date)
            .transpose()?;

        Ok(BookingRequest {
            target_url,
            customer_name,
            customer_phone,
            customer_email,
            party_size,
            preferred_times,
            target_date,
            headless: self.headless,
        })
    }
}

fn validate_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::Validation(format!("booking url '{trimmed}' is invalid: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::Validation(format!(
            "booking url must use http or https, got '{other}'"
        ))),
    }
}

fn validate_times(times: Vec<String>) -> Result<Vec<String>, ConfigError> {
    if times.is_empty() {
        return Err(ConfigError::Validation(
            "at least one preferred time is required".to_string(),
        ));
    }
    times
        .into_iter()
        .map(|t| {
            let trimmed = t.trim().to_string();
            if trimmed.is_empty() {
                Err(ConfigError::Validation(
                    "preferred times must not contain blank entries".to_string(),
                ))
            } else {
                Ok(trimmed)
            }
        })
        .collect()
}

fn parse_target_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    let raw = raw.trim();
    if !DATE_RE.is_match(raw) {
        return Err(ConfigError::Validation(format!(
            "target date '{raw}' must be formatted YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ConfigError::Validation(format!("target date '{raw}' is not a real date: {e}")))
}

/// A validated, immutable booking request.
#[derive(Clone)]
pub struct BookingRequest {
    target_url: String,
    customer_name: String,
    customer_phone: PhoneNumber,
    customer_email: Option<String>,
    party_size: PartySize,
    preferred_times: Vec<String>,
    target_date: Option<NaiveDate>,
    headless: bool,
}

impl BookingRequest {
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    #[must_use]
    pub fn customer_phone(&self) -> &PhoneNumber {
        &self.customer_phone
    }

    #[must_use]
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }

    #[must_use]
    pub fn party_size(&self) -> PartySize {
        self.party_size
    }

    /// Preferred slots, highest priority first. Never empty.
    #[must_use]
    pub fn preferred_times(&self) -> &[String] {
        &self.preferred_times
    }

    #[must_use]
    pub fn target_date(&self) -> Option<NaiveDate> {
        self.target_date
    }

    /// The date to book: the configured date, or `today` when none was set.
    #[must_use]
    pub fn resolve_date(&self, today: NaiveDate) -> NaiveDate {
        self.target_date.unwrap_or(today)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    /// Same request with a different display mode.
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl fmt::Debug for BookingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingRequest")
            .field("target_url", &self.target_url)
            .field("customer_name", &self.customer_name)
            .field("customer_phone", &self.customer_phone)
            .field(
                "customer_email",
                &self.customer_email.as_ref().map(|_| "[redacted]"),
            )
            .field("party_size", &self.party_size)
            .field("preferred_times", &self.preferred_times)
            .field("target_date", &self.target_date)
            .field("headless", &self.headless)
            .finish()
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
