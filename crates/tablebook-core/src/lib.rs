pub mod app_config;
pub mod config;
pub mod error;
pub mod request;
pub mod selectors;

pub use app_config::{AppConfig, PacingMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use request::{BookingRequest, PartySize, PhoneNumber, RawBookingRequest};
pub use selectors::{load_selectors, WidgetSelectors};
