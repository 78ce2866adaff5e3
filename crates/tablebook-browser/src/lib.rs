//! Browser capability used by the booking workflow.
//!
//! The workflow only talks to [`BrowserSession`]; [`chromium`] drives a real
//! Chromium over the DevTools protocol. With the `scripted` feature, `scripted`
//! provides an in-memory page for exercising the workflow without a browser.

pub mod chromium;
pub mod error;
pub mod locator;
pub mod options;
#[cfg(any(test, feature = "scripted"))]
pub mod scripted;
pub mod session;

pub use chromium::{ChromiumLauncher, ChromiumSession};
pub use error::BrowserError;
pub use locator::Locator;
pub use options::{Permission, SessionOptions, ViewportSize};
#[cfg(any(test, feature = "scripted"))]
pub use scripted::{ScriptedCall, ScriptedElement, ScriptedLauncher, ScriptedSession};
pub use session::{BrowserSession, SessionLauncher};
