use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::locator::Locator;
use crate::options::SessionOptions;

/// One open page the workflow can drive.
///
/// Waiting methods are bounded by the timeout they receive; an element that
/// never shows up is reported as `Ok(false)` or [`BrowserError::Timeout`],
/// never as a hang.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Poll until `locator` is visible. `Ok(false)` when `timeout` elapses first.
    async fn wait_visible(&self, locator: &Locator, timeout: Duration)
        -> Result<bool, BrowserError>;

    /// Current visibility, without waiting.
    async fn is_visible(&self, locator: &Locator) -> Result<bool, BrowserError>;

    /// Wait for `locator` to become visible, then click it.
    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError>;

    /// Whether the `<select>` at `select` has an option with this value or label.
    async fn has_option(&self, select: &Locator, value: &str) -> Result<bool, BrowserError>;

    async fn select_option(&self, select: &Locator, value: &str) -> Result<(), BrowserError>;

    /// Wait for `locator`, clear it, and type `text` into it.
    async fn fill(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Text content of the element's parent, or `None` if the element is absent.
    async fn parent_text(&self, locator: &Locator) -> Result<Option<String>, BrowserError>;

    async fn screenshot(&self, path: &Path) -> Result<(), BrowserError>;

    /// Release the browser. Calling it again is a no-op.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// Opens sessions. The workflow owns whatever it launches.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self, options: &SessionOptions) -> Result<Self::Session, BrowserError>;
}
