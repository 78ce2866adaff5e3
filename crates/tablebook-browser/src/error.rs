use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("DevTools protocol error: {0}")]
    Protocol(String),

    #[error("page script failed: {0}")]
    Script(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("timed out after {timeout_ms}ms waiting for {target}")]
    Timeout { target: String, timeout_ms: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser session is closed")]
    Closed,
}

impl BrowserError {
    /// Returns `true` when the error describes page state a step can
    /// reasonably run into (missing or slow element) rather than a broken
    /// browser.
    ///
    /// Step-local:
    /// - [`BrowserError::ElementNotFound`]
    /// - [`BrowserError::Timeout`]
    ///
    /// Everything else (launch, protocol, script, I/O, closed session) means
    /// the session itself is unhealthy.
    #[must_use]
    pub fn is_step_local(&self) -> bool {
        matches!(
            self,
            BrowserError::ElementNotFound(_) | BrowserError::Timeout { .. }
        )
    }
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Protocol(err.to_string())
    }
}
