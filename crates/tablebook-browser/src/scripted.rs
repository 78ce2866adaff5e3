//! In-memory [`BrowserSession`] for driving the workflow without Chromium.
//!
//! A [`ScriptedSession`] is a static page: a map from [`Locator`] to
//! [`ScriptedElement`]. Locators that are not in the map behave like absent
//! elements. Every interaction is appended to a call log that tests inspect
//! afterwards. Clones share the same page and log.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::locator::Locator;
use crate::options::SessionOptions;
use crate::session::{BrowserSession, SessionLauncher};

/// One recorded interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Navigate(String),
    Click(Locator),
    SelectOption { select: Locator, value: String },
    Fill { field: Locator, text: String },
    Screenshot(PathBuf),
    Close,
}

/// What the page knows about one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedElement {
    pub visible: bool,
    /// Text of the enclosing element; empty when `None`.
    pub parent_text: Option<String>,
    /// `<option>` values, for select elements.
    pub options: Vec<String>,
}

impl ScriptedElement {
    #[must_use]
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parent_text(mut self, text: impl Into<String>) -> Self {
        self.parent_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Default)]
struct PageState {
    elements: HashMap<Locator, ScriptedElement>,
    calls: Vec<ScriptedCall>,
    close_count: usize,
    closed: bool,
    navigation_error: Option<String>,
    screenshot_error: Option<String>,
    crash_on_click: HashSet<Locator>,
    panic_on_click: HashSet<Locator>,
}

/// Shared handle to a scripted page.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSession {
    state: Arc<Mutex<PageState>>,
}

impl ScriptedSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn with_element(self, locator: Locator, element: ScriptedElement) -> Self {
        self.state().elements.insert(locator, element);
        self
    }

    /// Removes `locator` from the page, so it behaves like an absent element.
    #[must_use]
    pub fn without_element(self, locator: &Locator) -> Self {
        self.state().elements.remove(locator);
        self
    }

    /// Makes `navigate` fail with a protocol error.
    #[must_use]
    pub fn with_navigation_error(self, message: impl Into<String>) -> Self {
        self.state().navigation_error = Some(message.into());
        self
    }

    /// Makes `screenshot` fail with an I/O error.
    #[must_use]
    pub fn with_screenshot_error(self, message: impl Into<String>) -> Self {
        self.state().screenshot_error = Some(message.into());
        self
    }

    /// Clicking `locator` reports a protocol error, as if the browser went away.
    #[must_use]
    pub fn with_click_crash(self, locator: Locator) -> Self {
        self.state().crash_on_click.insert(locator);
        self
    }

    /// Clicking `locator` panics.
    #[must_use]
    pub fn with_click_panic(self, locator: Locator) -> Self {
        self.state().panic_on_click.insert(locator);
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.state().calls.clone()
    }

    #[must_use]
    pub fn clicks(&self) -> Vec<Locator> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                ScriptedCall::Click(locator) => Some(locator.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                ScriptedCall::Screenshot(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `close` calls, including repeated ones.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.state().close_count
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn element(&self, locator: &Locator) -> Result<Option<ScriptedElement>, BrowserError> {
        let state = self.state();
        if state.closed {
            return Err(BrowserError::Closed);
        }
        Ok(state.elements.get(locator).cloned())
    }

    fn record(&self, call: ScriptedCall) -> Result<(), BrowserError> {
        let mut state = self.state();
        if state.closed {
            return Err(BrowserError::Closed);
        }
        state.calls.push(call);
        Ok(())
    }
}

fn timeout_error(locator: &Locator, timeout: Duration) -> BrowserError {
    BrowserError::Timeout {
        target: locator.to_string(),
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.record(ScriptedCall::Navigate(url.to_owned()))?;
        match self.state().navigation_error.clone() {
            Some(message) => Err(BrowserError::Protocol(message)),
            None => Ok(()),
        }
    }

    async fn wait_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<bool, BrowserError> {
        if self.is_visible(locator).await? {
            return Ok(true);
        }
        // The page never changes, so waiting only burns the timeout.
        tokio::time::sleep(timeout).await;
        Ok(false)
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, BrowserError> {
        Ok(self.element(locator)?.is_some_and(|el| el.visible))
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        if !self.wait_visible(locator, timeout).await? {
            return Err(timeout_error(locator, timeout));
        }
        self.record(ScriptedCall::Click(locator.clone()))?;
        let (crash, panic) = {
            let state = self.state();
            (
                state.crash_on_click.contains(locator),
                state.panic_on_click.contains(locator),
            )
        };
        if panic {
            panic!("scripted panic while clicking {locator}");
        }
        if crash {
            return Err(BrowserError::Protocol(format!(
                "connection lost while clicking {locator}"
            )));
        }
        Ok(())
    }

    async fn has_option(&self, select: &Locator, value: &str) -> Result<bool, BrowserError> {
        Ok(self
            .element(select)?
            .is_some_and(|el| el.options.iter().any(|opt| opt == value)))
    }

    async fn select_option(&self, select: &Locator, value: &str) -> Result<(), BrowserError> {
        if !self.has_option(select, value).await? {
            return Err(BrowserError::ElementNotFound(format!(
                "option \"{value}\" in {select}"
            )));
        }
        self.record(ScriptedCall::SelectOption {
            select: select.clone(),
            value: value.to_owned(),
        })
    }

    async fn fill(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        if !self.wait_visible(locator, timeout).await? {
            return Err(timeout_error(locator, timeout));
        }
        self.record(ScriptedCall::Fill {
            field: locator.clone(),
            text: text.to_owned(),
        })
    }

    async fn parent_text(&self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        Ok(self
            .element(locator)?
            .map(|el| el.parent_text.unwrap_or_default()))
    }

    async fn screenshot(&self, path: &Path) -> Result<(), BrowserError> {
        self.record(ScriptedCall::Screenshot(path.to_path_buf()))?;
        match self.state().screenshot_error.clone() {
            Some(message) => Err(BrowserError::Io(std::io::Error::other(message))),
            None => Ok(()),
        }
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let mut state = self.state();
        state.close_count += 1;
        if !state.closed {
            state.closed = true;
            state.calls.push(ScriptedCall::Close);
        }
        Ok(())
    }
}

/// Hands out a [`ScriptedSession`], or fails to launch.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLauncher {
    session: ScriptedSession,
    launch_error: Option<String>,
    launched_with: Arc<Mutex<Vec<SessionOptions>>>,
}

impl ScriptedLauncher {
    #[must_use]
    pub fn new(session: ScriptedSession) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// A launcher whose every launch fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            launch_error: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn session(&self) -> &ScriptedSession {
        &self.session
    }

    /// Options passed to each launch attempt, in order.
    #[must_use]
    pub fn launches(&self) -> Vec<SessionOptions> {
        self.launched_with
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SessionLauncher for ScriptedLauncher {
    type Session = ScriptedSession;

    async fn launch(&self, options: &SessionOptions) -> Result<ScriptedSession, BrowserError> {
        self.launched_with
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(options.clone());
        match &self.launch_error {
            Some(message) => Err(BrowserError::Launch(message.clone())),
            None => Ok(self.session.clone()),
        }
    }
}
