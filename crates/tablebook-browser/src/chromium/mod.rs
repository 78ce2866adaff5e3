//! [`BrowserSession`] backed by a local Chromium driven over the DevTools
//! protocol.

mod script;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{GrantPermissionsParams, PermissionType};
use chromiumoxide::cdp::browser_protocol::emulation::SetTimezoneOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::BrowserError;
use crate::locator::Locator;
use crate::options::{Permission, SessionOptions};
use crate::session::{BrowserSession, SessionLauncher};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches a fresh Chromium process per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn browser_config(options: &SessionOptions) -> Result<BrowserConfig, BrowserError> {
    let mut builder = BrowserConfig::builder()
        .window_size(options.viewport.width, options.viewport.height)
        .viewport(Viewport {
            width: options.viewport.width,
            height: options.viewport.height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        })
        .arg(format!("--lang={}", options.primary_language()));

    if !options.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &options.executable {
        builder = builder.chrome_executable(path);
    }

    builder
        .build()
        .map_err(|err| BrowserError::Launch(format!("browser config error: {err}")))
}

fn permission_type(permission: Permission) -> PermissionType {
    match permission {
        Permission::Geolocation => PermissionType::Geolocation,
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self, options: &SessionOptions) -> Result<ChromiumSession, BrowserError> {
        let config = browser_config(options)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| BrowserError::Launch(err.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!(error = %err, "devtools handler error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                DetachedBrowser {
                    browser,
                    handler: handler_task,
                }
                .shutdown()
                .await;
                return Err(BrowserError::Launch(format!("failed to open page: {err}")));
            }
        };

        let session = ChromiumSession {
            page,
            inner: Mutex::new(Some((browser, handler_task))),
        };
        if let Err(err) = session.configure(options).await {
            session.shutdown().await;
            return Err(err);
        }

        tracing::info!(
            headless = options.headless,
            width = options.viewport.width,
            height = options.viewport.height,
            timezone = %options.timezone,
            "browser session ready"
        );
        Ok(session)
    }
}

/// One Chromium process with a single page.
pub struct ChromiumSession {
    page: Page,
    inner: Mutex<Option<(Browser, JoinHandle<()>)>>,
}

impl ChromiumSession {
    async fn configure(&self, options: &SessionOptions) -> Result<(), BrowserError> {
        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(options.user_agent.clone())
            .accept_language(options.locale.clone())
            .build()
            .map_err(BrowserError::Protocol)?;
        self.page.execute(user_agent).await?;
        self.page
            .execute(SetTimezoneOverrideParams::new(options.timezone.clone()))
            .await?;

        if !options.permissions.is_empty() {
            let permissions = options
                .permissions
                .iter()
                .copied()
                .map(permission_type)
                .collect::<Vec<_>>();
            let guard = self.inner.lock().await;
            if let Some((browser, _)) = guard.as_ref() {
                browser
                    .execute(GrantPermissionsParams::new(permissions))
                    .await?;
            }
        }
        Ok(())
    }

    async fn shutdown(&self) {
        if let Err(err) = self.close().await {
            tracing::warn!(error = %err, "failed to close browser after setup error");
        }
    }

    async fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.inner.lock().await.is_some() {
            Ok(())
        } else {
            Err(BrowserError::Closed)
        }
    }

    async fn evaluate(&self, expression: String) -> Result<Value, BrowserError> {
        self.ensure_open().await?;
        let result = self.page.evaluate(expression).await?;
        result
            .into_value::<Value>()
            .map_err(|err| BrowserError::Script(err.to_string()))
    }

    /// Tags the element behind `locator` and returns a CSS selector for it.
    async fn mark(&self, locator: &Locator, clear: bool) -> Result<String, BrowserError> {
        let token = Uuid::new_v4().simple().to_string();
        let value = self.evaluate(script::mark(locator, &token, clear)).await?;
        match script::status(&value) {
            Some("ok") => Ok(script::ref_selector(&token)),
            Some("missing") => Err(BrowserError::ElementNotFound(locator.to_string())),
            other => Err(BrowserError::Script(format!(
                "unexpected status {other:?} while resolving {locator}"
            ))),
        }
    }

    async fn require_visible(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        if self.wait_visible(locator, timeout).await? {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                target: locator.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })
        }
    }

    async fn option_status(
        &self,
        select: &Locator,
        value: &str,
        apply: bool,
    ) -> Result<Option<String>, BrowserError> {
        let result = self.evaluate(script::option(select, value, apply)).await?;
        Ok(script::status(&result).map(str::to_owned))
    }
}

/// A browser taken out of its session for shutdown.
struct DetachedBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl DetachedBrowser {
    async fn shutdown(mut self) {
        if let Err(err) = self.browser.close().await {
            tracing::warn!(error = %err, "failed to close browser");
        }
        if let Err(err) = self.browser.wait().await {
            tracing::debug!(error = %err, "browser process did not exit cleanly");
        }
        self.handler.abort();
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.ensure_open().await?;
        self.page.goto(url).await?;
        Ok(())
    }

    async fn wait_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<bool, BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(locator).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, BrowserError> {
        let value = self.evaluate(script::visible(locator)).await?;
        Ok(script::status(&value) == Some("ok")
            && value.get("visible").and_then(Value::as_bool) == Some(true))
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.require_visible(locator, timeout).await?;
        let selector = self.mark(locator, false).await?;
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        tracing::debug!(locator = %locator, "clicked");
        Ok(())
    }

    async fn has_option(&self, select: &Locator, value: &str) -> Result<bool, BrowserError> {
        Ok(self.option_status(select, value, false).await?.as_deref() == Some("ok"))
    }

    async fn select_option(&self, select: &Locator, value: &str) -> Result<(), BrowserError> {
        match self.option_status(select, value, true).await?.as_deref() {
            Some("ok") => Ok(()),
            Some("missing") => Err(BrowserError::ElementNotFound(select.to_string())),
            Some("no-option") => Err(BrowserError::ElementNotFound(format!(
                "option \"{value}\" in {select}"
            ))),
            other => Err(BrowserError::Script(format!(
                "unexpected status {other:?} while selecting in {select}"
            ))),
        }
    }

    async fn fill(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.require_visible(locator, timeout).await?;
        let selector = self.mark(locator, true).await?;
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn parent_text(&self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        let value = self.evaluate(script::parent_text(locator)).await?;
        match script::status(&value) {
            Some("ok") => Ok(Some(
                value
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
            )),
            _ => Ok(None),
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<(), BrowserError> {
        self.ensure_open().await?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let Some((browser, handler)) = self.inner.lock().await.take() else {
            return Ok(());
        };
        DetachedBrowser { browser, handler }.shutdown().await;
        tracing::debug!("browser closed");
        Ok(())
    }
}
