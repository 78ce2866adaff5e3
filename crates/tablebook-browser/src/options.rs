use std::path::PathBuf;

/// Desktop Chrome on macOS, matching what the booking site sees from a
/// regular visitor.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_LOCALE: &str = "en,zh-TW;q=0.9,zh;q=0.8,en-US;q=0.7,zh-CN;q=0.6";

pub const DEFAULT_TIMEZONE: &str = "Asia/Taipei";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1080,
        }
    }
}

/// Browser permissions granted to the booking page up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Geolocation,
}

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    pub viewport: ViewportSize,
    pub user_agent: String,
    /// `Accept-Language` value; its first tag also becomes the browser UI language.
    pub locale: String,
    pub timezone: String,
    pub permissions: Vec<Permission>,
    /// Chromium binary to launch; auto-detected when `None`.
    pub executable: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: false,
            viewport: ViewportSize::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            permissions: vec![Permission::Geolocation],
            executable: None,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn with_executable(mut self, executable: Option<PathBuf>) -> Self {
        self.executable = executable;
        self
    }

    /// First language tag of [`SessionOptions::locale`] without its quality value.
    #[must_use]
    pub fn primary_language(&self) -> &str {
        self.locale
            .split(',')
            .next()
            .and_then(|tag| tag.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .unwrap_or("en")
    }
}
