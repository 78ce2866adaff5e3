use std::fmt;

use serde::Serialize;

/// How to find an element on the page.
///
/// Every variant resolves to the first match in document order. Text
/// comparisons trim and collapse whitespace and are otherwise exact, except
/// for [`Locator::Role`] names, which match case-insensitively as a substring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Any CSS selector.
    Css { selector: String },
    /// Elements matching `selector` whose visible text equals `text`.
    CssText { selector: String, text: String },
    /// The innermost element whose visible text equals `text`.
    Text { text: String },
    /// Element with the given ARIA role (explicit or implicit) whose accessible
    /// name contains `name`.
    Role { role: String, name: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            selector: selector.into(),
        }
    }

    pub fn css_with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssText {
            selector: selector.into(),
            text: text.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css { selector } => write!(f, "css={selector}"),
            Locator::CssText { selector, text } => write!(f, "css={selector} text=\"{text}\""),
            Locator::Text { text } => write!(f, "text=\"{text}\""),
            Locator::Role { role, name } => write!(f, "role={role}[name=\"{name}\"]"),
        }
    }
}
