//! One-shot flash messages carried across a redirect in the session.

use serde::{Deserialize, Serialize};

/// Session keys used by the site.
pub mod session_keys {
    /// Queue of pending flash messages.
    pub const FLASH: &str = "flash";
}

/// Visual weight of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Notice,
    Error,
}

impl FlashLevel {
    /// CSS class used by the base layout.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Notice => "flash-notice",
            Self::Error => "flash-error",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Notice,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}
