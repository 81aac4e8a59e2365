//! UI feedback notifications.
//!
//! Four named events carry a message string and turn into a color-coded
//! snackbar. Rendering is left to whoever subscribes to the [`Notifier`].
//!
//! # Example
//!
//! ```rust
//! use docecm::notify::{NotificationKind, Notifier};
//!
//! let notifier = Notifier::new();
//! let mut rx = notifier.subscribe();
//!
//! notifier.dispatch("APP_ERROR", "Upload failed").unwrap();
//! let snackbar = rx.try_recv().unwrap();
//! assert_eq!(snackbar.color, NotificationKind::Error.color());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{Error, Result};

/// Pending snackbars a slow subscriber may fall behind by.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "APP_MESSAGE")]
    Message,
    #[serde(rename = "APP_ERROR")]
    Error,
    #[serde(rename = "APP_INFO")]
    Info,
    #[serde(rename = "APP_WARNING")]
    Warning,
}

impl NotificationKind {
    pub const ALL: [Self; 4] = [Self::Message, Self::Error, Self::Info, Self::Warning];

    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Message => "APP_MESSAGE",
            Self::Error => "APP_ERROR",
            Self::Info => "APP_INFO",
            Self::Warning => "APP_WARNING",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Message => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.event_name() == name)
            .ok_or_else(|| Error::UnknownEvent(name.to_string()))
    }
}

/// Transient notification as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snackbar {
    pub show: bool,
    pub color: String,
    pub text: String,
}

impl Snackbar {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            show: true,
            color: kind.color().to_string(),
            text: text.into(),
        }
    }
}

/// Fans snackbars out to every subscriber.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Snackbar>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Snackbar> {
        self.tx.subscribe()
    }

    /// Publish a snackbar; having no subscribers is not an error.
    pub fn notify(&self, kind: NotificationKind, text: impl Into<String>) -> Snackbar {
        let snackbar = Snackbar::new(kind, text);
        debug!(name: "notify.snackbar", kind = kind.event_name(), "Notification raised");
        let _ = self.tx.send(snackbar.clone());
        snackbar
    }

    /// Publish by event name (`APP_MESSAGE`, `APP_ERROR`, `APP_INFO`, `APP_WARNING`).
    pub fn dispatch(&self, event: &str, text: impl Into<String>) -> Result<Snackbar> {
        let kind = event.parse::<NotificationKind>()?;
        Ok(self.notify(kind, text))
    }

    pub fn message(&self, text: impl Into<String>) -> Snackbar {
        self.notify(NotificationKind::Message, text)
    }

    pub fn error(&self, text: impl Into<String>) -> Snackbar {
        self.notify(NotificationKind::Error, text)
    }

    pub fn info(&self, text: impl Into<String>) -> Snackbar {
        self.notify(NotificationKind::Info, text)
    }

    pub fn warning(&self, text: impl Into<String>) -> Snackbar {
        self.notify(NotificationKind::Warning, text)
    }
}
