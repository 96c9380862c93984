use std::fmt;
use tracing::{error, info};

pub const METADATA_UPLOADED: &str = "Token metadata uploaded successfully";
pub const TOKEN_CREATED: &str = "Token created successfully!";
pub const TOKEN_MINTED: &str = "Token minted successfully!";
pub const WALLETS_CREATED: &str = "Wallets created successfully";
pub const TOKEN_SENT: &str = "Token sent";
pub const TRANSACTION_FAILED: &str = "Transaction failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A user-facing status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// "Transaction failed: <reason>"
    pub fn transaction_failed(reason: impl fmt::Display) -> Self {
        Self::error(format!("{TRANSACTION_FAILED}: {reason}"))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Fire-and-forget sink for status messages
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Routes notifications into the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!("{}", notification.message),
            NotificationLevel::Error => error!("{}", notification.message),
        }
    }
}
