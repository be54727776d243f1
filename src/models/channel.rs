use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery medium discriminant, stored as text in the delivery log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Email,
    Discord,
    Telegram,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Discord => "discord",
            ChannelKind::Telegram => "telegram",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "email" => Some(ChannelKind::Email),
            "discord" => Some(ChannelKind::Discord),
            "telegram" => Some(ChannelKind::Telegram),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured notification channel with its medium-specific credentials.
/// `verified` is set by the out-of-band credential verification flow; a
/// channel that never passed a test send stays ineligible for live dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationChannel {
    Email {
        address: String,
        verified: bool,
    },
    Discord {
        webhook_url: String,
        verified: bool,
    },
    Telegram {
        bot_token: String,
        chat_id: String,
        verified: bool,
    },
}

impl NotificationChannel {
    pub fn kind(&self) -> ChannelKind {
        match self {
            NotificationChannel::Email { .. } => ChannelKind::Email,
            NotificationChannel::Discord { .. } => ChannelKind::Discord,
            NotificationChannel::Telegram { .. } => ChannelKind::Telegram,
        }
    }

    pub fn is_verified(&self) -> bool {
        match self {
            NotificationChannel::Email { verified, .. }
            | NotificationChannel::Discord { verified, .. }
            | NotificationChannel::Telegram { verified, .. } => *verified,
        }
    }
}
