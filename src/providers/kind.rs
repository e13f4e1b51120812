use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported channel kinds
///
/// The set is closed: adding a channel means adding a variant, an options
/// type and an adapter, and wiring it into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// E-mail over SMTP
    Smtp,
    /// Bark iOS push gateway
    Bark,
    /// Generic HTTP webhook
    Webhook,
}

impl ChannelKind {
    /// Every kind, in registry construction order
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Smtp, ChannelKind::Bark, ChannelKind::Webhook];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Smtp => "smtp",
            ChannelKind::Bark => "bark",
            ChannelKind::Webhook => "webhook",
        }
    }
}

impl FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "smtp" => Ok(ChannelKind::Smtp),
            "bark" => Ok(ChannelKind::Bark),
            "webhook" => Ok(ChannelKind::Webhook),
            other => Err(format!(
                "Unknown provider '{}'. Valid providers are: smtp, bark, webhook",
                other
            )),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
