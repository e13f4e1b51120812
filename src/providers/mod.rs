//! Delivery adapters and the provider registry.
//!
//! Each channel kind has one adapter implementing [`NotificationProvider`].
//! The [`ProviderRegistry`] builds the active adapters from
//! [`ProviderOptions`] and [`GlobalOptions`]:
//!
//! - a kind is built when it is configured and passes the provider allowlist
//! - inside each adapter, records are kept when their ID passes the ID allowlist

mod bark;
mod error;
mod kind;
mod options;
mod provider;
mod registry;
mod smtp;
mod webhook;

pub use bark::{BarkOptions, BarkProvider};
pub use error::{DeliveryError, ProviderError};
pub use kind::ChannelKind;
pub use options::{ErrorPolicy, GlobalOptions, ProviderOptions};
pub use provider::{ChannelRecord, NotificationProvider, check_record_id, id_allowed};
pub use registry::ProviderRegistry;
pub use smtp::{SMTP_PORT, SmtpOptions, SmtpProvider};
pub use webhook::{WebhookOptions, WebhookProvider};
