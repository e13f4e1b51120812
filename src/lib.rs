//! notify-rs library
//!
//! Sends one message to many notification channels (SMTP, Bark, webhooks)
//! selected by channel kind and record ID.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod providers;
pub mod transport;
pub mod utils;

pub use client::NotifyClient;
pub use error::{NotifyError, NotifyResult};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
