//! SMTP delivery through `lettre`.
//!
//! Descriptor layout:
//! `smtp://<user>:<escaped-password>@<host>:<port>/?fromAddress=..&toAddresses=a,b&subject=..&UseHTML=..&UseStartTLS=..`
//!
//! Only the password is escaped. The query is split on the fixed `&key=`
//! markers instead of form-decoded, so a subject such as `Build #42 C++ & tests`
//! arrives intact.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use reqwest::Url;

use super::error::TransportError;
use super::target::DeliveryTarget;

const DEFAULT_SMTP_PORT: u16 = 587;

/// Query keys in the order the descriptor writes them. Keys before the
/// subject bind to their first marker, keys after it to their last.
const LEADING_KEYS: &[&str] = &["fromAddress", "toAddresses", "subject"];
const TRAILING_KEYS: &[&str] = &["UseHTML", "UseStartTLS"];

pub(super) async fn deliver(target: &DeliveryTarget, message: &str) -> Result<(), TransportError> {
    let params = SmtpParams::from_descriptor(target.as_str())?;
    let email = params.build_message(message)?;
    let mailer = params.mailer()?;

    let response = mailer.send(email).await?;
    tracing::debug!(
        host = %params.host,
        code = %response.code(),
        "smtp server accepted message"
    );
    Ok(())
}

/// Connection and envelope parameters decoded from an `smtp://` descriptor
#[derive(Debug, Clone, PartialEq)]
struct SmtpParams {
    host: String,
    port: u16,
    username: String,
    password: String,
    from: String,
    to: Vec<String>,
    subject: String,
    html: bool,
    starttls: bool,
}

impl SmtpParams {
    fn from_descriptor(descriptor: &str) -> Result<Self, TransportError> {
        let (authority, query) = descriptor.split_once("/?").unwrap_or((descriptor, ""));
        let url = Url::parse(&format!("{}/", authority))
            .map_err(|e| TransportError::invalid_target(e.to_string()))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TransportError::invalid_target("smtp descriptor has no host"))?
            .to_string();

        let username = decode(url.username())?;
        // Passwords are query-escaped: '+' stands for a space
        let password = match url.password() {
            Some(p) => decode(&p.replace('+', " "))?,
            None => String::new(),
        };

        let mut params = Self {
            host,
            port: url.port().unwrap_or(DEFAULT_SMTP_PORT),
            username,
            password,
            from: String::new(),
            to: Vec::new(),
            subject: String::new(),
            html: false,
            starttls: true,
        };

        for (key, value) in split_query(query) {
            match key {
                "fromAddress" => params.from = value.to_string(),
                "toAddresses" => {
                    params.to = value
                        .split(',')
                        .map(str::trim)
                        .filter(|addr| !addr.is_empty())
                        .map(String::from)
                        .collect();
                }
                "subject" => params.subject = value.to_string(),
                "UseHTML" => params.html = parse_flag("UseHTML", value)?,
                "UseStartTLS" => params.starttls = parse_flag("UseStartTLS", value)?,
                _ => {}
            }
        }

        if params.from.is_empty() {
            return Err(TransportError::invalid_target("smtp descriptor has no fromAddress"));
        }
        if params.to.is_empty() {
            return Err(TransportError::invalid_target("smtp descriptor has no toAddresses"));
        }

        Ok(params)
    }

    fn build_message(&self, body: &str) -> Result<Message, TransportError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(self.subject.clone());
        for to in &self.to {
            builder = builder.to(parse_mailbox(to)?);
        }

        let content_type = if self.html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        builder
            .header(content_type)
            .body(body.to_string())
            .map_err(|e| TransportError::Message(e.to_string()))
    }

    fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let builder = if self.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
        };

        let builder = builder.port(self.port);
        let builder = if self.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
        };

        Ok(builder.build())
    }
}

/// Splits the raw query on the known `key=` markers
///
/// A marker counts only at the start of the query or right after `&`.
/// Values are returned verbatim and run up to the next chosen marker.
fn split_query(query: &str) -> Vec<(&'static str, &str)> {
    let positions = |key: &str| -> Vec<usize> {
        let marker = format!("{}=", key);
        query
            .match_indices(marker.as_str())
            .map(|(pos, _)| pos)
            .filter(|&pos| pos == 0 || query[..pos].ends_with('&'))
            .collect()
    };

    let mut markers: Vec<(usize, &'static str)> = Vec::new();
    for &key in LEADING_KEYS {
        if let Some(&pos) = positions(key).first() {
            markers.push((pos, key));
        }
    }
    for &key in TRAILING_KEYS {
        if let Some(&pos) = positions(key).last() {
            markers.push((pos, key));
        }
    }
    markers.sort_unstable();
    markers.dedup_by_key(|(pos, _)| *pos);

    markers
        .iter()
        .enumerate()
        .map(|(i, &(pos, key))| {
            let start = pos + key.len() + 1;
            let end = markers
                .get(i + 1)
                .map(|&(next, _)| next - 1)
                .unwrap_or(query.len());
            (key, query.get(start..end.max(start)).unwrap_or_default())
        })
        .collect()
}

fn decode(raw: &str) -> Result<String, TransportError> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| TransportError::invalid_target(format!("invalid escape sequence: {}", e)))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, TransportError> {
    value.parse::<bool>().map_err(|_| {
        TransportError::invalid_target(format!("{} must be true or false, got '{}'", name, value))
    })
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| TransportError::Message(format!("invalid address '{}': {}", address, e)))
}
