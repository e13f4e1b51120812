//! Bark push gateway delivery.
//!
//! Descriptor layout:
//! `bark://:<device_key>@<host[:port]>[/path]/?scheme=https&title=..&sound=..`
//!
//! Bark API Reference: https://github.com/Finb/Bark

use reqwest::Url;
use serde_json::{Map, Value, json};

use super::client::HTTP_CLIENT;
use super::error::TransportError;
use super::target::DeliveryTarget;

/// Optional Bark parameters forwarded verbatim in the push body
const PASSTHROUGH_PARAMS: &[&str] = &["title", "sound", "icon", "group", "level", "url"];

pub(super) async fn deliver(target: &DeliveryTarget, message: &str) -> Result<(), TransportError> {
    let url = target.parse()?;
    let api_url = build_api_url(&url)?;
    let body = build_request_body(&url, message)?;

    let mut request = HTTP_CLIENT.post(api_url).json(&body);
    if let Some(timeout) = target.timeout() {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            code: status.as_u16(),
            body,
        });
    }

    Ok(())
}

/// Builds the `/push` endpoint URL from the descriptor
fn build_api_url(url: &Url) -> Result<String, TransportError> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| TransportError::invalid_target("bark descriptor has no host"))?;

    let scheme = url
        .query_pairs()
        .find(|(k, _)| k == "scheme")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| "https".to_string());
    if scheme != "http" && scheme != "https" {
        return Err(TransportError::invalid_target(format!(
            "bark scheme must be http or https, got '{}'",
            scheme
        )));
    }

    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    let path = url.path().trim_end_matches('/');

    Ok(format!("{}://{}{}/push", scheme, authority, path))
}

/// Builds the JSON body for the Bark push API
fn build_request_body(url: &Url, message: &str) -> Result<Value, TransportError> {
    let device_key = url
        .password()
        .map(urlencoding::decode)
        .transpose()
        .map_err(|e| TransportError::invalid_target(format!("invalid device key: {}", e)))?
        .filter(|k| !k.is_empty())
        .ok_or_else(|| TransportError::invalid_target("bark descriptor has no device key"))?;

    let mut body = Map::new();
    body.insert("device_key".to_string(), json!(device_key));
    body.insert("body".to_string(), json!(message));

    for (key, value) in url.query_pairs() {
        if PASSTHROUGH_PARAMS.contains(&key.as_ref()) && !value.is_empty() {
            body.insert(key.into_owned(), json!(value));
        }
    }

    Ok(Value::Object(body))
}
