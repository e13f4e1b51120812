//! Generic HTTP webhook delivery.
//!
//! Descriptor layout: `webhooks://host[:port]/path?..&method=POST` for HTTPS
//! endpoints and `webhook://..` for plain HTTP. The trailing `method`
//! parameter is consumed here; every other query parameter is forwarded.

use reqwest::{Method, Url};
use serde_json::json;

use super::client::HTTP_CLIENT;
use super::error::TransportError;
use super::target::DeliveryTarget;

pub(super) async fn deliver(target: &DeliveryTarget, message: &str) -> Result<(), TransportError> {
    let (method, endpoint) = resolve_endpoint(&target.parse()?)?;

    let mut request = HTTP_CLIENT
        .request(method, endpoint)
        .json(&json!({ "body": message }));
    for (key, value) in target.headers() {
        request = request.header(key, value);
    }
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

/// Splits a webhook descriptor into the HTTP method and the real endpoint
fn resolve_endpoint(url: &Url) -> Result<(Method, Url), TransportError> {
    let http_scheme = match url.scheme() {
        "webhooks" => "https",
        "webhook" => "http",
        other => return Err(TransportError::UnsupportedScheme(other.to_string())),
    };
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| TransportError::invalid_target("webhook descriptor has no host"))?;

    let mut method = Method::POST;
    let mut forwarded = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == "method" {
            method = value.parse().map_err(|_| {
                TransportError::invalid_target(format!("invalid HTTP method '{}'", value))
            })?;
        } else {
            forwarded.push((key.into_owned(), value.into_owned()));
        }
    }

    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    let mut endpoint = Url::parse(&format!("{}://{}{}", http_scheme, authority, url.path()))
        .map_err(|e| TransportError::invalid_target(e.to_string()))?;
    if !forwarded.is_empty() {
        endpoint.query_pairs_mut().extend_pairs(forwarded);
    }

    Ok((method, endpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resolve_endpoint_https() {
        let url = Url::parse("webhooks://example.com/hooks/abc?method=PUT").unwrap();
        let (method, endpoint) = resolve_endpoint(&url).unwrap();
        assert_eq!(method, Method::PUT);
        assert_eq!(endpoint.as_str(), "https://example.com/hooks/abc");
    }

    #[test]
    fn test_resolve_endpoint_keeps_other_query_params() {
        let url = Url::parse("webhook://example.com:8080/hook?token=xyz&method=POST").unwrap();
        let (method, endpoint) = resolve_endpoint(&url).unwrap();
        assert_eq!(method, Method::POST);
        assert_eq!(endpoint.as_str(), "http://example.com:8080/hook?token=xyz");
    }

    #[test]
    fn test_resolve_endpoint_defaults_to_post() {
        let url = Url::parse("webhooks://example.com/hook").unwrap();
        let (method, _) = resolve_endpoint(&url).unwrap();
        assert_eq!(method, Method::POST);
    }

    #[test]
    fn test_resolve_endpoint_rejects_bad_method() {
        let url = Url::parse("webhooks://example.com/hook?method=NOT%20A%20METHOD").unwrap();
        assert!(resolve_endpoint(&url).is_err());
    }

    #[tokio::test]
    async fn test_deliver_sends_json_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/hook"))
            .and(query_param("token", "xyz"))
            .and(header("X-Api-Key", "secret"))
            .and(body_json(json!({ "body": "disk full" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let addr = server.address();
        let target = DeliveryTarget::new(format!(
            "webhook://{}:{}/hook?token=xyz&method=PUT",
            addr.ip(),
            addr.port()
        ))
        .with_headers([("X-Api-Key", "secret")])
        .with_timeout(Duration::from_secs(5));

        deliver(&target, "disk full").await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_reports_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let addr = server.address();
        let target = DeliveryTarget::new(format!(
            "webhook://{}:{}/hook?method=POST",
            addr.ip(),
            addr.port()
        ));

        let err = deliver(&target, "x").await.unwrap_err();
        assert!(matches!(err, TransportError::Status { code: 500, .. }));
    }
}
