use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{BambuserError, Result};

/// Versioned media type pinned on every request.
pub const API_MEDIA_TYPE: &str = "application/vnd.bambuser.v1+json";

/// Authenticated HTTP transport shared by every operation of a client.
///
/// Every request built through [`Transport::request`] has the base URL
/// prepended and carries the `Accept`, bearer `Authorization` and (except for
/// `DELETE`) JSON `Content-Type` headers. Cloning is cheap: the underlying
/// connection pool is shared.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    authorization: HeaderValue,
}

impl Transport {
    pub(crate) fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let authorization = bearer_header(api_key)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BambuserError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    /// The API base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start an authenticated request for `path` (relative to the base URL).
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let is_delete = method == Method::DELETE;
        let mut req = self
            .http
            .request(method, url)
            .header(ACCEPT, API_MEDIA_TYPE)
            .header(AUTHORIZATION, self.authorization.clone());
        if !is_delete {
            req = req.header(CONTENT_TYPE, "application/json");
        }
        req
    }

    /// Send a request and turn any non-2xx status into a typed error.
    pub(crate) async fn execute(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        warn!("API error ({}): {}", status_code, body);
        Err(BambuserError::from_status(status_code, body))
    }

    /// Send a request and decode the JSON response body.
    pub(crate) async fn execute_json(&self, req: RequestBuilder) -> Result<Value> {
        let response = self.execute(req).await?;
        let value = response.json().await.map_err(BambuserError::Http)?;
        Ok(value)
    }
}

/// Build the `Authorization` header value, rejecting keys that cannot be sent.
pub(crate) fn bearer_header(api_key: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
        BambuserError::Config("API key contains characters not allowed in a header".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Lazily created, then cached, transport for one client instance.
pub(crate) struct TransportCell {
    base_url: String,
    api_key: String,
    timeout: Duration,
    cell: OnceLock<Transport>,
}

impl TransportCell {
    pub(crate) fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            base_url,
            api_key,
            timeout,
            cell: OnceLock::new(),
        }
    }

    /// Return the cached transport, creating it on first access.
    pub(crate) fn get(&self) -> Result<&Transport> {
        if let Some(transport) = self.cell.get() {
            return Ok(transport);
        }
        let transport = Transport::new(&self.base_url, &self.api_key, self.timeout)?;
        Ok(self.cell.get_or_init(|| transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> TransportCell {
        TransportCell::new(
            "https://api.example.com/".into(),
            "secret-key".into(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn transport_is_cached() {
        let cell = cell();
        let first = cell.get().unwrap() as *const Transport;
        let second = cell.get().unwrap() as *const Transport;
        assert_eq!(first, second);
    }

    #[test]
    fn request_headers() {
        let cell = cell();
        let transport = cell.get().unwrap();
        assert_eq!(transport.base_url(), "https://api.example.com");

        let req = transport.request(Method::GET, "/broadcasts").build().unwrap();
        assert_eq!(req.url().as_str(), "https://api.example.com/broadcasts");
        assert_eq!(req.headers()[ACCEPT], API_MEDIA_TYPE);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer secret-key");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn delete_has_no_content_type() {
        let cell = cell();
        let transport = cell.get().unwrap();
        let req = transport
            .request(Method::DELETE, "/images/1")
            .build()
            .unwrap();
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer secret-key");
    }

    #[test]
    fn rejects_unsendable_key() {
        assert!(matches!(
            bearer_header("bad\nkey"),
            Err(BambuserError::Config(_))
        ));
    }
}
