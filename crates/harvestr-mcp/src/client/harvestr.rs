//! Harvestr REST API client.
//!
//! Thin authenticated client over the Harvestr v1 API. It owns one lazily
//! created HTTP connection handle, injects the private app token on every
//! request, strips null query parameters, and turns raw responses into either
//! a decoded JSON payload or a classified [`HarvestrError`].

use super::config::{resolve_token, ClientConfig, TOKEN_ENV_VAR};
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Header carrying the private app token.
pub const TOKEN_HEADER: &str = "x-harvestr-private-app-token";

/// Query parameters for GET requests. `null` values are dropped before sending.
pub type QueryParams = serde_json::Map<String, Value>;

/// Harvestr client errors.
#[derive(Debug, Error)]
pub enum HarvestrError {
    /// Client configuration is missing or unusable. Raised at construction only.
    #[error("{0}")]
    Config(String),

    /// API returned a status code of 400 or above.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, or the raw body text.
        message: String,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response carried a body that is not JSON.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl HarvestrError {
    /// The error raised when no token is configured.
    pub fn missing_token() -> Self {
        HarvestrError::Config(format!(
            "{} environment variable is required. \
             Create a token in Harvestr Settings > Integrations > API Access Token",
            TOKEN_ENV_VAR
        ))
    }

    /// HTTP status of an API error, `None` for every other kind.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HarvestrError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a configuration error (fatal, not per-call).
    pub fn is_config(&self) -> bool {
        matches!(self, HarvestrError::Config(_))
    }

    /// Whether this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarvestrError::Timeout(_))
    }

    /// Whether the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

impl From<reqwest::Error> for HarvestrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HarvestrError::Timeout(err)
        } else {
            HarvestrError::Transport(err)
        }
    }
}

/// Result type for Harvestr client operations.
pub type HarvestrResult<T> = Result<T, HarvestrError>;

/// Harvestr API client.
///
/// `get`, `post` and `patch` return `Ok(None)` for `204 No Content` and
/// `Ok(Some(value))` for any other success, with the body passed through
/// unchanged.
pub struct HarvestrClient {
    /// Resolved configuration; `token` is always non-empty.
    config: ClientConfig,

    /// Private app token.
    token: String,

    /// Connection handle, created on first use and dropped by [`close`](Self::close).
    connection: Mutex<Option<Client>>,
}

impl HarvestrClient {
    /// Create a client from an explicit token or `HARVESTR_API_TOKEN`.
    ///
    /// Base URL and timeout come from the environment as described in
    /// [`ClientConfig::from_env`].
    pub fn new(token: Option<String>) -> HarvestrResult<Self> {
        let mut config = ClientConfig::from_env();
        config.token = resolve_token(token, config.token.take());
        Self::with_config(config)
    }

    /// Create a client from a fully specified configuration.
    ///
    /// Fails with [`HarvestrError::Config`] if the token is missing, empty, or
    /// cannot be sent as a header value. No connection is opened.
    pub fn with_config(config: ClientConfig) -> HarvestrResult<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(HarvestrError::missing_token)?;

        if HeaderValue::from_str(&token).is_err() {
            return Err(HarvestrError::Config(format!(
                "{} contains characters that are not valid in an HTTP header",
                TOKEN_ENV_VAR
            )));
        }

        Ok(Self {
            config,
            token,
            connection: Mutex::new(None),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Configuration the client was built from.
    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.config.request_timeout()
    }

    /// Whether a connection handle is currently open.
    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }

    /// Make a GET request.
    ///
    /// `null` entries in `params` are removed. If none remain, the request
    /// carries no query string at all.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn get(
        &self,
        endpoint: &str,
        params: Option<QueryParams>,
    ) -> HarvestrResult<Option<Value>> {
        let client = self.connection()?;
        let mut request = client.get(self.config.url(endpoint));

        if let Some(query) = clean_params(params) {
            debug!(params = query.len(), "GET with query parameters");
            request = request.query(&query);
        }

        let response = request.send().await?;
        handle_response(response).await
    }

    /// Make a POST request. The body is sent as-is.
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> HarvestrResult<Option<Value>> {
        let client = self.connection()?;
        let mut request = client.post(self.config.url(endpoint));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        handle_response(response).await
    }

    /// Make a PATCH request. The body is sent as-is.
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn patch(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> HarvestrResult<Option<Value>> {
        let client = self.connection()?;
        let mut request = client.patch(self.config.url(endpoint));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        handle_response(response).await
    }

    /// Release the connection handle.
    ///
    /// Returns `true` if an open handle was released, `false` if there was
    /// nothing to close. Safe to call any number of times.
    pub fn close(&self) -> bool {
        match self.connection.lock().take() {
            Some(_) => {
                debug!("Closed Harvestr connection");
                true
            }
            None => false,
        }
    }

    /// Get the open connection handle or create a new one.
    ///
    /// `reqwest::Client` is reference counted and safe to share across
    /// concurrent requests, so callers get a clone of the single handle. The
    /// lock is never held across an await.
    pub(crate) fn connection(&self) -> HarvestrResult<Client> {
        let mut slot = self.connection.lock();

        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        debug!(base_url = %self.config.base_url, "Opening Harvestr connection");

        let client = Client::builder()
            .default_headers(self.headers()?)
            .timeout(self.config.request_timeout())
            .build()?;

        *slot = Some(client.clone());
        Ok(client)
    }

    /// Request headers with authentication.
    fn headers(&self) -> HarvestrResult<HeaderMap> {
        let mut token = HeaderValue::from_str(&self.token).map_err(|_| {
            HarvestrError::Config(format!(
                "{} contains characters that are not valid in an HTTP header",
                TOKEN_ENV_VAR
            ))
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token);
        Ok(headers)
    }
}

impl fmt::Debug for HarvestrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestrClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Drop `null` parameters and render the rest as query string values.
///
/// Returns `None` when nothing is left to send.
fn clean_params(params: Option<QueryParams>) -> Option<Vec<(String, String)>> {
    let cleaned: Vec<(String, String)> = params?
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Handle an API response and classify failures.
async fn handle_response(response: Response) -> HarvestrResult<Option<Value>> {
    let status = response.status();

    if status.as_u16() >= 400 {
        let message = error_message(&error_body(response.text().await));
        warn!("Harvestr API error ({}): {}", status.as_u16(), message);
        return Err(HarvestrError::Api {
            status: status.as_u16(),
            message,
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| HarvestrError::InvalidResponse(e.to_string()))
}

/// Text of an error response, or a placeholder if it could not be read.
fn error_body<E: fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        warn!("Failed to read Harvestr error body: {}", e);
        format!("<unreadable body: {}>", e)
    })
}

/// `message` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => match fields.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => body.to_string(),
            Some(other) => other.to_string(),
        },
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> QueryParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = HarvestrClient::with_config(ClientConfig::with_token("t1")).unwrap();
        assert_eq!(client.base_url(), "https://rest.harvestr.io/v1");
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert!(!client.is_connected());
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = HarvestrClient::with_config(ClientConfig::default()).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().contains("HARVESTR_API_TOKEN"));
        assert!(err.to_string().contains("API Access Token"));
    }

    #[test]
    fn test_empty_token_is_config_error() {
        let err = HarvestrClient::with_config(ClientConfig::with_token("")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_header_unsafe_token_is_config_error() {
        let err = HarvestrClient::with_config(ClientConfig::with_token("bad\ntoken")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_headers() {
        let client = HarvestrClient::with_config(ClientConfig::with_token("t1")).unwrap();
        let headers = client.headers().unwrap();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[TOKEN_HEADER], "t1");
        assert!(headers[TOKEN_HEADER].is_sensitive());
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = HarvestrClient::with_config(ClientConfig::with_token("secret-token")).unwrap();
        assert!(!format!("{:?}", client).contains("secret-token"));
    }

    #[test]
    fn test_connection_reused_until_closed() {
        let client = HarvestrClient::with_config(ClientConfig::with_token("t1")).unwrap();
        client.connection().unwrap();
        assert!(client.is_connected());
        client.connection().unwrap();
        assert!(client.is_connected());

        assert!(client.close());
        assert!(!client.is_connected());

        client.connection().unwrap();
        assert!(client.is_connected());
    }

    #[test]
    fn test_close_is_idempotent() {
        let client = HarvestrClient::with_config(ClientConfig::with_token("t1")).unwrap();
        assert!(!client.close());

        client.connection().unwrap();
        assert!(client.close());
        assert!(!client.close());
    }

    #[test]
    fn test_clean_params_all_null() {
        let cleaned = clean_params(Some(params(json!({"parentId": null, "select": null}))));
        assert!(cleaned.is_none());
    }

    #[test]
    fn test_clean_params_none_and_empty() {
        assert!(clean_params(None).is_none());
        assert!(clean_params(Some(QueryParams::new())).is_none());
    }

    #[test]
    fn test_clean_params_strips_nulls() {
        let cleaned = clean_params(Some(params(json!({
            "parentId": "cmp-1",
            "select": null,
            "limit": 10,
            "archived": false
        }))))
        .unwrap();

        assert_eq!(cleaned.len(), 3);
        assert!(cleaned.contains(&("parentId".to_string(), "cmp-1".to_string())));
        assert!(cleaned.contains(&("limit".to_string(), "10".to_string())));
        assert!(cleaned.contains(&("archived".to_string(), "false".to_string())));
        assert!(!cleaned.iter().any(|(k, _)| k == "select"));
    }

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(error_message(r#"{"message":"not found"}"#), "not found");
        assert_eq!(error_message(r#"{"message":42}"#), "42");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"error":"nope"}"#), r#"{"error":"nope"}"#);
        assert_eq!(error_message(r#"["a","b"]"#), r#"["a","b"]"#);
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn test_unreadable_error_body() {
        let body = error_body(Err::<String, _>("connection reset"));
        assert_eq!(body, "<unreadable body: connection reset>");
        assert_eq!(error_message(&body), body);

        assert_eq!(error_body(Ok::<_, String>("oops".to_string())), "oops");
    }

    #[test]
    fn test_api_error_display() {
        let err = HarvestrError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (404): not found");
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_config());
    }
}
