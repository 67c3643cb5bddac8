//! HTTP client for the REVOX API

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, RevoxError};

/// Session side of the HTTP client
///
/// Supplies the bearer credential and reacts when the server rejects it.
pub trait SessionHook: Send + Sync {
    /// Current bearer token, if a session is persisted
    fn bearer_token(&self) -> Option<String>;

    /// Called once per 401 response, before the error is returned
    fn on_unauthorized(&self);
}

/// Hook for clients that never authenticate
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl SessionHook for NoSession {
    fn bearer_token(&self) -> Option<String> {
        None
    }

    fn on_unauthorized(&self) {}
}

/// Transport used by every domain service
#[allow(async_fn_in_trait)]
pub trait ApiClient {
    /// Send one request and decode the success body into `R`
    ///
    /// An empty success body decodes as JSON `null`, so `R = ()` or
    /// `Option<_>` accept it.
    async fn request<T, R>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned;

    async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        self.request::<(), R>(Method::GET, endpoint, None).await
    }

    async fn post<T, R>(&self, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, payload).await
    }

    async fn patch<T, R>(&self, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PATCH, endpoint, payload).await
    }
}

/// Turn a non-success response into an error
///
/// Failure bodies are expected to be `{"message": "..."}`; anything else
/// leaves the message empty so callers fall back to status-based text.
pub fn classify_failure(status: u16, body: &str) -> RevoxError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
    RevoxError::http(status, message)
}

/// Decode a success body, treating an empty body as `null`
pub fn decode_body<R: DeserializeOwned>(body: &str) -> Result<R> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| {
        RevoxError::invalid_response(format!("Unexpected response body: {}", e))
    })
}

/// Endpoints that authenticate by themselves and never carry the bearer token
pub(crate) fn is_auth_endpoint(endpoint: &str) -> bool {
    endpoint.trim_start_matches('/').starts_with("auth/")
}

/// reqwest-backed client
pub struct HttpClient {
    client: Client,
    config: Config,
    session: Arc<dyn SessionHook>,
}

impl HttpClient {
    pub fn new(config: Config, session: Arc<dyn SessionHook>) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ApiClient for HttpClient {
    async fn request<T, R>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!("{} {}", method, url);

        let mut request_builder = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");

        if !is_auth_endpoint(endpoint) {
            if let Some(token) = self.session.bearer_token() {
                request_builder = request_builder.bearer_auth(token);
            }
        }

        if let Some(data) = payload {
            request_builder = request_builder.json(data);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let response_text = response.text().await?;
        tracing::debug!("{} {} -> {}", method, url, status.as_u16());

        if status.is_success() {
            return decode_body(&response_text);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Server rejected the session on {} {}", method, endpoint);
            self.session.on_unauthorized();
        }

        Err(classify_failure(status.as_u16(), &response_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_failure_reads_message() {
        let err = classify_failure(409, r#"{"message":"Bike already registered"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.server_message(), Some("Bike already registered"));
    }

    #[test]
    fn test_classify_failure_without_message() {
        let err = classify_failure(500, "<html>Bad Gateway</html>");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.server_message(), None);

        let err = classify_failure(400, r#"{"error":"nope"}"#);
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_decode_empty_body() {
        decode_body::<()>("").unwrap();
        let value: Option<serde_json::Value> = decode_body("  ").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_invalid_body() {
        let result: Result<Vec<i64>> = decode_body("{");
        assert!(matches!(result, Err(RevoxError::InvalidResponse { .. })));
    }

    #[test]
    fn test_auth_endpoints() {
        assert!(is_auth_endpoint("/auth/google"));
        assert!(is_auth_endpoint("auth/guest"));
        assert!(!is_auth_endpoint("/users/1"));
        assert!(!is_auth_endpoint("/authors"));
    }
}
