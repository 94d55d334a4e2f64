//! Shared HTTP client for the topic catalog store.
//!
//! Provides a minimal client with optional auth (Bearer token or X-API-Key),
//! generic GET/multipart POST/DELETE helpers that classify failures into
//! `StoreError`, and the topic endpoints in [`api`].

pub mod api;

use coursedesk_core::{Config, StoreError, StoreResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    /// No credentials.
    None,
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

impl Auth {
    /// API key takes precedence over a bearer token.
    pub fn from_config(config: &Config) -> Self {
        match (&config.api_key, &config.bearer_token) {
            (Some(key), _) => Auth::XApiKey(key.clone()),
            (None, Some(token)) => Auth::Bearer(token.clone()),
            (None, None) => Auth::None,
        }
    }
}

/// HTTP client for the catalog store.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, auth: Auth, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Self::new(
            config.api_url.clone(),
            Auth::from_config(config),
            config.http_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> StoreResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    /// DELETE request. Returns Ok(()) on any 2xx; the body is ignored.
    pub async fn delete(&self, path: &str) -> StoreResult<()> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.delete(&url));

        let response = request.send().await.map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::NetworkUnavailable(format!("request timed out: {}", err))
    } else if err.is_builder() {
        StoreError::InvalidRequest(err.to_string())
    } else {
        StoreError::NetworkUnavailable(err.to_string())
    }
}

async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    tracing::debug!(status = status.as_u16(), message = %message, "Catalog store returned an error");
    Err(StoreError::from_status(status.as_u16(), message))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse response as JSON: {}", e)))
}

/// Pull a human message out of an error body: `{"error": ..}` or
/// `{"message": ..}` when JSON, the trimmed text otherwise.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(
            error_message(r#"{"error":"title is required"}"#).as_deref(),
            Some("title is required")
        );
        assert_eq!(
            error_message(r#"{"message":"no such topic"}"#).as_deref(),
            Some("no such topic")
        );
        assert_eq!(error_message(" boom \n").as_deref(), Some("boom"));
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn auth_from_config_prefers_api_key() {
        let mut config = Config::default();
        assert_eq!(Auth::from_config(&config), Auth::None);

        config.bearer_token = Some("jwt".to_string());
        assert_eq!(Auth::from_config(&config), Auth::Bearer("jwt".to_string()));

        config.api_key = Some("key".to_string());
        assert_eq!(Auth::from_config(&config), Auth::XApiKey("key".to_string()));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client =
            ApiClient::new("http://localhost:5000/api/", Auth::None, Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.build_url("/topics"),
            "http://localhost:5000/api/topics"
        );
    }
}
