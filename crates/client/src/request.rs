//! Thin JSON-over-HTTP helper with a per-request timeout and bounded retries.

use std::time::Duration;

use heatmap_market_data::RetryPolicy;
use log::debug;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body sent by the server.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RequestHelper {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RequestHelper {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::Config("server URL is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to initialize HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            retry: RetryPolicy::client_default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json::<(), T>(Method::GET, path, None).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// Sends the request, retrying on 429 and timeouts per the retry policy.
    pub async fn request_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        let label = format!("{} {}", method, path);
        let text = self
            .retry
            .run(
                &label,
                || self.send_once(method.clone(), path, body.as_ref()),
                ClientError::is_retryable,
            )
            .await?;
        serde_json::from_str(&text).map_err(|e| {
            ClientError::Decode(format!(
                "{} - {}",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(path.to_string())
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(path.to_string())
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        if status.is_success() {
            return Ok(text);
        }
        Err(status_error(status, &text))
    }
}

fn status_error(status: StatusCode, body: &str) -> ClientError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.clone());
    let message = parsed
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let snippet: String = body.chars().take(200).collect();
            if snippet.is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                snippet
            }
        });
    ClientError::Http {
        status: status.as_u16(),
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_prefers_api_body() {
        let err = status_error(
            StatusCode::NOT_FOUND,
            r#"{"code":"NOT_FOUND","message":"Ticker 9 not found"}"#,
        );
        assert_eq!(
            err,
            ClientError::Http {
                status: 404,
                code: Some("NOT_FOUND".to_string()),
                message: "Ticker 9 not found".to_string(),
            }
        );

        let err = status_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_blank_base_url_is_rejected() {
        assert!(RequestHelper::new("  ", DEFAULT_TIMEOUT).is_err());
        let helper = RequestHelper::new("http://localhost:8080/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(helper.base_url(), "http://localhost:8080");
    }
}
