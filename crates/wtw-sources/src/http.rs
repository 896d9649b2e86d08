use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::SourceError;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("wtw/", env!("CARGO_PKG_VERSION"));

/// Shared client for every source: JSON accept header, fixed timeout
pub fn create_client() -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(SourceError::Client)
}

/// Send a prepared GET and decode the body as JSON.
///
/// `endpoint` is a log/error label without secrets (never the full query string).
pub async fn send_json(request: RequestBuilder, endpoint: &str) -> Result<Value, SourceError> {
    debug!(endpoint = %endpoint, "GET");

    let response = request
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| SourceError::Request {
            endpoint: endpoint.to_string(),
            source: source.without_url(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Http {
            endpoint: endpoint.to_string(),
            status,
            body,
        });
    }

    let text = response.text().await.map_err(|source| SourceError::Request {
        endpoint: endpoint.to_string(),
        source: source.without_url(),
    })?;

    serde_json::from_str(&text).map_err(|e| SourceError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
