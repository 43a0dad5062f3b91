mod http_errors;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use http_errors::api_request_error;

pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const SEARCH_PATH: &str = "/search";

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Performs the single JSON POST of an invocation and buffers the full
/// response before parsing. Response types are expected to tolerate missing
/// fields; only transport failures, timeouts, and non-2xx statuses are errors.
pub async fn post<B, T>(client: &Client, cfg: &Config, path: &str, body: &B) -> Result<T>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let api_url = endpoint_url(&cfg.api_base_url, path);
    debug!(api_url = %api_url, "sending API request");

    let response = client
        .post(&api_url)
        .bearer_auth(&cfg.api_key)
        .json(body)
        .send()
        .await
        .map_err(|err| {
            warn!(api_url = %api_url, error = %err, "API request failed");
            api_request_error(err, &api_url, cfg.timeout_secs())
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        warn!(
            api_url = %api_url,
            status = %status,
            response_body_len = response_body.len(),
            "API returned non-success status"
        );
        return Err(anyhow!(
            "API request failed with status {}: {}",
            status,
            response_body
        ));
    }

    debug!(api_url = %api_url, "received API response");
    response.json().await.context("Failed to parse API response")
}
