use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api;
use crate::config::Config;

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const DEFAULT_MAX_TOKENS_PER_PAGE: u32 = 1024;

/// Search request body. Range limits (1-20 results, 256-2048 tokens per page)
/// are enforced by the remote service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub max_tokens_per_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    title: Option<String>,
    url: Option<String>,
    snippet: Option<String>,
    date: Option<String>,
}

/// Runs one web search and renders the ranked results. The returned string
/// carries its own trailing newlines and is written with `print!`.
pub async fn web_search(client: &Client, cfg: &Config, request: &SearchRequest) -> Result<String> {
    debug!(
        query = %request.query,
        max_results = request.max_results,
        country = request.country.as_deref().unwrap_or("-"),
        "dispatching web search"
    );

    let response: SearchResponse = api::post(client, cfg, api::SEARCH_PATH, request).await?;
    debug!(result_count = response.results.len(), "received search results");
    Ok(format_results(&response.results))
}

fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No search results found.\n".to_string();
    }

    let mut out = format!("Found {} search results:\n\n", results.len());
    for (idx, result) in results.iter().enumerate() {
        let title = result.title.as_deref().unwrap_or("No title");
        let url = result.url.as_deref().unwrap_or("N/A");
        out.push_str(&format!("{}. **{}**\n", idx + 1, title));
        out.push_str(&format!("   URL: {}\n", url));
        if let Some(snippet) = result.snippet.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!("   {}\n", snippet));
        }
        if let Some(date) = result.date.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("   Date: {}\n", date));
        }
        out.push('\n');
    }

    out
}
