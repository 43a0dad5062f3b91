use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api;
use crate::config::Config;

/// Chat-completion models, one per natural-language subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "sonar-pro")]
    SonarPro,
    #[serde(rename = "sonar-deep-research")]
    SonarDeepResearch,
    #[serde(rename = "sonar-reasoning-pro")]
    SonarReasoningPro,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SonarPro => "sonar-pro",
            Self::SonarDeepResearch => "sonar-deep-research",
            Self::SonarReasoningPro => "sonar-reasoning-pro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: Model,
    pub messages: Vec<ChatMessage>,
}

// Every consumed field defaults when absent: a 2xx response with missing
// pieces degrades to an empty answer instead of an error.
#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Sends one single-message chat completion and renders the answer for the
/// terminal, with citations appended when the API supplies them.
pub async fn chat_completion(
    client: &Client,
    cfg: &Config,
    query: &str,
    model: Model,
    strip_thinking: bool,
) -> Result<String> {
    let request = ChatRequest {
        model,
        messages: vec![ChatMessage::user(query)],
    };
    debug!(model = model.as_str(), strip_thinking, "dispatching chat completion");

    let response: ChatResponse =
        api::post(client, cfg, api::CHAT_COMPLETIONS_PATH, &request).await?;
    debug!(
        model = model.as_str(),
        citation_count = response.citations.len(),
        "received chat completion"
    );
    Ok(render_response(response, strip_thinking))
}

fn render_response(response: ChatResponse, strip_thinking: bool) -> String {
    let mut content = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .unwrap_or_default();

    if strip_thinking {
        content = strip_thinking_tokens(&content);
    }

    if !response.citations.is_empty() {
        content.push_str("\n\nCitations:");
        for (idx, citation) in response.citations.iter().enumerate() {
            content.push_str(&format!("\n[{}] {}", idx + 1, citation));
        }
    }

    content
}

/// Removes `<think>...</think>` spans and trims the remainder. Each opening
/// marker pairs with the nearest following closing marker; an opening marker
/// with no closing marker is left untouched.
fn strip_thinking_tokens(content: &str) -> String {
    static THINK_SPAN: OnceLock<Regex> = OnceLock::new();
    let re = THINK_SPAN
        .get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("think-span pattern is valid"));
    re.replace_all(content, "").trim().to_string()
}
