//! HTTP drafting client for OpenAI-compatible chat completion endpoints.

use std::time::Duration;

use counsel_core::drafting::{DraftError, DraftRequest, SectionDrafter};
use counsel_core::error::{CounselError, CounselResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::DraftingConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Drafts sections through a remote language model.
#[derive(Debug, Clone)]
pub struct HttpSectionDrafter {
    client: reqwest::Client,
    config: DraftingConfig,
}

impl HttpSectionDrafter {
    pub fn new(config: DraftingConfig) -> CounselResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CounselError::Config(format!("drafting client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DraftingConfig {
        &self.config
    }
}

impl SectionDrafter for HttpSectionDrafter {
    #[instrument(name = "draft_section_http", skip_all, fields(section = %request.section_id))]
    async fn draft(&self, request: DraftRequest) -> Result<String, DraftError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut req = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                DraftError::Timeout
            } else {
                DraftError::Unavailable(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| DraftError::Unavailable(format!("malformed response: {e}")))?;
        let text = extract_text(parsed)?;
        debug!(chars = text.len(), "Section drafted");
        Ok(text)
    }
}

/// Map a non-success status to a transient or permanent failure.
fn classify_status(status: StatusCode) -> DraftError {
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        DraftError::Unavailable(format!("status {status}"))
    } else {
        DraftError::Rejected(format!("status {status}"))
    }
}

fn extract_text(response: ChatResponse) -> Result<String, DraftError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(DraftError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_transient() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::REQUEST_TIMEOUT,
        ] {
            assert!(classify_status(status).is_transient(), "{status}");
        }
    }

    #[test]
    fn client_errors_are_not_retried() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::BAD_REQUEST] {
            assert!(!classify_status(status).is_transient(), "{status}");
        }
    }

    #[test]
    fn extracts_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  The facts.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "The facts.");
    }

    #[test]
    fn blank_or_missing_content_is_empty() {
        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(matches!(
            extract_text(blank),
            Err(DraftError::EmptyResponse)
        ));
        let none: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_text(none), Err(DraftError::EmptyResponse)));
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "p",
                },
            ],
            max_tokens: 100,
            temperature: 0.25,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][1]["content"], "p");
        assert_eq!(json["max_tokens"], 100);
    }
}
