//! Streaming chat client.

use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, Url};

use crate::error::CozeError;
use crate::sse::{SseEvent, SseParser};
use crate::types::{ApiFailure, ChatCompleted, ChatMessage, ChatRequest, ChatStatus, MessageDelta};

const DEFAULT_BASE_URL: &str = "https://api.coze.cn";
const CHAT_PATH: &str = "v3/chat";
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Client for the Coze v3 streaming chat API.
pub struct CozeClient {
    client: Client,
    token: String,
    bot_id: String,
    base_url: Url,
}

/// Running state of one streamed chat.
#[derive(Default)]
struct ChatAccumulator {
    answer: String,
    completed: bool,
    events_seen: bool,
    done: bool,
}

impl CozeClient {
    /// Creates a client pointed at the production Coze API.
    ///
    /// # Errors
    ///
    /// Returns [`CozeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, bot_id: &str, timeout_secs: u64) -> Result<Self, CozeError> {
        Self::with_base_url(token, bot_id, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CozeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CozeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        bot_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, CozeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CozeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_string(),
            bot_id: bot_id.to_string(),
            base_url,
        })
    }

    /// Runs one streamed chat and returns the accumulated answer text.
    ///
    /// Answer deltas are concatenated in arrival order; the call succeeds
    /// only after the chat-completed event.
    ///
    /// # Errors
    ///
    /// - [`CozeError::Api`] when the API reports a failure (error event,
    ///   failed chat, or a plain JSON error body).
    /// - [`CozeError::Stream`] when the stream ends before completion.
    /// - [`CozeError::EmptyCompletion`] when the chat completes but the
    ///   accumulated answer is empty.
    pub async fn chat(&self, user_id: &str, prompt: &str) -> Result<String, CozeError> {
        let url = self
            .base_url
            .join(CHAT_PATH)
            .map_err(|e| CozeError::InvalidBaseUrl {
                url: format!("{}{CHAT_PATH}", self.base_url),
                reason: e.to_string(),
            })?;

        let request = ChatRequest {
            bot_id: &self.bot_id,
            user_id,
            stream: true,
            auto_save_history: false,
            additional_messages: vec![ChatMessage {
                role: "user",
                content: prompt,
                content_type: "text",
            }],
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if let Ok(failure) = serde_json::from_str::<ApiFailure>(&body) {
                if failure.code != 0 {
                    return Err(CozeError::Api {
                        code: failure.code,
                        msg: failure.msg,
                    });
                }
            }
            return Err(CozeError::Stream {
                reason: format!("HTTP {status}"),
            });
        }

        let mut acc = ChatAccumulator::default();
        let mut parser = SseParser::new();
        let mut pending: Vec<u8> = Vec::new();
        let mut raw_body = String::new();

        let mut stream = response.bytes_stream();
        'outer: while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            pending.extend_from_slice(&chunk);

            // Only feed the parser complete UTF-8; a multi-byte character can
            // straddle a chunk boundary.
            let valid_len = match std::str::from_utf8(&pending) {
                Ok(_) => pending.len(),
                Err(e) => e.valid_up_to(),
            };
            if valid_len == 0 {
                continue;
            }
            let text = String::from_utf8_lossy(&pending[..valid_len]).into_owned();
            pending.drain(..valid_len);
            raw_body.push_str(&text);

            for event in parser.push(&text) {
                Self::apply_event(&event, &mut acc)?;
                if acc.done {
                    break 'outer;
                }
            }
        }

        if !acc.events_seen {
            // A non-streaming JSON error body arrives with HTTP 200.
            if let Ok(failure) = serde_json::from_str::<ApiFailure>(&raw_body) {
                if failure.code != 0 {
                    return Err(CozeError::Api {
                        code: failure.code,
                        msg: failure.msg,
                    });
                }
            }
        }

        if !acc.completed {
            return Err(CozeError::Stream {
                reason: "stream ended before chat completed".to_string(),
            });
        }
        if acc.answer.trim().is_empty() {
            return Err(CozeError::EmptyCompletion);
        }
        Ok(acc.answer)
    }

    fn apply_event(event: &SseEvent, acc: &mut ChatAccumulator) -> Result<(), CozeError> {
        acc.events_seen = true;
        match event.event.as_str() {
            "conversation.message.delta" => {
                if let Ok(delta) = serde_json::from_str::<MessageDelta>(&event.data) {
                    if delta.kind == "answer" {
                        acc.answer.push_str(&delta.content);
                    }
                }
            }
            "conversation.chat.completed" => {
                acc.completed = true;
                if let Some(usage) = serde_json::from_str::<ChatCompleted>(&event.data)
                    .ok()
                    .and_then(|c| c.usage)
                {
                    tracing::debug!(
                        tokens = usage.token_count,
                        output_tokens = usage.output_count,
                        "chat completed"
                    );
                }
            }
            "conversation.chat.failed" => {
                let failure = serde_json::from_str::<ChatStatus>(&event.data)
                    .ok()
                    .and_then(|s| s.last_error);
                return Err(match failure {
                    Some(f) => CozeError::Api {
                        code: f.code,
                        msg: f.msg,
                    },
                    None => CozeError::Stream {
                        reason: "chat failed without error detail".to_string(),
                    },
                });
            }
            "error" => {
                if let Ok(f) = serde_json::from_str::<ApiFailure>(&event.data) {
                    return Err(CozeError::Api {
                        code: f.code,
                        msg: f.msg,
                    });
                }
                return Err(CozeError::Stream {
                    reason: format!("error event: {}", event.data),
                });
            }
            "done" => {
                acc.done = true;
            }
            _ => {
                tracing::trace!(event = %event.event, "ignoring chat event");
            }
        }
        if event.data == "[DONE]" {
            acc.done = true;
        }
        Ok(())
    }
}
