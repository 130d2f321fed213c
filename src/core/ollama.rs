use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::OllamaError;
use crate::models::ModelConfig;

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    config: ModelConfig,
}

/// Chat message for Ollama chat API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Request body for Ollama chat endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// One NDJSON line of a streamed chat response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatMessageResponse>,
    done: bool,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration
    pub fn new(config: ModelConfig) -> Result<Self, OllamaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| OllamaError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Generate a response using the chat API
    ///
    /// - `system_prompt`: Optional system prompt for this request
    /// - `prompt`: The user prompt
    /// - `stream_to_stdout`: If true, echo tokens to stdout as they arrive
    pub async fn generate(
        &self,
        system_prompt: Option<&str>,
        prompt: &str,
        stream_to_stdout: bool,
    ) -> Result<String, OllamaError> {
        let url = format!("{}/api/chat", self.config.url);

        let mut messages = Vec::new();
        if let Some(sys) = system_prompt {
            messages.push(ChatMessage::system(sys));
        }
        messages.push(ChatMessage::user(prompt));

        let request = ChatRequest {
            model: self.config.name.clone(),
            messages,
            stream: true,
        };

        debug!("Sending chat request to Ollama: {} (model {})", url, self.config.name);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    OllamaError::ConnectionRefused(format!(
                        "Could not connect to Ollama at {}. Is Ollama running?",
                        self.config.url
                    ))
                } else if e.is_timeout() {
                    OllamaError::Timeout(self.config.timeout_seconds)
                } else {
                    OllamaError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OllamaError::HttpError { status, message });
        }

        let mut full_response = String::new();
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        'outer: while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| OllamaError::StreamError(e.to_string()))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Ollama sends newline-delimited JSON
            while let Some(newline_pos) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline_pos).collect();
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let parsed = parse_chat_line(line)?;
                let content = parsed
                    .message
                    .as_ref()
                    .map(|m| m.content.as_str())
                    .unwrap_or("");
                full_response.push_str(content);

                if stream_to_stdout {
                    print!("{}", content);
                    io::stdout().flush().ok();
                }

                if parsed.done {
                    if stream_to_stdout {
                        println!();
                    }
                    if let Some(count) = parsed.eval_count {
                        debug!("Tokens generated: {}", count);
                    }
                    break 'outer;
                }
            }
        }

        info!("Generated {} characters", full_response.len());
        Ok(full_response)
    }

    /// Check if Ollama is reachable
    pub async fn health_check(&self) -> Result<bool, OllamaError> {
        let url = format!("{}/api/tags", self.config.url);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    OllamaError::ConnectionRefused(format!(
                        "Could not connect to Ollama at {}",
                        self.config.url
                    ))
                } else {
                    OllamaError::from(e)
                }
            })?;

        Ok(response.status().is_success())
    }
}

fn parse_chat_line(line: &str) -> Result<ChatResponse, OllamaError> {
    serde_json::from_str(line).map_err(|e| {
        let preview: String = line.chars().take(200).collect();
        OllamaError::ParseError(format!("Failed to parse: {} - {}", preview, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn test_parse_chat_line() {
        let parsed = parse_chat_line(
            r#"{"model":"m","message":{"role":"assistant","content":"FILE: a.py"},"done":false}"#,
        )
        .unwrap();
        assert_eq!(parsed.message.unwrap().content, "FILE: a.py");
        assert!(!parsed.done);

        let last = parse_chat_line(r#"{"done":true,"eval_count":42}"#).unwrap();
        assert!(last.done);
        assert_eq!(last.eval_count, Some(42));
    }

    #[test]
    fn test_parse_chat_line_error() {
        let result = parse_chat_line("not json");
        assert!(matches!(result, Err(OllamaError::ParseError(_))));
    }

    #[test]
    fn test_unreachable_server() {
        let config = ModelConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..Default::default()
        };
        let client = OllamaClient::new(config).unwrap();

        let result = tokio_test::block_on(client.generate(None, "hello", false));
        assert!(result.is_err());
    }
}
