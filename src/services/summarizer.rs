//! HTTP client for the summarization model service.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. Used for the
//! one-shot document summary after upload and for answering chat questions
//! with the stored summary plus recent history as context.

use crate::configuration::SummarizerSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;

const SUMMARY_INSTRUCTION: &str = "You summarize documents. Produce a concise summary of the \
     following document text, covering its key points and conclusions.";

const CHAT_INSTRUCTION: &str = "You answer questions about a document. Ground every answer in \
     the provided summary and conversation; say so when the document does not contain the answer.";

/// One prior turn of a document conversation, oldest first.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[async_trait]
pub trait SummaryEngine: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError>;

    async fn answer(
        &self,
        summary: &str,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String, SummarizerError>;
}

/// Reqwest-backed engine.
#[derive(Clone)]
pub struct SummarizerClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl SummarizerClient {
    pub fn new(settings: &SummarizerSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            client,
        }
    }

    async fn complete(&self, messages: Vec<Message>) -> Result<String, SummarizerError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut request = self.client.post(&url).json(&CompletionRequest {
            model: &self.model,
            messages,
        });
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SummarizerError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Api {
                status,
                message: body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(SummarizerError::EmptyCompletion)
    }
}

#[async_trait]
impl SummaryEngine for SummarizerClient {
    async fn summarize(&self, text: &str) -> Result<String, SummarizerError> {
        self.complete(vec![
            Message::system(SUMMARY_INSTRUCTION),
            Message::user(text),
        ])
        .await
    }

    async fn answer(
        &self,
        summary: &str,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String, SummarizerError> {
        let mut messages = vec![
            Message::system(CHAT_INSTRUCTION),
            Message::system(&format!("Document summary:\n{summary}")),
        ];
        for turn in history {
            messages.push(Message {
                role: turn.role.clone(),
                content: turn.content.clone(),
            });
        }
        messages.push(Message::user(question));

        self.complete(messages).await
    }
}

/// Error types for summarizer operations
#[derive(Debug)]
pub enum SummarizerError {
    Request(String),
    Api { status: u16, message: String },
    Parse(String),
    EmptyCompletion,
}

impl std::fmt::Display for SummarizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizerError::Request(msg) => write!(f, "Request error: {}", msg),
            SummarizerError::Api { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            SummarizerError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SummarizerError::EmptyCompletion => write!(f, "Model returned no choices"),
        }
    }
}

impl std::error::Error for SummarizerError {}

// Wire types

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Message,
}
