//! OpenAI-compatible HTTP provider (Together API)
//!
//! One client serves both the embedding and the chat-completion seam.

use crate::config::RagConfig;
use crate::rag::traits::{ChatModel, Embedder};
use crate::rag::{RagError, RagResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Embedding and chat-completion client for an OpenAI-compatible API
#[derive(Clone)]
pub struct TogetherClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    embedding_model: String,
    chat_model: String,
    temperature: f32,
}

impl TogetherClient {
    /// Creates a client, reading the API key from the configured variable
    pub fn from_config(config: &RagConfig) -> RagResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| RagError::Config(format!("{} not set", config.api_key_env)))?;
        Ok(Self::with_api_key(config, api_key))
    }

    /// Creates a client with an explicit API key
    pub fn with_api_key(config: &RagConfig, api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req: Serialize + ?Sized, Resp: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        request: &Req,
    ) -> RagResult<Resp> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint, "Provider request failed");
                RagError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, endpoint, "Provider API error");
            return Err(RagError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RagError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Embedder for TogetherClient {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response: EmbeddingResponse = self.post("embeddings", &request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RagError::Parse("No embedding in response".into()))?;

        debug!(model = %self.embedding_model, dimension = embedding.len(), "Embedded text");
        Ok(embedding)
    }
}

#[async_trait]
impl ChatModel for TogetherClient {
    async fn complete(&self, prompt: &str) -> RagResult<String> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response: ChatResponse = self.post("chat/completions", &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RagError::Parse("No choices in completion response".into()))?;

        debug!(
            model = %self.chat_model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(content)
    }
}
