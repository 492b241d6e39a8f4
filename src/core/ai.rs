// language-model backends - one rendered prompt in, one completion out

use crate::Error;
use crate::config::{LlmConfig, Provider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A hosted model that turns a fully-rendered prompt into text.
///
/// One call per prompt: no streaming, no retry. Every failure (transport,
/// auth, upstream status, timeout, empty payload) comes back as `Err`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, Error>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Build the backend selected by `config.provider`.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>, Error> {
    let client: Arc<dyn CompletionClient> = match config.provider {
        Provider::OpenAi => Arc::new(OpenAi::new(config)?),
        Provider::Claude => Arc::new(Claude::new(config)?),
    };
    Ok(client)
}

fn http_client(config: &LlmConfig) -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder().timeout(config.timeout).build()?)
}

// the upstream body is the most useful part of the error
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Completion(format!("upstream returned {status}: {body}")))
}

// openai chat completions

pub struct OpenAi {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAi {
    pub fn new(config: &LlmConfig) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/v1/chat/completions", config.base_url),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAi {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response: ChatResponse = check_status(response).await?.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Completion("upstream returned no completion".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// anthropic messages

pub struct Claude {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    text: String,
}

impl Claude {
    pub fn new(config: &LlmConfig) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/v1/messages", config.base_url),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for Claude {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: 1024,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await?;

        let response: MessagesResponse = check_status(response).await?.json().await?;

        response
            .content
            .into_iter()
            .map(|c| c.text)
            .find(|text| !text.is_empty())
            .ok_or_else(|| Error::Completion("upstream returned no completion".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
