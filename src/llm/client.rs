use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// API family a model id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAi,
}

impl Provider {
    /// Infer the provider from a model id (`claude-*` is Anthropic, anything else OpenAI)
    pub fn for_model(model: &str) -> Self {
        if model.trim().to_ascii_lowercase().starts_with("claude") {
            Provider::Anthropic
        } else {
            Provider::OpenAi
        }
    }

    /// Environment variable holding the credential for this provider
    pub fn api_key_var(self) -> &'static str {
        match self {
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Configuration for the model client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key for the provider implied by `model`
    pub api_key: String,
    /// Model to use (e.g., "gpt-4o" or "claude-sonnet-4-20250514")
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Create config for `model`, reading the matching API key from the environment
    pub fn from_env(model: impl Into<String>, temperature: f64) -> Result<Self> {
        let model = model.into();
        let var = Provider::for_model(&model).api_key_var();
        let api_key =
            std::env::var(var).with_context(|| format!("{var} environment variable not set"))?;

        Ok(Self::new(api_key, model, temperature))
    }

    pub fn new(api_key: String, model: String, temperature: f64) -> Self {
        Self {
            api_key,
            model,
            temperature,
            max_tokens: 4096,
        }
    }

    pub fn provider(&self) -> Provider {
        Provider::for_model(&self.model)
    }
}

/// Chat client for either Anthropic or OpenAI, chosen by model id
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one system + user exchange and return the reply text
    pub async fn send_message(&self, system: &str, user: &str) -> Result<String> {
        debug!(model = %self.config.model, "Sending {} prompt chars", system.len() + user.len());
        match self.config.provider() {
            Provider::Anthropic => self.send_anthropic(system, user).await,
            Provider::OpenAi => self.send_openai(system, user).await,
        }
    }

    async fn send_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = anthropic_request(&self.config, system, user);

        let response = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error: {} - {}", status, body);
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        response.into_text().context("No text content in response")
    }

    async fn send_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = openai_request(&self.config, system, user);

        let response = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error: {} - {}", status, body);
        }

        let response: OpenAiResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        response.into_text().context("No text content in response")
    }
}

fn anthropic_request(config: &LlmConfig, system: &str, user: &str) -> AnthropicRequest {
    AnthropicRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
        system: Some(system.to_string()),
        messages: vec![Message {
            role: "user".to_string(),
            content: user.to_string(),
        }],
    }
}

fn openai_request(config: &LlmConfig, system: &str, user: &str) -> OpenAiRequest {
    OpenAiRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ],
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

impl AnthropicResponse {
    /// Concatenated text blocks, or `None` if the reply carried no text
    fn into_text(self) -> Option<String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

impl OpenAiResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
