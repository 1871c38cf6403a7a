//! Adapter for OpenAI's legacy text-completion endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::ModelError;
use super::model::{ModelAdapter, ResultRecord, SamplingConfig};
use super::tokenizer::Tokenizer;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-davinci-003";

/// Completion models this adapter knows how to drive, in preference order.
pub const SUPPORTED_MODELS: &[&str] = &[
    "text-davinci-003",
    "text-curie-001",
    "text-babbage-001",
    "text-ada-001",
];

/// Connection settings for [`OpenAiCompletion`].
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: i64,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stop: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    usage: Map<String, Value>,
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// A validated connection to one OpenAI completion model.
#[derive(Debug)]
pub struct OpenAiCompletion {
    config: OpenAiConfig,
    http: reqwest::Client,
    tokenizer: Tokenizer,
}

impl OpenAiCompletion {
    /// Builds the adapter and checks the requested model against the models
    /// the provider currently offers.
    pub async fn connect(config: OpenAiConfig, http: reqwest::Client) -> Result<Self, ModelError> {
        let adapter = Self::unchecked(config, http)?;

        let available = adapter.list_supported_models().await?;
        if !available.iter().any(|m| *m == adapter.config.model) {
            return Err(ModelError::UnsupportedModel {
                model: adapter.config.model.clone(),
                available,
            });
        }

        info!(model = %adapter.config.model, "connected to OpenAI completion model");
        Ok(adapter)
    }

    /// Supported models the provider currently offers, without requiring the
    /// configured model to be one of them.
    pub async fn available_models(
        config: OpenAiConfig,
        http: reqwest::Client,
    ) -> Result<Vec<String>, ModelError> {
        Self::unchecked(config, http)?.list_supported_models().await
    }

    fn unchecked(config: OpenAiConfig, http: reqwest::Client) -> Result<Self, ModelError> {
        Ok(Self {
            config,
            http,
            tokenizer: Tokenizer::new()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn complete(&self, prompt: &str, config: &SamplingConfig) -> Result<ResultRecord, ModelError> {
        let prompt_tokens = self.tokenizer.count(prompt);
        let max_tokens = config.max_tokens.saturating_sub(prompt_tokens as i64);
        if max_tokens <= 0 {
            return Err(ModelError::PromptExceedsBudget {
                prompt_tokens,
                max_tokens: config.max_tokens,
            });
        }
        debug!(prompt_tokens, max_tokens, "sending completion request");

        let body = CompletionRequest {
            model: &self.config.model,
            prompt,
            temperature: config.temperature,
            max_tokens,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
            stop: config.stop.as_deref(),
        };

        let resp = self
            .http
            .post(self.url("completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let resp: CompletionResponse = read_json(resp).await?;

        let text = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .ok_or_else(|| ModelError::MalformedResponse("no completion choice returned".to_string()))?;

        Ok(ResultRecord::new(resp.usage, text))
    }
}

/// Decodes a JSON response body. A non-success status becomes
/// [`ModelError::Provider`], preferring the provider's own error message over
/// the raw body.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ModelError> {
    let status = resp.status();
    let raw = resp.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .map(|e| e.error.message)
            .unwrap_or(raw);
        return Err(ModelError::Provider {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_str(&raw).map_err(|e| ModelError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl ModelAdapter for OpenAiCompletion {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn description(&self) -> &str {
        "OpenAI API for text completion using various models"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn list_supported_models(&self) -> Result<Vec<String>, ModelError> {
        let resp = self
            .http
            .get(self.url("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        let listed: ModelList = read_json(resp).await?;
        debug!(count = listed.data.len(), "provider reported models");

        Ok(SUPPORTED_MODELS
            .iter()
            .filter(|m| listed.data.iter().any(|entry| entry.id == **m))
            .map(|m| m.to_string())
            .collect())
    }

    async fn run(
        &self,
        prompts: &[String],
        config: &SamplingConfig,
    ) -> Result<Vec<ResultRecord>, ModelError> {
        let mut records = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            records.push(self.complete(prompt, config).await?);
        }
        Ok(records)
    }
}
