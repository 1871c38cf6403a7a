//! The capability contract every completion backend implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::error::{FitError, ModelError};

/// Generation-control parameters forwarded with each prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub temperature: f32,
    /// Total token budget; the prompt's own length is subtracted from it.
    pub max_tokens: i64,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: Option<Vec<String>>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4000,
            top_p: 0.1,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
        }
    }
}

impl SamplingConfig {
    /// Names accepted by [`SamplingConfig::set`].
    pub const OPTION_NAMES: &'static [&'static str] = &[
        "temperature",
        "max_tokens",
        "top_p",
        "frequency_penalty",
        "presence_penalty",
        "stop",
    ];

    /// Returns a copy of this config with every given option applied.
    pub fn with_options(&self, options: &BTreeMap<String, Value>) -> Result<Self, FitError> {
        let mut config = self.clone();
        for (name, value) in options {
            config.set(name, value)?;
        }
        Ok(config)
    }

    /// Applies a single named option.
    pub fn set(&mut self, name: &str, value: &Value) -> Result<(), FitError> {
        let invalid = |reason: &str| FitError::InvalidOption {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let float = || {
            value
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| invalid("expected a number"))
        };

        match name {
            "temperature" => self.temperature = float()?,
            "top_p" => self.top_p = float()?,
            "frequency_penalty" => self.frequency_penalty = float()?,
            "presence_penalty" => self.presence_penalty = float()?,
            "max_tokens" => {
                self.max_tokens = value
                    .as_i64()
                    .ok_or_else(|| invalid("expected an integer"))?
            }
            "stop" => {
                self.stop = match value {
                    Value::Null => None,
                    Value::String(s) => Some(vec![s.clone()]),
                    Value::Array(items) => Some(
                        items
                            .iter()
                            .map(|item| {
                                item.as_str()
                                    .map(str::to_string)
                                    .ok_or_else(|| invalid("expected a list of strings"))
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                    _ => return Err(invalid("expected a string or a list of strings")),
                }
            }
            _ => return Err(invalid("unknown option")),
        }
        Ok(())
    }
}

/// Output for a single prompt: the provider's usage accounting plus the generated text.
///
/// Serializes as one flat mapping, e.g.
/// `{"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12, "text": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub usage: Map<String, Value>,
    pub text: String,
}

impl ResultRecord {
    /// Builds a record; a `text` entry in `usage` is discarded so the
    /// generated text is the only `text` field.
    pub fn new(mut usage: Map<String, Value>, text: String) -> Self {
        usage.remove("text");
        Self { usage, text }
    }
}

/// A remote text-completion backend.
///
/// Implementations are immutable once built; the bound model has already been
/// validated against [`ModelAdapter::list_supported_models`].
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Short provider name.
    fn name(&self) -> &str;

    /// One-line description of the backend.
    fn description(&self) -> &str;

    /// The model identifier prompts are sent to.
    fn model(&self) -> &str;

    /// Sampling options this backend understands. Named values matching one of
    /// these are routed to [`ModelAdapter::run`] by the prompt fitter.
    fn option_names(&self) -> &[&'static str] {
        SamplingConfig::OPTION_NAMES
    }

    /// Supported models that the provider currently reports as available,
    /// in the adapter's own preference order.
    async fn list_supported_models(&self) -> Result<Vec<String>, ModelError>;

    /// Runs every prompt in order and returns one record per prompt.
    async fn run(
        &self,
        prompts: &[String],
        config: &SamplingConfig,
    ) -> Result<Vec<ResultRecord>, ModelError>;
}
