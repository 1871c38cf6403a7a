//! Loads the promptfit configuration file.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{OpenAiConfig, SamplingConfig, DEFAULT_ALLOWED_MISSING, DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to determine HOME directory")]
    NoHome,

    #[error("Config file {0} does not exist")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable '{0}' is not set")]
    MissingApiKey(String),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub templates_dir: PathBuf,
    pub allowed_missing_variables: Vec<String>,
    pub provider: ProviderConfig,
    pub sampling: SamplingConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            allowed_missing_variables: DEFAULT_ALLOWED_MISSING.iter().map(|v| v.to_string()).collect(),
            provider: ProviderConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// `~/.promptfit/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = env::var("HOME").map_err(|_| ConfigError::NoHome)?;
        Ok(PathBuf::from(home).join(".promptfit").join("config.toml"))
    }

    /// Loads the config from `path`, or from the default location when `path` is `None`.
    ///
    /// An explicit path must exist. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::default_path()?;
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads the API key from the environment variable the provider names.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        env::var(&self.provider.api_key_env)
            .map_err(|_| ConfigError::MissingApiKey(self.provider.api_key_env.clone()))
    }

    /// Connection settings for the OpenAI adapter, with the API key resolved.
    pub fn openai(&self) -> Result<OpenAiConfig, ConfigError> {
        Ok(OpenAiConfig::new(self.api_key()?)
            .with_model(&self.provider.model)
            .with_base_url(&self.provider.base_url))
    }
}
