//! Error types for the library API.

use thiserror::Error;

/// Errors raised by a model adapter, at construction or while running prompts.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The requested model is not in the supported set the provider currently offers.
    #[error("model not supported: '{model}' (available: {})", .available.join(", "))]
    UnsupportedModel { model: String, available: Vec<String> },

    /// The prompt alone uses up the whole token budget, nothing is left to generate.
    #[error("prompt uses {prompt_tokens} tokens, which leaves no room under max_tokens = {max_tokens}")]
    PromptExceedsBudget { prompt_tokens: usize, max_tokens: i64 },

    /// The tokenizer could not be loaded.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// The request never got a response (connection, TLS, timeout...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The provider answered with a body we could not interpret.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Errors related to template discovery, parsing and binding.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template with this name exists under the templates directory.
    #[error("Template '{0}' not found")]
    NotFound(String),

    /// The render call did not bind every required variable.
    #[error("Missing required variables in template '{template}': {}", .missing.join(", "))]
    MissingVariables { template: String, missing: Vec<String> },

    /// The template engine failed to parse or render.
    #[error("Template engine error: {0}")]
    Engine(#[from] minijinja::Error),

    /// The templates directory could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A comprehensive error type for fitting a template onto a model.
#[derive(Error, Debug)]
pub enum FitError {
    /// An error originating from the template side.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An error originating from the model adapter.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A sampling option was given a value of the wrong shape.
    #[error("Invalid value for sampling option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },
}
