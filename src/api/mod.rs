//! High-level API for fitting prompt templates onto completion models.

mod error;
mod fitter;
mod model;
mod openai;
mod tokenizer;

pub use error::{FitError, ModelError, TemplateError};
pub use fitter::{split_variables, PromptFitter, Vars, DEFAULT_ALLOWED_MISSING};
pub use model::{ModelAdapter, ResultRecord, SamplingConfig};
pub use openai::{OpenAiCompletion, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, SUPPORTED_MODELS};
pub use tokenizer::Tokenizer;
