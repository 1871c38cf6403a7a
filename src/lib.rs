pub mod api;
pub mod cli;
pub mod commands;
pub mod core;

pub use api::{
    FitError, ModelAdapter, ModelError, OpenAiCompletion, OpenAiConfig, PromptFitter,
    ResultRecord, SamplingConfig, TemplateError, Vars,
};
