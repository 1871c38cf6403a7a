use crate::api::OpenAiCompletion;
use crate::cli::Cmd;
use crate::core::config::Config;

pub mod fit;
pub mod models;
pub mod render;
pub mod templates;
pub mod vars;

/// Dispatches the parsed command to the appropriate handler.
pub async fn dispatch(command: Cmd, config: &Config) -> Result<(), String> {
    match command {
        Cmd::Templates => templates::run(config),
        Cmd::Vars { template } => vars::run(config, &template),
        Cmd::Render { template, vars } => render::run(config, &template, &vars),
        Cmd::Models => models::run(config).await,
        Cmd::Fit {
            template,
            vars,
            model,
            json,
        } => fit::run(config, &template, &vars, model.as_deref(), json).await,
    }
}

/// Connects to the configured provider, optionally overriding the model.
pub(crate) async fn connect(config: &Config, model: Option<&str>) -> Result<OpenAiCompletion, String> {
    let mut openai = config.openai().map_err(|e| e.to_string())?;
    if let Some(model) = model {
        openai = openai.with_model(model);
    }
    OpenAiCompletion::connect(openai, reqwest::Client::new())
        .await
        .map_err(|e| e.to_string())
}
