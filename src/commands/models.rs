use crate::api::OpenAiCompletion;
use crate::core::config::Config;
use console::style;

/// Print the supported models the provider currently offers.
///
/// Works even when the configured model is not one of them.
pub async fn run(config: &Config) -> Result<(), String> {
    let openai = config.openai().map_err(|e| e.to_string())?;
    let models = OpenAiCompletion::available_models(openai, reqwest::Client::new())
        .await
        .map_err(|e| e.to_string())?;

    println!("{}", style("OpenAI").green().bold());
    if models.is_empty() {
        println!("  {}", style("No supported models available").yellow());
    }
    for id in models {
        if id == config.provider.model {
            println!("  {} {}", id, style("(configured)").dim());
        } else {
            println!("  {}", id);
        }
    }
    Ok(())
}
