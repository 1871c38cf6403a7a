use crate::api::PromptFitter;
use crate::core::config::Config;
use crate::core::utils::parse_vars;
use console::style;
use spinners::{Spinner, Spinners};

/// Render a template, run it on the model and print the response.
pub async fn run(
    config: &Config,
    template: &str,
    vars: &[String],
    model: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let vars = parse_vars(vars)?;
    let model = super::connect(config, model).await?;

    let fitter = PromptFitter::new(&model, &config.templates_dir)
        .with_allowed_missing(config.allowed_missing_variables.iter().cloned())
        .with_sampling(config.sampling.clone());

    let mut sp = Spinner::new(Spinners::Dots9, "Waiting for model response...".into());
    let result = fitter.fit(template, vars).await;
    match &result {
        Ok(_) => sp.stop_with_message("✔ Response received.".into()),
        Err(_) => sp.stop_with_message("✘ Request failed.".into()),
    }
    let record = result.map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    println!("\n{}", record.text.trim());
    if !record.usage.is_empty() {
        let usage = record
            .usage
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("\n{} {}", style("Usage:").dim(), style(usage).dim());
    }
    Ok(())
}
