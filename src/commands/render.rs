use crate::core::config::Config;
use crate::core::templates::TemplateStore;
use crate::core::utils::parse_vars;
use std::collections::BTreeSet;

/// Render a template with variables and print it to stdout.
pub fn run(config: &Config, template: &str, vars: &[String]) -> Result<(), String> {
    let vars = parse_vars(vars)?;
    let allowed: BTreeSet<String> = config.allowed_missing_variables.iter().cloned().collect();

    let store = TemplateStore::new(&config.templates_dir);
    let rendered = store
        .generate_prompt(template, &vars, &allowed)
        .map_err(|e| e.to_string())?;

    println!("{}", rendered);
    Ok(())
}
