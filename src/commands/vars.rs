use crate::core::config::Config;
use crate::core::templates::TemplateStore;
use console::style;

/// Show the variables a template expects, marking the optional ones.
pub fn run(config: &Config, template: &str) -> Result<(), String> {
    let store = TemplateStore::new(&config.templates_dir);
    let vars = store.variables(template).map_err(|e| e.to_string())?;

    println!("{} {}", style("Template:").green().bold(), template);
    for var in vars {
        if config.allowed_missing_variables.contains(&var) {
            println!("  {} {}", var, style("(optional)").dim());
        } else {
            println!("  {}", var);
        }
    }
    Ok(())
}
