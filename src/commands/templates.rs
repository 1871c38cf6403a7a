use crate::core::config::Config;
use crate::core::templates::TemplateStore;
use console::style;

/// List every template under the templates directory.
pub fn run(config: &Config) -> Result<(), String> {
    let store = TemplateStore::new(&config.templates_dir);
    let names = store.list_templates().map_err(|e| e.to_string())?;

    if names.is_empty() {
        println!(
            "{}",
            style(format!("No templates found in {}", store.dir().display())).yellow()
        );
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}
