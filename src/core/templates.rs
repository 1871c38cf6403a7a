//! Filesystem-backed Jinja template store.

use minijinja::{path_loader, Environment, ErrorKind};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::TemplateError;

/// Loads, inspects and renders the templates found under one directory.
pub struct TemplateStore {
    dir: PathBuf,
    env: Environment<'static>,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(dir.clone()));
        Self { dir, env }
    }

    /// Directory the templates are loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of every template under the directory, relative to it and sorted.
    pub fn list_templates(&self) -> Result<Vec<String>, TemplateError> {
        let mut names = Vec::new();
        if self.dir.is_dir() {
            collect_templates(&self.dir, "", &mut names)?;
        }
        names.sort();
        Ok(names)
    }

    /// Variables the template reads but never assigns itself.
    pub fn variables(&self, name: &str) -> Result<BTreeSet<String>, TemplateError> {
        let tmpl = self.env.get_template(name).map_err(|e| not_found(name, e))?;
        Ok(tmpl.undeclared_variables(false).into_iter().collect())
    }

    /// Renders the template after checking that every variable outside
    /// `allowed_missing` is bound. The result is trimmed of surrounding whitespace.
    pub fn generate_prompt(
        &self,
        name: &str,
        vars: &BTreeMap<String, Value>,
        allowed_missing: &BTreeSet<String>,
    ) -> Result<String, TemplateError> {
        let missing: Vec<String> = self
            .variables(name)?
            .into_iter()
            .filter(|v| !vars.contains_key(v) && !allowed_missing.contains(v))
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::MissingVariables {
                template: name.to_string(),
                missing,
            });
        }

        Ok(self.render(name, vars)?.trim().to_string())
    }

    /// Renders the template with the given bindings. Unbound variables render empty.
    pub fn render(&self, name: &str, vars: &BTreeMap<String, Value>) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template(name).map_err(|e| not_found(name, e))?;
        Ok(tmpl.render(vars)?)
    }
}

fn not_found(name: &str, err: minijinja::Error) -> TemplateError {
    if matches!(err.kind(), ErrorKind::TemplateNotFound) {
        TemplateError::NotFound(name.to_string())
    } else {
        TemplateError::Engine(err)
    }
}

/// Recursive helper gathering template names with `/` separators.
fn collect_templates(dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<(), TemplateError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }

        let name = if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", prefix, file_name)
        };
        let path = entry.path();
        if path.is_dir() {
            collect_templates(&path, &name, names)?;
        } else if path.is_file() {
            names.push(name);
        }
    }
    Ok(())
}
