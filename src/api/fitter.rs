//! Fits a flat bag of named values onto a template and a model.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;

use super::error::{FitError, ModelError, TemplateError};
use super::model::{ModelAdapter, ResultRecord, SamplingConfig};
use crate::core::templates::TemplateStore;

/// Variables a template may reference without the caller binding them.
pub const DEFAULT_ALLOWED_MISSING: &[&str] = &["examples", "description", "output_format"];

/// Named values handed to the fitter.
pub type Vars = BTreeMap<String, Value>;

/// Renders templates and runs them on a borrowed model.
///
/// The model's option names are captured once, when the fitter is built. Only
/// names [`SamplingConfig`] can apply are kept.
pub struct PromptFitter<'a, M: ModelAdapter + ?Sized> {
    templates: TemplateStore,
    model: &'a M,
    allowed_missing_variables: BTreeSet<String>,
    model_variable_names: BTreeSet<String>,
    sampling: SamplingConfig,
}

impl<'a, M: ModelAdapter + ?Sized> PromptFitter<'a, M> {
    pub fn new(model: &'a M, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: TemplateStore::new(templates_dir),
            model,
            allowed_missing_variables: DEFAULT_ALLOWED_MISSING
                .iter()
                .map(|v| v.to_string())
                .collect(),
            model_variable_names: model
                .option_names()
                .iter()
                .filter(|v| SamplingConfig::OPTION_NAMES.contains(v))
                .map(|v| v.to_string())
                .collect(),
            sampling: SamplingConfig::default(),
        }
    }

    /// Replaces the set of variables that may be left unbound.
    pub fn with_allowed_missing(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_missing_variables = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sampling options used when the caller does not override them.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn allowed_missing_variables(&self) -> &BTreeSet<String> {
        &self.allowed_missing_variables
    }

    pub fn model_variable_names(&self) -> &BTreeSet<String> {
        &self.model_variable_names
    }

    pub fn model(&self) -> &M {
        self.model
    }

    pub fn list_templates(&self) -> Result<Vec<String>, TemplateError> {
        self.templates.list_templates()
    }

    pub fn get_template_variables(&self, template_name: &str) -> Result<BTreeSet<String>, TemplateError> {
        self.templates.variables(template_name)
    }

    /// Renders the template, failing if a required variable is unbound.
    /// The result is trimmed of surrounding whitespace.
    pub fn generate_prompt(&self, template_name: &str, vars: &Vars) -> Result<String, TemplateError> {
        self.templates
            .generate_prompt(template_name, vars, &self.allowed_missing_variables)
    }

    /// Splits `vars` between the template and the model, renders the prompt
    /// and returns the model's record for it.
    pub async fn fit(&self, template_name: &str, vars: Vars) -> Result<ResultRecord, FitError> {
        let template_variables = self.get_template_variables(template_name)?;
        let (prompt_vars, model_vars) =
            split_variables(&template_variables, &self.model_variable_names, vars);

        let prompt = self.generate_prompt(template_name, &prompt_vars)?;
        let config = self.sampling.with_options(&model_vars)?;
        debug!(
            template = template_name,
            prompt_len = prompt.len(),
            options = ?model_vars.keys().collect::<Vec<_>>(),
            model = self.model.model(),
            "running fitted prompt"
        );

        self.model
            .run(&[prompt], &config)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                FitError::from(ModelError::MalformedResponse(
                    "model returned no record for the prompt".to_string(),
                ))
            })
    }
}

/// Partitions `vars` into `(template bindings, model options)`.
///
/// Template variables win when a name belongs to both sets. Names in neither
/// set are dropped.
pub fn split_variables(
    template_variables: &BTreeSet<String>,
    model_variables: &BTreeSet<String>,
    vars: Vars,
) -> (Vars, Vars) {
    let mut prompt_vars = Vars::new();
    let mut model_vars = Vars::new();
    for (name, value) in vars {
        if template_variables.contains(&name) {
            prompt_vars.insert(name, value);
        } else if model_variables.contains(&name) {
            model_vars.insert(name, value);
        } else {
            debug!(name = %name, "dropping variable unknown to template and model");
        }
    }
    (prompt_vars, model_vars)
}
