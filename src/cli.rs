//! Defines the command-line interface structure using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promptfit", version, about = "Fit prompt templates onto completion models")]
pub struct Cli {
    /// Path to the config file (defaults to ~/.promptfit/config.toml)
    #[arg(long, global = true, env = "PROMPTFIT_CONFIG")]
    pub config: Option<PathBuf>,
    /// Templates directory, overriding the config file
    #[arg(long, global = true)]
    pub templates: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// List every available template
    Templates,
    /// Show the variables a template expects
    Vars { template: String },
    /// Render a template with variable substitution (local only)
    Render {
        template: String,
        #[arg(long = "var", help = "Variable assignments in key=value format")]
        vars: Vec<String>,
    },
    /// List supported models the provider currently offers
    Models,
    /// Render a template and run it on the model
    Fit {
        template: String,
        /// Variable assignments in key=value format; sampling options such as
        /// temperature=0.2 are routed to the model
        #[arg(long = "var")]
        vars: Vec<String>,
        /// Model to use, overriding the config file
        #[arg(long)]
        model: Option<String>,
        /// Print the whole result record as JSON
        #[arg(long)]
        json: bool,
    },
}
