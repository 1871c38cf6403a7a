use clap::Parser;
use promptfit::cli::Cli;
use promptfit::commands;
use promptfit::core::config::Config;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        eprintln!("• {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(dir) = cli.templates {
        config.templates_dir = dir;
    }
    debug!(templates_dir = %config.templates_dir.display(), model = %config.provider.model, "configuration loaded");

    commands::dispatch(cli.command, &config).await
}
