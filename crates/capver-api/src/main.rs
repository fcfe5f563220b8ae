//! Binary entrypoint for the capver API server.
use anyhow::Context;
use capver_api::{run, AppState};
use capver_core::config::env_value;
use capver_core::RegistryConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // CAPVER_CONFIG points at a YAML config; CAPVER_* variables override it
    let config = match env_value("CAPVER_CONFIG") {
        Some(path) => RegistryConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => RegistryConfig::default(),
    }
    .apply_env()?;

    let state = AppState::from_config(&config)?;
    let addr = env_value("CAPVER_ADDR").unwrap_or_else(|| "0.0.0.0:8787".to_string());
    run(&addr, state).await.context("server error")?;
    Ok(())
}
