pub mod cli;
pub mod core;
pub mod providers;

use crate::core::Dashboard;
use crate::core::config::AppConfig;
use crate::providers::BackendClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Show,
    Generate,
    UpdateRate,
}

/// Loads the config, wires the backend client into a dashboard and runs `command`.
///
/// `base_url` overrides the backend endpoint from the config file.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    base_url: Option<&str>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(url) = base_url {
        config.backend.base_url = url.to_string();
    }
    debug!("Loaded config: {config:#?}");
    info!(base_url = %config.backend.base_url, "Using indicators backend");

    let client = BackendClient::new(&config.backend.base_url, config.timeout())?;
    let mut dashboard =
        Dashboard::new(Arc::new(client)).with_generation_delay(config.generation_delay());

    match command {
        AppCommand::Show => cli::dashboard::show(&mut dashboard).await,
        AppCommand::Generate => cli::dashboard::generate(&mut dashboard).await,
        AppCommand::UpdateRate => cli::dashboard::update_rate(&mut dashboard).await,
    }
}
