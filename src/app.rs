//! Building and running the poll loop from an [`AppConfig`]

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use sensplot_core::{validate_config, PollLoop};
use sensplot_render::{create_renderer, BoxedRenderer};
use sensplot_sources::{create_client, discover, BoxedSensorClient};

use crate::config::AppConfig;

/// Poll loop over the configured sensor client and renderer
pub type AppLoop = PollLoop<BoxedSensorClient, BoxedRenderer>;

/// Build the poll loop described by `config`.
///
/// The startup guard runs before any collaborator is created; a
/// [`sensplot_core::StartupConfigError`] is returned unchanged so callers can
/// downcast it.
pub fn build_loop(config: &AppConfig) -> Result<AppLoop> {
    validate_config(&config.poll)?;

    let renderer = create_renderer(&config.render)?;
    let client = create_client(&config.sensor);
    let poll = PollLoop::new(config.poll.clone(), client, renderer)?;

    info!(
        "Polling {} every {:?}",
        poll.endpoint(),
        config.poll.cycle_interval()
    );
    Ok(poll)
}

/// Run the loop until `cycles` cycles are done (forever if `None`) or Ctrl-C
pub async fn run_until_shutdown(poll: &mut AppLoop, cycles: Option<u64>) -> Result<()> {
    let run = async {
        match cycles {
            Some(n) => poll.run_for(n).await,
            None => poll.run().await,
        }
    };

    tokio::select! {
        _ = run => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for Ctrl-C")?;
            warn!("Interrupted, shutting down");
        }
    }
    Ok(())
}

/// Write `config` to `path` if the poll loop would accept it
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    validate_config(&config.poll)?;
    config
        .save_to_path(path)
        .with_context(|| format!("saving {}", path.display()))
}

/// List the resources the configured sensor advertises
pub async fn discover_resources(config: &AppConfig) -> Result<Vec<String>> {
    let client = create_client(&config.sensor);
    let endpoint = config.poll.endpoint();
    let resources = discover(&client, &endpoint)
        .await
        .with_context(|| format!("discovering resources of {}", endpoint))?;
    Ok(resources)
}
