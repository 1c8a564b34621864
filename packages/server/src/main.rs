#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone street traffic API server.
//!
//! Reads an optional TOML config from `TRAFFIC_CONFIG`, loads the dataset,
//! and serves the API until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use street_traffic::{EngineHandle, config};

/// Environment variable naming a TOML config file.
const CONFIG_ENV: &str = "TRAFFIC_CONFIG";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = config::resolve(config_path.as_deref()).map_err(std::io::Error::other)?;

    log::info!("Loading traffic data from {}", config.dataset_path.display());
    let handle = Arc::new(EngineHandle::load(config));

    street_traffic_server::run_server(handle).await
}
