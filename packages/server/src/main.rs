#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the crime dashboard API server.
//!
//! Reads the layered configuration (file, then environment) and serves
//! the API until interrupted.

use crime_dash_config::DashboardConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DashboardConfig::load(None).map_err(std::io::Error::other)?;

    crime_dash_server::run_server(config).await
}
