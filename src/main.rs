mod config;
mod error;
mod services;
mod session;

use std::sync::Arc;

use tracing::info;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::services::annotation::MockAnnotator;
use crate::session::Session;

#[tokio::main]
async fn main() -> Result<(), HostError> {
    // Logs go to stderr; stdout carries the session report.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = HostConfig::from_env()?;
    let steps = match &config.script {
        Some(path) => session::load_script(path).await?,
        None => session::demo_script(),
    };
    info!(variant = ?config.variant, steps = steps.len(), latency_ms = config.scan_latency.as_millis(), "design review starting");

    let canvas = config.canvas_config()?;
    let annotator = Arc::new(MockAnnotator::new(config.scan_latency));
    let report = Session::new(canvas, annotator, config.settle_timeout).run(steps).await;

    let json = serde_json::to_string_pretty(&report).map_err(HostError::Report)?;
    println!("{json}");
    Ok(())
}
