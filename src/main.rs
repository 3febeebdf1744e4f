//! # Rokoko Bridge
//!
//! Trigger Rokoko Studio calibration and recording from a PlayStation controller.
//!
//! Usage: `rokoko-bridge [CONFIG_PATH]` (default `config/default.toml`).

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

use rokoko_bridge::automation::RecordAutomation;
use rokoko_bridge::bridge::{is_device_loss, Bridge, BridgeTiming};
use rokoko_bridge::config::Config;
use rokoko_bridge::controller::buttons;
use rokoko_bridge::controller::ps5::DualSenseController;
use rokoko_bridge::dispatch::{ActionMapping, Dispatcher};
use rokoko_bridge::executor::Executor;
use rokoko_bridge::logging;
use rokoko_bridge::service::protocol::CalibrateRequest;
use rokoko_bridge::service::HttpCaptureClient;

/// Config file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for Rokoko Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (defaults if the file is missing)
///    - Set up logging
///    - Open the controller
///    - Build the dispatcher, executor and capture service client
///
/// 2. **Main Loop**
///    - Poll the controller every `poll_interval_ms`
///    - Dispatch debounced actions and run them inline
///    - Probe the capture service every `health_check_interval_ms`
///
/// 3. **Shutdown**
///    - Ctrl+C exits cleanly
///    - Losing the controller exits with an error
///
/// # Errors
///
/// Returns error if:
/// - The config file exists but is invalid
/// - No controller can be opened
/// - The controller disconnects while running
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let (config, loaded) = if Path::new(&config_path).exists() {
        let config = Config::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?;
        (config, true)
    } else {
        (Config::default(), false)
    };

    let _log_guard = logging::init(&config.logging)?;

    info!("Rokoko Bridge v{} starting...", env!("CARGO_PKG_VERSION"));
    if loaded {
        info!("Loaded configuration from {}", config_path);
    } else {
        warn!("Config file {} not found, using defaults", config_path);
    }

    let controller = if config.controller.device_path.is_empty() {
        DualSenseController::open()
    } else {
        DualSenseController::open_path(&config.controller.device_path)
    }
    .context("Connect a PlayStation controller and try again")?;

    info!(
        "Controller connected: {} ({})",
        controller.name().unwrap_or("unknown"),
        controller.device_path()
    );

    let mapping = ActionMapping::from_bindings(&config.bindings);
    let automation = RecordAutomation::from_config(&config.automation);
    let automation_note = if automation.is_some() { " (+ screen automation)" } else { "" };
    for (button, action) in mapping.iter() {
        info!(
            "{:<8} (button {:>2}) -> {}{}",
            buttons::name_of(button),
            button,
            action,
            automation_note
        );
    }
    info!("Debounce window: {} s", config.debounce.seconds);

    let client = HttpCaptureClient::new(&config.service)?;
    let executor = Executor::new(
        Box::new(client),
        automation,
        CalibrateRequest::from(&config.calibration),
    );
    let dispatcher = Dispatcher::new(mapping, config.debounce.cooldown());

    let timing = BridgeTiming {
        poll_interval: config.controller.poll_interval(),
        health_check_interval: config.service.health_check_interval(),
    };

    match Bridge::new(controller, dispatcher, executor).run(timing).await {
        Ok(()) => {
            info!("Stopped.");
            Ok(())
        }
        Err(e) if is_device_loss(&e) => {
            error!("Controller disconnected, exiting");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
