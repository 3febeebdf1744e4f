//! # Screen Automation Module
//!
//! Optional fallback for a second application that has no HTTP API.
//!
//! Starting a take locates the application's record control, clicks it, then
//! presses space; stopping presses space again. The clicker is a capability
//! behind [`ScreenClicker`] so the executor works the same with or without it.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::config::AutomationConfig;
use crate::error::{BridgeError, Result};

pub mod xdotool;

pub use xdotool::XdotoolClicker;

/// Key that toggles recording in the target application
pub const RECORD_TOGGLE_KEY: &str = "space";

/// Absolute screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

/// Trait for driving mouse and keyboard on the desktop
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScreenClicker: Send + Sync {
    /// Find the record control. `Ok(None)` means it is not on screen.
    async fn locate(&self) -> Result<Option<ScreenPoint>>;

    /// Left-click at `at`
    async fn click(&self, at: ScreenPoint) -> Result<()>;

    /// Tap a key by its X keysym name (e.g. `"space"`)
    async fn press_key(&self, key: &str) -> Result<()>;
}

/// Start/stop recording in the secondary application
pub struct RecordAutomation {
    clicker: Box<dyn ScreenClicker>,
    key_delay: Duration,
}

impl RecordAutomation {
    pub fn new(clicker: Box<dyn ScreenClicker>, key_delay: Duration) -> Self {
        Self { clicker, key_delay }
    }

    /// Build the xdotool-backed automation from config, or `None` when disabled.
    pub fn from_config(config: &AutomationConfig) -> Option<Self> {
        config.enabled.then(|| {
            Self::new(
                Box::new(XdotoolClicker::new(
                    &config.window_name,
                    config.click_x,
                    config.click_y,
                )),
                Duration::from_millis(config.key_delay_ms),
            )
        })
    }

    /// Click the record control and press the record key.
    ///
    /// # Errors
    ///
    /// Returns `AutomationMiss` if the control cannot be found. Nothing is
    /// clicked and no retry is attempted.
    pub async fn start(&self) -> Result<()> {
        let target = self.clicker.locate().await?.ok_or_else(|| {
            BridgeError::AutomationMiss("record button not found on screen".to_string())
        })?;

        self.clicker.click(target).await?;
        tokio::time::sleep(self.key_delay).await;
        self.clicker.press_key(RECORD_TOGGLE_KEY).await?;
        info!("Record button clicked at ({}, {})", target.x, target.y);
        Ok(())
    }

    /// Press the record key to end the take.
    pub async fn stop(&self) -> Result<()> {
        self.clicker.press_key(RECORD_TOGGLE_KEY).await?;
        info!("Stop key sent to recording application");
        Ok(())
    }
}
