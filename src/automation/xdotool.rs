//! [`ScreenClicker`] backed by the `xdotool` command-line tool (X11).
//!
//! The record control is found by window title: the first visible window
//! whose name matches is taken, and the configured offset is added to its
//! top-left corner.

use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use super::{ScreenClicker, ScreenPoint};
use crate::error::{BridgeError, Result};

const XDOTOOL: &str = "xdotool";

#[derive(Debug, Clone)]
pub struct XdotoolClicker {
    window_name: String,
    offset_x: i32,
    offset_y: i32,
}

impl XdotoolClicker {
    pub fn new(window_name: &str, offset_x: i32, offset_y: i32) -> Self {
        Self {
            window_name: window_name.to_string(),
            offset_x,
            offset_y,
        }
    }

    async fn run(args: &[&str]) -> Result<Output> {
        debug!("{} {}", XDOTOOL, args.join(" "));
        Command::new(XDOTOOL)
            .args(args)
            .output()
            .await
            .map_err(|e| BridgeError::Automation(format!("Failed to run {}: {}", XDOTOOL, e)))
    }

    async fn run_checked(args: &[&str]) -> Result<Output> {
        let output = Self::run(args).await?;
        if !output.status.success() {
            return Err(BridgeError::Automation(format!(
                "{} {} failed: {}",
                XDOTOOL,
                args.first().copied().unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output)
    }
}

#[async_trait]
impl ScreenClicker for XdotoolClicker {
    async fn locate(&self) -> Result<Option<ScreenPoint>> {
        // `search` exits non-zero when nothing matches
        let search = Self::run(&["search", "--onlyvisible", "--name", self.window_name.as_str()]).await?;
        if !search.status.success() {
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&search.stdout);
        let Some(window_id) = stdout.lines().map(str::trim).find(|line| !line.is_empty()) else {
            return Ok(None);
        };

        let geometry = Self::run_checked(&["getwindowgeometry", "--shell", window_id]).await?;
        let origin = parse_geometry(&String::from_utf8_lossy(&geometry.stdout)).ok_or_else(|| {
            BridgeError::Automation(format!("Unexpected geometry output for window {}", window_id))
        })?;

        Ok(Some(ScreenPoint {
            x: origin.x + self.offset_x,
            y: origin.y + self.offset_y,
        }))
    }

    async fn click(&self, at: ScreenPoint) -> Result<()> {
        let x = at.x.to_string();
        let y = at.y.to_string();
        Self::run_checked(&["mousemove", x.as_str(), y.as_str(), "click", "1"]).await?;
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        Self::run_checked(&["key", key]).await?;
        Ok(())
    }
}

/// Parses the `X=` and `Y=` lines of `xdotool getwindowgeometry --shell`.
fn parse_geometry(output: &str) -> Option<ScreenPoint> {
    let mut x = None;
    let mut y = None;
    for line in output.lines() {
        match line.trim().split_once('=') {
            Some(("X", value)) => x = value.parse().ok(),
            Some(("Y", value)) => y = value.parse().ok(),
            _ => {}
        }
    }
    Some(ScreenPoint { x: x?, y: y? })
}
