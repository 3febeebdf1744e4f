//! # PlayStation Controller Module
//!
//! This module handles PlayStation controller detection, connection, and button
//! polling using the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! Supported controllers are identified by:
//! - Vendor ID: 0x054c (Sony)
//! - Product ID: DualShock 4 (0x05c4, 0x09cc), DualSense (0x0ce6) or
//!   DualSense Edge (0x0df2), wired or Bluetooth
//!
//! The kernel exposes the motion sensors and touchpad as separate event
//! devices with the same IDs, so only a device that reports gamepad buttons
//! is accepted.

use evdev::{Device, Key};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use super::buttons;
use super::input::InputSource;
use crate::error::{BridgeError, Result};

/// Sony vendor ID
const SONY_VENDOR_ID: u16 = 0x054c;

/// Supported Sony controller product IDs
const SUPPORTED_PRODUCT_IDS: &[u16] = &[
    0x05c4, // DualShock 4 (v1)
    0x09cc, // DualShock 4 (v2)
    0x0ce6, // DualSense
    0x0df2, // DualSense Edge
];

/// `errno` reported by evdev once the device node is gone
const ENODEV: i32 = 19;

/// PlayStation controller handle
///
/// Represents an active connection to a controller via evdev.
pub struct DualSenseController {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for DualSenseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualSenseController")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl DualSenseController {
    /// Detect and open the first available PlayStation controller
    ///
    /// Scans all `/dev/input/event*` devices to find a connected controller
    /// by matching vendor and product IDs.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No supported controller found on the system
    /// - `Controller`: `/dev/input` is missing or unreadable
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rokoko_bridge::controller::ps5::DualSenseController;
    ///
    /// let controller = DualSenseController::open()?;
    /// println!("Connected to controller at: {}", controller.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(BridgeError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| BridgeError::Controller(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BridgeError::Controller(format!("Failed to read directory entry: {}", e)))?;

        // Sort entries for deterministic device selection when multiple controllers are connected
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with("event"))
                .unwrap_or(false);
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let id = device.input_id();
                    debug!(
                        "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                        path.display(),
                        id.vendor(),
                        id.product()
                    );

                    if is_supported(id.vendor(), id.product()) && has_gamepad_buttons(&device) {
                        let device_path = path.to_string_lossy().to_string();
                        info!("Found PlayStation controller at: {}", device_path);

                        return Ok(Self {
                            device,
                            device_path,
                        });
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(BridgeError::ControllerNotFound)
    }

    /// Open a specific event device, skipping auto-detection
    ///
    /// No vendor check is done here so that third-party pads can be used by
    /// pointing the config at them directly.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path).map_err(|e| {
            BridgeError::Controller(format!("Failed to open {}: {}", path.display(), e))
        })?;

        if !has_gamepad_buttons(&device) {
            return Err(BridgeError::Controller(format!(
                "{} does not report gamepad buttons",
                path.display()
            )));
        }

        info!("Opened controller at: {}", path.display());
        Ok(Self {
            device,
            device_path: path.to_string_lossy().to_string(),
        })
    }

    /// Get the device path of this controller
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Get controller name from evdev
    ///
    /// Typically "Wireless Controller" or "DualSense Wireless Controller".
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }

    /// Read the set of held buttons straight from the kernel key state
    ///
    /// # Errors
    ///
    /// - `ControllerDisconnected` if the device node has gone away
    /// - `Controller` for any other read failure
    pub fn pressed_buttons(&self) -> Result<BTreeSet<u16>> {
        let state = self.device.get_key_state().map_err(|e| {
            if e.raw_os_error() == Some(ENODEV) {
                BridgeError::ControllerDisconnected
            } else {
                BridgeError::Controller(format!("Failed to read key state: {}", e))
            }
        })?;

        Ok(state.iter().filter_map(buttons::index_of).collect())
    }
}

impl InputSource for DualSenseController {
    fn poll(&mut self) -> Result<BTreeSet<u16>> {
        self.pressed_buttons()
    }
}

fn is_supported(vendor: u16, product: u16) -> bool {
    vendor == SONY_VENDOR_ID && SUPPORTED_PRODUCT_IDS.contains(&product)
}

fn has_gamepad_buttons(device: &Device) -> bool {
    device
        .supported_keys()
        .map(|keys| keys.contains(Key::BTN_SOUTH))
        .unwrap_or(false)
}
