//! # Rokoko Bridge Library
//!
//! Trigger Rokoko Studio calibration and recording from a PlayStation controller.
//!
//! This library provides the pieces of the bridge: controller polling and
//! edge detection, the debounced dispatcher, the capture service client, the
//! optional screen-automation fallback, and the loop that ties them together.

pub mod automation;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod logging;
pub mod service;
