//! # Controller Module
//!
//! PlayStation controller input handling.
//!
//! This module handles:
//! - Controller detection and connection via evdev
//! - Polling the held-button set every tick
//! - Turning held state into press edges
//! - Mapping evdev keys to stable button indices

pub mod buttons;
pub mod input;
pub mod ps5;
