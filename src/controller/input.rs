//! # Input Source
//!
//! Polling abstraction over the controller and press-edge detection.
//!
//! The controller is sampled as a level (the set of currently held buttons).
//! [`EdgeDetector`] compares successive samples and emits a [`ButtonEvent`]
//! only when a button changes state, so holding a button fires once.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::error::Result;

/// A single button state change observed during one polling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Button index (see [`crate::controller::buttons`])
    pub button: u16,
    /// `true` for a press edge, `false` for a release edge
    pub pressed: bool,
    /// When the tick that observed the change ran
    pub timestamp: Instant,
}

/// Trait for polling the set of currently held buttons
///
/// Implementations return `BridgeError::ControllerDisconnected` when the
/// device is gone for good; any other error is treated as transient.
pub trait InputSource: Send {
    /// Returns the indices of all buttons held right now.
    fn poll(&mut self) -> Result<BTreeSet<u16>>;
}

/// Turns level samples into press/release edges.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    held: BTreeSet<u16>,
}

impl EdgeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing sample, so buttons already held produce no
    /// press edge until they are released and pressed again.
    #[must_use]
    pub fn seeded(held: BTreeSet<u16>) -> Self {
        Self { held }
    }

    /// Compares `current` against the previous sample and returns the edges.
    ///
    /// Press edges come first, in ascending button order, followed by release
    /// edges in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    /// use std::time::Instant;
    /// use rokoko_bridge::controller::input::EdgeDetector;
    ///
    /// let mut edges = EdgeDetector::new();
    /// let now = Instant::now();
    ///
    /// let held: BTreeSet<u16> = [3].into_iter().collect();
    /// assert_eq!(edges.update(&held, now).len(), 1);
    /// // Still held: no new edge
    /// assert!(edges.update(&held, now).is_empty());
    /// ```
    pub fn update(&mut self, current: &BTreeSet<u16>, timestamp: Instant) -> Vec<ButtonEvent> {
        let pressed = current.difference(&self.held).map(|&button| ButtonEvent {
            button,
            pressed: true,
            timestamp,
        });
        let released = self.held.difference(current).map(|&button| ButtonEvent {
            button,
            pressed: false,
            timestamp,
        });
        let events = pressed.chain(released).collect();

        self.held = current.clone();
        events
    }

    /// Buttons held as of the last sample.
    #[must_use]
    pub fn held(&self) -> &BTreeSet<u16> {
        &self.held
    }

    /// Forgets all held buttons.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
