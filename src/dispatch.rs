//! # Debounced Dispatcher
//!
//! Resolves press edges to logical actions and enforces a per-action cooldown.
//!
//! An action is accepted when it has never fired before, or when at least the
//! cooldown has elapsed since it was last accepted. The timestamp is recorded
//! at dispatch time, before the action runs, so a slow HTTP call cannot
//! stretch or shorten the window.
//!
//! ## Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use rokoko_bridge::config::BindingConfig;
//! use rokoko_bridge::controller::input::ButtonEvent;
//! use rokoko_bridge::dispatch::{ActionKind, ActionMapping, Dispatcher};
//!
//! let mapping = ActionMapping::from_bindings(&BindingConfig::default());
//! let mut dispatcher = Dispatcher::new(mapping, Duration::from_secs(5));
//!
//! let t0 = Instant::now();
//! let press = |at| ButtonEvent { button: 3, pressed: true, timestamp: at };
//!
//! assert_eq!(dispatcher.dispatch(&[press(t0)]), vec![ActionKind::Calibrate]);
//! assert!(dispatcher.dispatch(&[press(t0 + Duration::from_secs(3))]).is_empty());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::BindingConfig;
use crate::controller::buttons;
use crate::controller::input::ButtonEvent;

/// Logical command, independent of the physical button that triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Calibrate,
    StartRecord,
    StopRecord,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Calibrate => "Calibrate",
            ActionKind::StartRecord => "Start recording",
            ActionKind::StopRecord => "Stop recording",
        };
        f.write_str(name)
    }
}

/// Immutable button index → action lookup, built once at startup.
///
/// An index with no entry is unmapped. If several actions share an index,
/// that button triggers all of them.
#[derive(Debug, Clone, Default)]
pub struct ActionMapping {
    bindings: BTreeMap<u16, Vec<ActionKind>>,
}

impl ActionMapping {
    /// Builds a mapping from explicit `(button, action)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (u16, ActionKind)>) -> Self {
        let mut bindings: BTreeMap<u16, Vec<ActionKind>> = BTreeMap::new();
        for (button, action) in pairs {
            let actions = bindings.entry(button).or_default();
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        Self { bindings }
    }

    /// Builds the mapping from the `[bindings]` config section.
    pub fn from_bindings(config: &BindingConfig) -> Self {
        Self::new([
            (config.calibrate, ActionKind::Calibrate),
            (config.start_recording, ActionKind::StartRecord),
            (config.stop_recording, ActionKind::StopRecord),
        ])
    }

    /// Actions bound to `button`. Empty when the button is unmapped.
    #[must_use]
    pub fn resolve(&self, button: u16) -> &[ActionKind] {
        self.bindings.get(&button).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All bindings in ascending button order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, ActionKind)> + '_ {
        self.bindings
            .iter()
            .flat_map(|(&button, actions)| actions.iter().map(move |&action| (button, action)))
    }
}

/// Last accepted time per action.
#[derive(Debug, Default)]
pub struct DebounceState {
    last_accepted: HashMap<ActionKind, Instant>,
}

impl DebounceState {
    /// Accepts and records `now` if the action is outside its cooldown.
    ///
    /// An action that never fired is always accepted. A `now` earlier than
    /// the recorded time counts as zero elapsed.
    pub fn try_accept(&mut self, action: ActionKind, now: Instant, cooldown: Duration) -> bool {
        let ready = match self.last_accepted.get(&action) {
            None => true,
            Some(&last) => now.saturating_duration_since(last) >= cooldown,
        };
        if ready {
            self.last_accepted.insert(action, now);
        }
        ready
    }

    #[must_use]
    pub fn last_accepted(&self, action: ActionKind) -> Option<Instant> {
        self.last_accepted.get(&action).copied()
    }
}

/// Maps press edges to debounced actions.
#[derive(Debug)]
pub struct Dispatcher {
    mapping: ActionMapping,
    cooldown: Duration,
    state: DebounceState,
}

impl Dispatcher {
    #[must_use]
    pub fn new(mapping: ActionMapping, cooldown: Duration) -> Self {
        Self {
            mapping,
            cooldown,
            state: DebounceState::default(),
        }
    }

    #[must_use]
    pub fn mapping(&self) -> &ActionMapping {
        &self.mapping
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Returns the actions to run for one tick's worth of events.
    ///
    /// Press edges are handled in ascending button order regardless of the
    /// order they arrive in; release edges and unmapped buttons are dropped.
    pub fn dispatch(&mut self, events: &[ButtonEvent]) -> Vec<ActionKind> {
        let mut presses: Vec<&ButtonEvent> = events.iter().filter(|e| e.pressed).collect();
        presses.sort_by_key(|e| e.button);

        let mut accepted = Vec::new();
        for event in presses {
            let actions = self.mapping.resolve(event.button);
            if actions.is_empty() {
                trace!(
                    "Button {} ({}) is unmapped",
                    event.button,
                    buttons::name_of(event.button)
                );
                continue;
            }

            for &action in actions {
                if self.state.try_accept(action, event.timestamp, self.cooldown) {
                    accepted.push(action);
                } else {
                    debug!("{} ignored, cooling down", action);
                }
            }
        }
        accepted
    }
}
