//! # Button Index Table
//!
//! Maps evdev key codes to small, stable button indices. Bindings in the
//! config refer to buttons by these indices, which follow the usual SDL
//! gamepad order so that indices echoed by other tools line up.
//!
//! | Index | Button | evdev Code |
//! |-------|--------|------------|
//! | 0 | Cross (×) | BTN_SOUTH |
//! | 1 | Circle (○) | BTN_EAST |
//! | 2 | Square (□) | BTN_WEST |
//! | 3 | Triangle (△) | BTN_NORTH |
//! | 4 | Share | BTN_SELECT |
//! | 5 | PS | BTN_MODE |
//! | 6 | Options | BTN_START |
//! | 7 | L3 | BTN_THUMBL |
//! | 8 | R3 | BTN_THUMBR |
//! | 9 | L1 | BTN_TL |
//! | 10 | R1 | BTN_TR |
//! | 11 | L2 (click) | BTN_TL2 |
//! | 12 | R2 (click) | BTN_TR2 |

use evdev::Key;

/// Number of buttons in the index table
pub const BUTTON_COUNT: usize = 13;

const BUTTONS: [(Key, &str); BUTTON_COUNT] = [
    (Key::BTN_SOUTH, "Cross"),
    (Key::BTN_EAST, "Circle"),
    (Key::BTN_WEST, "Square"),
    (Key::BTN_NORTH, "Triangle"),
    (Key::BTN_SELECT, "Share"),
    (Key::BTN_MODE, "PS"),
    (Key::BTN_START, "Options"),
    (Key::BTN_THUMBL, "L3"),
    (Key::BTN_THUMBR, "R3"),
    (Key::BTN_TL, "L1"),
    (Key::BTN_TR, "R1"),
    (Key::BTN_TL2, "L2"),
    (Key::BTN_TR2, "R2"),
];

/// Returns the button index for an evdev key, if it is a gamepad button.
#[must_use]
pub fn index_of(key: Key) -> Option<u16> {
    BUTTONS
        .iter()
        .position(|(k, _)| *k == key)
        .map(|i| i as u16)
}

/// Returns the evdev key for a button index.
#[must_use]
pub fn key_of(index: u16) -> Option<Key> {
    BUTTONS.get(usize::from(index)).map(|(k, _)| *k)
}

/// Human-readable button name, or `"Unknown"` for indices outside the table.
#[must_use]
pub fn name_of(index: u16) -> &'static str {
    BUTTONS
        .get(usize::from(index))
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

/// All keys in the table, in index order.
pub fn keys() -> impl Iterator<Item = Key> {
    BUTTONS.iter().map(|(k, _)| *k)
}
