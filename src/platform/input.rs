//! Held-key tracking
//!
//! The game polls "is this key held" once per tick. Terminals that report
//! key releases give that directly. Plain terminals only send presses and
//! auto-repeats, so a key counts as held for a short window after its last
//! press; the first press gets a longer window to cover the auto-repeat
//! delay.

use crate::sim::TickInput;

/// Ticks a key stays held after its first press without a release event
pub const FIRST_PRESS_HOLD_TICKS: u64 = 30;
/// Ticks a key stays held after an auto-repeat without a release event
pub const REPEAT_HOLD_TICKS: u64 = 6;

/// The four driving keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKey {
    Left,
    Right,
    Forward,
    Back,
}

impl DriveKey {
    const ALL: [DriveKey; 4] = [
        DriveKey::Left,
        DriveKey::Right,
        DriveKey::Forward,
        DriveKey::Back,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyHold {
    Up,
    /// Held until an explicit release
    Down,
    /// Held through the given tick
    Until(u64),
}

/// Current state of the driving keys
#[derive(Debug, Clone)]
pub struct HeldKeys {
    /// Whether release events are reported
    releases: bool,
    keys: [KeyHold; 4],
}

impl HeldKeys {
    pub fn new(releases: bool) -> Self {
        Self {
            releases,
            keys: [KeyHold::Up; 4],
        }
    }

    /// Record a press (or auto-repeat when `repeat`) at tick `now`
    pub fn press(&mut self, key: DriveKey, repeat: bool, now: u64) {
        let slot = &mut self.keys[key.index()];
        *slot = if self.releases {
            KeyHold::Down
        } else {
            let fresh = matches!(*slot, KeyHold::Up) || (!repeat && !is_held(*slot, now));
            let window = if fresh { FIRST_PRESS_HOLD_TICKS } else { REPEAT_HOLD_TICKS };
            let until = now + window;
            match *slot {
                // A repeat never shortens a window still running
                KeyHold::Until(prev) if prev > until => KeyHold::Until(prev),
                _ => KeyHold::Until(until),
            }
        };
    }

    pub fn release(&mut self, key: DriveKey) {
        self.keys[key.index()] = KeyHold::Up;
    }

    /// Drop every held key (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.keys = [KeyHold::Up; 4];
    }

    pub fn is_held(&self, key: DriveKey, now: u64) -> bool {
        is_held(self.keys[key.index()], now)
    }

    /// Driving part of the tick input at tick `now`
    pub fn snapshot(&mut self, now: u64) -> TickInput {
        for slot in &mut self.keys {
            if !is_held(*slot, now) {
                *slot = KeyHold::Up;
            }
        }
        let [left, right, forward, back] = DriveKey::ALL.map(|k| self.is_held(k, now));
        TickInput {
            left,
            right,
            forward,
            back,
            ..Default::default()
        }
    }
}

fn is_held(hold: KeyHold, now: u64) -> bool {
    match hold {
        KeyHold::Up => false,
        KeyHold::Down => true,
        KeyHold::Until(until) => now <= until,
    }
}
