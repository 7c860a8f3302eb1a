// Copyright 2018 Ian Johnson

// This file is part of Chip-8.

// Chip-8 is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Chip-8 is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Chip-8.  If not, see <http://www.gnu.org/licenses/>.

//! Input handling for the Chip-8 interpreter.
//!
//! The input state is a latch: the front-end reports key transitions as they
//! happen, and the interpreter reads the latched state whenever an
//! instruction needs it.  Nothing here ever blocks.

use std::default::Default;

use num::traits::FromPrimitive;

/// The number of keys on the Chip-8 controller.
const N_KEYS: usize = 16;

enum_from_primitive!{
/// The keys on the Chip-8 controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    K0 = 0,
    K1,
    K2,
    K3,
    K4,
    K5,
    K6,
    K7,
    K8,
    K9,
    KA,
    KB,
    KC,
    KD,
    KE,
    KF
}
}

impl Key {
    /// Returns the key with the given number, or `None` if there is no such
    /// key.
    pub fn from_byte(b: u8) -> Option<Key> {
        Key::from_u8(b)
    }
}

/// Represents the state of the input device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// The key states (`true` means "pressed").
    keys: [bool; N_KEYS],
    /// The most recent key press which hasn't been taken yet.
    last_pressed: Option<Key>,
}

impl State {
    /// Returns a new input state with all keys unpressed.
    pub fn new() -> Self {
        State::default()
    }

    /// Sets the state of the given key.
    ///
    /// A key going from released to pressed is also remembered as the most
    /// recent press, to be picked up later by `take_key_press`.  Reporting a
    /// key that is already down again (as auto-repeat does) is not a new
    /// press.
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        let was_pressed = self.keys[key as usize];
        self.keys[key as usize] = pressed;
        if pressed && !was_pressed {
            self.last_pressed = Some(key);
        }
    }

    /// Presses the given key.
    pub fn press(&mut self, key: Key) {
        self.set_key(key, true);
    }

    /// Releases the given key.
    pub fn release(&mut self, key: Key) {
        self.set_key(key, false);
    }

    /// Returns whether the given key is pressed.
    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys[key as usize]
    }

    /// Returns whether any key is pressed.
    pub fn any_pressed(&self) -> bool {
        self.keys.iter().any(|&k| k)
    }

    /// Returns the most recent key press and forgets it, or `None` if no key
    /// has been pressed since the last call.
    pub fn take_key_press(&mut self) -> Option<Key> {
        self.last_pressed.take()
    }

    /// Releases every key and forgets any pending press.
    pub fn clear(&mut self) {
        *self = State::default();
    }
}
