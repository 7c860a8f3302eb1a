/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The Chip-8's main memory.
//!
//! Memory is a flat array of `MEM_SIZE` bytes.  The region below `PROG_START`
//! is reserved for the interpreter (it holds the font) and programs are
//! loaded starting at `PROG_START`.  Every address is taken modulo
//! `MEM_SIZE`, so instructions that run off the end of memory wrap around
//! instead of failing.

use std::default::Default;
use std::fmt;

use failure::Error;

use font::{HEX_HEIGHT, HEX_SPRITES, HEX_START};
use {MEM_SIZE, PROG_SIZE, PROG_START};

/// An error resulting from an attempt to load an empty program.
#[derive(Debug, Fail)]
#[fail(display = "input program is empty")]
pub struct EmptyProgramError;

/// An error resulting from an input program being too large.
#[derive(Debug, Fail)]
#[fail(display = "input program is too large ({} bytes)", _0)]
pub struct ProgramTooLargeError(pub usize);

/// The memory of a single machine.
pub struct Memory {
    data: [u8; MEM_SIZE],
}

impl Memory {
    /// Returns a new memory, empty apart from the font.
    pub fn new() -> Self {
        let mut mem = Memory {
            data: [0; MEM_SIZE],
        };
        mem.load_font();
        mem
    }

    /// Copies the font sprites into the reserved area.
    pub fn load_font(&mut self) {
        for (i, sprite) in HEX_SPRITES.iter().enumerate() {
            let start = HEX_START + i * HEX_HEIGHT;
            let end = start + sprite.len();
            self.data[start..end].copy_from_slice(sprite);
        }
    }

    /// Loads the given program at `PROG_START`.
    ///
    /// The whole program area is cleared first, so nothing from a previous
    /// program survives.  If the program is empty or doesn't fit, an error is
    /// returned and memory is left untouched.
    pub fn load_program(&mut self, prog: &[u8]) -> Result<(), Error> {
        if prog.is_empty() {
            return Err(EmptyProgramError.into());
        }
        if prog.len() > PROG_SIZE {
            return Err(ProgramTooLargeError(prog.len()).into());
        }

        for b in self.data[PROG_START..].iter_mut() {
            *b = 0;
        }
        self.data[PROG_START..PROG_START + prog.len()].copy_from_slice(prog);
        Ok(())
    }

    /// Returns the byte at the given address.
    pub fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize % MEM_SIZE]
    }

    /// Sets the byte at the given address.
    pub fn write(&mut self, addr: u16, val: u8) {
        self.data[addr as usize % MEM_SIZE] = val;
    }

    /// Returns `len` bytes starting at the given address.
    ///
    /// Reads that run past the end of memory continue from address 0.
    pub fn read_range(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.data[(addr as usize + i) % MEM_SIZE])
            .collect()
    }

    /// Returns a reference to the underlying data.
    pub fn data(&self) -> &[u8; MEM_SIZE] {
        &self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Memory {{ .. }}")
    }
}
