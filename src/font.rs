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

//! The built-in hexadecimal font.

/// The location at which the hex sprites are stored.
pub const HEX_START: usize = 0x0;
/// The height of a hex sprite.
pub const HEX_HEIGHT: usize = 5;

/// The hex digit sprites, `0` through `F`.
pub const HEX_SPRITES: [[u8; HEX_HEIGHT]; 16] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0],
    [0x20, 0x60, 0x20, 0x20, 0x70],
    [0xF0, 0x10, 0xF0, 0x80, 0xF0],
    [0xF0, 0x10, 0xF0, 0x10, 0xF0],
    [0x90, 0x90, 0xF0, 0x10, 0x10],
    [0xF0, 0x80, 0xF0, 0x10, 0xF0],
    [0xF0, 0x80, 0xF0, 0x90, 0xF0],
    [0xF0, 0x10, 0x20, 0x40, 0x40],
    [0xF0, 0x90, 0xF0, 0x90, 0xF0],
    [0xF0, 0x90, 0xF0, 0x10, 0xF0],
    [0xF0, 0x90, 0xF0, 0x90, 0x90],
    [0xE0, 0x90, 0xE0, 0x90, 0xE0],
    [0xF0, 0x80, 0x80, 0x80, 0xF0],
    [0xE0, 0x90, 0x90, 0x90, 0xE0],
    [0xF0, 0x80, 0xF0, 0x80, 0xF0],
    [0xF0, 0x80, 0xF0, 0x80, 0x80],
];

/// The number of bytes taken up by the font in memory.
pub const HEX_SIZE: usize = HEX_HEIGHT * 16;

/// Returns the address of the sprite for the given digit.
///
/// Values above `0xF` are clamped to `0xF` rather than wrapped.
pub fn sprite_address(digit: u8) -> u16 {
    let digit = if digit > 0xF { 0xF } else { digit };
    (HEX_START + HEX_HEIGHT * digit as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_addresses() {
        let cases = [(0x0, 0x00), (0x1, 0x05), (0xA, 0x32), (0xF, 0x4B), (0x10, 0x4B), (0xFF, 0x4B)];

        for &(digit, addr) in cases.iter() {
            assert_eq!(sprite_address(digit), addr, "case {:?}", (digit, addr));
        }
    }

    #[test]
    fn font_fits_below_program() {
        assert_eq!(HEX_START + HEX_SIZE, 0x50);
        assert!(HEX_START + HEX_SIZE <= ::PROG_START);
    }
}
