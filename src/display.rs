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

//! The Chip-8 display buffer.

use std::default::Default;
use std::fmt;

/// The width of the display.
pub const WIDTH: usize = 64;
/// The height of the display.
pub const HEIGHT: usize = 32;

/// Raw pixel data, indexed as `data[x][y]`.
pub type PixelData = [[bool; HEIGHT]; WIDTH];

/// A Chip-8 display buffer.
pub struct Buffer {
    /// The underlying display buffer data.
    data: PixelData,
}

impl Buffer {
    /// Returns a new display buffer with all pixels clear.
    pub fn new() -> Self {
        Buffer {
            data: [[false; HEIGHT]; WIDTH],
        }
    }

    /// Clears the display.
    pub fn clear(&mut self) {
        for col in self.data.iter_mut() {
            for elem in col.iter_mut() {
                *elem = false;
            }
        }
    }

    /// Draws the given sprite at the given position.
    ///
    /// Each byte of the sprite is a row, with bit 7 as the leftmost pixel.
    /// Pixels that fall off an edge of the display wrap around to the
    /// opposite edge.  Returns whether there was a collision, that is,
    /// whether any lit pixel was turned off.
    pub fn draw_sprite(&mut self, sprite: &[u8], x: usize, y: usize) -> bool {
        let mut collision = false;

        for (j, row) in sprite.iter().enumerate() {
            for i in 0..8 {
                if row & (1 << (7 - i)) != 0 && self.toggle(x + i, y + j) {
                    collision = true;
                }
            }
        }

        collision
    }

    /// Returns whether the given pixel is lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.data[x % WIDTH][y % HEIGHT]
    }

    /// Returns a copy of the current contents of the display.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { data: self.data }
    }

    /// Flips the on/off state of the given pixel, returning whether it was
    /// flipped off from the on state.
    fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.data[x % WIDTH][y % HEIGHT];
        let old = *pixel;
        *pixel = !old;
        old
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Buffer::new()
    }
}

/// An independent copy of the display contents, suitable for rendering.
#[derive(Clone, Copy)]
pub struct Snapshot {
    data: PixelData,
}

impl Snapshot {
    /// Returns a reference to the underlying pixel data.
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Returns whether the given pixel is lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.data[x % WIDTH][y % HEIGHT]
    }

    /// Returns whether no pixel is lit.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|col| col.iter().all(|&p| !p))
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Snapshot) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Snapshot(\n{})", self)
    }
}

/// Renders the snapshot as text, one line per row, with `#` for lit pixels
/// and `.` for dark ones.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                f.write_str(if self.data[x][y] { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font::HEX_SPRITES;

    /// Returns the lit pixels of the given buffer as a sorted list.
    fn lit(buf: &Buffer) -> Vec<(usize, usize)> {
        let mut pixels = Vec::new();
        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                if buf.pixel(x, y) {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    /// Tests drawing the `0` glyph twice, which must light exactly the bits
    /// of the glyph and then erase them again.
    #[test]
    fn draw_glyph_and_erase() {
        let mut buf = Buffer::new();

        assert!(!buf.draw_sprite(&HEX_SPRITES[0], 0, 0));
        let mut expected = Vec::new();
        for x in 0..4 {
            expected.push((x, 0));
            expected.push((x, 4));
        }
        for y in 1..4 {
            expected.push((0, y));
            expected.push((3, y));
        }
        expected.sort();
        assert_eq!(lit(&buf), expected);

        assert!(buf.draw_sprite(&HEX_SPRITES[0], 0, 0));
        assert!(buf.snapshot().is_blank());
    }

    /// Tests that sprites wrap around both edges instead of being clipped.
    #[test]
    fn draw_wraps() {
        let mut buf = Buffer::new();

        assert!(!buf.draw_sprite(&[0xC0], 63, 0));
        assert_eq!(lit(&buf), vec![(0, 0), (63, 0)]);

        buf.clear();
        assert!(!buf.draw_sprite(&[0x80, 0x80], 10, 31));
        assert_eq!(lit(&buf), vec![(10, 0), (10, 31)]);

        buf.clear();
        assert!(!buf.draw_sprite(&[0x80], 64 + 5, 32 + 2));
        assert_eq!(lit(&buf), vec![(5, 2)]);
    }

    /// Tests that a collision is reported for a partial overlap, and that
    /// pixels not covered by the second sprite survive.
    #[test]
    fn partial_collision() {
        let mut buf = Buffer::new();

        assert!(!buf.draw_sprite(&[0xF0], 0, 0));
        assert!(buf.draw_sprite(&[0x18], 0, 0));
        assert_eq!(lit(&buf), vec![(0, 0), (1, 0), (2, 0), (4, 0)]);
    }

    #[test]
    fn clear() {
        let mut buf = Buffer::new();
        buf.draw_sprite(&[0xFF, 0xFF], 30, 10);
        buf.clear();
        assert!(lit(&buf).is_empty());
    }

    /// Tests that snapshots are copies that later draws don't affect.
    #[test]
    fn snapshot_is_independent() {
        let mut buf = Buffer::new();
        buf.draw_sprite(&[0x80], 1, 1);
        let snapshot = buf.snapshot();
        buf.draw_sprite(&[0x80], 1, 1);
        buf.draw_sprite(&[0x80], 2, 2);

        assert!(snapshot.pixel(1, 1));
        assert!(!snapshot.pixel(2, 2));
        assert!(!buf.pixel(1, 1));
        assert_ne!(snapshot, buf.snapshot());
    }

    #[test]
    fn snapshot_text() {
        let mut buf = Buffer::new();
        buf.draw_sprite(&[0xA0], 0, 0);
        let text = buf.snapshot().to_string();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), HEIGHT);
        assert!(lines[0].starts_with("#.#."));
        assert!(lines.iter().all(|line| line.len() == WIDTH));
    }
}
