/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The Chip-8 disassembler.
//!
//! Disassembly is a linear sweep: the program is read two bytes at a time
//! from the start, and each word is decoded exactly as the interpreter would
//! decode it.  Words that aren't instructions (sprite data, for example) are
//! shown as raw `DW` data, and an odd byte at the end as `DB`.

use std::fmt;
use std::io::{Read, Write};

use failure::{Error, ResultExt};

use PROG_START;
use instruction::{Instruction, Opcode};

/// A single line of disassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The address of the line, assuming the program is loaded at
    /// `PROG_START`.
    pub address: usize,
    /// The word at this address.  For a trailing odd byte, the low byte is 0.
    pub opcode: Opcode,
    /// The decoded instruction, if the word is one.
    pub instruction: Option<Instruction>,
    /// The number of program bytes covered by this line (2, or 1 for a
    /// trailing odd byte).
    pub len: usize,
}

impl Line {
    /// Returns the assembly text of the line, without address or bytes.
    pub fn text(&self) -> String {
        match self.instruction {
            Some(ref instr) => instr.to_string(),
            None if self.len == 1 => format!("DB #{:02X}", self.opcode.bytes().0),
            None => format!("DW {}", self.opcode),
        }
    }

    /// Returns whether the line holds a recognized instruction.
    pub fn is_code(&self) -> bool {
        self.instruction.is_some()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (hi, lo) = self.opcode.bytes();
        if self.len == 1 {
            write!(f, "{:03X}  {:02X}     {}", self.address, hi, self.text())
        } else {
            write!(f, "{:03X}  {:02X} {:02X}  {}", self.address, hi, lo, self.text())
        }
    }
}

/// Contains the program being disassembled.
pub struct Disassembler {
    /// The program being disassembled.
    prog: Vec<u8>,
}

impl Disassembler {
    /// Creates a new disassembler, reading the program data from the given
    /// input.
    pub fn new<R: Read>(input: &mut R) -> Result<Self, Error> {
        let mut prog = Vec::new();
        input
            .read_to_end(&mut prog)
            .context("could not read program data")?;
        Ok(Disassembler { prog })
    }

    /// Creates a new disassembler for the given program data.
    pub fn from_bytes(prog: &[u8]) -> Self {
        Disassembler {
            prog: prog.to_vec(),
        }
    }

    /// Returns the program data.
    pub fn prog(&self) -> &[u8] {
        &self.prog
    }

    /// Returns an iterator over the lines of the disassembly.
    pub fn lines(&self) -> Lines {
        Lines {
            prog: &self.prog,
            offset: 0,
        }
    }

    /// Writes the disassembly to the given output, one line per word.
    pub fn dump<W: Write>(&self, output: &mut W) -> Result<(), Error> {
        for line in self.lines() {
            writeln!(output, "{}", line).context("could not write disassembly")?;
        }
        Ok(())
    }
}

/// An iterator over the lines of a disassembly.
pub struct Lines<'a> {
    prog: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let rest = &self.prog[self.offset..];
        let address = PROG_START + self.offset;

        let line = match rest.len() {
            0 => return None,
            1 => Line {
                address,
                opcode: Opcode::from_bytes(rest[0], 0),
                instruction: None,
                len: 1,
            },
            _ => {
                let opcode = Opcode::from_bytes(rest[0], rest[1]);
                Line {
                    address,
                    opcode,
                    instruction: Instruction::from_opcode(opcode).ok(),
                    len: 2,
                }
            }
        };
        self.offset += line.len;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use instruction::{Address, Register};

    #[test]
    fn lines() {
        let disasm = Disassembler::from_bytes(&[0x00, 0xE0, 0x12, 0x00, 0x01, 0x23, 0xAB]);
        let lines = disasm.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].address, 0x200);
        assert_eq!(lines[0].instruction, Some(Instruction::Cls));
        assert_eq!(lines[1].address, 0x202);
        assert_eq!(
            lines[1].instruction,
            Some(Instruction::Jp(Address::from_u16(0x200).unwrap()))
        );
        assert_eq!(lines[2].opcode, Opcode(0x0123));
        assert_eq!(lines[2].instruction, None);
        assert_eq!(lines[3].address, 0x206);
        assert_eq!(lines[3].len, 1);
        assert_eq!(lines[3].instruction, None);
    }

    /// Tests the text of each kind of line.
    #[test]
    fn line_text() {
        let disasm = Disassembler::from_bytes(&[
            0x00, 0xE0, 0x12, 0x00, 0x01, 0x23, 0xD1, 0x2F, 0xF5, 0x65, 0xAB,
        ]);
        let text = disasm.lines().map(|l| l.to_string()).collect::<Vec<_>>();

        assert_eq!(
            text,
            vec![
                "200  00 E0  CLS",
                "202  12 00  JP #200",
                "204  01 23  DW #0123",
                "206  D1 2F  DRW V1, V2, 15",
                "208  F5 65  LD V5, [I]",
                "20A  AB     DB #AB",
            ]
        );
    }

    #[test]
    fn dump() {
        let mut input = Cursor::new(vec![0x6A, 0x42, 0xFA, 0x29]);
        let disasm = Disassembler::new(&mut input).unwrap();
        let mut output = Vec::new();
        disasm.dump(&mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "200  6A 42  LD VA, #42\n202  FA 29  LD F, VA\n"
        );
    }

    #[test]
    fn line_text_without_bytes() {
        let disasm = Disassembler::from_bytes(&[0xF0, 0x0A, 0xE3, 0x00, 0x5F]);
        let lines = disasm.lines().collect::<Vec<_>>();

        assert_eq!(lines[0].text(), "LD V0, K");
        assert!(lines[0].is_code());
        assert_eq!(lines[1].text(), "DW #E300");
        assert!(!lines[1].is_code());
        assert_eq!(lines[2].text(), "DB #5F");
        assert!(!lines[2].is_code());
    }

    #[test]
    fn empty_program() {
        let disasm = Disassembler::from_bytes(&[]);
        assert_eq!(disasm.lines().count(), 0);

        let mut output = Vec::new();
        disasm.dump(&mut output).unwrap();
        assert!(output.is_empty());
    }

    /// Tests that sprite data mixed in with code decodes to whatever the
    /// interpreter would see, without stopping the sweep.
    #[test]
    fn data_is_decoded_like_code() {
        let disasm = Disassembler::from_bytes(&[0xF0, 0x90, 0x70, 0x10]);
        let lines = disasm.lines().collect::<Vec<_>>();

        assert_eq!(lines[0].instruction, None);
        assert_eq!(
            lines[1].instruction,
            Some(Instruction::AddByte(Register::V0, 0x10))
        );
    }
}
