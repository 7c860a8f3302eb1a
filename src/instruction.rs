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

//! Chip-8 instructions and opcodes.
//!
//! This module is the decode table of the machine.  An `Opcode` (the raw
//! 16-bit word fetched from memory) is translated into an `Instruction`, a
//! closed enum with one variant per opcode pattern and typed fields for its
//! operands.  The interpreter executes `Instruction`s and the disassembler
//! prints them, so both consumers see exactly the same decoding.
//!
//! For display purposes, every instruction can also be viewed as a
//! `Mnemonic` plus a list of `Operand`s, each of which carries an
//! `OperandRole` describing how its value should be written.  Roles are never
//! used for execution.

use std::fmt;

use num::FromPrimitive;

use MEM_SIZE;

/// An error resulting from an out-of-bounds address.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "address out of bounds: {:#04X}", _0)]
pub struct AddressOutOfBoundsError(pub usize);

/// An error resulting from an opcode that does not correspond to any
/// instruction.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "unrecognized opcode: {}", _0)]
pub struct InvalidOpcodeError(pub Opcode);

enum_from_primitive! {
/// A Chip-8 register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    V0 = 0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    VA,
    VB,
    VC,
    VD,
    VE,
    VF,
}
}

impl Register {
    /// Returns the register with the given index (only the lowest four bits
    /// are considered).
    pub fn from_index(index: u8) -> Register {
        Register::from_u8(index & 0xF).unwrap()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", *self)
    }
}

/// A Chip-8 opcode.
///
/// Having this as a wrapper around an ordinary `u16` allows for some nice
/// helper methods to be implemented, which make decoding opcodes much easier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Assembles an opcode from its two bytes, high byte first (this is the
    /// order in which they are stored in memory).
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode((high as u16) << 8 | low as u16)
    }

    /// Returns the high and low bytes of the opcode, in that order.
    pub fn bytes(&self) -> (u8, u8) {
        ((self.0 >> 8) as u8, self.0 as u8)
    }

    /// Returns the `Vx` register corresponding to this opcode.
    ///
    /// This does not guarantee that the result is actually meaningful.
    fn vx(&self) -> Register {
        Register::from_u16((self.0 & 0x0F00) >> 8).unwrap()
    }

    /// Returns the `Vy` register corresponding to this opcode.
    ///
    /// This does not guarantee that the result is actually meaningful.
    fn vy(&self) -> Register {
        Register::from_u16((self.0 & 0x00F0) >> 4).unwrap()
    }

    /// Returns the `nibble` corresponding to this opcode.
    ///
    /// This does not guarantee that the result is actually meaningful.
    fn nibble(&self) -> u8 {
        self.0 as u8 & 0xF
    }

    /// Returns the `byte` corresponding to this opcode.
    ///
    /// This does not guarantee that the result is actually meaningful.
    fn byte(&self) -> u8 {
        self.0 as u8
    }

    /// Returns the `addr` corresponding to this opcode.
    ///
    /// Twelve bits always fit in memory, so this cannot fail.
    fn addr(&self) -> Address {
        Address(self.0 & 0xFFF)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:04X}", self.0)
    }
}

/// An address pointing to a Chip-8 memory location.
///
/// Any instance of this type is guaranteed to be within the addressable
/// range.
///
/// # Examples
///
/// ```
/// use chip8vm::Address;
///
/// let addr = Address::from_u16(0x204).unwrap();
/// assert_eq!(addr.addr(), 0x204);
/// assert!(Address::from_u16(0x1000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(u16);

impl Address {
    /// Verifies whether the given `u16` address value is valid, returning the
    /// corresponding `Address` if it is.
    pub fn from_u16(addr: u16) -> Result<Self, AddressOutOfBoundsError> {
        if addr as usize >= MEM_SIZE {
            Err(AddressOutOfBoundsError(addr as usize))
        } else {
            Ok(Address(addr))
        }
    }

    /// Returns the value of the address.
    pub fn addr(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:03X}", self.0)
    }
}

/// The name of an operation, as it would be written in assembly.
///
/// Several instructions share a mnemonic (for example, every kind of `LD`);
/// they are told apart by their operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Cls,
    Ret,
    Jp,
    Call,
    Se,
    Sne,
    Ld,
    Add,
    Or,
    And,
    Xor,
    Sub,
    Shr,
    Subn,
    Shl,
    Rnd,
    Drw,
    Skp,
    Sknp,
}

impl Mnemonic {
    /// Returns the assembly name of the mnemonic.
    pub fn name(&self) -> &'static str {
        use self::Mnemonic::*;

        match *self {
            Cls => "CLS",
            Ret => "RET",
            Jp => "JP",
            Call => "CALL",
            Se => "SE",
            Sne => "SNE",
            Ld => "LD",
            Add => "ADD",
            Or => "OR",
            And => "AND",
            Xor => "XOR",
            Sub => "SUB",
            Shr => "SHR",
            Subn => "SUBN",
            Shl => "SHL",
            Rnd => "RND",
            Drw => "DRW",
            Skp => "SKP",
            Sknp => "SKNP",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The meaning of an operand, which determines how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandRole {
    /// A general-purpose register `Vx`.
    Register,
    /// An 8-bit immediate value.
    Immediate,
    /// A 12-bit address.
    Address,
    /// A 4-bit immediate value (the height of a sprite).
    Nibble,
    /// The address register `I`.
    I,
    /// The memory pointed to by `I` (`[I]`).
    IndirectI,
    /// The delay timer.
    DelayTimer,
    /// The sound timer.
    SoundTimer,
    /// A key press.
    Key,
    /// The location of a font sprite.
    Font,
    /// The BCD representation of a value.
    Bcd,
}

/// A single decoded operand: a raw value together with its role.
///
/// Operands with roles that name a fixed location (such as `DT`) have a value
/// of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operand {
    pub value: u16,
    pub role: OperandRole,
}

impl Operand {
    fn new(value: u16, role: OperandRole) -> Self {
        Operand { value, role }
    }

    fn register(reg: Register) -> Self {
        Operand::new(reg as u16, OperandRole::Register)
    }

    fn immediate(b: u8) -> Self {
        Operand::new(b as u16, OperandRole::Immediate)
    }

    fn address(addr: Address) -> Self {
        Operand::new(addr.addr(), OperandRole::Address)
    }

    fn fixed(role: OperandRole) -> Self {
        Operand::new(0, role)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.role {
            OperandRole::Register => write!(f, "V{:X}", self.value),
            OperandRole::Immediate => write!(f, "#{:02X}", self.value),
            OperandRole::Address => write!(f, "#{:03X}", self.value),
            OperandRole::Nibble => write!(f, "{}", self.value),
            OperandRole::I => f.write_str("I"),
            OperandRole::IndirectI => f.write_str("[I]"),
            OperandRole::DelayTimer => f.write_str("DT"),
            OperandRole::SoundTimer => f.write_str("ST"),
            OperandRole::Key => f.write_str("K"),
            OperandRole::Font => f.write_str("F"),
            OperandRole::Bcd => f.write_str("B"),
        }
    }
}

/// A Chip-8 instruction.
///
/// See the manual for more complete explanations of what each operation does.
/// Every value of this type is a valid instruction, so its consumers never
/// have to check opcode validity again.
///
/// # Examples
///
/// Instructions can be created from opcodes:
///
/// ```
/// use chip8vm::{Instruction, Opcode, Register};
///
/// let instr = Instruction::from_opcode(Opcode(0x7510)).unwrap();
/// assert_eq!(instr, Instruction::AddByte(Register::V5, 0x10));
/// assert_eq!(instr.to_string(), "ADD V5, #10");
/// ```
///
/// Words that do not correspond to any instruction are rejected:
///
/// ```
/// use chip8vm::{Instruction, Opcode};
///
/// assert!(Instruction::from_opcode(Opcode(0x0123)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `CLS` (`00E0`).
    Cls,
    /// `RET` (`00EE`).
    Ret,
    /// `JP addr` (`1nnn`).
    Jp(Address),
    /// `CALL addr` (`2nnn`).
    Call(Address),
    /// `SE Vx, byte` (`3xkk`).
    SeByte(Register, u8),
    /// `SNE Vx, byte` (`4xkk`).
    SneByte(Register, u8),
    /// `SE Vx, Vy` (`5xy0`).
    SeReg(Register, Register),
    /// `LD Vx, byte` (`6xkk`).
    LdByte(Register, u8),
    /// `ADD Vx, byte` (`7xkk`).
    AddByte(Register, u8),
    /// `LD Vx, Vy` (`8xy0`).
    LdReg(Register, Register),
    /// `OR Vx, Vy` (`8xy1`).
    Or(Register, Register),
    /// `AND Vx, Vy` (`8xy2`).
    And(Register, Register),
    /// `XOR Vx, Vy` (`8xy3`).
    Xor(Register, Register),
    /// `ADD Vx, Vy` (`8xy4`).
    AddReg(Register, Register),
    /// `SUB Vx, Vy` (`8xy5`).
    Sub(Register, Register),
    /// `SHR Vx, Vy` (`8xy6`).  Only `Vx` takes part in the shift.
    Shr(Register, Register),
    /// `SUBN Vx, Vy` (`8xy7`).
    Subn(Register, Register),
    /// `SHL Vx, Vy` (`8xyE`).  Only `Vx` takes part in the shift.
    Shl(Register, Register),
    /// `SNE Vx, Vy` (`9xy0`).
    SneReg(Register, Register),
    /// `LD I, addr` (`Annn`).
    LdI(Address),
    /// `JP V0, addr` (`Bnnn`).
    JpV0(Address),
    /// `RND Vx, byte` (`Cxkk`).
    Rnd(Register, u8),
    /// `DRW Vx, Vy, nibble` (`Dxyn`).
    Drw(Register, Register, u8),
    /// `SKP Vx` (`Ex9E`).
    Skp(Register),
    /// `SKNP Vx` (`ExA1`).
    Sknp(Register),
    /// `LD Vx, DT` (`Fx07`).
    LdRegDt(Register),
    /// `LD Vx, K` (`Fx0A`).
    LdKey(Register),
    /// `LD DT, Vx` (`Fx15`).
    LdDtReg(Register),
    /// `LD ST, Vx` (`Fx18`).
    LdSt(Register),
    /// `ADD I, Vx` (`Fx1E`).
    AddI(Register),
    /// `LD F, Vx` (`Fx29`).
    LdF(Register),
    /// `LD B, Vx` (`Fx33`).
    LdB(Register),
    /// `LD [I], Vx` (`Fx55`).
    LdDerefIReg(Register),
    /// `LD Vx, [I]` (`Fx65`).
    LdRegDerefI(Register),
}

impl Instruction {
    /// Returns the instruction corresponding to the given opcode.
    ///
    /// Decoding is pure: the same opcode always yields the same instruction.
    pub fn from_opcode(opcode: Opcode) -> Result<Self, InvalidOpcodeError> {
        use self::Instruction::*;

        Ok(match (opcode.0 & 0xF000) >> 12 {
            0x0 => match opcode.byte() {
                0xE0 => Cls,
                0xEE => Ret,
                _ => return Err(InvalidOpcodeError(opcode)),
            },
            0x1 => Jp(opcode.addr()),
            0x2 => Call(opcode.addr()),
            0x3 => SeByte(opcode.vx(), opcode.byte()),
            0x4 => SneByte(opcode.vx(), opcode.byte()),
            0x5 => SeReg(opcode.vx(), opcode.vy()),
            0x6 => LdByte(opcode.vx(), opcode.byte()),
            0x7 => AddByte(opcode.vx(), opcode.byte()),
            0x8 => match opcode.nibble() {
                0x0 => LdReg(opcode.vx(), opcode.vy()),
                0x1 => Or(opcode.vx(), opcode.vy()),
                0x2 => And(opcode.vx(), opcode.vy()),
                0x3 => Xor(opcode.vx(), opcode.vy()),
                0x4 => AddReg(opcode.vx(), opcode.vy()),
                0x5 => Sub(opcode.vx(), opcode.vy()),
                0x6 => Shr(opcode.vx(), opcode.vy()),
                0x7 => Subn(opcode.vx(), opcode.vy()),
                0xE => Shl(opcode.vx(), opcode.vy()),
                _ => return Err(InvalidOpcodeError(opcode)),
            },
            0x9 => SneReg(opcode.vx(), opcode.vy()),
            0xA => LdI(opcode.addr()),
            0xB => JpV0(opcode.addr()),
            0xC => Rnd(opcode.vx(), opcode.byte()),
            0xD => Drw(opcode.vx(), opcode.vy(), opcode.nibble()),
            0xE => match opcode.byte() {
                0x9E => Skp(opcode.vx()),
                0xA1 => Sknp(opcode.vx()),
                _ => return Err(InvalidOpcodeError(opcode)),
            },
            0xF => match opcode.byte() {
                0x07 => LdRegDt(opcode.vx()),
                0x0A => LdKey(opcode.vx()),
                0x15 => LdDtReg(opcode.vx()),
                0x18 => LdSt(opcode.vx()),
                0x1E => AddI(opcode.vx()),
                0x29 => LdF(opcode.vx()),
                0x33 => LdB(opcode.vx()),
                0x55 => LdDerefIReg(opcode.vx()),
                0x65 => LdRegDerefI(opcode.vx()),
                _ => return Err(InvalidOpcodeError(opcode)),
            },
            _ => unreachable!("4-bit quantity didn't match 0-15"),
        })
    }

    /// Returns whether the instruction sets the program counter itself, in
    /// which case the interpreter must not advance it afterwards.
    pub fn owns_pc(&self) -> bool {
        use self::Instruction::*;

        match *self {
            Jp(_) | JpV0(_) | Call(_) | Ret => true,
            _ => false,
        }
    }

    /// Returns the mnemonic of the instruction.
    pub fn mnemonic(&self) -> Mnemonic {
        use self::Instruction::*;

        match *self {
            Cls => Mnemonic::Cls,
            Ret => Mnemonic::Ret,
            Jp(_) | JpV0(_) => Mnemonic::Jp,
            Call(_) => Mnemonic::Call,
            SeByte(_, _) | SeReg(_, _) => Mnemonic::Se,
            SneByte(_, _) | SneReg(_, _) => Mnemonic::Sne,
            LdByte(_, _)
            | LdReg(_, _)
            | LdI(_)
            | LdRegDt(_)
            | LdKey(_)
            | LdDtReg(_)
            | LdSt(_)
            | LdF(_)
            | LdB(_)
            | LdDerefIReg(_)
            | LdRegDerefI(_) => Mnemonic::Ld,
            AddByte(_, _) | AddReg(_, _) | AddI(_) => Mnemonic::Add,
            Or(_, _) => Mnemonic::Or,
            And(_, _) => Mnemonic::And,
            Xor(_, _) => Mnemonic::Xor,
            Sub(_, _) => Mnemonic::Sub,
            Shr(_, _) => Mnemonic::Shr,
            Subn(_, _) => Mnemonic::Subn,
            Shl(_, _) => Mnemonic::Shl,
            Rnd(_, _) => Mnemonic::Rnd,
            Drw(_, _, _) => Mnemonic::Drw,
            Skp(_) => Mnemonic::Skp,
            Sknp(_) => Mnemonic::Sknp,
        }
    }

    /// Returns the operands of the instruction, in assembly order.
    pub fn operands(&self) -> Vec<Operand> {
        use self::Instruction::*;
        use self::OperandRole as R;

        match *self {
            Cls | Ret => vec![],
            Jp(addr) | Call(addr) => vec![Operand::address(addr)],
            JpV0(addr) => vec![Operand::register(Register::V0), Operand::address(addr)],
            SeByte(reg, b) | SneByte(reg, b) | LdByte(reg, b) | AddByte(reg, b) | Rnd(reg, b) => {
                vec![Operand::register(reg), Operand::immediate(b)]
            }
            SeReg(reg1, reg2)
            | SneReg(reg1, reg2)
            | LdReg(reg1, reg2)
            | Or(reg1, reg2)
            | And(reg1, reg2)
            | Xor(reg1, reg2)
            | AddReg(reg1, reg2)
            | Sub(reg1, reg2)
            | Shr(reg1, reg2)
            | Subn(reg1, reg2)
            | Shl(reg1, reg2) => vec![Operand::register(reg1), Operand::register(reg2)],
            LdI(addr) => vec![Operand::fixed(R::I), Operand::address(addr)],
            Drw(reg1, reg2, n) => vec![
                Operand::register(reg1),
                Operand::register(reg2),
                Operand::new(n as u16, R::Nibble),
            ],
            Skp(reg) | Sknp(reg) => vec![Operand::register(reg)],
            LdRegDt(reg) => vec![Operand::register(reg), Operand::fixed(R::DelayTimer)],
            LdKey(reg) => vec![Operand::register(reg), Operand::fixed(R::Key)],
            LdDtReg(reg) => vec![Operand::fixed(R::DelayTimer), Operand::register(reg)],
            LdSt(reg) => vec![Operand::fixed(R::SoundTimer), Operand::register(reg)],
            AddI(reg) => vec![Operand::fixed(R::I), Operand::register(reg)],
            LdF(reg) => vec![Operand::fixed(R::Font), Operand::register(reg)],
            LdB(reg) => vec![Operand::fixed(R::Bcd), Operand::register(reg)],
            LdDerefIReg(reg) => vec![Operand::fixed(R::IndirectI), Operand::register(reg)],
            LdRegDerefI(reg) => vec![Operand::register(reg), Operand::fixed(R::IndirectI)],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        for (i, operand) in self.operands().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, operand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests decoding of one representative opcode per instruction.
    #[test]
    fn decode_table() {
        use super::Instruction::*;
        use super::Register::*;

        let addr = |a| Address::from_u16(a).unwrap();
        let cases = [
            (0x00E0, Cls),
            (0x00EE, Ret),
            (0x1234, Jp(addr(0x234))),
            (0x1201, Jp(addr(0x201))),
            (0x2ABC, Call(addr(0xABC))),
            (0x3A12, SeByte(VA, 0x12)),
            (0x4B34, SneByte(VB, 0x34)),
            (0x5120, SeReg(V1, V2)),
            (0x6CFF, LdByte(VC, 0xFF)),
            (0x7D01, AddByte(VD, 0x01)),
            (0x8120, LdReg(V1, V2)),
            (0x8121, Or(V1, V2)),
            (0x8122, And(V1, V2)),
            (0x8123, Xor(V1, V2)),
            (0x8124, AddReg(V1, V2)),
            (0x8125, Sub(V1, V2)),
            (0x8126, Shr(V1, V2)),
            (0x8127, Subn(V1, V2)),
            (0x812E, Shl(V1, V2)),
            (0x9340, SneReg(V3, V4)),
            (0xA123, LdI(addr(0x123))),
            (0xB300, JpV0(addr(0x300))),
            (0xC50F, Rnd(V5, 0x0F)),
            (0xD015, Drw(V0, V1, 5)),
            (0xE29E, Skp(V2)),
            (0xE3A1, Sknp(V3)),
            (0xF407, LdRegDt(V4)),
            (0xF50A, LdKey(V5)),
            (0xF615, LdDtReg(V6)),
            (0xF718, LdSt(V7)),
            (0xF81E, AddI(V8)),
            (0xF929, LdF(V9)),
            (0xFA33, LdB(VA)),
            (0xFB55, LdDerefIReg(VB)),
            (0xFC65, LdRegDerefI(VC)),
        ];

        for &(opcode, ref instr) in cases.iter() {
            assert_eq!(
                Instruction::from_opcode(Opcode(opcode)).as_ref(),
                Ok(instr),
                "case {:#06X}",
                opcode
            );
        }
    }

    /// Tests that opcodes outside the table are reported rather than guessed.
    #[test]
    fn unrecognized_opcodes() {
        let cases = [
            0x0000, 0x0123, 0x00E1, 0x00FF, 0x8008, 0x800F, 0x812D, 0xE19F, 0xE0A0, 0xF000,
            0xF130, 0xF175, 0xFF85, 0xF0FF,
        ];

        for &opcode in cases.iter() {
            assert_eq!(
                Instruction::from_opcode(Opcode(opcode)),
                Err(InvalidOpcodeError(Opcode(opcode))),
                "case {:#06X}",
                opcode
            );
        }
    }

    /// Tests that decoding every possible word twice gives the same result.
    #[test]
    fn decode_is_deterministic() {
        for word in 0..=0xFFFFu16 {
            let (high, low) = Opcode(word).bytes();
            let first = Instruction::from_opcode(Opcode::from_bytes(high, low));
            let second = Instruction::from_opcode(Opcode(word));
            assert_eq!(first, second, "case {:#06X}", word);
            if let Ok(instr) = first {
                assert_eq!(instr.operands(), second.unwrap().operands());
            }
        }
    }

    /// Tests that opcodes are assembled big-endian.
    #[test]
    fn opcode_from_bytes() {
        assert_eq!(Opcode::from_bytes(0x12, 0x34), Opcode(0x1234));
        assert_eq!(Opcode(0xABCD).bytes(), (0xAB, 0xCD));
    }

    /// Tests the textual form of instructions, which is driven by the
    /// operand roles.
    #[test]
    fn display() {
        let cases = [
            (0x00E0, "CLS"),
            (0x00EE, "RET"),
            (0x1208, "JP #208"),
            (0xB208, "JP V0, #208"),
            (0x2FFF, "CALL #FFF"),
            (0x3A0B, "SE VA, #0B"),
            (0x9AB0, "SNE VA, VB"),
            (0x8EF6, "SHR VE, VF"),
            (0xA050, "LD I, #050"),
            (0xD12F, "DRW V1, V2, 15"),
            (0xEFA1, "SKNP VF"),
            (0xF107, "LD V1, DT"),
            (0xF20A, "LD V2, K"),
            (0xF315, "LD DT, V3"),
            (0xF418, "LD ST, V4"),
            (0xF51E, "ADD I, V5"),
            (0xF629, "LD F, V6"),
            (0xF733, "LD B, V7"),
            (0xF855, "LD [I], V8"),
            (0xF965, "LD V9, [I]"),
            (0xC0FF, "RND V0, #FF"),
        ];

        for &(opcode, text) in cases.iter() {
            let instr = Instruction::from_opcode(Opcode(opcode)).unwrap();
            assert_eq!(instr.to_string(), text, "case {:#06X}", opcode);
        }
    }

    /// Tests the operand roles of a few instructions whose roles are easy to
    /// get wrong.
    #[test]
    fn operand_roles() {
        use super::OperandRole as R;

        let roles = |opcode| {
            Instruction::from_opcode(Opcode(opcode))
                .unwrap()
                .operands()
                .iter()
                .map(|op| op.role)
                .collect::<Vec<_>>()
        };

        assert!(roles(0x00E0).is_empty());
        assert_eq!(roles(0xA123), vec![R::I, R::Address]);
        assert_eq!(roles(0xD125), vec![R::Register, R::Register, R::Nibble]);
        assert_eq!(roles(0xF307), vec![R::Register, R::DelayTimer]);
        assert_eq!(roles(0xF315), vec![R::DelayTimer, R::Register]);
        assert_eq!(roles(0xF30A), vec![R::Register, R::Key]);
        assert_eq!(roles(0xF355), vec![R::IndirectI, R::Register]);
        assert_eq!(roles(0xF365), vec![R::Register, R::IndirectI]);
        assert_eq!(roles(0x6312), vec![R::Register, R::Immediate]);
    }

    /// Tests which instructions take over the program counter.
    #[test]
    fn owns_pc() {
        let owning = [0x00EE, 0x1234, 0x2345, 0xB456];
        let advancing = [0x00E0, 0x3000, 0x6000, 0x8124, 0xD011, 0xF00A, 0xE09E];

        for &opcode in owning.iter() {
            let instr = Instruction::from_opcode(Opcode(opcode)).unwrap();
            assert!(instr.owns_pc(), "case {:#06X}", opcode);
        }
        for &opcode in advancing.iter() {
            let instr = Instruction::from_opcode(Opcode(opcode)).unwrap();
            assert!(!instr.owns_pc(), "case {:#06X}", opcode);
        }
    }
}
