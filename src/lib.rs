/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! A Chip-8 virtual machine.
//!
//! The crate is split along the lines of the machine itself: `memory`,
//! `display`, `input` and `font` model the hardware, `instruction` decodes
//! opcodes, `interpreter` executes them and `machine` drives the interpreter
//! on its own clock.  The `disassembler` shares the decoder with the
//! interpreter, so what it prints is exactly what would be executed.

#[macro_use]
extern crate enum_primitive;
extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate num;
extern crate rand;
extern crate time;

/// The size of the Chip-8's memory, in bytes.
pub const MEM_SIZE: usize = 0x1000;
/// The address where programs should be loaded.
pub const PROG_START: usize = 0x200;
/// The maximum size of a Chip-8 program, in bytes.
pub const PROG_SIZE: usize = MEM_SIZE - PROG_START;

pub mod disassembler;
pub mod display;
pub mod font;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod timer;

pub use disassembler::Disassembler;
pub use instruction::{Address, Instruction, InvalidOpcodeError, Mnemonic, Opcode, Operand,
                      OperandRole, Register};
pub use interpreter::Interpreter;
pub use machine::Machine;
