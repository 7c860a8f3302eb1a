/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Tests whether the disassembler shows exactly the instructions that the
//! interpreter would execute.

extern crate chip8vm;

use std::io::Cursor;

use chip8vm::interpreter::Options;
use chip8vm::{Disassembler, Instruction, Interpreter, Register};

/// A small program that draws the digits of a counter in a loop, followed by
/// a sprite and an odd trailing byte.
static COUNTER: &[u8] = &[
    0x00, 0xE0, // CLS
    0x63, 0x00, // LD V3, #00
    0xA3, 0x00, // LD I, #300
    0xF3, 0x33, // LD B, V3
    0xF2, 0x65, // LD V2, [I]
    0xF0, 0x29, // LD F, V0
    0x64, 0x00, // LD V4, #00
    0x65, 0x00, // LD V5, #00
    0xD4, 0x55, // DRW V4, V5, 5
    0x73, 0x01, // ADD V3, #01
    0x22, 0x18, // CALL #218
    0x12, 0x02, // JP #202
    0x81, 0x2E, // SHL V1, V2
    0x00, 0xEE, // RET
    0x3C, 0x42, // sprite data
    0xE7, 0x81, // sprite data
    0x0F,
];

#[test]
fn disassembly_matches_interpreter() {
    let mut interpreter = Interpreter::with_options(Options::testing());
    interpreter.load_program(COUNTER).unwrap();
    let disasm = Disassembler::new(&mut Cursor::new(COUNTER)).unwrap();

    let lines = disasm.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), (COUNTER.len() + 1) / 2);

    for line in lines.iter().filter(|line| line.len == 2) {
        let opcode = interpreter.opcode_at(line.address as u16);
        assert_eq!(line.opcode, opcode, "line {}", line);
        assert_eq!(
            line.instruction,
            Instruction::from_opcode(opcode).ok(),
            "line {}",
            line
        );
    }
}

/// Tests that stepping through the program executes the instructions in the
/// order the disassembly lists them, up to the first call.
#[test]
fn straight_line_code_runs_in_listed_order() {
    let mut interpreter = Interpreter::with_options(Options::testing());
    interpreter.load_program(COUNTER).unwrap();
    let disasm = Disassembler::from_bytes(COUNTER);

    for line in disasm.lines().take(10) {
        assert_eq!(interpreter.pc() as usize, line.address, "line {}", line);
        assert_eq!(
            interpreter.current_instruction().ok(),
            line.instruction,
            "line {}",
            line
        );
        interpreter.step();
    }
    assert_eq!(interpreter.register(Register::V3), 1);
    assert!(!interpreter.display().snapshot().is_blank());
}

#[test]
fn listing_text() {
    let disasm = Disassembler::from_bytes(COUNTER);
    let mut output = Vec::new();
    disasm.dump(&mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    let lines = text.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "200  00 E0  CLS");
    assert_eq!(lines[3], "206  F3 33  LD B, V3");
    assert_eq!(lines[10], "214  22 18  CALL #218");
    assert_eq!(lines[12], "218  81 2E  SHL V1, V2");
    assert_eq!(lines[14], "21C  3C 42  SE VC, #42");
    assert_eq!(lines[15], "21E  E7 81  DW #E781");
    assert_eq!(lines[16], "220  0F     DB #0F");
}
