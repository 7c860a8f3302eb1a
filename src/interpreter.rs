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

//! The Chip-8 interpreter.
//!
//! The main focus of this module is the `Interpreter` struct, which contains
//! the state of a Chip-8 machine (apart from the timers, which are shared
//! with the timer cycle) and knows how to execute instructions against it.
//! Execution is split into two steps: `execute` applies the effect of an
//! instruction, and `advance` moves the program counter past it unless the
//! instruction already took control of the program counter.  `step` runs one
//! complete instruction cycle, including the wait for a key press.
//!
//! The interpreter never fails while running.  Unrecognized opcodes are
//! skipped, arithmetic wraps and memory addresses wrap around the end of
//! memory.

use std::default::Default;
use std::fmt;
use std::num::Wrapping;
use std::sync::Arc;

use failure::Error;
use rand::{self, Rng, SeedableRng, XorShiftRng};

use PROG_START;
use display;
use font;
use input::{self, Key};
use instruction::{Instruction, InvalidOpcodeError, Opcode, Register};
use memory::Memory;
use timer::Timers;

/// The maximum number of return addresses on the call stack.
pub const STACK_DEPTH: usize = 16;
/// The largest value the stack pointer register can hold.
const MAX_SP: u8 = 15;

/// Options for the interpreter.
pub struct Options {
    /// The seed to use for `RND` (default `None`, meaning a random seed).
    ///
    /// The seed must not be all zeros.
    pub rng_seed: Option<[u32; 4]>,
}

impl Options {
    /// Returns the default set of options.
    pub fn new() -> Self {
        Options { rng_seed: None }
    }

    /// Returns a set of options useful for testing (e.g. a fixed seed).
    pub fn testing() -> Self {
        Options {
            rng_seed: Some([0x193A_6754, 0xA8A7_D469, 0x9783_0E05, 0x113B_A7BB]),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new()
    }
}

/// A Chip-8 interpreter.
///
/// This struct contains the state of a Chip-8 machine and provides all the
/// expected methods for interacting with it, such as stepping through
/// execution and inspecting the internal state.
pub struct Interpreter {
    /// The internal memory.
    mem: Memory,
    /// The display buffer.
    display: display::Buffer,
    /// The input state.
    input: input::State,
    /// The general-purpose registers `V0`-`VF`.
    regs: [Wrapping<u8>; 16],
    /// The special register `I`.
    reg_i: u16,
    /// The delay and sound timers.
    timers: Arc<Timers>,
    /// The program counter.
    pc: u16,
    /// The stack pointer register, tracking the call depth up to `MAX_SP`.
    sp: u8,
    /// The call stack (for returning from subroutines), at most
    /// `STACK_DEPTH` entries.
    stack: Vec<u16>,
    /// The register waiting for a key press, if any.
    waiting_for_key: Option<Register>,
    /// The source of randomness for `RND`.
    rng: XorShiftRng,
}

impl Interpreter {
    /// Returns a new interpreter with the default options.
    pub fn new() -> Self {
        Interpreter::with_options(Options::default())
    }

    /// Returns a new interpreter using the given options.
    pub fn with_options(options: Options) -> Self {
        Interpreter {
            mem: Memory::new(),
            display: display::Buffer::new(),
            input: input::State::new(),
            regs: [Wrapping(0); 16],
            reg_i: 0,
            timers: Arc::new(Timers::new()),
            pc: PROG_START as u16,
            sp: 0,
            stack: Vec::with_capacity(STACK_DEPTH),
            waiting_for_key: None,
            rng: match options.rng_seed {
                Some(seed) => XorShiftRng::from_seed(seed),
                None => rand::weak_rng(),
            },
        }
    }

    /// Loads the given program into memory.
    ///
    /// On failure, memory is left as it was.
    pub fn load_program(&mut self, prog: &[u8]) -> Result<(), Error> {
        self.mem.load_program(prog)
    }

    /// Puts the machine back in its initial state.
    ///
    /// The loaded program stays in memory; everything else (registers, stack,
    /// timers, display, input and the font) is reinitialized.
    pub fn reset(&mut self) {
        self.display.clear();
        self.input.clear();
        self.regs = [Wrapping(0); 16];
        self.reg_i = 0;
        self.timers.reset();
        self.pc = PROG_START as u16;
        self.sp = 0;
        self.stack.clear();
        self.waiting_for_key = None;
        self.mem.load_font();
    }

    /// Returns a reference to the display buffer.
    pub fn display(&self) -> &display::Buffer {
        &self.display
    }

    /// Returns a mutable reference to the display buffer.
    pub fn display_mut(&mut self) -> &mut display::Buffer {
        &mut self.display
    }

    /// Returns a reference to the input state.
    pub fn input(&self) -> &input::State {
        &self.input
    }

    /// Returns a mutable reference to the input state.
    pub fn input_mut(&mut self) -> &mut input::State {
        &mut self.input
    }

    /// Returns a reference to the internal memory.
    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    /// Returns a mutable reference to the internal memory.
    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    /// Returns a handle to the timers, which may be shared with another
    /// thread.
    pub fn timers(&self) -> Arc<Timers> {
        Arc::clone(&self.timers)
    }

    /// Returns the value of register `I`.
    pub fn i(&self) -> u16 {
        self.reg_i
    }

    /// Sets the value of register `I`.
    pub fn set_i(&mut self, val: u16) {
        self.reg_i = val;
    }

    /// Returns the value of the delay timer.
    pub fn dt(&self) -> u8 {
        self.timers.dt()
    }

    /// Sets the value of the delay timer.
    pub fn set_dt(&mut self, val: u8) {
        self.timers.set_dt(val);
    }

    /// Returns the value of the sound timer.
    pub fn st(&self) -> u8 {
        self.timers.st()
    }

    /// Sets the value of the sound timer.
    pub fn set_st(&mut self, val: u8) {
        self.timers.set_st(val);
    }

    /// Returns the value in the given register.
    pub fn register(&self, reg: Register) -> u8 {
        self.regs[reg as usize].0
    }

    /// Sets the given register to the given value.
    pub fn set_register(&mut self, reg: Register, val: u8) {
        self.regs[reg as usize].0 = val
    }

    /// Returns the value of the program counter.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the value of the stack pointer.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Sets the stack pointer register.  Values above 15 are saturated to 15.
    ///
    /// The call stack itself is not affected.
    pub fn set_sp(&mut self, val: u8) {
        self.sp = if val > MAX_SP { MAX_SP } else { val };
    }

    /// Returns the return addresses currently on the call stack, innermost
    /// last.
    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    /// Returns the register that is waiting for a key press, if the
    /// interpreter is in the key-wait state.
    pub fn waiting_for_key(&self) -> Option<Register> {
        self.waiting_for_key
    }

    /// Returns the instruction at the program counter.
    pub fn current_instruction(&self) -> Result<Instruction, InvalidOpcodeError> {
        Instruction::from_opcode(self.current_opcode())
    }

    /// Returns the opcode at the program counter.
    pub fn current_opcode(&self) -> Opcode {
        self.opcode_at(self.pc)
    }

    /// Returns the opcode stored at the given address.
    pub fn opcode_at(&self, addr: u16) -> Opcode {
        Opcode::from_bytes(self.mem.read(addr), self.mem.read(addr.wrapping_add(1)))
    }

    /// Performs a single instruction cycle.
    ///
    /// While waiting for a key press, a cycle only checks whether a key has
    /// been pressed; the program counter was already advanced past the
    /// instruction that started the wait.  Unrecognized opcodes are logged
    /// and skipped.
    pub fn step(&mut self) {
        if let Some(reg) = self.waiting_for_key {
            if let Some(key) = self.input.take_key_press() {
                debug!("got key {:?} for {}", key, reg);
                self.set_register(reg, key as u8);
                self.waiting_for_key = None;
            }
            return;
        }

        let pc = self.pc;
        match self.current_instruction() {
            Ok(instr) => {
                trace!("{:#05X}: {}", pc, instr);
                self.execute(&instr);
                self.advance(&instr);
            }
            Err(e) => {
                warn!("{} at address {:#05X}; skipping it", e, pc);
                self.pc = pc.wrapping_add(2);
            }
        }
    }

    /// Executes the given instruction in the current interpreter context.
    ///
    /// The program counter is only touched by instructions that need to
    /// (jumps, calls, returns and skips); call `advance` afterwards to move
    /// on to the next instruction.
    pub fn execute(&mut self, ins: &Instruction) {
        use self::Instruction::*;

        match *ins {
            Cls => self.display.clear(),
            Ret => self.ret(),
            Jp(addr) => self.pc = addr.addr(),
            Call(addr) => self.call(addr.addr()),
            SeByte(reg, b) => if self.register(reg) == b {
                self.skip();
            },
            SneByte(reg, b) => if self.register(reg) != b {
                self.skip();
            },
            SeReg(reg1, reg2) => if self.register(reg1) == self.register(reg2) {
                self.skip();
            },
            LdByte(reg, b) => self.set_register(reg, b),
            AddByte(reg, b) => self.regs[reg as usize] += Wrapping(b),
            LdReg(reg1, reg2) => {
                let r2 = self.register(reg2);
                self.set_register(reg1, r2);
            }
            Or(reg1, reg2) => {
                let r1 = self.register(reg1);
                let r2 = self.register(reg2);
                self.set_register(reg1, r1 | r2);
            }
            And(reg1, reg2) => {
                let r1 = self.register(reg1);
                let r2 = self.register(reg2);
                self.set_register(reg1, r1 & r2);
            }
            Xor(reg1, reg2) => {
                let r1 = self.register(reg1);
                let r2 = self.register(reg2);
                self.set_register(reg1, r1 ^ r2);
            }
            AddReg(reg1, reg2) => {
                let r2 = self.register(reg2);
                self.add(reg1, r2);
            }
            Sub(reg1, reg2) => {
                let r2 = self.register(reg2);
                self.sub(reg1, r2);
            }
            Shr(reg, _) => self.shr(reg),
            Subn(reg1, reg2) => {
                let r2 = self.register(reg2);
                self.subn(reg1, r2);
            }
            Shl(reg, _) => self.shl(reg),
            SneReg(reg1, reg2) => if self.register(reg1) != self.register(reg2) {
                self.skip();
            },
            LdI(addr) => self.reg_i = addr.addr(),
            JpV0(addr) => {
                self.pc = addr.addr().wrapping_add(self.register(Register::V0) as u16);
            }
            Rnd(reg, b) => {
                let r = self.rng.gen::<u8>();
                self.set_register(reg, r & b);
            }
            Drw(reg1, reg2, n) => self.drw(reg1, reg2, n),
            Skp(reg) => if self.key_pressed(reg) {
                self.skip();
            },
            Sknp(reg) => if !self.key_pressed(reg) {
                self.skip();
            },
            LdRegDt(reg) => {
                let dt = self.dt();
                self.set_register(reg, dt);
            }
            LdKey(reg) => {
                debug!("waiting for a key press for {}", reg);
                self.waiting_for_key = Some(reg);
            }
            LdDtReg(reg) => {
                let r = self.register(reg);
                self.set_dt(r);
            }
            LdSt(reg) => {
                let r = self.register(reg);
                self.set_st(r);
            }
            AddI(reg) => {
                self.reg_i = self.reg_i.wrapping_add(self.register(reg) as u16);
            }
            LdF(reg) => self.reg_i = font::sprite_address(self.register(reg)),
            LdB(reg) => self.ld_b(reg),
            LdDerefIReg(reg) => self.ld_deref_i_reg(reg),
            LdRegDerefI(reg) => self.ld_reg_deref_i(reg),
        }
    }

    /// Moves the program counter past the given instruction, unless the
    /// instruction set the program counter itself.
    pub fn advance(&mut self, ins: &Instruction) {
        if !ins.owns_pc() {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    /// Sets `reg` to `reg + val`, setting `VF` to 1 if the sum is greater
    /// than 255 or 0 otherwise.
    fn add(&mut self, reg: Register, val: u8) {
        let sum = self.register(reg) as u16 + val as u16;
        self.set_register(reg, sum as u8);
        self.set_register(Register::VF, (sum > 255) as u8);
    }

    /// Pushes the address of the next instruction and jumps to `addr`.
    ///
    /// Once the stack holds `STACK_DEPTH` return addresses, a call replaces
    /// the innermost one instead of pushing a new one.
    fn call(&mut self, addr: u16) {
        let ret = self.pc.wrapping_add(2);
        if self.stack.len() < STACK_DEPTH {
            self.stack.push(ret);
        } else {
            warn!("call stack overflow at {:#05X}", self.pc);
            if let Some(top) = self.stack.last_mut() {
                *top = ret;
            }
        }
        let depth = self.stack.len();
        self.set_sp(depth as u8);
        self.pc = addr;
    }

    /// Implements the `DRW` operation.
    fn drw(&mut self, reg1: Register, reg2: Register, n: u8) {
        let sprite = self.mem.read_range(self.reg_i, n as usize);
        let x = self.register(reg1) as usize;
        let y = self.register(reg2) as usize;

        let collision = self.display.draw_sprite(&sprite, x, y);
        self.set_register(Register::VF, collision as u8);
    }

    /// Returns whether the key named by the given register is pressed.
    ///
    /// Register values that don't name a key are never pressed.
    fn key_pressed(&self, reg: Register) -> bool {
        Key::from_byte(self.register(reg)).map_or(false, |key| self.input.is_pressed(key))
    }

    /// Implements the `LD B, Vx` operation.
    fn ld_b(&mut self, reg: Register) {
        let val = self.register(reg);
        let addr = self.reg_i;

        self.mem.write(addr, val / 100);
        self.mem.write(addr.wrapping_add(1), val % 100 / 10);
        self.mem.write(addr.wrapping_add(2), val % 10);
    }

    /// Implements the `LD [I], Vx` operation.
    fn ld_deref_i_reg(&mut self, reg: Register) {
        let start = self.reg_i;
        for regno in 0..=reg as usize {
            self.mem
                .write(start.wrapping_add(regno as u16), self.regs[regno].0);
        }
    }

    /// Implements the `LD Vx, [I]` operation.
    fn ld_reg_deref_i(&mut self, reg: Register) {
        let start = self.reg_i;
        for regno in 0..=reg as usize {
            self.regs[regno] = Wrapping(self.mem.read(start.wrapping_add(regno as u16)));
        }
    }

    /// Pops the innermost return address into the program counter.
    ///
    /// Returning with an empty stack does nothing but move on to the next
    /// instruction.
    fn ret(&mut self) {
        match self.stack.pop() {
            Some(ret) => {
                let depth = self.stack.len();
                self.set_sp(depth as u8);
                self.pc = ret;
            }
            None => {
                warn!("no subroutine to return from at {:#05X}", self.pc);
                self.pc = self.pc.wrapping_add(2);
            }
        }
    }

    /// Sets `reg` to `reg << 1`, setting `VF` to the old highest bit.
    fn shl(&mut self, reg: Register) {
        let old = self.register(reg);
        self.set_register(reg, old << 1);
        self.set_register(Register::VF, old >> 7);
    }

    /// Sets `reg` to `reg >> 1`, setting `VF` to the old lowest bit.
    fn shr(&mut self, reg: Register) {
        let old = self.register(reg);
        self.set_register(reg, old >> 1);
        self.set_register(Register::VF, old & 1);
    }

    /// Skips the next instruction.
    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Subtracts the given byte from the given register, setting `VF` to 1
    /// if the register was strictly greater or 0 otherwise.
    fn sub(&mut self, reg: Register, val: u8) {
        let old = self.register(reg);
        self.set_register(reg, old.wrapping_sub(val));
        self.set_register(Register::VF, (old > val) as u8);
    }

    /// Sets `reg` to `val - reg`, setting `VF` to 1 if `val` was strictly
    /// greater or 0 otherwise.
    fn subn(&mut self, reg: Register, val: u8) {
        let old = self.register(reg);
        self.set_register(reg, val.wrapping_sub(old));
        self.set_register(Register::VF, (val > old) as u8);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("pc", &self.pc)
            .field("i", &self.reg_i)
            .field("regs", &self.regs.iter().map(|r| r.0).collect::<Vec<_>>())
            .field("sp", &self.sp)
            .field("stack", &self.stack())
            .field("timers", &self.timers.get())
            .field("waiting_for_key", &self.waiting_for_key)
            .finish()
    }
}
