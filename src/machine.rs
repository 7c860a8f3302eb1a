/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! A running Chip-8 machine.
//!
//! A `Machine` wraps an `Interpreter` and drives it from two worker threads:
//! one performs instruction cycles at `CYCLE_FREQ` and the other performs
//! timer cycles at `TIMER_FREQ`.  The timer thread only ever touches the
//! timers, so it never has to wait for the interpreter lock.  Whenever both
//! locks are needed, the interpreter lock is taken first.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use failure::{Error, ResultExt};

use display::Snapshot;
use input::Key;
use interpreter::{Interpreter, Options};
use timer::{Clock, Timers};

/// The frequency of the instruction cycle, in Hz.
pub const CYCLE_FREQ: u32 = 500;
/// The frequency of the timer cycle, in Hz.
pub const TIMER_FREQ: u32 = 60;
/// The maximum number of cycles to catch up on in a single wake-up.
const MAX_CATCH_UP: u64 = 8;

/// An error resulting from an operation that requires the machine to be
/// stopped.
#[derive(Debug, Fail)]
#[fail(display = "the machine is running")]
pub struct MachineRunningError;

/// A Chip-8 machine that runs on its own threads.
pub struct Machine {
    interpreter: Arc<Mutex<Interpreter>>,
    timers: Arc<Timers>,
    running: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl Machine {
    /// Returns a new, stopped machine with the default options.
    pub fn new() -> Self {
        Machine::with_options(Options::default())
    }

    /// Returns a new, stopped machine using the given interpreter options.
    pub fn with_options(options: Options) -> Self {
        let interpreter = Interpreter::with_options(options);
        let timers = interpreter.timers();

        Machine {
            interpreter: Arc::new(Mutex::new(interpreter)),
            timers,
            running: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
        }
    }

    /// Loads the given program into memory.
    pub fn load_program(&self, prog: &[u8]) -> Result<(), Error> {
        self.interpreter().load_program(prog)
    }

    /// Reads a program from the given source and loads it into memory.
    pub fn load_program_from<R: Read>(&self, input: &mut R) -> Result<(), Error> {
        let mut prog = Vec::new();
        input
            .read_to_end(&mut prog)
            .context("could not read program data")?;
        self.load_program(&prog)
    }

    /// Returns a copy of the current display contents.
    pub fn display_snapshot(&self) -> Snapshot {
        self.interpreter().display().snapshot()
    }

    /// Sets the state of the given key.
    pub fn set_key_state(&self, key: Key, pressed: bool) {
        self.interpreter().input_mut().set_key(key, pressed);
    }

    /// Returns whether the machine is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a lock on the interpreter, for inspecting or modifying its
    /// state.
    ///
    /// The instruction cycle is blocked for as long as the guard is held.
    pub fn interpreter(&self) -> MutexGuard<Interpreter> {
        lock(&self.interpreter)
    }

    /// Starts the instruction and timer cycles.
    ///
    /// Starting a machine that is already running does nothing.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.is_running() {
            debug!("machine already running");
            return Ok(());
        }
        self.running.store(true, Ordering::SeqCst);

        let interpreter = Arc::clone(&self.interpreter);
        let cycles = spawn_cycle(
            "chip8-cycle",
            CYCLE_FREQ,
            Arc::clone(&self.running),
            move |n| {
                let mut interpreter = lock(&interpreter);
                for _ in 0..n {
                    interpreter.step();
                }
            },
        );
        match cycles.context("could not start instruction cycle") {
            Ok(handle) => self.workers.push(handle),
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        }

        let timers = Arc::clone(&self.timers);
        let ticks = spawn_cycle(
            "chip8-timer",
            TIMER_FREQ,
            Arc::clone(&self.running),
            move |n| {
                for _ in 0..n {
                    timers.tick();
                }
            },
        );
        match ticks.context("could not start timer cycle") {
            Ok(handle) => self.workers.push(handle),
            Err(e) => {
                self.stop();
                return Err(e.into());
            }
        }

        debug!("machine started");
        Ok(())
    }

    /// Stops the machine, waiting for the current cycles to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if self.workers.is_empty() {
            return;
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("machine worker thread panicked");
            }
        }
        debug!("machine stopped");
    }

    /// Puts the machine back in its initial state, keeping the loaded
    /// program.
    ///
    /// The machine must be stopped.
    pub fn reset(&self) -> Result<(), Error> {
        if self.is_running() {
            return Err(MachineRunningError.into());
        }
        self.interpreter().reset();
        debug!("machine reset");
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}

impl Drop for Machine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Locks the interpreter.
///
/// Every interpreter operation leaves the machine in a valid state, so a lock
/// poisoned by a panicking thread is still usable.
fn lock(interpreter: &Mutex<Interpreter>) -> MutexGuard<Interpreter> {
    interpreter.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawns a thread that calls `work` with the number of elapsed ticks of a
/// clock at the given frequency, until `running` is cleared.
fn spawn_cycle<F>(
    name: &str,
    frequency: u32,
    running: Arc<AtomicBool>,
    mut work: F,
) -> io::Result<JoinHandle<()>>
where
    F: FnMut(u64) + Send + 'static,
{
    thread::Builder::new().name(name.to_owned()).spawn(move || {
        let mut clock = Clock::new(frequency);
        while running.load(Ordering::SeqCst) {
            let ticks = clock.lap();
            if ticks > MAX_CATCH_UP {
                trace!(
                    "dropping {} ticks at {} Hz",
                    ticks - MAX_CATCH_UP,
                    clock.frequency()
                );
                work(MAX_CATCH_UP);
            } else if ticks > 0 {
                work(ticks);
            }
            thread::sleep(clock.until_next_tick());
        }
    })
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use instruction::Register;

    fn with_program(prog: &[u8]) -> Machine {
        let machine = Machine::with_options(Options::testing());
        machine.load_program(prog).unwrap();
        machine
    }

    #[test]
    fn start_and_stop() {
        let mut machine = with_program(&[0x12, 0x00]);
        assert!(!machine.is_running());

        machine.start().unwrap();
        assert!(machine.is_running());
        machine.start().unwrap();
        assert!(machine.is_running());

        machine.stop();
        assert!(!machine.is_running());
        machine.stop();
        assert!(!machine.is_running());
    }

    #[test]
    fn reset_while_running_fails() {
        let mut machine = with_program(&[0x12, 0x00]);
        machine.start().unwrap();

        let err = machine.reset().unwrap_err();
        assert!(err.downcast_ref::<MachineRunningError>().is_some());

        machine.stop();
        machine.reset().unwrap();
    }

    /// Tests that both cycles make progress: the program loads the delay
    /// timer and then spins, and the timer cycle must count it down.
    #[test]
    fn runs_program() {
        let mut machine = with_program(&[
            0x60, 0x05, // LD V0, #05
            0xF0, 0x15, // LD DT, V0
            0x12, 0x04, // JP #204
        ]);
        machine.start().unwrap();
        thread::sleep(Duration::from_millis(500));
        machine.stop();

        let interpreter = machine.interpreter();
        assert_eq!(interpreter.register(Register::V0), 5);
        assert_eq!(interpreter.pc(), 0x204);
        assert_eq!(interpreter.dt(), 0);
    }

    /// Tests that the timers keep running while the instruction cycle waits
    /// for a key, and that a key press ends the wait.
    #[test]
    fn key_wait_while_running() {
        let mut machine = with_program(&[
            0x60, 0x0A, // LD V0, #0A
            0xF0, 0x15, // LD DT, V0
            0xF1, 0x0A, // LD V1, K
            0x12, 0x06, // JP #206
        ]);
        machine.start().unwrap();
        thread::sleep(Duration::from_millis(400));
        {
            let interpreter = machine.interpreter();
            assert_eq!(interpreter.waiting_for_key(), Some(Register::V1));
            assert_eq!(interpreter.dt(), 0);
        }

        machine.set_key_state(Key::K9, true);
        thread::sleep(Duration::from_millis(100));
        machine.stop();

        let interpreter = machine.interpreter();
        assert_eq!(interpreter.waiting_for_key(), None);
        assert_eq!(interpreter.register(Register::V1), 9);
        assert_eq!(interpreter.pc(), 0x206);
    }

    #[test]
    fn display_snapshot() {
        let mut machine = with_program(&[
            0xA0, 0x00, // LD I, #000
            0xD0, 0x05, // DRW V0, V0, 5
            0x12, 0x04, // JP #204
        ]);
        assert!(machine.display_snapshot().is_blank());

        machine.start().unwrap();
        thread::sleep(Duration::from_millis(100));
        machine.stop();

        let snapshot = machine.display_snapshot();
        assert!(snapshot.pixel(0, 0));
        assert!(snapshot.pixel(3, 4));
        assert!(!snapshot.pixel(1, 1));
    }

    /// Tests that a reset keeps the program but nothing else.
    #[test]
    fn reset_keeps_program() {
        let mut machine = with_program(&[
            0x6A, 0x42, // LD VA, #42
            0x12, 0x02, // JP #202
        ]);
        machine.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        machine.stop();
        machine.set_key_state(Key::K3, true);
        assert_eq!(machine.interpreter().register(Register::VA), 0x42);

        machine.reset().unwrap();

        let interpreter = machine.interpreter();
        assert_eq!(interpreter.register(Register::VA), 0);
        assert_eq!(interpreter.pc(), 0x200);
        assert!(!interpreter.input().any_pressed());
        assert_eq!(interpreter.mem().read(0x200), 0x6A);
        assert_eq!(interpreter.mem().read(0x203), 0x02);
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }
    }

    #[test]
    fn load_program_from() {
        let machine = Machine::with_options(Options::testing());
        machine.load_program_from(&mut &[0x00u8, 0xE0][..]).unwrap();
        assert_eq!(machine.interpreter().mem().read(0x201), 0xE0);

        let err = machine.load_program_from(&mut BrokenReader).unwrap_err();
        assert_eq!(err.to_string(), "could not read program data");
        assert_eq!(machine.interpreter().mem().read(0x201), 0xE0);
    }
}
