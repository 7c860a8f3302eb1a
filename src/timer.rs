/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Clocks and the timer registers.
//!
//! The delay and sound timers are decremented by their own periodic task, so
//! they live behind a lock of their own instead of sharing the interpreter's.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use time;

const NS_PER_SEC: u128 = 1_000_000_000;

/// A basic clock, counting ticks at a fixed frequency.
#[derive(Debug)]
pub struct Clock {
    /// The frequency at which the clock ticks, in Hz.
    frequency: u32,
    /// The tick count as of the last call to `lap`.
    last: u64,
}

impl Clock {
    /// Returns a new clock running at the given frequency.
    pub fn new(frequency: u32) -> Self {
        let mut clock = Clock { frequency, last: 0 };
        clock.last = clock.now();
        clock
    }

    /// Returns the frequency of the clock.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Returns the number of ticks which have elapsed since the last call to
    /// this method (or the creation of the clock).
    pub fn lap(&mut self) -> u64 {
        let now = self.now();
        let ticks = now.saturating_sub(self.last);
        self.last = now;
        ticks
    }

    /// Returns how long it is until the next tick after the last lap.
    pub fn until_next_tick(&self) -> Duration {
        let freq = self.frequency as u128;
        let next_ns = ((self.last as u128 + 1) * NS_PER_SEC + freq - 1) / freq;
        let now_ns = time::precise_time_ns() as u128;
        Duration::from_nanos(next_ns.saturating_sub(now_ns) as u64)
    }

    /// Returns the current tick count.
    fn now(&self) -> u64 {
        (time::precise_time_ns() as u128 * self.frequency as u128 / NS_PER_SEC) as u64
    }
}

/// The values of the delay and sound timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    /// The delay timer.
    pub dt: u8,
    /// The sound timer.
    pub st: u8,
}

/// The delay and sound timers, shared between the instruction cycle and the
/// timer cycle.
#[derive(Debug, Default)]
pub struct Timers {
    regs: Mutex<Registers>,
}

impl Timers {
    /// Returns a new pair of timers, both stopped.
    pub fn new() -> Self {
        Timers::default()
    }

    /// Returns the value of the delay timer.
    pub fn dt(&self) -> u8 {
        self.lock().dt
    }

    /// Sets the value of the delay timer.
    pub fn set_dt(&self, val: u8) {
        self.lock().dt = val;
    }

    /// Returns the value of the sound timer.
    pub fn st(&self) -> u8 {
        self.lock().st
    }

    /// Sets the value of the sound timer.
    pub fn set_st(&self, val: u8) {
        self.lock().st = val;
    }

    /// Returns both timer values at once.
    pub fn get(&self) -> Registers {
        *self.lock()
    }

    /// Sets both timers to 0.
    pub fn reset(&self) {
        *self.lock() = Registers::default();
    }

    /// Performs a single timer cycle, decrementing each timer that is not
    /// already 0.
    pub fn tick(&self) {
        let mut regs = self.lock();
        if regs.dt > 0 {
            regs.dt -= 1;
        }
        if regs.st > 0 {
            regs.st -= 1;
        }
    }

    fn lock(&self) -> MutexGuard<Registers> {
        // A single byte store can't leave the registers half-updated.
        self.regs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn tick_decrements_independently() {
        let timers = Timers::new();
        timers.set_dt(2);
        timers.set_st(1);

        timers.tick();
        assert_eq!(timers.get(), Registers { dt: 1, st: 0 });
        timers.tick();
        assert_eq!(timers.get(), Registers { dt: 0, st: 0 });
        timers.tick();
        assert_eq!(timers.get(), Registers { dt: 0, st: 0 });
    }

    #[test]
    fn reset() {
        let timers = Timers::new();
        timers.set_dt(10);
        timers.set_st(20);
        timers.reset();

        assert_eq!(timers.dt(), 0);
        assert_eq!(timers.st(), 0);
    }

    #[test]
    fn clock_counts_ticks() {
        let mut clock = Clock::new(1000);
        assert_eq!(clock.frequency(), 1000);
        thread::sleep(Duration::from_millis(20));

        assert!(clock.lap() >= 10);
        assert!(clock.until_next_tick() <= Duration::from_millis(1));
    }
}
