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

//! The `chip8` binary program.
//!
//! This runs a program headless for a fixed amount of time and then prints
//! what ended up on the display.

extern crate chip8vm;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{self, Write};
use std::process;
use std::thread;
use std::time::Duration;

use clap::{App, Arg, ArgMatches};
use failure::{Error, ResultExt};
use log::LevelFilter;

use chip8vm::Machine;
use chip8vm::input::Key;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// An error resulting from a key argument that doesn't name a key.
#[derive(Debug, Fail)]
#[fail(display = "invalid key '{}' (expected a hex digit)", _0)]
struct InvalidKeyError(String);

fn main() {
    let matches = App::new("chip8")
        .version(VERSION)
        .author("Ian Johnson <ianprime0509@gmail.com>")
        .about("A headless Chip-8 virtual machine")
        .help_message("show this help message and exit")
        .version_message("show version information and exit")
        .arg(
            Arg::with_name("duration")
                .short("d")
                .long("duration")
                .value_name("MILLIS")
                .help("set how long to run the program (in milliseconds)")
                .takes_value(true)
                .default_value("1000"),
        )
        .arg(
            Arg::with_name("key")
                .short("k")
                .long("key")
                .value_name("KEY")
                .help("hold down the given key (0-F) while running")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("increase verbosity"),
        )
        .arg(
            Arg::with_name("FILE")
                .help("set the program file to run")
                .required(true)
                .index(1),
        )
        .get_matches();

    let verbosity = matches.occurrences_of("verbose");
    let filter = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter(None, filter)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        for cause in e.causes().skip(1) {
            info!("caused by: {}", cause);
        }
        trace!("backtrace: {}", e.backtrace());
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let duration = matches
        .value_of("duration")
        .unwrap_or("1000")
        .parse::<u64>()
        .context("invalid duration argument")?;
    let keys = match matches.values_of("key") {
        Some(values) => values.map(parse_key).collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let filename = matches.value_of("FILE").unwrap_or_default();
    let mut input =
        File::open(filename).with_context(|_| format!("could not open file '{}'", filename))?;
    let mut machine = Machine::new();
    machine
        .load_program_from(&mut input)
        .with_context(|_| format!("could not load program from file '{}'", filename))?;

    for &key in keys.iter() {
        machine.set_key_state(key, true);
    }
    machine.start()?;
    info!("running '{}' for {} ms", filename, duration);
    thread::sleep(Duration::from_millis(duration));
    machine.stop();

    {
        let interpreter = machine.interpreter();
        info!(
            "stopped at {:#05X} (DT = {}, ST = {})",
            interpreter.pc(),
            interpreter.dt(),
            interpreter.st()
        );
    }

    let stdout = io::stdout();
    let mut output = stdout.lock();
    write!(output, "{}", machine.display_snapshot()).context("could not write display")?;

    Ok(())
}

/// Parses a key argument, which is a single hex digit.
fn parse_key(arg: &str) -> Result<Key, Error> {
    u8::from_str_radix(arg, 16)
        .ok()
        .and_then(Key::from_byte)
        .ok_or_else(|| InvalidKeyError(arg.to_owned()).into())
}
