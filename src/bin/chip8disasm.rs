/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The `chip8disasm` binary program.
//!
//! Prints a linear listing of a Chip-8 program, optionally restricted to an
//! address range or to the words that decode as instructions.

extern crate chip8vm;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{self, Read, Write};
use std::process;

use clap::{App, Arg, ArgMatches};
use failure::{Error, ResultExt};
use log::LevelFilter;

use chip8vm::disassembler::Line;
use chip8vm::{Disassembler, MEM_SIZE};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// An error resulting from an address argument that isn't a valid address.
#[derive(Debug, Fail)]
#[fail(display = "invalid address '{}' (expected a hex number below 1000)", _0)]
struct InvalidAddressError(String);

/// Which lines to print, and how.
struct Listing {
    /// The first address to include.
    from: usize,
    /// The last address to include.
    to: usize,
    /// Whether to leave out words that aren't instructions.
    code_only: bool,
    /// Whether to print only the assembly text.
    plain: bool,
}

impl Listing {
    fn from_matches(matches: &ArgMatches) -> Result<Self, Error> {
        let from = match matches.value_of("from") {
            Some(arg) => parse_address(arg)?,
            None => 0,
        };
        let to = match matches.value_of("to") {
            Some(arg) => parse_address(arg)?,
            None => MEM_SIZE - 1,
        };

        Ok(Listing {
            from,
            to,
            code_only: matches.is_present("code-only"),
            plain: matches.is_present("plain"),
        })
    }

    fn includes(&self, line: &Line) -> bool {
        self.from <= line.address && line.address <= self.to && (line.is_code() || !self.code_only)
    }

    fn write<W: Write>(&self, output: &mut W, line: &Line) -> io::Result<()> {
        if self.plain {
            writeln!(output, "{}", line.text())
        } else {
            writeln!(output, "{}", line)
        }
    }
}

fn main() {
    let matches = App::new("chip8disasm")
        .version(VERSION)
        .author("Ian Johnson <ianprime0509@gmail.com>")
        .about("Lists the instructions of a Chip-8 program")
        .help_message("show this help message and exit")
        .version_message("show this version information and exit")
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("OUTPUT")
                .help("write the listing to OUTPUT instead of standard output")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("from")
                .short("f")
                .long("from")
                .value_name("ADDR")
                .help("start the listing at the given (hex) address")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("to")
                .short("t")
                .long("to")
                .value_name("ADDR")
                .help("end the listing at the given (hex) address")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("code-only")
                .short("c")
                .long("code-only")
                .help("leave out words that are not instructions"),
        )
        .arg(
            Arg::with_name("plain")
                .short("p")
                .long("plain")
                .help("print only the assembly text of each line"),
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
                .help("the program to list (standard input if absent or '-')")
                .index(1),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        error!("{}", e);
        for cause in e.causes().skip(1) {
            info!("caused by: {}", cause);
        }
        trace!("backtrace: {}", e.backtrace());
        process::exit(1);
    }
}

fn init_logging(verbosity: u64) {
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
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let listing = Listing::from_matches(matches)?;

    let disasm = match matches.value_of("FILE") {
        None | Some("-") => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            Disassembler::new(&mut input)?
        }
        Some(path) => {
            let mut input =
                File::open(path).with_context(|_| format!("could not open input file '{}'", path))?;
            Disassembler::new(&mut input)?
        }
    };

    let stdout = io::stdout();
    let mut output: Box<Write> = match matches.value_of("output") {
        None | Some("-") => Box::new(stdout.lock()),
        Some(path) => Box::new(File::create(path)
            .with_context(|_| format!("could not create output file '{}'", path))?),
    };

    let (mut code, mut data) = (0, 0);
    for line in disasm.lines().filter(|line| listing.includes(line)) {
        if line.is_code() {
            code += 1;
        } else {
            data += 1;
        }
        listing
            .write(&mut output, &line)
            .context("could not write listing")?;
    }
    info!(
        "listed {} instructions and {} data words from {} bytes",
        code,
        data,
        disasm.prog().len()
    );

    Ok(())
}

/// Parses a hex address argument, with or without a leading `#` or `0x`.
fn parse_address(arg: &str) -> Result<usize, Error> {
    let digits = arg.trim_left_matches('#').trim_left_matches("0x");
    match usize::from_str_radix(digits, 16) {
        Ok(addr) if addr < MEM_SIZE => Ok(addr),
        _ => Err(InvalidAddressError(arg.to_owned()).into()),
    }
}
