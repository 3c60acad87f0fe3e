// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate getopts;
extern crate nes_cpu;

use getopts::Options;
use nes_cpu::debugger::console;
use nes_cpu::debugger::debugger::Debugger;
use nes_cpu::io::binutils;
use nes_cpu::io::errors::*;
use nes_cpu::io::log;
use nes_cpu::nes::nes::{NES, NESRuntimeOptions};
use std::env;

/// Prints usage information with an optional reason.
fn print_usage(program: &str, opts: &Options, reason: Option<&str>) {
    let brief = format!("usage: {} [options] ROM", program);
    if let Some(reason) = reason {
        eprintln!("{}: {}", program, reason);
    }
    print!("{}", opts.usage(&brief));
}

/// Initializes and starts the emulator. Returns an exit code after which the
/// program unwinds and stops executing. Once the emulator starts executing, the
/// application should only stop due to user input or a CPU error.
fn init() -> i32 {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("v", "verbose", "display CPU frame information");
    opts.optflag("d", "debug", "drive execution from the debugger console");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            print_usage(&program, &opts, Some(&e.to_string()));
            return EXIT_FAILURE;
        },
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts, None);
        return EXIT_SUCCESS;
    }

    // The rom path is the one mandatory free argument.
    let rom_path = match matches.free.len() {
        1 => matches.free[0].clone(),
        0 => {
            print_usage(&program, &opts, Some("no rom passed"));
            return EXIT_FAILURE;
        },
        _ => {
            print_usage(&program, &opts, Some("only one rom may be passed"));
            return EXIT_FAILURE;
        },
    };

    let runtime_options = NESRuntimeOptions {
        verbose: matches.opt_present("v"),
        debug: matches.opt_present("d"),
    };

    let (header, image) = match binutils::load_rom(&rom_path) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("{}: {}: {}", program, rom_path, e);
            return EXIT_INVALID_ROM;
        },
    };
    log::log("rom", format!("{} PRG-ROM bank(s), trainer: {}", header.prg_rom_size,
                            header.has_trainer()), &runtime_options);

    let mut nes = NES::new(runtime_options);
    let result = nes.load_program(&image)
        .and_then(|_| nes.reset())
        .and_then(|_| if runtime_options.debug {
            Debugger::new(console::spawn()).run(&mut nes)
        } else {
            nes.run()
        });

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", program, e);
            eprintln!("{}", nes.cpu);
            exit_code(&e)
        },
    }
}

/// Entry point of the program and wrapper of init. Takes the exit code returned
/// from init and exits with it.
fn main() {
    let exit_code = init();
    std::process::exit(exit_code); // Unwinding done, safe to exit.
}
