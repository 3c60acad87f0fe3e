// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use debugger::parser;
use io::log;
use nes::error::Result;
use nes::instruction;
use nes::nes::NES;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;
use utils::paging;

const BYTES_PER_LINE: usize = 16;

// One past the last address a dump may reach.
const ADDRESS_SPACE_END: usize = 0x10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Stop,
    Continue,
    Step,
    Dump,
    Registers,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CommandWithArguments {
    pub command: Command,
    pub args: Vec<String>,
}

pub struct Debugger {
    receiver: Receiver<String>,
    stepping: bool,
    quit: bool,
}

impl Debugger {
    pub fn new(receiver: Receiver<String>) -> Self {
        Debugger {
            receiver: receiver,
            stepping: true,
            quit: false,
        }
    }

    /// Returns true while the CPU is executing without waiting for commands.
    pub fn stepping(&self) -> bool {
        self.stepping
    }

    /// Returns true once the user asked to leave or the console went away.
    pub fn quit(&self) -> bool {
        self.quit
    }

    /// Drives the emulator until the user quits. Errors raised by the CPU end
    /// the session.
    pub fn run(&mut self, nes: &mut NES) -> Result<()> {
        while !self.quit {
            self.step(nes)?;
        }
        Ok(())
    }

    /// Handles at most one pending command and then steps the CPU forward a
    /// single instruction unless execution is stopped.
    pub fn step(&mut self, nes: &mut NES) -> Result<()> {
        // Input is received from another thread so the emulator can run without
        // the debugger prompt blocking it.
        match self.receiver.try_recv() {
            Ok(input) => {
                if let Some(output) = self.handle_input(&input, nes)? {
                    println!("{}", output);
                }
            },
            Err(TryRecvError::Disconnected) => self.quit = true,
            Err(TryRecvError::Empty) => {},
        };

        // If the debugger is in stepping mode, continue execution like normal,
        // otherwise the CPU should not update. In the meantime, sleep the host
        // CPU while we wait for input.
        if self.quit {
            Ok(())
        } else if self.stepping {
            nes.step()
        } else {
            thread::sleep(Duration::from_millis(16));
            Ok(())
        }
    }

    /// Interprets and executes a line of input. Returns text to show the user,
    /// if any. Mistakes in the input are reported as text; only failures of
    /// the emulator itself are errors.
    pub fn handle_input(&mut self, input: &str, nes: &mut NES) -> Result<Option<String>> {
        match interpret(input) {
            Ok(command) => self.execute_command(command, nes),
            Err(e) => Ok(Some(format!("nes-cpu: {}", e))),
        }
    }

    /// Executes the correct debugger command based on the enum passed.
    fn execute_command(&mut self, command: CommandWithArguments, nes: &mut NES) -> Result<Option<String>> {
        match command.command {
            Command::Stop => self.execute_stop(nes),
            Command::Continue => self.execute_continue(nes),
            Command::Step => return self.execute_step(nes),
            Command::Dump => return Ok(Some(execute_dump(nes, &command.args))),
            Command::Registers => return Ok(Some(execute_registers(nes))),
            Command::Quit => self.quit = true,
        };
        Ok(None)
    }

    /// Stops execution of the CPU to allow the human some time to debug a
    /// problem or stare at hex codes all day to look like a l33t haxor.
    fn execute_stop(&mut self, nes: &NES) {
        log::log("debugger", "Stopping execution now...", &nes.runtime_options);
        self.stepping = false;
    }

    /// Starts execution if it's stopped.
    fn execute_continue(&mut self, nes: &NES) {
        log::log("debugger", "Starting execution now...", &nes.runtime_options);
        self.stepping = true;
    }

    /// Executes a single instruction while stopped and shows where the CPU
    /// ended up.
    fn execute_step(&mut self, nes: &mut NES) -> Result<Option<String>> {
        if self.stepping {
            return Ok(Some(String::from("nes-cpu: stop execution before stepping")));
        }
        nes.step()?;
        Ok(Some(execute_registers(nes)))
    }
}

/// Parse a raw input string into a list of arguments and a command. This
/// function also maps command names to their respective enums.
pub fn interpret(input: &str) -> ::std::result::Result<CommandWithArguments, String> {
    let mut args = parser::input_to_arguments(input)?;
    if args.is_empty() {
        return Err(String::from("no command specified"));
    }

    // Map command strings to the command enum type.
    let raw_command = args.remove(0);
    let command = match raw_command.to_lowercase().as_str() {
        // Full commands.
        "stop"     => Command::Stop,
        "continue" => Command::Continue,
        "step"     => Command::Step,
        "dump"     => Command::Dump,
        "regs"     => Command::Registers,
        "quit"     => Command::Quit,
        // Aliases.
        "s" => Command::Stop,
        "c" => Command::Continue,
        "n" => Command::Step,
        "d" => Command::Dump,
        "r" => Command::Registers,
        "q" => Command::Quit,
        _ => return Err(format!("unknown command specified: {}", raw_command)),
    };

    Ok(CommandWithArguments {
        command: command,
        args: args,
    })
}

fn parse_hex(arg: &str) -> ::std::result::Result<usize, String> {
    let digits = arg.trim_start_matches("0x").trim_start_matches('$');
    usize::from_str_radix(digits, 16).map_err(|_| format!("invalid hex number: {}", arg))
}

/// Dumps memory starting at an address. Without a length the whole page
/// holding the address is shown.
fn execute_dump(nes: &NES, args: &[String]) -> String {
    let (start, len) = match dump_bounds(args) {
        Ok(bounds) => bounds,
        Err(e) => return format!("nes-cpu: {}", e),
    };

    match nes.memory.dump(start, len) {
        Ok(bytes) => format_dump(start, &bytes),
        Err(e) => format!("nes-cpu: {}", e),
    }
}

fn dump_bounds(args: &[String]) -> ::std::result::Result<(u16, usize), String> {
    let addr = match args.get(0) {
        Some(arg) => parse_hex(arg)?,
        None => return Err(String::from("usage: dump <addr> [len]")),
    };
    if addr > 0xFFFF {
        return Err(format!("address out of range: {}", args[0]));
    }

    let len = match args.get(1) {
        Some(arg) => parse_hex(arg)?,
        None => return Ok((paging::page_start(addr as u16), paging::PAGE_SIZE)),
    };
    if len > ADDRESS_SPACE_END - addr {
        return Err(format!("length {} runs past the end of memory", args[1]));
    }
    Ok((addr as u16, len))
}

/// Formats bytes as a hex dump with the address of the first byte of each
/// line in front.
pub fn format_dump(start: u16, bytes: &[u8]) -> String {
    let lines: Vec<String> = bytes.chunks(BYTES_PER_LINE).enumerate().map(|(i, chunk)| {
        let addr = start as usize + i * BYTES_PER_LINE;
        let hex: Vec<String> = chunk.iter().map(|byte| format!("{:02X}", byte)).collect();
        format!("{:04X}  {}", addr, hex.join(" "))
    }).collect();
    lines.join("\n")
}

/// Shows the registers and the instruction about to be executed.
fn execute_registers(nes: &NES) -> String {
    let cpu = &nes.cpu;
    let next = match instruction::disassemble(cpu.instructions(), &nes.memory, cpu.pc) {
        Ok((text, _)) => text,
        Err(e) => format!("<{}>", e),
    };
    format!("PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} (page {:02X})  {}",
            cpu.pc, cpu.a, cpu.x, cpu.y, cpu.p, cpu.sp, paging::page(cpu.pc), next)
}
