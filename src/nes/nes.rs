// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use io::log;
use nes::cpu::CPU;
use nes::error::Result;
use nes::instruction;
use nes::memory::AddressBus;

/// Options chosen on the command line that change how the emulator behaves
/// while running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NESRuntimeOptions {
    pub verbose: bool, // Log every executed instruction.
    pub debug: bool,   // Drive execution from the debugger console.
}

/// The host owning the CPU and its address bus.
pub struct NES {
    pub runtime_options: NESRuntimeOptions,
    pub cpu: CPU,
    pub memory: AddressBus,
}

impl NES {
    pub fn new(runtime_options: NESRuntimeOptions) -> NES {
        NES {
            runtime_options: runtime_options,
            cpu: CPU::new(),
            memory: AddressBus::nes(),
        }
    }

    /// Copies a program image into cartridge space.
    pub fn load_program(&mut self, image: &[u8]) -> Result<()> {
        self.memory.load_program(image)?;
        log::log("nes", format!("Loaded {} byte program image", image.len()), &self.runtime_options);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        self.cpu.reset(&self.memory)?;
        log::log("cpu", format!("Reset, starting at {:#06X}", self.cpu.pc), &self.runtime_options);
        Ok(())
    }

    /// Executes a single instruction, tracing it first when verbose.
    pub fn step(&mut self) -> Result<()> {
        if self.runtime_options.verbose {
            let line = instruction::trace_line(&self.cpu, &self.memory)?;
            log::log("trace", line, &self.runtime_options);
        }
        self.cpu.step(&mut self.memory)
    }

    /// Runs until an instruction fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.step()?;
        }
    }
}
