// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use nes::addressing::{AddressingFn, AddressingMode};
use nes::cpu::CPU;
use nes::error::{EmulationError, Result};
use nes::memory::AddressBus;
use nes::opcode::{self, Opcode};
use nes::operation::OperationFn;
use std::fmt;

/// A decoded opcode. All 6502 instructions are a maximum size of 3 bytes. The
/// first byte is the opcode which determines the action of the instruction
/// and the addressing mode decides how many of the following 2 bytes are its
/// arguments.
#[derive(Clone, Copy)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub resolve: AddressingFn,
    pub execute: OperationFn,
}

impl Instruction {
    /// Length of the instruction in bytes, opcode included.
    #[inline(always)]
    pub fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

impl From<Opcode> for Instruction {
    fn from(opcode: Opcode) -> Instruction {
        let (mnemonic, mode, execute) = opcode.definition();
        Instruction {
            opcode: opcode as u8,
            mnemonic: mnemonic,
            mode: mode,
            resolve: mode.resolver(),
            execute: execute,
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02X} {} {:?}", self.opcode, self.mnemonic, self.mode)
    }
}

/// Dispatch table with one slot per possible opcode byte. Slots for bytes that
/// aren't official opcodes stay empty.
pub struct InstructionTable {
    entries: [Option<Instruction>; 256],
}

impl InstructionTable {
    pub fn new() -> InstructionTable {
        let mut entries = [None; 256];
        for (byte, entry) in entries.iter_mut().enumerate() {
            *entry = opcode::decode_opcode(byte as u8).map(Instruction::from);
        }
        InstructionTable { entries: entries }
    }

    #[inline(always)]
    pub fn get(&self, opcode: u8) -> Option<Instruction> {
        self.entries[opcode as usize]
    }

    /// Like `get`, but an empty slot is an error.
    #[inline(always)]
    pub fn lookup(&self, opcode: u8) -> Result<Instruction> {
        self.get(opcode).ok_or(EmulationError::InvalidOpcode(opcode))
    }

    /// Number of opcodes with an entry.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

impl Default for InstructionTable {
    fn default() -> InstructionTable {
        InstructionTable::new()
    }
}

/// Disassembles the instruction at `addr`. Returns the assembler text along
/// with the raw instruction bytes.
pub fn disassemble(table: &InstructionTable, memory: &AddressBus, addr: u16) -> Result<(String, Vec<u8>)> {
    let instr = table.lookup(memory.read(addr)?)?;
    let mut bytes = Vec::with_capacity(3);
    for offset in 0..instr.len() {
        bytes.push(memory.read(addr.wrapping_add(offset))?);
    }

    let lsb = bytes.get(1).cloned().unwrap_or(0);
    let msb = bytes.get(2).cloned().unwrap_or(0);
    let next_pc = addr.wrapping_add(instr.len());
    let operand = instr.mode.format_operand(lsb, msb, next_pc);
    let text = if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    };
    Ok((text, bytes))
}

/// Formats the instruction the CPU is about to execute along with the register
/// state, one line per instruction.
pub fn trace_line(cpu: &CPU, memory: &AddressBus) -> Result<String> {
    let (disassembled, bytes) = disassemble(cpu.instructions(), memory, cpu.pc)?;
    let raw: Vec<String> = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();
    Ok(format!("{:04X}  {:8}  {:14}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
               cpu.pc, raw.join(" "), disassembled, cpu.a, cpu.x, cpu.y, cpu.p, cpu.sp))
}
