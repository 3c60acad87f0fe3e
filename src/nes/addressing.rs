// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use nes::cpu::CPU;
use nes::error::Result;
use nes::memory::AddressBus;
use utils::arithmetic;

/// What an addressing mode hands to an operation: nothing, a byte to work on,
/// or the effective address of the byte to work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Value(u8),
    Address(u16),
}

/// Computes the operand of an instruction. The program counter points just
/// past the opcode on entry and just past the instruction on exit.
pub type AddressingFn = fn(&mut CPU, &mut AddressBus) -> Result<Operand>;

/// Every addressing mode of the 6502. Most instructions support several modes,
/// which is what gives the 56 mnemonics their 151 opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_len(&self) -> u16 {
        use self::AddressingMode::*;

        match *self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY => 1,
            IndexedIndirect | IndirectIndexed | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }

    /// The routine that resolves operands in this mode.
    pub fn resolver(&self) -> AddressingFn {
        use self::AddressingMode::*;

        match *self {
            Implied         => implied,
            Accumulator     => accumulator,
            Immediate       => immediate,
            ZeroPage        => zero_page,
            ZeroPageX       => zero_page_x,
            ZeroPageY       => zero_page_y,
            Absolute        => absolute,
            AbsoluteX       => absolute_x,
            AbsoluteY       => absolute_y,
            Indirect        => indirect,
            IndexedIndirect => indexed_indirect,
            IndirectIndexed => indirect_indexed,
            Relative        => relative,
        }
    }

    /// Formats operand bytes in assembler syntax. `next_pc` is the address of
    /// the following instruction, needed to show branch targets.
    pub fn format_operand(&self, lsb: u8, msb: u8, next_pc: u16) -> String {
        use self::AddressingMode::*;

        let word = (msb as u16) << 8 | lsb as u16;
        match *self {
            Implied         => String::new(),
            Accumulator     => String::from("A"),
            Immediate       => format!("#${:02X}", lsb),
            ZeroPage        => format!("${:02X}", lsb),
            ZeroPageX       => format!("${:02X},X", lsb),
            ZeroPageY       => format!("${:02X},Y", lsb),
            Absolute        => format!("${:04X}", word),
            AbsoluteX       => format!("${:04X},X", word),
            AbsoluteY       => format!("${:04X},Y", word),
            Indirect        => format!("(${:04X})", word),
            IndexedIndirect => format!("(${:02X},X)", lsb),
            IndirectIndexed => format!("(${:02X}),Y", lsb),
            Relative        => format!("${:04X}", arithmetic::add_relative(next_pc, lsb as i8)),
        }
    }
}

/// The instruction has no operand or the operand is implied by the
/// instruction itself (e.g. CLC).
pub fn implied(_: &mut CPU, _: &mut AddressBus) -> Result<Operand> {
    Ok(Operand::Implied)
}

/// Operates directly on the accumulator.
pub fn accumulator(cpu: &mut CPU, _: &mut AddressBus) -> Result<Operand> {
    Ok(Operand::Value(cpu.a))
}

/// The operand is the byte following the opcode.
pub fn immediate(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    Ok(Operand::Value(cpu.fetch_u8(memory)?))
}

/// An 8-bit address within the first page of memory.
pub fn zero_page(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    Ok(Operand::Address(cpu.fetch_u8(memory)? as u16))
}

/// A zero page address offset by X. The sum wraps around within the zero page
/// so $FF,X with X = 1 is $00.
pub fn zero_page_x(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let base = cpu.fetch_u8(memory)?;
    Ok(Operand::Address(base.wrapping_add(cpu.x) as u16))
}

/// A zero page address offset by Y, wrapping like zero page X.
pub fn zero_page_y(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let base = cpu.fetch_u8(memory)?;
    Ok(Operand::Address(base.wrapping_add(cpu.y) as u16))
}

/// A full 16-bit little-endian address.
pub fn absolute(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    Ok(Operand::Address(cpu.fetch_u16(memory)?))
}

pub fn absolute_x(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let base = cpu.fetch_u16(memory)?;
    Ok(Operand::Address(base.wrapping_add(cpu.x as u16)))
}

pub fn absolute_y(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let base = cpu.fetch_u16(memory)?;
    Ok(Operand::Address(base.wrapping_add(cpu.y as u16)))
}

/// The operand is the address stored at the given address. Only used by JMP.
pub fn indirect(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let pointer = cpu.fetch_u16(memory)?;
    Ok(Operand::Address(memory.read_word(pointer)?))
}

/// (zp,X): the pointer lives in the zero page at the given address plus X.
pub fn indexed_indirect(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let pointer = cpu.fetch_u8(memory)?.wrapping_add(cpu.x);
    Ok(Operand::Address(memory.read_word(pointer as u16)?))
}

/// (zp),Y: the pointer lives in the zero page at the given address and Y is
/// added to the address it points to.
pub fn indirect_indexed(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let pointer = cpu.fetch_u8(memory)?;
    let base = memory.read_word(pointer as u16)?;
    Ok(Operand::Address(base.wrapping_add(cpu.y as u16)))
}

/// A signed displacement from the address of the next instruction. Only used
/// by branches.
pub fn relative(cpu: &mut CPU, memory: &mut AddressBus) -> Result<Operand> {
    let displacement = cpu.fetch_u8(memory)? as i8;
    Ok(Operand::Address(arithmetic::add_relative(cpu.pc, displacement)))
}
