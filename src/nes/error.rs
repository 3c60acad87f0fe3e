// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors raised while emulating the CPU and its address bus.

use nes::addressing::Operand;
use std::error::Error;
use std::fmt;
use std::result;

/// Errors returned by emulation operations. None of these are recoverable at
/// the point they're raised; once one occurs the program counter no longer
/// points at a meaningful instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulationError {
    /// The fetched opcode has no entry in the instruction table.
    InvalidOpcode(u8),
    /// No memory range claims the address.
    AddressOutOfRange(usize),
    /// A memory map passed to the bus doesn't cover the address space
    /// exactly once.
    InvalidMemoryMap(&'static str),
    /// An operation was handed an operand its addressing mode can't produce,
    /// e.g. a store given a value instead of an address.
    UnexpectedOperand(Operand),
}

impl fmt::Display for EmulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EmulationError::InvalidOpcode(opcode) =>
                write!(f, "invalid opcode {:#04X}", opcode),
            EmulationError::AddressOutOfRange(addr) =>
                write!(f, "address {:#06X} is not mapped to any memory", addr),
            EmulationError::InvalidMemoryMap(reason) =>
                write!(f, "invalid memory map: {}", reason),
            EmulationError::UnexpectedOperand(operand) =>
                write!(f, "operation cannot use operand {:?}", operand),
        }
    }
}

impl Error for EmulationError {}

pub type Result<T> = result::Result<T, EmulationError>;
