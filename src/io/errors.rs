// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use nes::error::EmulationError;

// Exit codes used throughout the application. These exit codes has specific
// meanings and are used when no OS error codes are available.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1; // Generic error ¯\_(ツ)_/¯.
pub const EXIT_INVALID_ROM: i32 = 2; // Invalid rom passed.
pub const EXIT_INVALID_OPCODE: i32 = 3;
pub const EXIT_INVALID_ADDRESS: i32 = 4;
pub const EXIT_RUNTIME_FAILURE: i32 = 101;

/// Picks the exit code for an error that stopped emulation.
pub fn exit_code(e: &EmulationError) -> i32 {
    match *e {
        EmulationError::InvalidOpcode(_) => EXIT_INVALID_OPCODE,
        EmulationError::AddressOutOfRange(_) => EXIT_INVALID_ADDRESS,
        EmulationError::InvalidMemoryMap(_) |
        EmulationError::UnexpectedOperand(_) => EXIT_RUNTIME_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nes::addressing::Operand;

    #[test]
    fn emulation_errors_have_distinct_codes() {
        assert_eq!(exit_code(&EmulationError::InvalidOpcode(0x02)), EXIT_INVALID_OPCODE);
        assert_eq!(exit_code(&EmulationError::AddressOutOfRange(0x10000)), EXIT_INVALID_ADDRESS);
        assert_eq!(exit_code(&EmulationError::InvalidMemoryMap("gap")), EXIT_RUNTIME_FAILURE);
        assert_eq!(exit_code(&EmulationError::UnexpectedOperand(Operand::Implied)), EXIT_RUNTIME_FAILURE);
    }
}
