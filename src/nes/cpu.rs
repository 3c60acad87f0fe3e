// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use nes::addressing::Operand;
use nes::error::{EmulationError, Result};
use nes::instruction::InstructionTable;
use nes::memory::AddressBus;
use std::fmt;
use utils::arithmetic;

// Flag constants that allow easy bitwise getting and setting of flag values.
pub const CARRY_FLAG       : u8 = 0x1;
pub const ZERO_FLAG        : u8 = 0x2;
pub const INTERRUPT_DISABLE: u8 = 0x4;
pub const DECIMAL_MODE     : u8 = 0x8;
pub const BREAK_1          : u8 = 0x10;
pub const BREAK_2          : u8 = 0x20;
pub const OVERFLOW_FLAG    : u8 = 0x40;
pub const NEGATIVE_FLAG    : u8 = 0x80;

// Location of the first byte on the bottom of the stack. The stack starts on
// memory page 2 (0x100).
pub const STACK_OFFSET: u16 = 0x100;

// Vectors holding the addresses execution continues from after a reset or a
// BRK instruction.
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const BRK_VECTOR  : u16 = 0xFFFE;

// Register values at power up.
const POWER_UP_STATUS: u8 = 0x34;
const POWER_UP_SP    : u8 = 0xFD;

/// This is an implementation of 2A03 processor used in the NES. The 2A03 is
/// based off the 6502 processor with some minor changes such as having no
/// binary-coded decimal mode.
///
/// The CPU doesn't own any memory. Every operation that touches memory borrows
/// the address bus for its duration.
pub struct CPU {
    // The program counter is a 16-bit register which points to the next
    // instruction to be executed. The value of program counter is modified
    // automatically as instructions are executed.
    //
    // The value of the program counter can be modified by executing a jump, a
    // relative branch, a subroutine call to another memory address, by
    // returning from a subroutine, or by an interrupt.
    pub pc: u16,

    // The processor supports a 256 byte stack located between $0100 and $01FF.
    // The stack pointer is an 8-bit register and holds the next free location
    // on the stack. The location of the stack is fixed and cannot be moved and
    // grows downwards.
    pub sp: u8,

    // The 8-bit accumulator is used all arithmetic and logical operations (with
    // the exception of increments and decrements). The contents of the
    // accumulator can be stored and retrieved either from memory or the stack.
    pub a: u8,

    // The 8-bit X register can be used to control information, compare values
    // in memory, and be incremented or decremented. The X register is special
    // as it can be used to get a copy of the stack pointer or change its value.
    pub x: u8,

    // The 8-bit Y register like X, can be used to manage information and be
    // incremented or decremented; however it doesn't have any special functions
    // like the X register does.
    pub y: u8,

    // The Processor Status register contains a list of flags that are set and
    // cleared by instructions to record the results of operations. Each flag
    // has a special bit within the register:
    //
    //   7  6  5  4  3  2  1  0
    //   N  V  B2 B1 D  I  Z  C
    //
    // The two break bits have no effect on execution. They only matter when
    // the register is pushed onto the stack by a BRK instruction, which forces
    // both of them on.
    //
    // Decimal mode can be set and cleared but the 2A03 has no BCD circuitry so
    // it never changes the result of an addition or subtraction.
    pub p: u8,

    // Decoded instructions indexed by opcode. Built once when the CPU is
    // created.
    instructions: InstructionTable,
}

impl CPU {
    pub fn new() -> CPU {
        CPU {
            pc: 0,
            sp: POWER_UP_SP,
            a: 0,
            x: 0,
            y: 0,
            p: POWER_UP_STATUS,
            instructions: InstructionTable::new(),
        }
    }

    /// The instruction table this CPU dispatches through.
    pub fn instructions(&self) -> &InstructionTable {
        &self.instructions
    }

    /// Sets the given flag(s) in the status register.
    #[inline(always)]
    pub fn set_flag(&mut self, flag: u8) {
        self.p |= flag;
    }

    /// Unsets the given flag(s) in the status register.
    #[inline(always)]
    pub fn unset_flag(&mut self, flag: u8) {
        self.p &= !flag;
    }

    /// Returns true if the given flag is set in the status register.
    #[inline(always)]
    pub fn flag_set(&self, flag: u8) -> bool {
        self.p & flag == flag
    }

    /// Sets the flag if `on` is true, otherwise the flag is unset.
    #[inline(always)]
    pub fn toggle_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.set_flag(flag);
        } else {
            self.unset_flag(flag);
        }
    }

    #[inline(always)]
    pub fn carry_flag_set(&self) -> bool {
        self.flag_set(CARRY_FLAG)
    }

    #[inline(always)]
    pub fn zero_flag_set(&self) -> bool {
        self.flag_set(ZERO_FLAG)
    }

    #[inline(always)]
    pub fn overflow_flag_set(&self) -> bool {
        self.flag_set(OVERFLOW_FLAG)
    }

    #[inline(always)]
    pub fn negative_flag_set(&self) -> bool {
        self.flag_set(NEGATIVE_FLAG)
    }

    /// Sets the zero flag if the value passed (typically a reference to a
    /// register) is zero, otherwise it's unset.
    #[inline(always)]
    pub fn toggle_zero_flag(&mut self, value: u8) {
        self.toggle_flag(ZERO_FLAG, value == 0);
    }

    /// Sets the negative flag if the value passed (typically a reference to a
    /// register) is negative, otherwise it's unset.
    #[inline(always)]
    pub fn toggle_negative_flag(&mut self, value: u8) {
        self.toggle_flag(NEGATIVE_FLAG, arithmetic::is_negative(value));
    }

    /// Updates both the zero and negative flags from a result byte.
    #[inline(always)]
    pub fn toggle_zero_negative(&mut self, value: u8) {
        self.toggle_zero_flag(value);
        self.toggle_negative_flag(value);
    }

    /// Emulates the reset line being pulled. Interrupts are disabled, the stack
    /// pointer drops by 3 as if three pushes happened and execution continues
    /// from the address held in the reset vector.
    pub fn reset(&mut self, memory: &AddressBus) -> Result<()> {
        self.set_flag(INTERRUPT_DISABLE);
        self.sp = self.sp.wrapping_sub(3);
        self.pc = memory.read_word(RESET_VECTOR)?;
        Ok(())
    }

    /// Fetches, decodes and executes exactly one instruction.
    pub fn step(&mut self, memory: &mut AddressBus) -> Result<()> {
        let opcode = self.fetch_u8(memory)?;
        let instr = self.instructions.lookup(opcode)?;
        let operand = (instr.resolve)(self, memory)?;
        (instr.execute)(self, memory, operand)
    }

    /// Executes instructions until one of them fails.
    pub fn run(&mut self, memory: &mut AddressBus) -> Result<()> {
        loop {
            self.step(memory)?;
        }
    }

    /// Reads the byte at the program counter and moves past it.
    pub fn fetch_u8(&mut self, memory: &AddressBus) -> Result<u8> {
        let value = memory.read(self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(value)
    }

    /// Reads the little-endian word at the program counter and moves past it.
    pub fn fetch_u16(&mut self, memory: &AddressBus) -> Result<u16> {
        let value = memory.read_word(self.pc)?;
        self.pc = self.pc.wrapping_add(2);
        Ok(value)
    }

    // Utility functions for managing the stack.

    /// Pushes an 8-bit number onto the stack.
    pub fn push_u8(&mut self, memory: &mut AddressBus, value: u8) -> Result<()> {
        memory.write(STACK_OFFSET + self.sp as u16, value)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    /// Pops an 8-bit number off the stack.
    pub fn pop_u8(&mut self, memory: &mut AddressBus) -> Result<u8> {
        self.sp = self.sp.wrapping_add(1);
        memory.read(STACK_OFFSET + self.sp as u16)
    }

    /// Pushes a 16-bit number (usually an address) onto the stack, high byte
    /// first.
    pub fn push_u16(&mut self, memory: &mut AddressBus, value: u16) -> Result<()> {
        self.push_u8(memory, (value >> 8) as u8)?;
        self.push_u8(memory, value as u8)
    }

    /// Pops a 16-bit number (usually an address) off the stack, low byte
    /// first.
    pub fn pop_u16(&mut self, memory: &mut AddressBus) -> Result<u16> {
        let lsb = self.pop_u8(memory)? as u16;
        let msb = self.pop_u8(memory)? as u16;
        Ok(msb << 8 | lsb)
    }

    /// Returns the byte an operation works on. Addresses are dereferenced
    /// through the bus. There is no byte behind an implied operand.
    pub fn operand_value(&self, memory: &AddressBus, operand: Operand) -> Result<u8> {
        match operand {
            Operand::Value(value) => Ok(value),
            Operand::Address(addr) => memory.read(addr),
            Operand::Implied => Err(EmulationError::UnexpectedOperand(operand)),
        }
    }

    /// Returns "SET" if the passed boolean is true, otherwise "UNSET". This
    /// function is used to display flags when the CPU crashes.
    fn fmt_flag(flag: bool) -> &'static str {
        if flag { "SET" } else { "UNSET" }
    }
}

impl Default for CPU {
    fn default() -> CPU {
        CPU::new()
    }
}

impl fmt::Display for CPU {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\nCPU Crash State:")?;
        writeln!(f, "    Program Counter: {:#X}", self.pc)?;
        writeln!(f, "    Stack Pointer:   {:#X}", self.sp)?;
        writeln!(f, "    Accumulator:     {:#X}", self.a)?;
        writeln!(f, "    X Register:      {:#X}", self.x)?;
        writeln!(f, "    Y Register:      {:#X}", self.y)?;
        writeln!(f, "")?;
        writeln!(f, "Status Register: {:#X}", self.p)?;
        writeln!(f, "    Carry Flag:        {}", CPU::fmt_flag(self.carry_flag_set()))?;
        writeln!(f, "    Zero Flag:         {}", CPU::fmt_flag(self.zero_flag_set()))?;
        writeln!(f, "    Interrupt Disable: {}", CPU::fmt_flag(self.flag_set(INTERRUPT_DISABLE)))?;
        writeln!(f, "    Decimal Mode:      {}", CPU::fmt_flag(self.flag_set(DECIMAL_MODE)))?;
        writeln!(f, "    Break 1:           {}", CPU::fmt_flag(self.flag_set(BREAK_1)))?;
        writeln!(f, "    Break 2:           {}", CPU::fmt_flag(self.flag_set(BREAK_2)))?;
        writeln!(f, "    Overflow Flag:     {}", CPU::fmt_flag(self.overflow_flag_set()))?;
        writeln!(f, "    Negative Flag:     {}", CPU::fmt_flag(self.negative_flag_set()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nes::error::EmulationError;

    /// Creates a CPU that has been reset into a program placed at 0x8000.
    fn setup(program: &[u8]) -> (CPU, AddressBus) {
        let mut memory = AddressBus::nes();
        for (i, byte) in program.iter().enumerate() {
            memory.write(0x8000 + i as u16, *byte).unwrap();
        }
        memory.write(0xFFFC, 0x00).unwrap();
        memory.write(0xFFFD, 0x80).unwrap();

        let mut cpu = CPU::new();
        cpu.reset(&mut memory).unwrap();
        (cpu, memory)
    }

    #[test]
    fn power_up_state() {
        let cpu = CPU::new();
        assert_eq!(cpu.pc, 0);
        assert_eq!(cpu.a, 0);
        assert_eq!(cpu.x, 0);
        assert_eq!(cpu.y, 0);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.p, 0x34);
    }

    #[test]
    fn reset_reads_vector_and_adjusts_state() {
        let mut memory = AddressBus::nes();
        memory.write(0xFFFC, 0x34).unwrap();
        memory.write(0xFFFD, 0xC2).unwrap();

        let mut cpu = CPU::new();
        cpu.p = 0x00;
        cpu.reset(&mut memory).unwrap();
        assert_eq!(cpu.pc, 0xC234);
        assert_eq!(cpu.sp, 0xFA);
        assert!(cpu.flag_set(INTERRUPT_DISABLE));
    }

    #[test]
    fn reset_without_vector_starts_at_zero() {
        let mut memory = AddressBus::nes();
        let mut cpu = CPU::new();
        cpu.reset(&mut memory).unwrap();
        assert_eq!(cpu.pc, 0x0000);
    }

    #[test]
    fn flags_are_set_by_bit_position() {
        let mut cpu = CPU::new();
        cpu.p = 0;
        let flags = [CARRY_FLAG, ZERO_FLAG, INTERRUPT_DISABLE, DECIMAL_MODE,
                     BREAK_1, BREAK_2, OVERFLOW_FLAG, NEGATIVE_FLAG];
        for (bit, flag) in flags.iter().enumerate() {
            assert_eq!(*flag, 1 << bit);
            cpu.set_flag(*flag);
            assert!(cpu.flag_set(*flag));
            cpu.unset_flag(*flag);
            assert!(!cpu.flag_set(*flag));
        }
        assert_eq!(cpu.p, 0);
    }

    #[test]
    fn zero_negative_follow_result() {
        let mut cpu = CPU::new();
        cpu.toggle_zero_negative(0x00);
        assert!(cpu.zero_flag_set());
        assert!(!cpu.negative_flag_set());
        cpu.toggle_zero_negative(0x80);
        assert!(!cpu.zero_flag_set());
        assert!(cpu.negative_flag_set());
        cpu.toggle_zero_negative(0x7F);
        assert!(!cpu.zero_flag_set());
        assert!(!cpu.negative_flag_set());
    }

    #[test]
    fn stack_push_writes_then_decrements() {
        let mut memory = AddressBus::nes();
        let mut cpu = CPU::new();
        cpu.sp = 0xFF;
        cpu.push_u8(&mut memory, 0x42).unwrap();
        assert_eq!(memory.read(0x01FF).unwrap(), 0x42);
        assert_eq!(cpu.sp, 0xFE);
        assert_eq!(cpu.pop_u8(&mut memory).unwrap(), 0x42);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn stack_pointer_wraps() {
        let mut memory = AddressBus::nes();
        let mut cpu = CPU::new();
        cpu.sp = 0x00;
        cpu.push_u8(&mut memory, 0x99).unwrap();
        assert_eq!(memory.read(0x0100).unwrap(), 0x99);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(cpu.pop_u8(&mut memory).unwrap(), 0x99);
        assert_eq!(cpu.sp, 0x00);
    }

    #[test]
    fn stack_words_are_pushed_high_byte_first() {
        let mut memory = AddressBus::nes();
        let mut cpu = CPU::new();
        cpu.sp = 0xFF;
        cpu.push_u16(&mut memory, 0xC0DE).unwrap();
        assert_eq!(memory.read(0x01FF).unwrap(), 0xC0);
        assert_eq!(memory.read(0x01FE).unwrap(), 0xDE);
        assert_eq!(cpu.pop_u16(&mut memory).unwrap(), 0xC0DE);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn step_executes_one_instruction() {
        // LDA #$42
        // STA $0010
        let (mut cpu, mut memory) = setup(&[0xA9, 0x42, 0x8D, 0x10, 0x00]);
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.pc, 0x8002);
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.pc, 0x8005);
        assert_eq!(memory.read(0x0010).unwrap(), 0x42);
        assert!(!cpu.negative_flag_set());
        assert!(!cpu.zero_flag_set());
    }

    #[test]
    fn step_rejects_undefined_opcodes() {
        let (mut cpu, mut memory) = setup(&[0xFF]);
        assert_eq!(cpu.step(&mut memory), Err(EmulationError::InvalidOpcode(255)));
    }

    #[test]
    fn run_stops_on_first_error() {
        // INX
        // INX
        // .byte $02
        let (mut cpu, mut memory) = setup(&[0xE8, 0xE8, 0x02]);
        assert_eq!(cpu.run(&mut memory), Err(EmulationError::InvalidOpcode(0x02)));
        assert_eq!(cpu.x, 2);
        assert_eq!(cpu.pc, 0x8003);
    }

    #[test]
    fn implied_operand_has_no_value() {
        let memory = AddressBus::nes();
        let cpu = CPU::new();
        assert_eq!(cpu.operand_value(&memory, Operand::Value(7)), Ok(7));
        assert_eq!(cpu.operand_value(&memory, Operand::Implied),
                   Err(EmulationError::UnexpectedOperand(Operand::Implied)));
    }

    #[test]
    fn crash_state_lists_registers() {
        let cpu = CPU::new();
        let state = cpu.to_string();
        assert!(state.contains("Stack Pointer:   0xFD"));
        assert!(state.contains("Interrupt Disable: SET"));
        assert!(state.contains("Carry Flag:        UNSET"));
    }
}
