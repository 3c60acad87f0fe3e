// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The operations behind each mnemonic. Every function has the same shape so
//! it can be stored in the instruction table: it receives the operand resolved
//! by the instruction's addressing mode and applies its effect to the CPU and
//! memory.

use nes::addressing::Operand;
use nes::cpu::{CPU, BRK_VECTOR, CARRY_FLAG, DECIMAL_MODE, INTERRUPT_DISABLE, OVERFLOW_FLAG,
               NEGATIVE_FLAG, BREAK_1, BREAK_2};
use nes::error::{EmulationError, Result};
use nes::memory::AddressBus;

pub type OperationFn = fn(&mut CPU, &mut AddressBus, Operand) -> Result<()>;

// Helpers shared by several operations.

/// Returns the effective address of an operand. Stores, jumps and
/// read-modify-write operations fail on anything else.
#[inline(always)]
fn address(operand: Operand) -> Result<u16> {
    match operand {
        Operand::Address(addr) => Ok(addr),
        _ => Err(EmulationError::UnexpectedOperand(operand)),
    }
}

/// Writes the result of a shift or rotate back where its input came from:
/// the accumulator for accumulator addressing, otherwise memory.
fn write_back(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand, result: u8) -> Result<()> {
    match operand {
        Operand::Address(addr) => memory.write(addr, result)?,
        _ => cpu.a = result,
    }
    cpu.toggle_zero_negative(result);
    Ok(())
}

/// Binary addition of the accumulator, an operand and the carry. SBC reuses
/// this with the one's complement of its operand, which is why the carry acts
/// as an inverted borrow.
fn add_with_carry(cpu: &mut CPU, value: u8) {
    let before = cpu.a;
    let sum = before as u16 + value as u16 + cpu.carry_flag_set() as u16;
    let result = sum as u8;

    cpu.toggle_flag(CARRY_FLAG, sum & 0x100 != 0);
    cpu.toggle_flag(OVERFLOW_FLAG, (result ^ before) & (result ^ value) & 0x80 != 0);
    cpu.a = result;
    cpu.toggle_zero_negative(result);
}

fn compare(cpu: &mut CPU, register: u8, value: u8) {
    cpu.toggle_flag(CARRY_FLAG, register >= value);
    cpu.toggle_zero_negative(register.wrapping_sub(value));
}

fn branch(cpu: &mut CPU, operand: Operand, condition: bool) -> Result<()> {
    if condition {
        cpu.pc = address(operand)?;
    }
    Ok(())
}

fn modify(memory: &mut AddressBus, cpu: &mut CPU, operand: Operand, f: fn(u8) -> u8) -> Result<()> {
    let addr = address(operand)?;
    let result = f(memory.read(addr)?);
    memory.write(addr, result)?;
    cpu.toggle_zero_negative(result);
    Ok(())
}

// Load and store.

pub fn lda(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.a = cpu.operand_value(memory, operand)?;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

pub fn ldx(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.x = cpu.operand_value(memory, operand)?;
    let x = cpu.x;
    cpu.toggle_zero_negative(x);
    Ok(())
}

pub fn ldy(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.y = cpu.operand_value(memory, operand)?;
    let y = cpu.y;
    cpu.toggle_zero_negative(y);
    Ok(())
}

pub fn sta(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    memory.write(address(operand)?, cpu.a)
}

pub fn stx(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    memory.write(address(operand)?, cpu.x)
}

pub fn sty(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    memory.write(address(operand)?, cpu.y)
}

// Register transfers. All of them update Z and N except TXS.

pub fn tax(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.x = cpu.a;
    let x = cpu.x;
    cpu.toggle_zero_negative(x);
    Ok(())
}

pub fn tay(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.y = cpu.a;
    let y = cpu.y;
    cpu.toggle_zero_negative(y);
    Ok(())
}

pub fn tsx(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.x = cpu.sp;
    let x = cpu.x;
    cpu.toggle_zero_negative(x);
    Ok(())
}

pub fn txa(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.a = cpu.x;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

pub fn txs(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.sp = cpu.x;
    Ok(())
}

pub fn tya(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.a = cpu.y;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

// Stack operations.

pub fn pha(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    let a = cpu.a;
    cpu.push_u8(memory, a)
}

/// Pushes the status register as it is. Only BRK forces the break bits.
pub fn php(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    let p = cpu.p;
    cpu.push_u8(memory, p)
}

pub fn pla(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.a = cpu.pop_u8(memory)?;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

pub fn plp(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.p = cpu.pop_u8(memory)?;
    Ok(())
}

// Logical operations.

pub fn and(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.a &= cpu.operand_value(memory, operand)?;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

pub fn eor(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.a ^= cpu.operand_value(memory, operand)?;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

pub fn ora(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.a |= cpu.operand_value(memory, operand)?;
    let a = cpu.a;
    cpu.toggle_zero_negative(a);
    Ok(())
}

/// Tests bits of memory against the accumulator. Bits 7 and 6 of the operand
/// are copied into N and V, Z is set from the AND of both.
pub fn bit(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    let a = cpu.a;
    cpu.toggle_flag(NEGATIVE_FLAG, value & 0x80 != 0);
    cpu.toggle_flag(OVERFLOW_FLAG, value & 0x40 != 0);
    cpu.toggle_zero_flag(a & value);
    Ok(())
}

// Arithmetic.

pub fn adc(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    add_with_carry(cpu, value);
    Ok(())
}

pub fn sbc(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    add_with_carry(cpu, !value);
    Ok(())
}

pub fn cmp(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let (a, value) = (cpu.a, cpu.operand_value(memory, operand)?);
    compare(cpu, a, value);
    Ok(())
}

pub fn cpx(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let (x, value) = (cpu.x, cpu.operand_value(memory, operand)?);
    compare(cpu, x, value);
    Ok(())
}

pub fn cpy(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let (y, value) = (cpu.y, cpu.operand_value(memory, operand)?);
    compare(cpu, y, value);
    Ok(())
}

// Increments and decrements.

pub fn inc(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    modify(memory, cpu, operand, |value| value.wrapping_add(1))
}

pub fn inx(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.x = cpu.x.wrapping_add(1);
    let x = cpu.x;
    cpu.toggle_zero_negative(x);
    Ok(())
}

pub fn iny(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.y = cpu.y.wrapping_add(1);
    let y = cpu.y;
    cpu.toggle_zero_negative(y);
    Ok(())
}

pub fn dec(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    modify(memory, cpu, operand, |value| value.wrapping_sub(1))
}

pub fn dex(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.x = cpu.x.wrapping_sub(1);
    let x = cpu.x;
    cpu.toggle_zero_negative(x);
    Ok(())
}

pub fn dey(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.y = cpu.y.wrapping_sub(1);
    let y = cpu.y;
    cpu.toggle_zero_negative(y);
    Ok(())
}

// Shifts and rotates. The bit shifted out always lands in the carry.

pub fn asl(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    cpu.toggle_flag(CARRY_FLAG, value & 0x80 != 0);
    write_back(cpu, memory, operand, value << 1)
}

pub fn lsr(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    cpu.toggle_flag(CARRY_FLAG, value & 0x01 != 0);
    write_back(cpu, memory, operand, value >> 1)
}

pub fn rol(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    let carry_in = cpu.carry_flag_set() as u8;
    cpu.toggle_flag(CARRY_FLAG, value & 0x80 != 0);
    write_back(cpu, memory, operand, value << 1 | carry_in)
}

pub fn ror(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let value = cpu.operand_value(memory, operand)?;
    let carry_in = cpu.carry_flag_set() as u8;
    cpu.toggle_flag(CARRY_FLAG, value & 0x01 != 0);
    write_back(cpu, memory, operand, value >> 1 | carry_in << 7)
}

// Jumps and calls.

pub fn jmp(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    cpu.pc = address(operand)?;
    Ok(())
}

/// Calls a subroutine. The address pushed is the last byte of the JSR
/// instruction, not the next instruction; RTS makes up the difference.
pub fn jsr(cpu: &mut CPU, memory: &mut AddressBus, operand: Operand) -> Result<()> {
    let target = address(operand)?;
    let return_addr = cpu.pc.wrapping_sub(1);
    cpu.push_u16(memory, return_addr)?;
    cpu.pc = target;
    Ok(())
}

pub fn rts(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.pc = cpu.pop_u16(memory)?.wrapping_add(1);
    Ok(())
}

/// Software interrupt. BRK is followed by a padding byte, so the address
/// pushed skips it. The status register is pushed with both break bits set
/// and execution continues at the address in the BRK vector.
pub fn brk(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.pc = cpu.pc.wrapping_add(1);
    let return_addr = cpu.pc;
    cpu.push_u16(memory, return_addr)?;
    cpu.set_flag(BREAK_1 | BREAK_2);
    let p = cpu.p;
    cpu.push_u8(memory, p)?;
    cpu.pc = memory.read_word(BRK_VECTOR)?;
    Ok(())
}

/// Returns from an interrupt. Unlike RTS the popped address is used as is.
pub fn rti(cpu: &mut CPU, memory: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.p = cpu.pop_u8(memory)?;
    cpu.pc = cpu.pop_u16(memory)?;
    Ok(())
}

// Branches.

pub fn bcc(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = !cpu.carry_flag_set();
    branch(cpu, operand, condition)
}

pub fn bcs(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = cpu.carry_flag_set();
    branch(cpu, operand, condition)
}

pub fn beq(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = cpu.zero_flag_set();
    branch(cpu, operand, condition)
}

pub fn bne(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = !cpu.zero_flag_set();
    branch(cpu, operand, condition)
}

pub fn bmi(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = cpu.negative_flag_set();
    branch(cpu, operand, condition)
}

pub fn bpl(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = !cpu.negative_flag_set();
    branch(cpu, operand, condition)
}

pub fn bvc(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = !cpu.overflow_flag_set();
    branch(cpu, operand, condition)
}

pub fn bvs(cpu: &mut CPU, _: &mut AddressBus, operand: Operand) -> Result<()> {
    let condition = cpu.overflow_flag_set();
    branch(cpu, operand, condition)
}

// Status flag changes.

pub fn clc(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.unset_flag(CARRY_FLAG);
    Ok(())
}

pub fn cld(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.unset_flag(DECIMAL_MODE);
    Ok(())
}

pub fn cli(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.unset_flag(INTERRUPT_DISABLE);
    Ok(())
}

pub fn clv(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.unset_flag(OVERFLOW_FLAG);
    Ok(())
}

pub fn sec(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.set_flag(CARRY_FLAG);
    Ok(())
}

pub fn sed(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.set_flag(DECIMAL_MODE);
    Ok(())
}

pub fn sei(cpu: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    cpu.set_flag(INTERRUPT_DISABLE);
    Ok(())
}

pub fn nop(_: &mut CPU, _: &mut AddressBus, _: Operand) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nes::cpu::{ZERO_FLAG, STACK_OFFSET};

    const BOUNDARIES: [u8; 4] = [0x00, 0xFF, 0x7F, 0x80];

    fn setup() -> (CPU, AddressBus) {
        let mut cpu = CPU::new();
        cpu.pc = 0x8000;
        cpu.sp = 0xFF;
        cpu.p = 0;
        (cpu, AddressBus::nes())
    }

    #[test]
    fn adc_overflow_into_sign_bit() {
        let (mut cpu, mut memory) = setup();
        cpu.a = 0x7F;
        adc(&mut cpu, &mut memory, Operand::Value(0x01)).unwrap();
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.overflow_flag_set());
        assert!(cpu.negative_flag_set());
        assert!(!cpu.carry_flag_set());
        assert!(!cpu.zero_flag_set());
    }

    #[test]
    fn adc_matches_signed_and_unsigned_arithmetic() {
        for &a in BOUNDARIES.iter() {
            for &m in BOUNDARIES.iter() {
                for &carry in [false, true].iter() {
                    let (mut cpu, mut memory) = setup();
                    cpu.a = a;
                    cpu.toggle_flag(CARRY_FLAG, carry);
                    adc(&mut cpu, &mut memory, Operand::Value(m)).unwrap();

                    let unsigned = a as u16 + m as u16 + carry as u16;
                    let signed = a as i8 as i16 + m as i8 as i16 + carry as i16;
                    let result = unsigned as u8;
                    assert_eq!(cpu.a, result);
                    assert_eq!(cpu.carry_flag_set(), unsigned > 0xFF, "C: {:02X}+{:02X}+{}", a, m, carry);
                    assert_eq!(cpu.overflow_flag_set(), signed < -128 || signed > 127,
                               "V: {:02X}+{:02X}+{}", a, m, carry);
                    assert_eq!(cpu.zero_flag_set(), result == 0);
                    assert_eq!(cpu.negative_flag_set(), result & 0x80 != 0);
                }
            }
        }
    }

    #[test]
    fn sbc_matches_signed_and_unsigned_arithmetic() {
        for &a in BOUNDARIES.iter() {
            for &m in BOUNDARIES.iter() {
                for &carry in [false, true].iter() {
                    let (mut cpu, mut memory) = setup();
                    cpu.a = a;
                    cpu.toggle_flag(CARRY_FLAG, carry);
                    sbc(&mut cpu, &mut memory, Operand::Value(m)).unwrap();

                    let borrow = !carry as i16;
                    let unsigned = a as i16 - m as i16 - borrow;
                    let signed = a as i8 as i16 - m as i8 as i16 - borrow;
                    let result = unsigned as u8;
                    assert_eq!(cpu.a, result);
                    assert_eq!(cpu.carry_flag_set(), unsigned >= 0, "C: {:02X}-{:02X}-{}", a, m, borrow);
                    assert_eq!(cpu.overflow_flag_set(), signed < -128 || signed > 127,
                               "V: {:02X}-{:02X}-{}", a, m, borrow);
                    assert_eq!(cpu.zero_flag_set(), result == 0);
                    assert_eq!(cpu.negative_flag_set(), result & 0x80 != 0);
                }
            }
        }
    }

    #[test]
    fn compares_set_carry_when_register_is_not_smaller() {
        let ops: [(OperationFn, fn(&mut CPU, u8)); 3] = [
            (cmp, |cpu: &mut CPU, value: u8| cpu.a = value),
            (cpx, |cpu: &mut CPU, value: u8| cpu.x = value),
            (cpy, |cpu: &mut CPU, value: u8| cpu.y = value),
        ];
        for &(op, load) in ops.iter() {
            for &register in BOUNDARIES.iter() {
                for &m in BOUNDARIES.iter() {
                    let (mut cpu, mut memory) = setup();
                    load(&mut cpu, register);
                    op(&mut cpu, &mut memory, Operand::Value(m)).unwrap();

                    let difference = register.wrapping_sub(m);
                    assert_eq!(cpu.carry_flag_set(), register >= m);
                    assert_eq!(cpu.zero_flag_set(), register == m);
                    assert_eq!(cpu.negative_flag_set(), difference & 0x80 != 0);
                }
            }
        }
    }

    #[test]
    fn cpx_equal_values() {
        let (mut cpu, mut memory) = setup();
        cpu.x = 0x05;
        cpx(&mut cpu, &mut memory, Operand::Value(0x05)).unwrap();
        assert!(cpu.zero_flag_set());
        assert!(cpu.carry_flag_set());
        assert!(!cpu.negative_flag_set());
    }

    #[test]
    fn logical_operations() {
        let (mut cpu, mut memory) = setup();
        cpu.a = 0xF0;
        and(&mut cpu, &mut memory, Operand::Value(0x0F)).unwrap();
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.zero_flag_set());

        ora(&mut cpu, &mut memory, Operand::Value(0x81)).unwrap();
        assert_eq!(cpu.a, 0x81);
        assert!(cpu.negative_flag_set());

        eor(&mut cpu, &mut memory, Operand::Value(0xFF)).unwrap();
        assert_eq!(cpu.a, 0x7E);
        assert!(!cpu.negative_flag_set());
        assert!(!cpu.zero_flag_set());
    }

    #[test]
    fn bit_copies_high_bits() {
        let (mut cpu, mut memory) = setup();
        memory.write(0x0040, 0xC0).unwrap();
        cpu.a = 0x01;
        bit(&mut cpu, &mut memory, Operand::Address(0x0040)).unwrap();
        assert!(cpu.negative_flag_set());
        assert!(cpu.overflow_flag_set());
        assert!(cpu.zero_flag_set());
        assert_eq!(cpu.a, 0x01);

        cpu.a = 0x40;
        memory.write(0x0040, 0x40).unwrap();
        bit(&mut cpu, &mut memory, Operand::Address(0x0040)).unwrap();
        assert!(!cpu.negative_flag_set());
        assert!(cpu.overflow_flag_set());
        assert!(!cpu.zero_flag_set());
    }

    #[test]
    fn shifts_move_bit_into_carry() {
        let (mut cpu, mut memory) = setup();
        asl(&mut cpu, &mut memory, Operand::Value(0x81)).unwrap();
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.carry_flag_set());

        lsr(&mut cpu, &mut memory, Operand::Value(0x01)).unwrap();
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.carry_flag_set());
        assert!(cpu.zero_flag_set());

        memory.write(0x0010, 0x80).unwrap();
        asl(&mut cpu, &mut memory, Operand::Address(0x0010)).unwrap();
        assert_eq!(memory.read(0x0010).unwrap(), 0x00);
        assert!(cpu.carry_flag_set());
        assert!(cpu.zero_flag_set());
        assert_eq!(cpu.a, 0x00);
    }

    #[test]
    fn rotates_go_through_carry() {
        let (mut cpu, mut memory) = setup();
        cpu.set_flag(CARRY_FLAG);
        rol(&mut cpu, &mut memory, Operand::Value(0x80)).unwrap();
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.carry_flag_set());

        cpu.unset_flag(CARRY_FLAG);
        ror(&mut cpu, &mut memory, Operand::Value(0x01)).unwrap();
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.carry_flag_set());
        assert!(cpu.zero_flag_set());
    }

    #[test]
    fn ror_memory_shifts_right() {
        let (mut cpu, mut memory) = setup();
        memory.write(0x0020, 0x01).unwrap();
        cpu.set_flag(CARRY_FLAG);
        ror(&mut cpu, &mut memory, Operand::Address(0x0020)).unwrap();
        assert_eq!(memory.read(0x0020).unwrap(), 0x80);
        assert!(cpu.carry_flag_set());
        assert!(cpu.negative_flag_set());
        assert!(!cpu.zero_flag_set());
    }

    #[test]
    fn rol_memory_shifts_left() {
        let (mut cpu, mut memory) = setup();
        memory.write(0x0020, 0x40).unwrap();
        rol(&mut cpu, &mut memory, Operand::Address(0x0020)).unwrap();
        assert_eq!(memory.read(0x0020).unwrap(), 0x80);
        assert!(!cpu.carry_flag_set());
        assert!(cpu.negative_flag_set());
    }

    #[test]
    fn memory_increments_wrap() {
        let (mut cpu, mut memory) = setup();
        memory.write(0x0030, 0xFF).unwrap();
        inc(&mut cpu, &mut memory, Operand::Address(0x0030)).unwrap();
        assert_eq!(memory.read(0x0030).unwrap(), 0x00);
        assert!(cpu.zero_flag_set());

        dec(&mut cpu, &mut memory, Operand::Address(0x0030)).unwrap();
        assert_eq!(memory.read(0x0030).unwrap(), 0xFF);
        assert!(cpu.negative_flag_set());
    }

    #[test]
    fn register_increments_wrap() {
        let (mut cpu, mut memory) = setup();
        cpu.x = 0xFF;
        inx(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.x, 0x00);
        assert!(cpu.zero_flag_set());

        dey(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.y, 0xFF);
        assert!(cpu.negative_flag_set());
    }

    #[test]
    fn txs_leaves_flags_alone() {
        let (mut cpu, mut memory) = setup();
        cpu.x = 0x00;
        txs(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.sp, 0x00);
        assert_eq!(cpu.p, 0);

        tsx(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert!(cpu.zero_flag_set());
    }

    #[test]
    fn stack_round_trips() {
        let (mut cpu, mut memory) = setup();
        cpu.a = 0x80;
        pha(&mut cpu, &mut memory, Operand::Implied).unwrap();
        cpu.a = 0x00;
        pla(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.negative_flag_set());
        assert_eq!(cpu.sp, 0xFF);

        cpu.p = 0xC3;
        php(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(memory.read(STACK_OFFSET + 0xFF).unwrap(), 0xC3);
        cpu.p = 0;
        plp(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.p, 0xC3);
    }

    #[test]
    fn mismatched_operands_are_errors() {
        let (mut cpu, mut memory) = setup();
        let mismatch = EmulationError::UnexpectedOperand(Operand::Value(1));
        assert_eq!(sta(&mut cpu, &mut memory, Operand::Value(1)), Err(mismatch.clone()));
        assert_eq!(jmp(&mut cpu, &mut memory, Operand::Value(1)), Err(mismatch.clone()));
        assert_eq!(inc(&mut cpu, &mut memory, Operand::Value(1)), Err(mismatch.clone()));
        assert_eq!(lda(&mut cpu, &mut memory, Operand::Implied),
                   Err(EmulationError::UnexpectedOperand(Operand::Implied)));

        cpu.set_flag(CARRY_FLAG);
        assert_eq!(bcs(&mut cpu, &mut memory, Operand::Value(1)), Err(mismatch.clone()));
        assert_eq!(jsr(&mut cpu, &mut memory, Operand::Value(1)), Err(mismatch));
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn jsr_pushes_last_byte_of_instruction() {
        let (mut cpu, mut memory) = setup();
        // The operand has already been consumed, JSR itself sits at 0x8000.
        cpu.pc = 0x8003;
        jsr(&mut cpu, &mut memory, Operand::Address(0x9000)).unwrap();
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(memory.read(0x01FF).unwrap(), 0x80);
        assert_eq!(memory.read(0x01FE).unwrap(), 0x02);
        assert_eq!(cpu.sp, 0xFD);

        rts(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn brk_pushes_state_and_jumps_through_vector() {
        let (mut cpu, mut memory) = setup();
        memory.write(0xFFFE, 0x00).unwrap();
        memory.write(0xFFFF, 0xC1).unwrap();
        cpu.pc = 0x8001;
        cpu.p = NEGATIVE_FLAG | CARRY_FLAG;
        brk(&mut cpu, &mut memory, Operand::Implied).unwrap();

        assert_eq!(cpu.pc, 0xC100);
        assert_eq!(memory.read(0x01FF).unwrap(), 0x80);
        assert_eq!(memory.read(0x01FE).unwrap(), 0x02);
        assert_eq!(memory.read(0x01FD).unwrap(), NEGATIVE_FLAG | CARRY_FLAG | BREAK_1 | BREAK_2);
        assert_eq!(cpu.sp, 0xFC);

        cpu.p = 0;
        rti(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cpu.p, NEGATIVE_FLAG | CARRY_FLAG | BREAK_1 | BREAK_2);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn branches_only_jump_when_condition_holds() {
        let cases: [(OperationFn, u8, bool); 8] = [
            (bcc, CARRY_FLAG, false),
            (bcs, CARRY_FLAG, true),
            (bne, ZERO_FLAG, false),
            (beq, ZERO_FLAG, true),
            (bpl, NEGATIVE_FLAG, false),
            (bmi, NEGATIVE_FLAG, true),
            (bvc, OVERFLOW_FLAG, false),
            (bvs, OVERFLOW_FLAG, true),
        ];
        for &(op, flag, jumps_when_set) in cases.iter() {
            for &set in [false, true].iter() {
                let (mut cpu, mut memory) = setup();
                cpu.toggle_flag(flag, set);
                op(&mut cpu, &mut memory, Operand::Address(0x9000)).unwrap();
                let expected = if set == jumps_when_set { 0x9000 } else { 0x8000 };
                assert_eq!(cpu.pc, expected);
            }
        }
    }

    #[test]
    fn flag_instructions() {
        let (mut cpu, mut memory) = setup();
        sec(&mut cpu, &mut memory, Operand::Implied).unwrap();
        sed(&mut cpu, &mut memory, Operand::Implied).unwrap();
        sei(&mut cpu, &mut memory, Operand::Implied).unwrap();
        cpu.set_flag(OVERFLOW_FLAG);
        assert_eq!(cpu.p, CARRY_FLAG | DECIMAL_MODE | INTERRUPT_DISABLE | OVERFLOW_FLAG);

        clc(&mut cpu, &mut memory, Operand::Implied).unwrap();
        cld(&mut cpu, &mut memory, Operand::Implied).unwrap();
        cli(&mut cpu, &mut memory, Operand::Implied).unwrap();
        clv(&mut cpu, &mut memory, Operand::Implied).unwrap();
        assert_eq!(cpu.p, 0);
    }

    #[test]
    fn decimal_mode_does_not_change_addition() {
        let (mut cpu, mut memory) = setup();
        cpu.set_flag(DECIMAL_MODE);
        cpu.a = 0x09;
        adc(&mut cpu, &mut memory, Operand::Value(0x01)).unwrap();
        assert_eq!(cpu.a, 0x0A);
    }
}
