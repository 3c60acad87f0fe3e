// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use enum_primitive::FromPrimitive;
use nes::addressing::AddressingMode;
use nes::operation::{self, OperationFn};

enum_from_primitive! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Opcode {
        ADCImm   = 0x69,
        ADCZero  = 0x65,
        ADCZeroX = 0x75,
        ADCAbs   = 0x6D,
        ADCAbsX  = 0x7D,
        ADCAbsY  = 0x79,
        ADCIndX  = 0x61,
        ADCIndY  = 0x71,

        ANDImm   = 0x29,
        ANDZero  = 0x25,
        ANDZeroX = 0x35,
        ANDAbs   = 0x2D,
        ANDAbsX  = 0x3D,
        ANDAbsY  = 0x39,
        ANDIndX  = 0x21,
        ANDIndY  = 0x31,

        ASLAcc   = 0x0A,
        ASLZero  = 0x06,
        ASLZeroX = 0x16,
        ASLAbs   = 0x0E,
        ASLAbsX  = 0x1E,

        BCCRel   = 0x90,
        BCSRel   = 0xB0,
        BEQRel   = 0xF0,
        BMIRel   = 0x30,
        BNERel   = 0xD0,
        BPLRel   = 0x10,
        BVCRel   = 0x50,
        BVSRel   = 0x70,

        BITZero  = 0x24,
        BITAbs   = 0x2C,

        BRK      = 0x00,

        CLC      = 0x18,
        CLD      = 0xD8,
        CLI      = 0x58,
        CLV      = 0xB8,

        CMPImm   = 0xC9,
        CMPZero  = 0xC5,
        CMPZeroX = 0xD5,
        CMPAbs   = 0xCD,
        CMPAbsX  = 0xDD,
        CMPAbsY  = 0xD9,
        CMPIndX  = 0xC1,
        CMPIndY  = 0xD1,

        CPXImm   = 0xE0,
        CPXZero  = 0xE4,
        CPXAbs   = 0xEC,

        CPYImm   = 0xC0,
        CPYZero  = 0xC4,
        CPYAbs   = 0xCC,

        DECZero  = 0xC6,
        DECZeroX = 0xD6,
        DECAbs   = 0xCE,
        DECAbsX  = 0xDE,

        DEX      = 0xCA,
        DEY      = 0x88,

        EORImm   = 0x49,
        EORZero  = 0x45,
        EORZeroX = 0x55,
        EORAbs   = 0x4D,
        EORAbsX  = 0x5D,
        EORAbsY  = 0x59,
        EORIndX  = 0x41,
        EORIndY  = 0x51,

        INCZero  = 0xE6,
        INCZeroX = 0xF6,
        INCAbs   = 0xEE,
        INCAbsX  = 0xFE,

        INX      = 0xE8,
        INY      = 0xC8,

        JMPAbs   = 0x4C,
        JMPInd   = 0x6C,

        JSRAbs   = 0x20,

        LDAImm   = 0xA9,
        LDAZero  = 0xA5,
        LDAZeroX = 0xB5,
        LDAAbs   = 0xAD,
        LDAAbsX  = 0xBD,
        LDAAbsY  = 0xB9,
        LDAIndX  = 0xA1,
        LDAIndY  = 0xB1,

        LDXImm   = 0xA2,
        LDXZero  = 0xA6,
        LDXZeroY = 0xB6,
        LDXAbs   = 0xAE,
        LDXAbsY  = 0xBE,

        LDYImm   = 0xA0,
        LDYZero  = 0xA4,
        LDYZeroX = 0xB4,
        LDYAbs   = 0xAC,
        LDYAbsX  = 0xBC,

        LSRAcc   = 0x4A,
        LSRZero  = 0x46,
        LSRZeroX = 0x56,
        LSRAbs   = 0x4E,
        LSRAbsX  = 0x5E,

        NOP      = 0xEA,

        ORAImm   = 0x09,
        ORAZero  = 0x05,
        ORAZeroX = 0x15,
        ORAAbs   = 0x0D,
        ORAAbsX  = 0x1D,
        ORAAbsY  = 0x19,
        ORAIndX  = 0x01,
        ORAIndY  = 0x11,

        PHA      = 0x48,
        PHP      = 0x08,
        PLA      = 0x68,
        PLP      = 0x28,

        ROLAcc   = 0x2A,
        ROLZero  = 0x26,
        ROLZeroX = 0x36,
        ROLAbs   = 0x2E,
        ROLAbsX  = 0x3E,

        RORAcc   = 0x6A,
        RORZero  = 0x66,
        RORZeroX = 0x76,
        RORAbs   = 0x6E,
        RORAbsX  = 0x7E,

        RTI      = 0x40,
        RTS      = 0x60,

        SBCImm   = 0xE9,
        SBCZero  = 0xE5,
        SBCZeroX = 0xF5,
        SBCAbs   = 0xED,
        SBCAbsX  = 0xFD,
        SBCAbsY  = 0xF9,
        SBCIndX  = 0xE1,
        SBCIndY  = 0xF1,

        SEC      = 0x38,
        SED      = 0xF8,
        SEI      = 0x78,

        STAZero  = 0x85,
        STAZeroX = 0x95,
        STAAbs   = 0x8D,
        STAAbsX  = 0x9D,
        STAAbsY  = 0x99,
        STAIndX  = 0x81,
        STAIndY  = 0x91,

        STXZero  = 0x86,
        STXZeroY = 0x96,
        STXAbs   = 0x8E,

        STYZero  = 0x84,
        STYZeroX = 0x94,
        STYAbs   = 0x8C,

        TAX      = 0xAA,
        TAY      = 0xA8,
        TSX      = 0xBA,
        TXA      = 0x8A,
        TXS      = 0x9A,
        TYA      = 0x98,
    }
}

/// Decodes an opcode by converting an opcode number to an enum value. Bytes
/// that aren't official opcodes decode to nothing.
pub fn decode_opcode(opcode: u8) -> Option<Opcode> {
    Opcode::from_u8(opcode)
}

impl Opcode {
    /// The mnemonic, addressing mode and operation this opcode stands for.
    pub fn definition(&self) -> (&'static str, AddressingMode, OperationFn) {
        use self::Opcode::*;
        use nes::addressing::AddressingMode::*;

        match *self {
            ADCImm   => ("ADC", Immediate,       operation::adc),
            ADCZero  => ("ADC", ZeroPage,        operation::adc),
            ADCZeroX => ("ADC", ZeroPageX,       operation::adc),
            ADCAbs   => ("ADC", Absolute,        operation::adc),
            ADCAbsX  => ("ADC", AbsoluteX,       operation::adc),
            ADCAbsY  => ("ADC", AbsoluteY,       operation::adc),
            ADCIndX  => ("ADC", IndexedIndirect, operation::adc),
            ADCIndY  => ("ADC", IndirectIndexed, operation::adc),

            ANDImm   => ("AND", Immediate,       operation::and),
            ANDZero  => ("AND", ZeroPage,        operation::and),
            ANDZeroX => ("AND", ZeroPageX,       operation::and),
            ANDAbs   => ("AND", Absolute,        operation::and),
            ANDAbsX  => ("AND", AbsoluteX,       operation::and),
            ANDAbsY  => ("AND", AbsoluteY,       operation::and),
            ANDIndX  => ("AND", IndexedIndirect, operation::and),
            ANDIndY  => ("AND", IndirectIndexed, operation::and),

            ASLAcc   => ("ASL", Accumulator,     operation::asl),
            ASLZero  => ("ASL", ZeroPage,        operation::asl),
            ASLZeroX => ("ASL", ZeroPageX,       operation::asl),
            ASLAbs   => ("ASL", Absolute,        operation::asl),
            ASLAbsX  => ("ASL", AbsoluteX,       operation::asl),

            BCCRel   => ("BCC", Relative,        operation::bcc),
            BCSRel   => ("BCS", Relative,        operation::bcs),
            BEQRel   => ("BEQ", Relative,        operation::beq),
            BMIRel   => ("BMI", Relative,        operation::bmi),
            BNERel   => ("BNE", Relative,        operation::bne),
            BPLRel   => ("BPL", Relative,        operation::bpl),
            BVCRel   => ("BVC", Relative,        operation::bvc),
            BVSRel   => ("BVS", Relative,        operation::bvs),

            BITZero  => ("BIT", ZeroPage,        operation::bit),
            BITAbs   => ("BIT", Absolute,        operation::bit),

            BRK      => ("BRK", Implied,         operation::brk),

            CLC      => ("CLC", Implied,         operation::clc),
            CLD      => ("CLD", Implied,         operation::cld),
            CLI      => ("CLI", Implied,         operation::cli),
            CLV      => ("CLV", Implied,         operation::clv),

            CMPImm   => ("CMP", Immediate,       operation::cmp),
            CMPZero  => ("CMP", ZeroPage,        operation::cmp),
            CMPZeroX => ("CMP", ZeroPageX,       operation::cmp),
            CMPAbs   => ("CMP", Absolute,        operation::cmp),
            CMPAbsX  => ("CMP", AbsoluteX,       operation::cmp),
            CMPAbsY  => ("CMP", AbsoluteY,       operation::cmp),
            CMPIndX  => ("CMP", IndexedIndirect, operation::cmp),
            CMPIndY  => ("CMP", IndirectIndexed, operation::cmp),

            CPXImm   => ("CPX", Immediate,       operation::cpx),
            CPXZero  => ("CPX", ZeroPage,        operation::cpx),
            CPXAbs   => ("CPX", Absolute,        operation::cpx),

            CPYImm   => ("CPY", Immediate,       operation::cpy),
            CPYZero  => ("CPY", ZeroPage,        operation::cpy),
            CPYAbs   => ("CPY", Absolute,        operation::cpy),

            DECZero  => ("DEC", ZeroPage,        operation::dec),
            DECZeroX => ("DEC", ZeroPageX,       operation::dec),
            DECAbs   => ("DEC", Absolute,        operation::dec),
            DECAbsX  => ("DEC", AbsoluteX,       operation::dec),

            DEX      => ("DEX", Implied,         operation::dex),
            DEY      => ("DEY", Implied,         operation::dey),

            EORImm   => ("EOR", Immediate,       operation::eor),
            EORZero  => ("EOR", ZeroPage,        operation::eor),
            EORZeroX => ("EOR", ZeroPageX,       operation::eor),
            EORAbs   => ("EOR", Absolute,        operation::eor),
            EORAbsX  => ("EOR", AbsoluteX,       operation::eor),
            EORAbsY  => ("EOR", AbsoluteY,       operation::eor),
            EORIndX  => ("EOR", IndexedIndirect, operation::eor),
            EORIndY  => ("EOR", IndirectIndexed, operation::eor),

            INCZero  => ("INC", ZeroPage,        operation::inc),
            INCZeroX => ("INC", ZeroPageX,       operation::inc),
            INCAbs   => ("INC", Absolute,        operation::inc),
            INCAbsX  => ("INC", AbsoluteX,       operation::inc),

            INX      => ("INX", Implied,         operation::inx),
            INY      => ("INY", Implied,         operation::iny),

            JMPAbs   => ("JMP", Absolute,        operation::jmp),
            JMPInd   => ("JMP", Indirect,        operation::jmp),

            JSRAbs   => ("JSR", Absolute,        operation::jsr),

            LDAImm   => ("LDA", Immediate,       operation::lda),
            LDAZero  => ("LDA", ZeroPage,        operation::lda),
            LDAZeroX => ("LDA", ZeroPageX,       operation::lda),
            LDAAbs   => ("LDA", Absolute,        operation::lda),
            LDAAbsX  => ("LDA", AbsoluteX,       operation::lda),
            LDAAbsY  => ("LDA", AbsoluteY,       operation::lda),
            LDAIndX  => ("LDA", IndexedIndirect, operation::lda),
            LDAIndY  => ("LDA", IndirectIndexed, operation::lda),

            LDXImm   => ("LDX", Immediate,       operation::ldx),
            LDXZero  => ("LDX", ZeroPage,        operation::ldx),
            LDXZeroY => ("LDX", ZeroPageY,       operation::ldx),
            LDXAbs   => ("LDX", Absolute,        operation::ldx),
            LDXAbsY  => ("LDX", AbsoluteY,       operation::ldx),

            LDYImm   => ("LDY", Immediate,       operation::ldy),
            LDYZero  => ("LDY", ZeroPage,        operation::ldy),
            LDYZeroX => ("LDY", ZeroPageX,       operation::ldy),
            LDYAbs   => ("LDY", Absolute,        operation::ldy),
            LDYAbsX  => ("LDY", AbsoluteX,       operation::ldy),

            LSRAcc   => ("LSR", Accumulator,     operation::lsr),
            LSRZero  => ("LSR", ZeroPage,        operation::lsr),
            LSRZeroX => ("LSR", ZeroPageX,       operation::lsr),
            LSRAbs   => ("LSR", Absolute,        operation::lsr),
            LSRAbsX  => ("LSR", AbsoluteX,       operation::lsr),

            NOP      => ("NOP", Implied,         operation::nop),

            ORAImm   => ("ORA", Immediate,       operation::ora),
            ORAZero  => ("ORA", ZeroPage,        operation::ora),
            ORAZeroX => ("ORA", ZeroPageX,       operation::ora),
            ORAAbs   => ("ORA", Absolute,        operation::ora),
            ORAAbsX  => ("ORA", AbsoluteX,       operation::ora),
            ORAAbsY  => ("ORA", AbsoluteY,       operation::ora),
            ORAIndX  => ("ORA", IndexedIndirect, operation::ora),
            ORAIndY  => ("ORA", IndirectIndexed, operation::ora),

            PHA      => ("PHA", Implied,         operation::pha),
            PHP      => ("PHP", Implied,         operation::php),
            PLA      => ("PLA", Implied,         operation::pla),
            PLP      => ("PLP", Implied,         operation::plp),

            ROLAcc   => ("ROL", Accumulator,     operation::rol),
            ROLZero  => ("ROL", ZeroPage,        operation::rol),
            ROLZeroX => ("ROL", ZeroPageX,       operation::rol),
            ROLAbs   => ("ROL", Absolute,        operation::rol),
            ROLAbsX  => ("ROL", AbsoluteX,       operation::rol),

            RORAcc   => ("ROR", Accumulator,     operation::ror),
            RORZero  => ("ROR", ZeroPage,        operation::ror),
            RORZeroX => ("ROR", ZeroPageX,       operation::ror),
            RORAbs   => ("ROR", Absolute,        operation::ror),
            RORAbsX  => ("ROR", AbsoluteX,       operation::ror),

            RTI      => ("RTI", Implied,         operation::rti),
            RTS      => ("RTS", Implied,         operation::rts),

            SBCImm   => ("SBC", Immediate,       operation::sbc),
            SBCZero  => ("SBC", ZeroPage,        operation::sbc),
            SBCZeroX => ("SBC", ZeroPageX,       operation::sbc),
            SBCAbs   => ("SBC", Absolute,        operation::sbc),
            SBCAbsX  => ("SBC", AbsoluteX,       operation::sbc),
            SBCAbsY  => ("SBC", AbsoluteY,       operation::sbc),
            SBCIndX  => ("SBC", IndexedIndirect, operation::sbc),
            SBCIndY  => ("SBC", IndirectIndexed, operation::sbc),

            SEC      => ("SEC", Implied,         operation::sec),
            SED      => ("SED", Implied,         operation::sed),
            SEI      => ("SEI", Implied,         operation::sei),

            STAZero  => ("STA", ZeroPage,        operation::sta),
            STAZeroX => ("STA", ZeroPageX,       operation::sta),
            STAAbs   => ("STA", Absolute,        operation::sta),
            STAAbsX  => ("STA", AbsoluteX,       operation::sta),
            STAAbsY  => ("STA", AbsoluteY,       operation::sta),
            STAIndX  => ("STA", IndexedIndirect, operation::sta),
            STAIndY  => ("STA", IndirectIndexed, operation::sta),

            STXZero  => ("STX", ZeroPage,        operation::stx),
            STXZeroY => ("STX", ZeroPageY,       operation::stx),
            STXAbs   => ("STX", Absolute,        operation::stx),

            STYZero  => ("STY", ZeroPage,        operation::sty),
            STYZeroX => ("STY", ZeroPageX,       operation::sty),
            STYAbs   => ("STY", Absolute,        operation::sty),

            TAX      => ("TAX", Implied,         operation::tax),
            TAY      => ("TAY", Implied,         operation::tay),
            TSX      => ("TSX", Implied,         operation::tsx),
            TXA      => ("TXA", Implied,         operation::txa),
            TXS      => ("TXS", Implied,         operation::txs),
            TYA      => ("TYA", Implied,         operation::tya),
        }
    }

    /// Determine the length of an instruction with this opcode.
    pub fn len(&self) -> u16 {
        let (_, mode, _) = self.definition();
        1 + mode.operand_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_opcodes_decode() {
        let count = (0..256).filter(|&byte| decode_opcode(byte as u8).is_some()).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn undefined_opcodes_do_not_decode() {
        for &byte in [0x02, 0x03, 0x1A, 0x80, 0x9E, 0xEB, 0xFF].iter() {
            assert_eq!(decode_opcode(byte), None);
        }
    }

    #[test]
    fn lengths_follow_addressing_mode() {
        assert_eq!(Opcode::BRK.len(), 1);
        assert_eq!(Opcode::ASLAcc.len(), 1);
        assert_eq!(Opcode::LDAImm.len(), 2);
        assert_eq!(Opcode::BNERel.len(), 2);
        assert_eq!(Opcode::STAIndY.len(), 2);
        assert_eq!(Opcode::JMPInd.len(), 3);
        assert_eq!(Opcode::JSRAbs.len(), 3);
    }

    #[test]
    fn mnemonic_prefixes_variant_name() {
        for byte in 0..256 {
            if let Some(opcode) = decode_opcode(byte as u8) {
                let (mnemonic, _, _) = opcode.definition();
                assert!(format!("{:?}", opcode).starts_with(mnemonic), "{:?}", opcode);
            }
        }
    }
}
