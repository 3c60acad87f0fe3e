// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use byteorder::{ByteOrder, LittleEndian};
use std::cmp;
use nes::error::{EmulationError, Result};

// Memory partition sizes (physical).
pub const RAM_SIZE                : usize = 0x800;
pub const PPU_CTRL_REGISTERS_SIZE : usize = 0x8;
pub const MISC_CTRL_REGISTERS_SIZE: usize = 0x20;
pub const CARTRIDGE_SIZE          : usize = 0xBFE0;

// Partitioned virtual memory map bounds. Every range below is mirrored across
// its whole window when the physical size is smaller than the window.
pub const RAM_START_ADDR                : u16 = 0x0;
pub const RAM_END_ADDR                  : u16 = 0x1FFF;
pub const PPU_CTRL_REGISTERS_START      : u16 = 0x2000;
pub const PPU_CTRL_REGISTERS_END        : u16 = 0x3FFF;
pub const MISC_CTRL_REGISTERS_START     : u16 = 0x4000;
pub const MISC_CTRL_REGISTERS_END       : u16 = 0x401F;
pub const CARTRIDGE_START               : u16 = 0x4020;
pub const CARTRIDGE_END                 : u16 = 0xFFFF;

// Index of the cartridge range in the default map, which is where program
// images are loaded.
const CARTRIDGE_RANGE: usize = 3;

// One past the last address of the 16-bit address space.
const ADDRESS_SPACE_SIZE: usize = 0x10000;

/// A window of the address space backed by its own buffer. The buffer may be
/// smaller than the window, in which case it repeats (is mirrored) across the
/// window.
#[derive(Debug, Clone)]
pub struct MemoryRange {
    name: &'static str,
    start: u16,
    end: u16,
    buffer: Vec<u8>,
}

impl MemoryRange {
    /// Creates a zero filled range claiming `start..=end` and backed by a
    /// buffer of `size` bytes.
    pub fn new(name: &'static str, start: u16, end: u16, size: usize) -> MemoryRange {
        MemoryRange {
            name: name,
            start: start,
            end: end,
            buffer: vec![0; size],
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn start(&self) -> u16 {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of addresses claimed by this range.
    #[inline(always)]
    pub fn width(&self) -> usize {
        self.end as usize - self.start as usize + 1
    }

    /// Size of the physical buffer behind this range.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    fn contains(&self, addr: usize) -> bool {
        self.start as usize <= addr && addr <= self.end as usize
    }

    /// Maps an address inside the window to an index in the buffer.
    #[inline(always)]
    fn mirror(&self, addr: usize) -> usize {
        (addr - self.start as usize) % self.buffer.len()
    }
}

/// The CPU address bus. Owns every backing buffer and routes each of the 65536
/// addresses to exactly one of them. Device register windows are plain storage
/// here; nothing reacts to reads or writes.
#[derive(Debug, Clone)]
pub struct AddressBus {
    ranges: Vec<MemoryRange>,
    program_range: usize,
}

impl AddressBus {
    /// Builds a bus from an ordered list of ranges. The ranges must start at
    /// 0x0000, be ascending, contiguous and end at 0xFFFF. `program_range` is
    /// the index of the range program images are loaded into.
    pub fn new(ranges: Vec<MemoryRange>, program_range: usize) -> Result<AddressBus> {
        if ranges.is_empty() {
            return Err(EmulationError::InvalidMemoryMap("no memory ranges"));
        }
        if program_range >= ranges.len() {
            return Err(EmulationError::InvalidMemoryMap("program range does not exist"));
        }

        let mut next_start = 0usize;
        for range in &ranges {
            if range.start > range.end {
                return Err(EmulationError::InvalidMemoryMap("range ends before it starts"));
            }
            if range.buffer.is_empty() {
                return Err(EmulationError::InvalidMemoryMap("range has an empty buffer"));
            }
            if range.start as usize != next_start {
                return Err(EmulationError::InvalidMemoryMap("ranges overlap or leave a gap"));
            }
            next_start = range.end as usize + 1;
        }
        if next_start != ADDRESS_SPACE_SIZE {
            return Err(EmulationError::InvalidMemoryMap("ranges do not cover the address space"));
        }

        Ok(AddressBus {
            ranges: ranges,
            program_range: program_range,
        })
    }

    /// The memory map of the NES CPU: 2kB of internal RAM, the PPU register
    /// window, the APU and I/O register window and cartridge space.
    pub fn nes() -> AddressBus {
        AddressBus {
            ranges: vec![
                MemoryRange::new("ram", RAM_START_ADDR, RAM_END_ADDR, RAM_SIZE),
                MemoryRange::new("ppu", PPU_CTRL_REGISTERS_START, PPU_CTRL_REGISTERS_END,
                                 PPU_CTRL_REGISTERS_SIZE),
                MemoryRange::new("apu_io", MISC_CTRL_REGISTERS_START, MISC_CTRL_REGISTERS_END,
                                 MISC_CTRL_REGISTERS_SIZE),
                MemoryRange::new("cartridge", CARTRIDGE_START, CARTRIDGE_END, CARTRIDGE_SIZE),
            ],
            program_range: CARTRIDGE_RANGE,
        }
    }

    /// The ranges making up this bus in registration order.
    pub fn ranges(&self) -> &[MemoryRange] {
        &self.ranges
    }

    /// Reads an unsigned 8-bit value located at the given address.
    #[inline(always)]
    pub fn read(&self, addr: u16) -> Result<u8> {
        self.read_at(addr as usize)
    }

    /// Reads an unsigned 16-bit value at the given address (little-endian).
    /// Both bytes are routed separately so a word may straddle two ranges. A
    /// word starting at 0xFFFF has no high byte and fails.
    #[inline(always)]
    pub fn read_word(&self, addr: u16) -> Result<u16> {
        let lsb = self.read_at(addr as usize)?;
        let msb = self.read_at(addr as usize + 1)?;
        Ok(LittleEndian::read_u16(&[lsb, msb]))
    }

    /// Writes an unsigned 8-bit value to the given address.
    #[inline(always)]
    pub fn write(&mut self, addr: u16, val: u8) -> Result<()> {
        let (range, idx) = self.map(addr as usize)?;
        self.ranges[range].buffer[idx] = val;
        Ok(())
    }

    /// Copies a program image to the start of the program range. Bytes past
    /// the end of the image are left untouched.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let range = &mut self.ranges[self.program_range];
        if program.len() > range.buffer.len() {
            return Err(EmulationError::AddressOutOfRange(range.start as usize + range.buffer.len()));
        }

        range.buffer[..program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Reads `len` bytes starting at the given address through the bus.
    pub fn dump(&self, addr: u16, len: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(cmp::min(len, ADDRESS_SPACE_SIZE));
        for offset in 0..len {
            bytes.push(self.read_at(addr as usize + offset)?);
        }
        Ok(bytes)
    }

    fn read_at(&self, addr: usize) -> Result<u8> {
        let (range, idx) = self.map(addr)?;
        Ok(self.ranges[range].buffer[idx])
    }

    /// Maps a given virtual address to the range that claims it and an index
    /// into that range's buffer. The first matching range wins.
    fn map(&self, addr: usize) -> Result<(usize, usize)> {
        self.ranges
            .iter()
            .position(|range| range.contains(addr))
            .map(|range| (range, self.ranges[range].mirror(addr)))
            .ok_or(EmulationError::AddressOutOfRange(addr))
    }
}
