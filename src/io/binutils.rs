// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use nes::memory::{CARTRIDGE_SIZE, CARTRIDGE_START};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

// Used to identify a rom as being in the iNES format. This byte sequence should
// be at the start of every rom.
const INES_IDENTIFIER: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

const HEADER_SIZE : usize = 0x10;
const TRAINER_SIZE: usize = 512;

// PRG-ROM banks are 16 KB each and up to two of them fit in 0x8000-0xFFFF.
pub const PRG_ROM_BANK_SIZE: usize = 0x4000;
const PRG_ROM_START    : usize = 0x8000;
const MAX_PRG_ROM_BANKS: u8 = 2;

/// Errors raised while loading a rom from disk.
#[derive(Debug)]
pub enum RomError {
    Io(io::Error),
    /// The file doesn't start with an iNES header.
    InvalidHeader,
    /// The header promises more data than the file holds.
    Truncated,
    /// The PRG-ROM doesn't fit into the CPU address space without a mapper.
    TooLarge,
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RomError::Io(ref e) => write!(f, "{}", e),
            RomError::InvalidHeader => write!(f, "rom does not contain iNES identifier and is invalid"),
            RomError::Truncated => write!(f, "rom is shorter than its header claims"),
            RomError::TooLarge => write!(f, "rom has more PRG-ROM than fits without a mapper"),
        }
    }
}

impl Error for RomError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            RomError::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RomError {
    fn from(e: io::Error) -> RomError {
        RomError::Io(e)
    }
}

/// Structure that represents the 16 byte header of an iNES rom. Only missing
/// the zero fill as it's unused space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct INESHeader {
    pub prg_rom_size: u8, // Size of PRG ROM in 16 KB units.
    pub chr_rom_size: u8, // Size of CHR ROM in 8 KB units.
    pub flags_6: u8,
    pub flags_7: u8,
    pub prg_ram_size: u8, // Size of PRG RAM in 8 KB units (0 infers 8 KB for
                          // compatibility).
    pub flags_9: u8,
    pub flags_10: u8,     // Unofficial, unused by most emulators.
}

impl INESHeader {
    /// Returns true if a 512 byte trainer sits between the header and the
    /// PRG-ROM.
    #[inline(always)]
    pub fn has_trainer(&self) -> bool {
        self.flags_6 & 0x4 == 0x4
    }

    /// Size of the PRG-ROM in bytes.
    #[inline(always)]
    pub fn prg_rom_bytes(&self) -> usize {
        self.prg_rom_size as usize * PRG_ROM_BANK_SIZE
    }
}

/// Reads a binary file at a given path and stores it in a vector of bytes.
pub fn read_bin<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut file = File::open(path)?;
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Parses the header of a rom (assumed to be in the iNES format).
///
/// The first 16 bytes of the rom contain the header. The iNES format is
/// identified by the literal byte string "NES<0x1A>". If the rom is not in the
/// iNES format, then it cannot be executed by the emulator.
pub fn parse_rom_header(rom: &[u8]) -> Result<INESHeader, RomError> {
    if rom.len() < HEADER_SIZE || rom[0x0..0x4] != INES_IDENTIFIER {
        return Err(RomError::InvalidHeader);
    }

    Ok(INESHeader {
        prg_rom_size: rom[0x4],
        chr_rom_size: rom[0x5],
        flags_6: rom[0x6],
        flags_7: rom[0x7],
        prg_ram_size: rom[0x8],
        flags_9: rom[0x9],
        flags_10: rom[0xA],
    })
}

/// Returns the PRG-ROM of a rom. The trainer, if present, shifts the PRG-ROM
/// back by 512 bytes.
pub fn extract_prg_rom<'a>(header: &INESHeader, rom: &'a [u8]) -> Result<&'a [u8], RomError> {
    let mut start = HEADER_SIZE;
    if header.has_trainer() {
        start += TRAINER_SIZE;
    }

    let end = start + header.prg_rom_bytes();
    if rom.len() < end {
        return Err(RomError::Truncated);
    }
    Ok(&rom[start..end])
}

/// Lays out PRG-ROM the way the cartridge presents it to the CPU, producing an
/// image for the cartridge range. The first byte of PRG-ROM lands at 0x8000;
/// a single 16 KB bank is mirrored into 0xC000 so the vectors at the top of
/// memory come from it.
pub fn build_program_image(prg: &[u8]) -> Result<Vec<u8>, RomError> {
    let banks = prg.len() / PRG_ROM_BANK_SIZE;
    if prg.is_empty() || prg.len() % PRG_ROM_BANK_SIZE != 0 {
        return Err(RomError::InvalidHeader);
    }
    if banks > MAX_PRG_ROM_BANKS as usize {
        return Err(RomError::TooLarge);
    }

    let mut image = vec![0; CARTRIDGE_SIZE];
    let offset = PRG_ROM_START - CARTRIDGE_START as usize;
    image[offset..offset + prg.len()].copy_from_slice(prg);
    if banks == 1 {
        let mirror = offset + PRG_ROM_BANK_SIZE;
        image[mirror..mirror + PRG_ROM_BANK_SIZE].copy_from_slice(prg);
    }
    Ok(image)
}

/// Reads a rom from disk and turns it into a program image.
pub fn load_rom<P: AsRef<Path>>(path: P) -> Result<(INESHeader, Vec<u8>), RomError> {
    let rom = read_bin(path)?;
    let header = parse_rom_header(&rom)?;
    let image = build_program_image(extract_prg_rom(&header, &rom)?)?;
    Ok((header, image))
}
