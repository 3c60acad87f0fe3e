// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub const PAGE_SIZE: usize = 0x100;

/// Returns the page index of the given address. Each memory page for the
/// 6502 is 256 (FF) bytes in size.
#[inline(always)]
pub fn page(addr: u16) -> u8 {
    (addr >> 8) as u8
}

/// Returns the first address of the page holding the given address.
#[inline(always)]
pub fn page_start(addr: u16) -> u16 {
    addr & 0xFF00
}
