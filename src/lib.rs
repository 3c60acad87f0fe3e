// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An interpreter for the 2A03, the 6502 derived CPU of the NES, along with
//! the mirrored address bus it runs against.

extern crate byteorder;
extern crate chrono;
#[macro_use]
extern crate enum_primitive;
extern crate rustyline;

pub mod debugger;
pub mod io;
pub mod nes;
pub mod utils;
