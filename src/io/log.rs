// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Local, TimeZone};
use nes::nes::NESRuntimeOptions;
use std::fmt::Display;

/// Formats a log entry stamped with the given time.
pub fn format_entry<Tz>(time: &DateTime<Tz>, prefix: &str, text: &str) -> String
    where Tz: TimeZone, Tz::Offset: Display
{
    format!("[{}] -- [{}] {}", time, prefix, text)
}

/// Logs a message to stdout with a given prefix if the emulator was started
/// with the verbose flag set.
pub fn log<P, T>(prefix: P, text: T, runtime_options: &NESRuntimeOptions) where P: Into<String>, T: Into<String> {
    if runtime_options.verbose {
        let local: DateTime<Local> = Local::now();
        println!("{}", format_entry(&local, &prefix.into(), &text.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn entries_carry_time_and_prefix() {
        let time = Utc.with_ymd_and_hms(2016, 11, 2, 8, 30, 0).unwrap();
        assert_eq!(format_entry(&time, "cpu", "reset"),
                   "[2016-11-02 08:30:00 UTC] -- [cpu] reset");
    }
}
