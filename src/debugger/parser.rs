// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[derive(PartialEq)]
enum ParseState {
    ScanningForArguments,
    ScanningArgument,
    ScanningQuotedArgument,
}

/// Returns true if the character passed is a whitespace character. Both spaces
/// and tabs are considered whitespace characters.
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Returns true if the character passed is a quote.
fn is_quote(c: char) -> bool {
    c == '"'
}

fn is_escape(c: char) -> bool {
    c == '\\'
}

/// Parses raw command-line input into a list of separate arguments. Arguments
/// are separated by whitespace, can be quoted, and can have escaped characters
/// inside of them.
pub fn input_to_arguments(input: &str) -> Result<Vec<String>, &'static str> {
    let mut state = ParseState::ScanningForArguments;
    let mut args: Vec<String> = Vec::new();
    let mut arg = String::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match state {
            ParseState::ScanningForArguments => {
                // Determine a scanning state depending on the first
                // non-whitespace character.
                if is_quote(c) {
                    state = ParseState::ScanningQuotedArgument;
                } else if is_escape(c) {
                    arg.push(chars.next().ok_or("escape at end of input")?);
                    state = ParseState::ScanningArgument;
                } else if !is_whitespace(c) {
                    arg.push(c);
                    state = ParseState::ScanningArgument;
                }
            },
            ParseState::ScanningArgument => {
                // Switch back to scanning if whitespace is encountered and push
                // the argument currently being parsed to the argument list.
                if is_whitespace(c) {
                    args.push(arg.split_off(0));
                    state = ParseState::ScanningForArguments;
                } else if is_escape(c) {
                    arg.push(chars.next().ok_or("escape at end of input")?);
                } else if is_quote(c) {
                    state = ParseState::ScanningQuotedArgument;
                } else {
                    arg.push(c);
                }
            },
            ParseState::ScanningQuotedArgument => {
                // A closing quote doesn't end the argument, only whitespace
                // does, so "a"b is the single argument ab.
                if is_quote(c) {
                    state = ParseState::ScanningArgument;
                } else if is_escape(c) {
                    arg.push(chars.next().ok_or("quoted arg does not close")?);
                } else {
                    arg.push(c);
                }
            },
        }
    }

    match state {
        ParseState::ScanningQuotedArgument => return Err("quoted arg does not close"),
        ParseState::ScanningArgument => args.push(arg),
        ParseState::ScanningForArguments => {},
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(input_to_arguments("dump  8000\t10").unwrap(), vec!["dump", "8000", "10"]);
        assert_eq!(input_to_arguments("   ").unwrap(), Vec::<String>::new());
        assert_eq!(input_to_arguments("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn quotes_group_whitespace() {
        assert_eq!(input_to_arguments("echo \"a b\" c").unwrap(), vec!["echo", "a b", "c"]);
        assert_eq!(input_to_arguments("\"\"").unwrap(), vec![""]);
        assert_eq!(input_to_arguments("x\"y z\"").unwrap(), vec!["xy z"]);
    }

    #[test]
    fn escapes_take_next_character() {
        assert_eq!(input_to_arguments("a\\ b").unwrap(), vec!["a b"]);
        assert_eq!(input_to_arguments("\"say \\\"hi\\\"\"").unwrap(), vec!["say \"hi\""]);
    }

    #[test]
    fn unterminated_input_is_an_error() {
        assert_eq!(input_to_arguments("dump \"8000"), Err("quoted arg does not close"));
        assert_eq!(input_to_arguments("dump \\"), Err("escape at end of input"));
    }
}
