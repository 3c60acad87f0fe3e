// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::mpsc::{self, Receiver};
use std::thread;

const PROMPT: &'static str = "(nes-cpu) ";

/// Starts the debugger prompt on its own thread. Every line entered is sent
/// through the returned channel. Ctrl-C and Ctrl-D send "quit" and close the
/// prompt.
pub fn spawn() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                eprintln!("nes-cpu: unable to start debugger console: {}", e);
                return;
            },
        };

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        eprintln!("nes-cpu: unable to record history: {}", e);
                    }
                    if sender.send(line).is_err() {
                        break; // The emulator stopped.
                    }
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    let _ = sender.send(String::from("quit"));
                    break;
                },
                Err(e) => {
                    eprintln!("nes-cpu: {}", e);
                    break;
                },
            }
        }
    });

    receiver
}
