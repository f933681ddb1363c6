//! Operator console: where dialogue is shown and answers are typed

use crate::error::{HrError, Result};
use std::io::{self, BufRead, Write};

/// Blocking text channel to the person being interviewed
pub trait Console {
    /// Display a line of dialogue
    fn say(&mut self, text: &str);

    /// Show `prompt` and wait for one line of input
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Console over stdin/stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, text: &str) {
        println!("{}\n", text);
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(HrError::Interview("Input stream closed".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
