//! Console I/O for PRINT, INPUT and the command loop
//!
//! Statements talk to the outside world only through the `Console` trait, so
//! programs can run against the terminal or against an in-memory buffer.

use crate::error::{BasicError, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented text console
pub trait Console {
    /// Write text without a line terminator
    fn write(&mut self, text: &str) -> Result<()>;

    /// Write text followed by a line terminator
    fn write_line(&mut self, text: &str) -> Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Show `prompt` and read one line, without its terminator.
    /// Returns `None` when input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Prompt until the user enters an integer
    fn read_integer(&mut self, prompt: &str) -> Result<i32> {
        loop {
            let line = self.read_line(prompt)?.ok_or(BasicError::EndOfInput)?;
            match line.trim().parse::<i32>() {
                Ok(value) => return Ok(value),
                Err(_) => self.write_line("Illegal integer format. Try again.")?,
            }
        }
    }
}

/// Console on the process's stdin and stdout
#[derive(Debug)]
pub struct StdConsole {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn write(&mut self, text: &str) -> Result<()> {
        let mut stdout = self.stdout.lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.write(prompt)?;

        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// In-memory console with scripted input and captured output
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    input: VecDeque<String>,
    output: String,
}

impl BufferConsole {
    /// Create a console with no queued input
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console that will answer reads with `lines`, in order
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    /// Queue another line of input
    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    /// Everything written so far, prompts included
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Take the captured output, leaving the buffer empty
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Console for BufferConsole {
    fn write(&mut self, text: &str) -> Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.push_str(prompt);
        Ok(self.input.pop_front())
    }
}
