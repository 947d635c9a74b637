//! Terminal messages shown between finder invocations.
//!
//! Standard output carries the selected credential, so every message goes to
//! standard error.

use std::io::{stderr, stdin, BufRead, Write};

use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::queue;
use keycuts_core::selection::Console;
use log::warn;

const ACKNOWLEDGE_PROMPT: &str = "Press Enter to continue...";

/// A [`Console`] that writes to `output` and reads acknowledgements from `input`.
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
}

impl TerminalConsole<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(stdin().lock(), stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    fn write_notice(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.output, "{message}")?;
        self.output.flush()
    }

    fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        queue!(
            self.output,
            SetForegroundColor(Color::Red),
            Print(message),
            SetAttribute(Attribute::Reset),
            Print("\n"),
            Print(ACKNOWLEDGE_PROMPT),
        )?;
        self.output.flush()
    }

    /// Blocks until a line (or end of input) is read.
    pub fn wait_for_acknowledgement(&mut self) {
        let mut line = String::new();
        if let Err(e) = self.input.read_line(&mut line) {
            warn!("Could not read acknowledgement: {e}");
        }
    }

    /// Shows an error and waits for the user to acknowledge it.
    pub fn show_error(&mut self, message: &str) {
        if let Err(e) = self.write_error(message) {
            warn!("Could not write to terminal: {e}");
        }
        self.wait_for_acknowledgement();
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn notify(&mut self, message: &str) {
        if let Err(e) = self.write_notice(message) {
            warn!("Could not write to terminal: {e}");
        }
    }

    fn report(&mut self, message: &str) {
        self.show_error(message);
    }
}
