use std::io::Write;
use std::process::{Command, Output, Stdio};

use log::{debug, info};

use crate::error::{Error, Result};

/// Splits a configured command line into the program and its leading arguments.
pub fn split_command_line(command_line: &str) -> (String, Vec<String>) {
    let mut parts = command_line.split_whitespace().map(ToString::to_string);
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().to_string()
}

/// Executes a command and returns its standard output.
///
/// Standard input is inherited so the tool can prompt (e.g. for a vault
/// unlock), standard error is captured for error reporting.
///
/// # Errors
///
/// Returns an error if the command cannot be started or exits with non-zero status.
pub fn capture_output(mut command: Command) -> Result<String> {
    debug!("Executing {:?}", command.get_args().collect::<Vec<_>>());

    let output = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;

    check_status(&command, &output)?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Executes a command, writing `input` to its standard input, and returns its
/// standard output. Standard error stays attached to the terminal.
///
/// The exit status is not checked: interactive tools report cancellation through
/// their exit code, which callers interpret from the output instead.
///
/// # Errors
///
/// Returns an error if the command cannot be started or its pipes fail.
pub fn run_with_input(mut command: Command, input: &str) -> Result<String> {
    let program = program_name(&command);

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        // The tool may exit before reading everything, e.g. on an immediate cancel
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            info!("`{program}` closed its input early: {e}");
        }
    }

    let output = child.wait_with_output()?;
    debug!("`{program}` exited with {}", output.status);

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn check_status(command: &Command, output: &Output) -> Result<()> {
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::sub_process_exit(program_name(command), &output.stderr))
    }
}
