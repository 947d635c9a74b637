use std::io::Write;

use keycuts_core::action::Payload;
use keycuts_core::error::{Error, Result};
use log::debug;

use crate::cli_args::OutputFormat;

/// Writes the completed payload for the host terminal.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_payload<W: Write>(writer: &mut W, payload: &Payload, format: OutputFormat) -> Result<()> {
    write_formatted(writer, payload, format).map_err(Error::Stdio)
}

fn write_formatted<W: Write>(
    writer: &mut W,
    payload: &Payload,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, payload).map_err(std::io::Error::from)?;
            writeln!(writer)?;
        }
        OutputFormat::Plain => {
            if let Some(delivery) = payload.delivery() {
                debug!("Writing {} delivery text", payload.action);
                write!(writer, "{}", delivery.text())?;
            }
        }
    }

    writer.flush()
}
