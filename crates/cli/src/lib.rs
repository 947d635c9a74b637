//! Keycuts CLI Library
//!
//! This crate provides the command-line interface for keycuts. It reads the
//! settings, runs one selection session in the terminal and writes the chosen
//! credential to standard output for the host terminal to paste or copy.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and settings overrides
//! - [`console`]: Progress and error messages between finder invocations
//! - [`output`]: Serialization of the final payload
//!
//! # Examples
//!
//! ```bash
//! # Pick from the whole vault, print the payload as JSON
//! kc
//!
//! # Only entries of the `work` folder, print just the credential text
//! kc work --output plain
//! ```

pub mod cli_args;
pub mod console;
pub mod output;
