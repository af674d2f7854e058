//! CLI dispatch for the `wmark check` command.
//!
//! Reports whether extensions, or the extensions of file paths, are ones the
//! watermarker can process.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use crate::format::{ext_hint, is_allowed_ext};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Debug, Serialize)]
struct CheckEntry<'a> {
    input: &'a str,
    extension: String,
    supported: bool,
}

/// Extension to test for one input: the input itself when it looks like
/// `.ext`, otherwise the extension of the path it names.
fn extension_of(input: &str) -> String {
    match input.strip_prefix('.') {
        Some(rest) if !rest.contains(|c: char| matches!(c, '.' | '/' | '\\')) => input.to_string(),
        _ => ext_hint(Path::new(input)),
    }
}

fn check_one(input: &str) -> CheckEntry<'_> {
    let extension = extension_of(input);
    // An input with no extension at all is simply unsupported.
    let supported = extension.len() > 1 && is_allowed_ext(&extension);
    CheckEntry { input, extension, supported }
}

/// Execute the check command.
pub(crate) fn run_check(inputs: &[String], json: bool) -> ExitCode {
    let entries: Vec<CheckEntry<'_>> = inputs.iter().map(|i| check_one(i)).collect();

    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for entry in &entries {
            let verdict = if entry.supported { "supported" } else { "unsupported" };
            println!("{}: {}", entry.input, verdict);
        }
    }

    if entries.iter().all(|e| e.supported) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
