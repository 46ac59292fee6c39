//! Process result protocol.
//!
//! stdout carries the machine-readable outcome: the redirect resource
//! and `+\n` on success, `-<code>\n` on failure. stderr carries the
//! matching human-readable diagnostic. The two channels are independent
//! and both always fire on failure.

use std::io::Write;
use std::process::ExitCode;

use cead_core::{FlowError, ResultCode};

/// Report a captured resource and the success marker. Exit code 0.
pub fn success(resource: &str) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", resource);
    let _ = stdout.write_all(b"+\n");
    let _ = stdout.flush();
    ExitCode::SUCCESS
}

/// Report a flow failure on both channels. Exit code 1.
pub fn failure(err: &FlowError) -> ExitCode {
    let code = err.code();

    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(&failure_marker(code));
    let _ = stdout.flush();

    eprintln!("{}: {}", code.name(), err);
    ExitCode::from(1)
}

fn failure_marker(code: ResultCode) -> [u8; 3] {
    [b'-', code.tag(), b'\n']
}
