//! CLI command implementations.

use std::io::{self, Write};

use tracing::info;
use virtualmk_cli::loader;
use virtualmk_vm::HaltReason;

/// Load and execute a `.mk` program.
///
/// The exit status is 0 whether the machine stopped on HLT or on a fatal
/// error; both are normal ends of a run.
pub fn run(args: &[String]) -> Result<(), i32> {
    let program = load(args)?;

    let stdout = io::stdout();
    let outcome = virtualmk_vm::run(&program, stdout.lock()).map_err(|e| {
        eprintln!("error: cannot write output: {e}");
        1
    })?;

    match &outcome.reason {
        HaltReason::Instruction => info!(instructions = outcome.instructions, "halted"),
        HaltReason::Fatal(e) => info!(instructions = outcome.instructions, error = %e, "halted on fatal error"),
    }
    Ok(())
}

/// Print the normalized token stream, one `<index>\t<token>` per line.
pub fn tokens(args: &[String]) -> Result<(), i32> {
    let program = load(args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, token) in program.iter().enumerate() {
        writeln!(out, "{i}\t{token}").map_err(|e| {
            eprintln!("error: cannot write output: {e}");
            1
        })?;
    }
    Ok(())
}

fn load(args: &[String]) -> Result<virtualmk_common::Program, i32> {
    loader::load(args.first().map(String::as_str)).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}
