//! VirtualMK virtual machine — executes token streams.
//!
//! The VM is a stack-and-register machine with:
//! - A value stack of `f64`
//! - Six storage registers A to F, plus the `S` operand meaning "the stack"
//! - A cursor into the token stream; operands are read inline, so each opcode
//!   decides how many more tokens it consumes
//!
//! Errors are either recoverable (reported, execution continues) or fatal
//! (reported, the machine halts). Either way the run ends with a dump of the
//! final stack and registers.
//!
//! # Usage
//!
//! ```
//! use virtualmk_common::Program;
//! use virtualmk_vm::{run, HaltReason};
//!
//! let program = Program::from_source("psh 5 psh 3 add s hlt");
//! let mut out = Vec::new();
//!
//! let outcome = run(&program, &mut out).unwrap();
//! assert_eq!(outcome.reason, HaltReason::Instruction);
//! assert_eq!(outcome.stack, vec![8.0]);
//! assert!(String::from_utf8(out).unwrap().contains("Stack: 8 \n"));
//! ```

pub mod error;
pub mod execute;
pub mod machine;
pub mod report;
pub mod resolve;

pub use error::RuntimeError;
pub use machine::{HaltReason, RegisterBank, VM};
pub use report::{Diagnostic, Number};

use std::io::{self, Write};

use virtualmk_common::Program;

/// Final state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reason: HaltReason,
    /// Value stack, bottom first.
    pub stack: Vec<f64>,
    pub registers: RegisterBank,
    /// Every reported condition, recoverable and fatal, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// Tokens consumed.
    pub instructions: usize,
}

impl Outcome {
    /// Number of recoverable conditions reported.
    pub fn recoverable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_fatal()).count()
    }
}

/// Execute a program, writing its output to `out`, and return the final state.
///
/// This is the primary entry point for the VM. It runs until HLT, a fatal
/// error, or the end of the token stream, and never terminates the process.
///
/// # Errors
///
/// Returns an I/O error only if writing to `out` fails.
pub fn run<W: Write>(program: &Program, out: W) -> io::Result<Outcome> {
    let mut vm = VM::new(program, out);
    let reason = vm.execute()?;
    Ok(Outcome {
        reason,
        stack: vm.stack,
        registers: vm.registers,
        diagnostics: vm.diagnostics,
        instructions: vm.count,
    })
}
