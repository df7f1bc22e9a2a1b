//! Operand resolution: turning the next token into an opcode, a register
//! operand, or a number.
//!
//! Every resolve call consumes exactly one token and bumps the instruction
//! count. The very first consumption of a run reads the token the cursor
//! already points at; every later one steps the cursor forward first. Running
//! off the end of the program is fatal.

use std::io::Write;

use tracing::trace;
use virtualmk_common::{parse_number, Opcode, Operand, Program, Register};

use crate::error::RuntimeError;
use crate::machine::{Interrupt, VM};

impl<'a, W: Write> VM<'a, W> {
    /// Consume one token.
    pub(crate) fn next_token(&mut self) -> Result<&'a str, Interrupt> {
        let first = self.count == 0;
        self.count += 1;

        if !first {
            if self.cursor + 1 >= self.program.len() {
                return Err(Interrupt::Fatal(RuntimeError::NotEnoughInstructions));
            }
            self.cursor += 1;
        }

        let program: &'a Program = self.program;
        let token = program
            .get(self.cursor)
            .ok_or(Interrupt::Fatal(RuntimeError::NotEnoughInstructions))?;
        trace!(at = self.count, cursor = self.cursor, token, "consume");
        Ok(token)
    }

    pub(crate) fn resolve_opcode(&mut self) -> Result<Opcode, Interrupt> {
        let token = self.next_token()?;
        Ok(Opcode::from_mnemonic(token)?)
    }

    pub(crate) fn resolve_register(&mut self) -> Result<Operand, Interrupt> {
        let token = self.next_token()?;
        let operand = Operand::from_mnemonic(token)?;
        trace!(operand = %operand, code = operand.code(), "register");
        Ok(operand)
    }

    /// Resolve a register operand that must name storage (A to F).
    pub(crate) fn resolve_named(&mut self) -> Result<Register, Interrupt> {
        self.resolve_register()?
            .register()
            .ok_or(Interrupt::Fatal(RuntimeError::IncorrectRegister))
    }

    pub(crate) fn resolve_number(&mut self) -> Result<f64, Interrupt> {
        let token = self.next_token()?;
        Ok(parse_number(token)?)
    }
}
