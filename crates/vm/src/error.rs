//! Runtime errors for the VirtualMK machine.
//!
//! Errors come in two tiers. Recoverable errors are reported and the machine
//! moves on to the next instruction with its state untouched. Fatal errors are
//! reported and halt the machine. [`RuntimeError::is_fatal`] tells them apart.

use thiserror::Error;
use virtualmk_common::DecodeError;

use crate::report::Number;

/// Errors that occur during program execution.
///
/// The display text of each variant is the message printed after
/// `"<count> | error: "` on the diagnostic line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    // ---- Fatal ----
    /// The token stream ran out while an instruction or operand was required.
    #[error("not enough instructions")]
    NotEnoughInstructions,

    /// Token is not an instruction mnemonic.
    #[error("instruction unknown: {token}")]
    UnknownInstruction { token: String },

    /// Token is not a register mnemonic.
    #[error("register unknown: {token}")]
    UnknownRegister { token: String },

    /// Token is not a floating-point literal.
    #[error("number incorrect : {token}")]
    InvalidNumber { token: String },

    /// A register operand is structurally invalid for its position: `S` where
    /// a named register is required, or a repeated register where distinct
    /// ones are required.
    #[error("register is incorrect")]
    IncorrectRegister,

    /// MOV or SET referenced the stack while it was empty.
    #[error("stack is empty")]
    TransferFromEmptyStack,

    // ---- Recoverable ----
    /// POP on an empty stack.
    #[error("could not pop value, stack is empty ")]
    PopFromEmptyStack,

    /// Binary arithmetic in stack mode with fewer than two values.
    #[error("stack has not enough values")]
    StackTooShort,

    /// DIV with a zero operand.
    #[error("could not be divide by zero")]
    DivisionByZero,

    /// SQR of a negative value.
    #[error("could not calculate square root from negative number: {}", Number::from(.value))]
    NegativeSquareRoot { value: f64 },

    /// LOG or LON of a zero stack top.
    #[error("value on stack is zero")]
    StackValueZero,

    /// LOG or LON of a zero register.
    #[error("register value is zero")]
    RegisterValueZero,

    /// Unary operation on an empty stack.
    #[error("stack is empty")]
    StackEmpty,
}

impl RuntimeError {
    /// Returns true if this error halts the machine.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RuntimeError::NotEnoughInstructions
                | RuntimeError::UnknownInstruction { .. }
                | RuntimeError::UnknownRegister { .. }
                | RuntimeError::InvalidNumber { .. }
                | RuntimeError::IncorrectRegister
                | RuntimeError::TransferFromEmptyStack
        )
    }
}

impl From<DecodeError> for RuntimeError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnknownInstruction(token) => RuntimeError::UnknownInstruction { token },
            DecodeError::UnknownRegister(token) => RuntimeError::UnknownRegister { token },
            DecodeError::InvalidNumber(token) => RuntimeError::InvalidNumber { token },
        }
    }
}
