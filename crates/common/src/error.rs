//! Decode errors for VirtualMK token streams.

use thiserror::Error;

/// Errors that occur while turning a token into an opcode, operand, or number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Token is not one of the 16 instruction mnemonics.
    #[error("instruction unknown: {0}")]
    UnknownInstruction(String),

    /// Token is not one of the 7 register mnemonics.
    #[error("register unknown: {0}")]
    UnknownRegister(String),

    /// Token has no leading floating-point literal, or it is out of range.
    #[error("number incorrect : {0}")]
    InvalidNumber(String),
}
