//! VirtualMK common types.
//!
//! This crate provides the data structures shared by the machine and its
//! front end:
//!
//! - [`Opcode`] — the 16 instruction mnemonics (HLT=0 .. NOP=15)
//! - [`Operand`] / [`Register`] — the 7 register mnemonics, with the stack
//!   sentinel `S` kept apart from the six storage registers
//! - [`Program`] — the uppercase token stream the machine consumes
//! - [`parse_number`] — leading-prefix number literals
//! - [`DecodeError`] — errors from typing a token
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod error;
pub mod number;
pub mod opcode;
pub mod program;
pub mod register;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use number::parse_number;
pub use opcode::{Family, Opcode};
pub use program::Program;
pub use register::{Operand, Register};
