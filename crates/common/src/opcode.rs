//! Opcode definitions for the VirtualMK instruction set.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute pins each variant to its stable numeric
/// mapping (HLT=0 through NOP=15).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop the machine and print the final state.
    Hlt = 0,
    /// Push the following number literal onto the stack.
    Psh = 1,
    /// Report and remove the top of the stack.
    Pop = 2,

    // Binary arithmetic: one mode operand, plus two more in register mode.
    /// Addition.
    Add = 3,
    /// Subtraction.
    Sub = 4,
    /// Multiplication.
    Mul = 5,
    /// Division. Both operands must be non-zero.
    Div = 6,
    /// Exponentiation.
    Pow = 7,

    // Unary, in place on the stack top or a register.
    /// Square root. Operand must not be negative.
    Sqr = 8,
    /// Base-10 logarithm. Operand must not be zero.
    Log = 9,
    /// Natural logarithm. Operand must not be zero.
    Lon = 10,
    /// Natural exponential.
    Exp = 11,

    // Transfers between two locations.
    /// Swap two locations.
    Mov = 12,
    /// Copy the second location into the first.
    Set = 13,

    /// Print the stack and registers.
    Prt = 14,
    /// No operation.
    Nop = 15,
}

/// Groups of opcodes that share an operand addressing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// HLT, PRT, NOP: no operands.
    Control,
    /// PSH, POP: stack-only.
    Stack,
    /// ADD, SUB, MUL, DIV, POW.
    Binary,
    /// SQR, LOG, LON, EXP.
    Unary,
    /// MOV, SET.
    Transfer,
}

/// All valid opcodes, in table order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 16] = [
    Opcode::Hlt,
    Opcode::Psh,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Pow,
    Opcode::Sqr,
    Opcode::Log,
    Opcode::Lon,
    Opcode::Exp,
    Opcode::Mov,
    Opcode::Set,
    Opcode::Prt,
    Opcode::Nop,
];

impl Opcode {
    /// Look up an opcode by its (uppercase) mnemonic.
    pub fn from_mnemonic(token: &str) -> Result<Self, DecodeError> {
        let op = match token {
            "HLT" => Opcode::Hlt,
            "PSH" => Opcode::Psh,
            "POP" => Opcode::Pop,
            "ADD" => Opcode::Add,
            "SUB" => Opcode::Sub,
            "MUL" => Opcode::Mul,
            "DIV" => Opcode::Div,
            "POW" => Opcode::Pow,
            "SQR" => Opcode::Sqr,
            "LOG" => Opcode::Log,
            "LON" => Opcode::Lon,
            "EXP" => Opcode::Exp,
            "MOV" => Opcode::Mov,
            "SET" => Opcode::Set,
            "PRT" => Opcode::Prt,
            "NOP" => Opcode::Nop,
            other => return Err(DecodeError::UnknownInstruction(other.to_string())),
        };
        Ok(op)
    }

    /// The assembly mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Psh => "PSH",
            Opcode::Pop => "POP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Pow => "POW",
            Opcode::Sqr => "SQR",
            Opcode::Log => "LOG",
            Opcode::Lon => "LON",
            Opcode::Exp => "EXP",
            Opcode::Mov => "MOV",
            Opcode::Set => "SET",
            Opcode::Prt => "PRT",
            Opcode::Nop => "NOP",
        }
    }

    /// The addressing family this opcode belongs to.
    pub fn family(self) -> Family {
        match self {
            Opcode::Hlt | Opcode::Prt | Opcode::Nop => Family::Control,
            Opcode::Psh | Opcode::Pop => Family::Stack,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Pow => Family::Binary,
            Opcode::Sqr | Opcode::Log | Opcode::Lon | Opcode::Exp => Family::Unary,
            Opcode::Mov | Opcode::Set => Family::Transfer,
        }
    }
}

impl FromStr for Opcode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::from_mnemonic(s)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
