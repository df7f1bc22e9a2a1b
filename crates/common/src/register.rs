//! Register and operand definitions.
//!
//! The register table has seven mnemonics. `S` does not name a storage
//! slot: it tells the instruction to work on the value stack. The other six
//! (`A` to `F`) are real storage. [`Operand`] keeps that distinction in the
//! type instead of in a magic index.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// A named storage register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// All storage registers, in bank order.
pub const ALL_REGISTERS: [Register; 6] = [
    Register::A,
    Register::B,
    Register::C,
    Register::D,
    Register::E,
    Register::F,
];

impl Register {
    /// Slot index into a six-entry register bank (A=0 .. F=5).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Code in the register mnemonic table (A=1 .. F=6).
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
            Register::E => "E",
            Register::F => "F",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A register operand as written in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// `S`: operate on the value stack.
    Stack,
    /// `A` to `F`: operate on a storage register.
    Named(Register),
}

/// All operands, in table order (S, A, .., F).
pub const ALL_OPERANDS: [Operand; 7] = [
    Operand::Stack,
    Operand::Named(Register::A),
    Operand::Named(Register::B),
    Operand::Named(Register::C),
    Operand::Named(Register::D),
    Operand::Named(Register::E),
    Operand::Named(Register::F),
];

impl Operand {
    /// Look up an operand by its (uppercase) mnemonic.
    pub fn from_mnemonic(token: &str) -> Result<Self, DecodeError> {
        let operand = match token {
            "S" => Operand::Stack,
            "A" => Operand::Named(Register::A),
            "B" => Operand::Named(Register::B),
            "C" => Operand::Named(Register::C),
            "D" => Operand::Named(Register::D),
            "E" => Operand::Named(Register::E),
            "F" => Operand::Named(Register::F),
            other => return Err(DecodeError::UnknownRegister(other.to_string())),
        };
        Ok(operand)
    }

    /// Code in the register mnemonic table (S=0, A=1 .. F=6).
    pub fn code(self) -> u8 {
        match self {
            Operand::Stack => 0,
            Operand::Named(reg) => reg.code(),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Operand::Stack => "S",
            Operand::Named(reg) => reg.mnemonic(),
        }
    }

    /// The storage register, or `None` for the stack sentinel.
    pub fn register(self) -> Option<Register> {
        match self {
            Operand::Stack => None,
            Operand::Named(reg) => Some(reg),
        }
    }
}

impl FromStr for Operand {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operand::from_mnemonic(s)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_codes() {
        assert_eq!(Operand::Stack.code(), 0);
        assert_eq!(Operand::Named(Register::A).code(), 1);
        assert_eq!(Operand::Named(Register::F).code(), 6);
        for (i, &op) in ALL_OPERANDS.iter().enumerate() {
            assert_eq!(op.code() as usize, i);
        }
    }

    #[test]
    fn bank_index_skips_sentinel() {
        for (i, &reg) in ALL_REGISTERS.iter().enumerate() {
            assert_eq!(reg.index(), i);
            assert_eq!(reg.code() as usize, i + 1);
        }
    }

    #[test]
    fn mnemonic_roundtrip() {
        for &op in &ALL_OPERANDS {
            assert_eq!(Operand::from_mnemonic(op.mnemonic()), Ok(op));
            assert_eq!(op.to_string().parse::<Operand>(), Ok(op));
        }
    }

    #[test]
    fn unknown_register() {
        assert_eq!(
            Operand::from_mnemonic("G"),
            Err(DecodeError::UnknownRegister("G".to_string()))
        );
        assert_eq!(
            Operand::from_mnemonic("AX"),
            Err(DecodeError::UnknownRegister("AX".to_string()))
        );
    }

    #[test]
    fn register_accessor() {
        assert_eq!(Operand::Stack.register(), None);
        assert_eq!(Operand::Named(Register::C).register(), Some(Register::C));
    }
}
