//! VM state management: value stack, register bank, token cursor.

use std::fmt;
use std::io::{self, Write};
use std::ops::{Index, IndexMut};

use virtualmk_common::{DecodeError, Operand, Program, Register};

use crate::error::RuntimeError;
use crate::report::{Diagnostic, Number};

/// The six storage registers A to F, all starting at 0.0.
///
/// The stack sentinel `S` has no slot here; it is the [`Operand::Stack`]
/// tag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegisterBank([f64; 6]);

impl RegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register values in bank order (A first).
    pub fn values(&self) -> &[f64; 6] {
        &self.0
    }
}

impl Index<Register> for RegisterBank {
    type Output = f64;

    fn index(&self, reg: Register) -> &f64 {
        &self.0[reg.index()]
    }
}

impl IndexMut<Register> for RegisterBank {
    fn index_mut(&mut self, reg: Register) -> &mut f64 {
        &mut self.0[reg.index()]
    }
}

impl fmt::Display for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for reg in virtualmk_common::register::ALL_REGISTERS {
            write!(f, "{reg} = {}  ", Number(self[reg]))?;
        }
        Ok(())
    }
}

/// Why the machine stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum HaltReason {
    /// An HLT instruction was executed.
    Instruction,
    /// A fatal error was reported.
    Fatal(RuntimeError),
}

/// Signals that unwind the current fetch-decode-execute cycle.
#[derive(Debug)]
pub(crate) enum Interrupt {
    /// HLT.
    Halt,
    /// A fatal runtime error; the run loop reports it and halts.
    Fatal(RuntimeError),
    /// The output sink failed.
    Io(io::Error),
}

impl From<io::Error> for Interrupt {
    fn from(e: io::Error) -> Self {
        Interrupt::Io(e)
    }
}

impl From<DecodeError> for Interrupt {
    fn from(e: DecodeError) -> Self {
        Interrupt::Fatal(e.into())
    }
}

/// The VirtualMK virtual machine.
///
/// Program output (POP, PRT, diagnostics, final dump) is written to `out`.
pub struct VM<'a, W: Write> {
    /// The token stream being executed.
    pub(crate) program: &'a Program,
    /// Value stack; the top is the last element.
    pub(crate) stack: Vec<f64>,
    pub(crate) registers: RegisterBank,
    /// Index of the most recently consumed token.
    pub(crate) cursor: usize,
    /// Tokens consumed so far. Used only for diagnostics.
    pub(crate) count: usize,
    /// Set once the machine reaches the HALTED state.
    pub(crate) halted: Option<HaltReason>,
    /// Every condition reported so far, in order.
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) out: W,
}

impl<'a, W: Write> VM<'a, W> {
    /// Create a new VM for the given program, writing output to `out`.
    pub fn new(program: &'a Program, out: W) -> Self {
        Self {
            program,
            stack: Vec::new(),
            registers: RegisterBank::new(),
            cursor: 0,
            count: 0,
            halted: None,
            diagnostics: Vec::new(),
            out,
        }
    }

    /// Value stack, bottom first.
    pub fn stack(&self) -> &[f64] {
        &self.stack
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    /// Number of tokens consumed so far.
    pub fn instruction_count(&self) -> usize {
        self.count
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Read an operand location. `None` if it is the stack and the stack is empty.
    pub(crate) fn load(&self, operand: Operand) -> Option<f64> {
        match operand {
            Operand::Stack => self.stack.last().copied(),
            Operand::Named(reg) => Some(self.registers[reg]),
        }
    }

    /// Overwrite an operand location. A write to the top of an empty stack is dropped.
    pub(crate) fn store(&mut self, operand: Operand, value: f64) {
        match operand {
            Operand::Stack => {
                if let Some(top) = self.stack.last_mut() {
                    *top = value;
                }
            }
            Operand::Named(reg) => self.registers[reg] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_starts_zeroed() {
        let bank = RegisterBank::new();
        assert_eq!(bank.values(), &[0.0; 6]);
    }

    #[test]
    fn bank_indexing() {
        let mut bank = RegisterBank::new();
        bank[Register::C] = 2.5;
        assert_eq!(bank[Register::C], 2.5);
        assert_eq!(bank.values()[2], 2.5);
    }

    #[test]
    fn bank_display() {
        let mut bank = RegisterBank::new();
        bank[Register::A] = 1.5;
        bank[Register::F] = -3.0;
        assert_eq!(
            bank.to_string(),
            "A = 1.5  B = 0  C = 0  D = 0  E = 0  F = -3  "
        );
    }

    #[test]
    fn load_and_store() {
        let program = Program::default();
        let mut vm = VM::new(&program, Vec::new());
        assert_eq!(vm.load(Operand::Stack), None);
        vm.store(Operand::Stack, 1.0);
        assert!(vm.stack().is_empty());

        vm.stack.push(4.0);
        vm.store(Operand::Stack, 9.0);
        assert_eq!(vm.load(Operand::Stack), Some(9.0));

        vm.store(Operand::Named(Register::B), 7.0);
        assert_eq!(vm.load(Operand::Named(Register::B)), Some(7.0));
        assert_eq!(vm.registers()[Register::B], 7.0);
    }

    #[test]
    fn fresh_machine_state() {
        let program = Program::from_source("HLT");
        let vm = VM::new(&program, Vec::new());
        assert_eq!(vm.instruction_count(), 0);
        assert!(!vm.is_halted());
        assert!(vm.diagnostics().is_empty());
    }
}
