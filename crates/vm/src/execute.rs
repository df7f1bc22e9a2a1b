//! Main execution loop and opcode dispatch for the VirtualMK machine.

use std::io::{self, Write};

use tracing::debug;
use virtualmk_common::{Opcode, Operand};

use crate::error::RuntimeError;
use crate::machine::{HaltReason, Interrupt, VM};
use crate::report::Number;

/// Domain check applied before a unary operation.
#[derive(Debug, Clone, Copy)]
enum Guard {
    None,
    NonNegative,
    NonZero,
}

impl Guard {
    /// The recoverable error for `value`, if it is outside the domain.
    fn violation(self, value: f64, operand: Operand) -> Option<RuntimeError> {
        match self {
            Guard::None => None,
            Guard::NonNegative if value < 0.0 => Some(RuntimeError::NegativeSquareRoot { value }),
            Guard::NonZero if value == 0.0 => Some(match operand {
                Operand::Stack => RuntimeError::StackValueZero,
                Operand::Named(_) => RuntimeError::RegisterValueZero,
            }),
            Guard::NonNegative | Guard::NonZero => None,
        }
    }
}

/// MOV exchanges two locations; SET copies the second into the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Swap,
    Copy,
}

impl<'a, W: Write> VM<'a, W> {
    /// Execute the program until it halts, then print the final state.
    ///
    /// Only a failing output sink is an `Err`; HLT and fatal runtime errors
    /// both end in `Ok` with the reason. Calling this on a halted machine
    /// returns the recorded reason without running anything.
    pub fn execute(&mut self) -> io::Result<HaltReason> {
        if let Some(reason) = &self.halted {
            return Ok(reason.clone());
        }

        let reason = loop {
            match self.step() {
                Ok(()) => {}
                Err(Interrupt::Halt) => break HaltReason::Instruction,
                Err(Interrupt::Fatal(e)) => {
                    self.report(e.clone())?;
                    break HaltReason::Fatal(e);
                }
                Err(Interrupt::Io(e)) => return Err(e),
            }
        };

        debug!(at = self.count, ?reason, "halted");
        self.halted = Some(reason.clone());
        self.write_final_dump()?;
        Ok(reason)
    }

    /// One fetch-decode-execute cycle.
    fn step(&mut self) -> Result<(), Interrupt> {
        let op = self.resolve_opcode()?;
        debug!(at = self.count, opcode = %op, code = op as u8, family = ?op.family(), "dispatch");

        match op {
            Opcode::Hlt => Err(Interrupt::Halt),
            Opcode::Psh => self.exec_push(),
            Opcode::Pop => self.exec_pop(),

            Opcode::Add => self.exec_binary(|a, b| a + b, false),
            Opcode::Sub => self.exec_binary(|a, b| a - b, false),
            Opcode::Mul => self.exec_binary(|a, b| a * b, false),
            Opcode::Div => self.exec_binary(|a, b| a / b, true),
            Opcode::Pow => self.exec_binary(f64::powf, false),

            Opcode::Sqr => self.exec_unary(f64::sqrt, Guard::NonNegative),
            Opcode::Log => self.exec_unary(f64::log10, Guard::NonZero),
            Opcode::Lon => self.exec_unary(f64::ln, Guard::NonZero),
            Opcode::Exp => self.exec_unary(f64::exp, Guard::None),

            Opcode::Mov => self.exec_transfer(Transfer::Swap),
            Opcode::Set => self.exec_transfer(Transfer::Copy),

            Opcode::Prt => self.exec_print(),
            Opcode::Nop => Ok(()),
        }
    }

    // ---- Stack ----

    fn exec_push(&mut self) -> Result<(), Interrupt> {
        let value = self.resolve_number()?;
        self.stack.push(value);
        Ok(())
    }

    fn exec_pop(&mut self) -> Result<(), Interrupt> {
        match self.stack.pop() {
            Some(value) => {
                writeln!(self.out, "popped value: {}", Number(value))?;
                Ok(())
            }
            None => self.recover(RuntimeError::PopFromEmptyStack),
        }
    }

    // ---- Arithmetic ----

    /// ADD, SUB, MUL, DIV, POW.
    ///
    /// Stack mode (`OP S`) pops the top value and replaces the new top with
    /// `popped OP new_top`. Register mode (`OP X Y Z`) writes `X OP Y` into
    /// `Z`; X and Y must differ and all three must be A to F. With
    /// `nonzero`, both inputs must be non-zero; in register mode a skipped
    /// operation still consumes its destination token.
    fn exec_binary(&mut self, apply: fn(f64, f64) -> f64, nonzero: bool) -> Result<(), Interrupt> {
        match self.resolve_register()? {
            Operand::Stack => {
                let (below, top) = match self.stack.as_slice() {
                    [.., below, top] => (*below, *top),
                    _ => return self.recover(RuntimeError::StackTooShort),
                };
                if nonzero && (top == 0.0 || below == 0.0) {
                    return self.recover(RuntimeError::DivisionByZero);
                }
                self.stack.pop();
                self.store(Operand::Stack, apply(top, below));
            }
            Operand::Named(mode) => {
                let second = self.resolve_named()?;
                // Operands are validated before the zero check, so `DIV A A B`
                // is fatal even when A holds zero.
                if second == mode {
                    return Err(Interrupt::Fatal(RuntimeError::IncorrectRegister));
                }
                let (lhs, rhs) = (self.registers[mode], self.registers[second]);
                if nonzero && (lhs == 0.0 || rhs == 0.0) {
                    self.recover(RuntimeError::DivisionByZero)?;
                    self.resolve_register()?;
                    return Ok(());
                }
                let dest = self.resolve_named()?;
                self.registers[dest] = apply(lhs, rhs);
            }
        }
        Ok(())
    }

    /// SQR, LOG, LON, EXP: in place on the stack top or a register.
    fn exec_unary(&mut self, apply: fn(f64) -> f64, guard: Guard) -> Result<(), Interrupt> {
        let operand = self.resolve_register()?;
        let Some(value) = self.load(operand) else {
            return self.recover(RuntimeError::StackEmpty);
        };
        if let Some(e) = guard.violation(value, operand) {
            return self.recover(e);
        }
        self.store(operand, apply(value));
        Ok(())
    }

    // ---- Transfers ----

    /// MOV and SET. Either operand may be `S`, but not both, and two named
    /// registers must differ. Touching an empty stack here is fatal.
    fn exec_transfer(&mut self, kind: Transfer) -> Result<(), Interrupt> {
        let first = self.resolve_register()?;
        if first == Operand::Stack && self.stack.is_empty() {
            return Err(Interrupt::Fatal(RuntimeError::TransferFromEmptyStack));
        }

        let second = self.resolve_register()?;
        match (first, second) {
            (Operand::Stack, Operand::Stack) => {
                return Err(Interrupt::Fatal(RuntimeError::IncorrectRegister));
            }
            (Operand::Named(a), Operand::Named(b)) if a == b => {
                return Err(Interrupt::Fatal(RuntimeError::IncorrectRegister));
            }
            _ => {}
        }

        let (Some(x), Some(y)) = (self.load(first), self.load(second)) else {
            return Err(Interrupt::Fatal(RuntimeError::TransferFromEmptyStack));
        };
        match kind {
            Transfer::Swap => {
                self.store(first, y);
                self.store(second, x);
            }
            Transfer::Copy => self.store(first, y),
        }
        Ok(())
    }

    // ---- Output ----

    fn exec_print(&mut self) -> Result<(), Interrupt> {
        writeln!(self.out)?;
        self.write_state()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtualmk_common::{Program, Register};

    fn machine(source: &str) -> (Program, Vec<u8>) {
        (Program::from_source(source), Vec::new())
    }

    #[test]
    fn guard_violations() {
        assert_eq!(
            Guard::NonNegative.violation(-1.0, Operand::Stack),
            Some(RuntimeError::NegativeSquareRoot { value: -1.0 })
        );
        assert_eq!(Guard::NonNegative.violation(0.0, Operand::Stack), None);
        assert_eq!(
            Guard::NonZero.violation(0.0, Operand::Stack),
            Some(RuntimeError::StackValueZero)
        );
        assert_eq!(
            Guard::NonZero.violation(0.0, Operand::Named(Register::A)),
            Some(RuntimeError::RegisterValueZero)
        );
        assert_eq!(Guard::NonZero.violation(-3.0, Operand::Stack), None);
        assert_eq!(Guard::None.violation(0.0, Operand::Stack), None);
    }

    #[test]
    fn step_leaves_machine_running() {
        let (program, mut out) = machine("PSH 2 PSH 3 MUL S HLT");
        let mut vm = VM::new(&program, &mut out);
        vm.step().unwrap();
        vm.step().unwrap();
        assert_eq!(vm.stack(), &[2.0, 3.0]);
        vm.step().unwrap();
        assert_eq!(vm.stack(), &[6.0]);
        assert!(matches!(vm.step(), Err(Interrupt::Halt)));
        assert!(!vm.is_halted());
    }

    #[test]
    fn execute_twice_does_not_rerun() {
        let (program, mut out) = machine("PSH 1 HLT");
        let mut vm = VM::new(&program, &mut out);
        assert_eq!(vm.execute().unwrap(), HaltReason::Instruction);
        let count = vm.instruction_count();
        assert_eq!(vm.execute().unwrap(), HaltReason::Instruction);
        assert_eq!(vm.instruction_count(), count);
        assert!(vm.is_halted());
    }

    #[test]
    fn transfer_with_stack_first_checks_before_consuming() {
        let (program, mut out) = machine("MOV S A");
        let mut vm = VM::new(&program, &mut out);
        let reason = vm.execute().unwrap();
        assert_eq!(
            reason,
            HaltReason::Fatal(RuntimeError::TransferFromEmptyStack)
        );
        // MOV and S consumed; A never reached.
        assert_eq!(vm.instruction_count(), 2);
    }
}
