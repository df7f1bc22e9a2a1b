//! Diagnostics and state printing.
//!
//! Every reported condition is one line, `"<count> | error: <message>"`,
//! where `<count>` is the number of tokens consumed so far. Numbers print the
//! way a C++ stream prints a `double` by default: six significant digits,
//! trailing zeros dropped, scientific notation for very large or small
//! magnitudes.

use std::fmt;
use std::io::{self, Write};

use tracing::{error, warn};

use crate::error::RuntimeError;
use crate::machine::{Interrupt, VM};

/// Significant digits used when printing numbers.
const PRECISION: usize = 6;

/// A machine value formatted for output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f64);

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number(value)
    }
}

impl From<&f64> for Number {
    fn from(value: &f64) -> Self {
        Number(*value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }
        if value == 0.0 {
            return f.write_str(if value.is_sign_negative() { "-0" } else { "0" });
        }

        // Rounding to the target precision can carry into the next decade
        // (999999.5 -> 1e+06), so the exponent is taken after rounding.
        let sci = format!("{:.*e}", PRECISION - 1, value);
        let Some((mantissa, exp)) = sci.split_once('e') else {
            return f.write_str(&sci);
        };
        let exp: i32 = exp.parse().unwrap_or(0);

        if exp < -4 || exp >= PRECISION as i32 {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(
                f,
                "{}e{sign}{:02}",
                trim_fraction(mantissa),
                exp.unsigned_abs()
            )
        } else {
            let decimals = (PRECISION as i32 - 1 - exp) as usize;
            let fixed = format!("{value:.decimals$}");
            f.write_str(trim_fraction(&fixed))
        }
    }
}

/// Drop trailing zeros after a decimal point, and the point itself if bare.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// The value stack printed top to bottom, each value followed by a space.
pub struct StackView<'s>(pub &'s [f64]);

impl fmt::Display for StackView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("empty");
        }
        for value in self.0.iter().rev() {
            write!(f, "{} ", Number(*value))?;
        }
        Ok(())
    }
}

/// One reported condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Instruction count at the time of the report (1-based).
    pub at: usize,
    pub error: RuntimeError,
}

impl Diagnostic {
    pub fn is_fatal(&self) -> bool {
        self.error.is_fatal()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | error: {}", self.at, self.error)
    }
}

impl<W: Write> VM<'_, W> {
    /// Write one diagnostic line and record it.
    pub(crate) fn report(&mut self, error: RuntimeError) -> io::Result<()> {
        let diagnostic = Diagnostic {
            at: self.count,
            error,
        };
        if diagnostic.is_fatal() {
            error!(at = diagnostic.at, error = %diagnostic.error, "fatal");
        } else {
            warn!(at = diagnostic.at, error = %diagnostic.error, "recoverable");
        }
        writeln!(self.out, "{diagnostic}")?;
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    /// Report a recoverable condition and carry on with the next instruction.
    pub(crate) fn recover(&mut self, error: RuntimeError) -> Result<(), Interrupt> {
        debug_assert!(!error.is_fatal());
        self.report(error)?;
        Ok(())
    }

    /// `Stack: ...` and `Registers: ...` lines followed by a blank line.
    pub(crate) fn write_state(&mut self) -> io::Result<()> {
        writeln!(self.out, "Stack: {}", StackView(&self.stack))?;
        writeln!(self.out, "Registers: {}", self.registers)?;
        writeln!(self.out)
    }

    pub(crate) fn write_final_dump(&mut self) -> io::Result<()> {
        write!(self.out, "\nFinished execution \n \n")?;
        self.write_state()
    }
}
