//! Program representation for VirtualMK token streams.
//!
//! A program is the flat sequence of whitespace-separated tokens read from a
//! `.mk` source file, uppercased. Tokens are typed lazily by the machine as
//! it consumes them.

use std::fmt;

/// A VirtualMK program: an ordered, case-normalized token sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The token stream.
    pub tokens: Vec<String>,
}

impl Program {
    /// Create a new program from already-normalized tokens.
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Split source text on whitespace and uppercase every token.
    pub fn from_source(text: &str) -> Self {
        let tokens = text
            .split_whitespace()
            .map(str::to_uppercase)
            .collect();
        Self { tokens }
    }

    /// Token at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Number of tokens in the program.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the program has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}
