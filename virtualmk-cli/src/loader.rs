//! Source file loading.
//!
//! A source file must carry the `.mk` extension. Its contents are split on
//! whitespace and uppercased into a [`Program`].

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use virtualmk_common::Program;

/// File extension required for source files.
pub const EXTENSION: &str = "mk";

/// Errors produced while loading a source file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No path was given.
    #[error("no input file")]
    NoInput,

    /// The path does not end in `.mk`.
    #[error("wrong file extension")]
    WrongExtension,

    /// The file could not be read.
    #[error("could not read file {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Check the extension of `path`.
pub fn check_extension(path: &Path) -> Result<(), LoadError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(EXTENSION) => Ok(()),
        _ => Err(LoadError::WrongExtension),
    }
}

/// Load the program at `path`, if any.
pub fn load(path: Option<&str>) -> Result<Program, LoadError> {
    let path = path.ok_or(LoadError::NoInput)?;
    check_extension(Path::new(path))?;

    let text = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_string(),
        source,
    })?;

    let program = Program::from_source(&text);
    debug!(path, tokens = program.len(), "loaded");
    Ok(program)
}
