//! Error types for pareto operations.
//!
//! This module provides the main error type [`ParetoError`] which wraps
//! the error conditions that can occur while loading a vocabulary or
//! parsing directives.

use std::io;

use thiserror::Error;

use pareto_core::error::RegistryError;
use pareto_parser::error::ParseError;

/// The main error type for pareto operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source
/// spans, which the CLI renders as a source snippet.
#[derive(Debug, Error)]
pub enum ParetoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Invalid registry definition: {0}")]
    Registry(#[from] RegistryError),

    #[error("Malformed registry definition file: {0}")]
    Definition(String),

    #[error("Unknown family `{0}`")]
    UnknownFamily(String),
}

impl ParetoError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
