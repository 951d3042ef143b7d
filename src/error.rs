// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for reading and writing TS catalogs

use thiserror::Error;

/// Errors raised while decoding or parsing a TS document.
#[derive(Error, Debug)]
pub enum TsError {
    #[error("malformed XML at line {line}: {message}")]
    Xml { line: usize, message: String },

    #[error("invalid TS document at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("cannot decode catalog: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TsError>;
