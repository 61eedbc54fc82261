//! Error types for Go source minification

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("Parser error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Failed to load Go grammar: {0}")]
    Language(String),

    #[error("Invalid minify level {0}: expected 1, 2 or 3")]
    InvalidLevel(u8),
}

pub type AstResult<T> = Result<T, AstError>;
