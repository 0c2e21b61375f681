use quill_types::{Dialect, SqlTypeCode};
use thiserror::Error;

use crate::capability::Operation;

/// Failure to convert a value between its wire form and an application type.
///
/// Every conversion in the value/type model reports through this type; no
/// conversion path panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataTypeError {
    /// No conversion rule exists between the value and the target type
    #[error("cannot convert {from} value to {to}")]
    Incompatible { from: &'static str, to: SqlTypeCode },

    /// Text did not parse as the target type
    #[error("cannot parse {input:?} as {to}")]
    Parse { input: String, to: SqlTypeCode },

    /// Numeric value does not fit the target type
    #[error("value {value} is out of range for {to}")]
    Overflow { value: String, to: SqlTypeCode },

    /// NULL reached a decoder that cannot represent it
    #[error("unexpected NULL for {to}")]
    UnexpectedNull { to: SqlTypeCode },

    /// Error raised by a user supplied converter
    #[error("converter error: {0}")]
    Converter(String),
}

#[derive(Debug, Error)]
pub enum QuillError {
    /// Value conversion failed while rendering or binding
    #[error(transparent)]
    DataType(#[from] DataTypeError),

    /// Operation cannot be rendered or emulated for the target dialect
    #[error("{operation} is not supported by dialect {dialect}")]
    UnsupportedDialect {
        operation: Operation,
        dialect: Dialect,
    },

    /// Malformed tree
    #[error("cannot render {node}: {message}")]
    Render { message: String, node: &'static str },

    /// Error reported by a statement handle or result row
    #[error("statement error at parameter {index}: {message}")]
    Statement { index: usize, message: String },

    /// Invalid settings
    #[error("configuration error: {0}")]
    Config(String),
}

impl QuillError {
    pub(crate) fn unsupported(operation: Operation, dialect: Dialect) -> Self {
        QuillError::UnsupportedDialect { operation, dialect }
    }

    pub(crate) fn render(node: &'static str, message: impl Into<String>) -> Self {
        QuillError::Render {
            message: message.into(),
            node,
        }
    }
}

/// Result type for rendering and binding
pub type Result<T> = std::result::Result<T, QuillError>;
