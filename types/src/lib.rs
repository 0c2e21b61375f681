//! Shared type definitions for quill
//!
//! This crate provides the identifiers shared by every quill crate:
//!
//! - [`Dialect`] - closed set of SQL dialects the renderer targets
//! - [`SqlTypeCode`] and [`TypeCategory`] - the type codes carried by data types
//!
//! # Features
//!
//! - `serde` - Enable serde serialization/deserialization

mod dialect;
pub mod sql;

pub use dialect::{Dialect, DialectParseError, LimitStyle, QuoteStyle};
pub use sql::{SqlTypeCode, TypeCategory};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::Dialect;
    pub use crate::sql::{SqlTypeCode, TypeCategory};
}
