//! # Quill
//!
//! A typed SQL expression-tree builder. Queries are assembled from typed
//! fields and conditions, checked for clause order at compile time, and
//! rendered to the SQL text and bind list of one of several dialects.
//!
//! ## Quick Start
//!
//! ```rust
//! use quill::prelude::*;
//!
//! let users = Table::new("users");
//! let id: Field<i32> = users.column("id");
//! let name: Field<String> = users.column("name");
//!
//! let query = select((&id, &name))
//!     .from(&users)
//!     .where_(name.like("a%"))
//!     .order_by(id.desc())
//!     .limit(10);
//!
//! let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
//! assert_eq!(
//!     rendered.sql(),
//!     r#"select "id", "name" from "users" where "name" like ? order by "id" desc limit ?"#
//! );
//! assert_eq!(rendered.binds().len(), 2);
//! # Ok::<(), quill::QuillError>(())
//! ```
//!
//! ## Dialects
//!
//! | Dialect       | Identifier quotes | Notes                                   |
//! |---------------|-------------------|-----------------------------------------|
//! | PostgreSQL    | `"id"`            | `on conflict`, `distinct on`, `merge`   |
//! | SQLite        | `"id"`            | `on conflict`, `merge` emulated         |
//! | MySQL/MariaDB | `` `id` ``        | `on duplicate key update`               |
//! | SQL Server    | `[id]`            | `offset .. fetch`, `exec` calls         |
//! | Oracle        | `"id"`            | `fetch first`, `merge`                  |
//!
//! Features missing from a dialect are either emulated by the renderer or
//! rejected with [`QuillError::UnsupportedDialect`]. See
//! [`Capabilities`](capability::Capabilities) for the full table.
//!
//! ## Features
//!
//! - `tracing` (default) - debug events for rendered statements and emulations
//! - `toml` (default) - load [`Settings`] from TOML documents
//! - `serde` - serde derives for [`Settings`] and [`Dialect`]
//! - `uuid` - `uuid::Uuid` columns and values

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod builder;
pub mod context;
pub mod dsl;
pub mod model;

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for quill operations
pub use quill_core::error::Result;

/// Error types
pub use quill_core::error::{DataTypeError, QuillError};

/// Database dialect enum
pub use quill_types::Dialect;

pub use context::{DslContext, Executor};

// =============================================================================
// Core modules
// =============================================================================

/// Dialect capability registry.
pub use quill_core::capability;

/// Binding of rendered bind lists onto driver statements.
pub use quill_core::binding;

/// Replays a rendered bind list onto a driver statement.
pub use quill_core::bind;

/// Expression nodes and the typed expression surface.
///
/// ```rust
/// use quill::expr::{Field, count_star};
/// use quill::table::Table;
///
/// let users = Table::new("users");
/// let age: Field<i32> = users.column("age");
/// let adults = count_star().filter_where(age.ge(18));
/// ```
pub use quill_core::expr;

/// Render listeners.
pub use quill_core::listener;

/// Identifiers.
pub use quill_core::name;

/// Immutable statement nodes.
pub use quill_core::query;

/// The renderer and its output.
pub use quill_core::render;

/// Render settings.
pub use quill_core::settings;

/// Tables, derived tables and joins.
pub use quill_core::table;

/// Data types, codecs and converters.
pub use quill_core::types;

/// Wire values.
pub use quill_core::value;

pub use quill_core::settings::Settings;

// =============================================================================
// Prelude
// =============================================================================

/// Everything needed to build and render queries.
///
/// ```rust
/// use quill::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::ToStatement;
    pub use crate::context::{DslContext, Executor};
    pub use crate::dsl::*;

    pub use quill_core::capability::{Operation, Support};
    pub use quill_core::expr::{
        AggregateFunction, Condition, Expr, Field, IntoField, NullsOrder, Operand, SortField,
        SortOrder,
    };
    pub use quill_core::listener::{Clause, VisitContext, VisitListener};
    pub use quill_core::name::{Name, QualifiedName};
    pub use quill_core::render::RenderedQuery;
    pub use quill_core::settings::{
        ParamType, RenderKeywordCase, RenderQuotedNames, Settings, StatementType,
    };
    pub use quill_core::table::{DerivedTable, JoinKind, Table};
    pub use quill_core::types::{DataType, SqlValue, sql_data_type};
    pub use quill_core::value::Value;

    pub use quill_types::Dialect;

    pub use crate::{QuillError, Result};
}
