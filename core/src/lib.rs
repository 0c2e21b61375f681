//! Core of quill: the typed expression tree, the dialect capability
//! registry, the renderer and the binder.
//!
//! Most applications use the `quill` crate, which adds step builders and the
//! [`DslContext`](../quill/struct.DslContext.html) facade on top of this one.
//!
//! # Features
//!
//! - `tracing` - debug events for rendered statements and emulations
//! - `serde` - serde derives for [`Settings`](settings::Settings)
//! - `toml` - [`Settings::from_toml_str`](settings::Settings::from_toml_str)
//! - `uuid` - `Value::Uuid` and `uuid::Uuid` columns

pub mod bind;
pub mod binding;
pub mod capability;
pub mod error;
pub mod expr;
pub mod listener;
pub mod name;
pub mod query;
pub mod render;
pub mod settings;
pub mod table;
mod tracing;
pub mod types;
pub mod value;

pub use bind::bind;
pub use binding::{Binding, BindingSqlContext, DefaultBinding, ResultRow, StatementHandle};
pub use capability::{Capabilities, Operation, Support};
pub use error::{DataTypeError, QuillError, Result};
pub use expr::{Condition, Expr, Field, Param, ParamMode, SortField};
pub use listener::{Clause, QueryPart, QueryPartRef, VisitContext, VisitListener};
pub use name::{Name, QualifiedName};
pub use query::Statement;
pub use render::{BindValue, OutParameter, RenderedQuery, render};
pub use settings::Settings;
pub use table::{DerivedTable, Table, TableRef};
pub use types::{DataType, DataTypeInfo, SqlValue};
pub use value::Value;

pub use quill_types::{Dialect, SqlTypeCode, TypeCategory};
