//! Statement rendering.
//!
//! [`render`] walks a statement once and produces the SQL text together with
//! the ordered bind list, so the two can never disagree. Dialect differences
//! are resolved against the [capability registry](crate::capability) while
//! walking: supported operations render natively, emulated ones are rewritten
//! and unsupported ones fail with [`QuillError::UnsupportedDialect`].
//!
//! ```
//! use quill_core::expr::Field;
//! use quill_core::query::{Select, Statement};
//! use quill_core::render::render;
//! use quill_core::settings::Settings;
//! use quill_core::table::Table;
//! use quill_types::Dialect;
//!
//! let users = Table::new("users");
//! let id: Field<i32> = users.column("id");
//!
//! let select = Select {
//!     fields: vec![id.clone().into()],
//!     from: vec![users.into()],
//!     where_: id.eq(7),
//!     ..Select::default()
//! };
//! let query = render(&Statement::Select(select), Dialect::PostgreSQL, &Settings::default(), &[])?;
//! assert_eq!(query.sql(), r#"select "id" from "users" where "id" = ?"#);
//! assert_eq!(query.binds().len(), 1);
//! # Ok::<(), quill_core::QuillError>(())
//! ```

mod context;
mod dml;
mod expr;
pub mod literal;
mod select;

use std::sync::Arc;

use compact_str::CompactString;
use hashbrown::HashMap;
use quill_types::Dialect;
use smallvec::SmallVec;

use crate::error::{QuillError, Result};
use crate::expr::ParamMode;
use crate::listener::VisitListener;
use crate::query::Statement;
use crate::settings::Settings;
use crate::types::DataTypeInfo;
use crate::value::Value;
use context::RenderContext;

/// A value sent to the statement at a marker position.
#[derive(Debug, Clone)]
pub struct BindValue {
    /// 1-based marker position
    pub index: usize,
    pub name: Option<CompactString>,
    pub data_type: DataTypeInfo,
    /// `Value::Null` for SQL NULL
    pub value: Value,
    pub mode: ParamMode,
}

/// An OUT or INOUT marker the statement must register.
#[derive(Debug, Clone)]
pub struct OutParameter {
    pub index: usize,
    pub data_type: DataTypeInfo,
}

/// Output of [`render`].
#[derive(Debug, Clone)]
pub struct RenderedQuery {
    sql: String,
    binds: SmallVec<[BindValue; 8]>,
    out_parameters: SmallVec<[OutParameter; 2]>,
    marker_count: usize,
    dialect: Dialect,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) execute_logging: bool,
}

impl RenderedQuery {
    #[inline]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Input values in marker order.
    #[inline]
    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    #[inline]
    pub fn out_parameters(&self) -> &[OutParameter] {
        &self.out_parameters
    }

    /// Number of markers in the SQL text.
    #[inline]
    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn into_sql(self) -> String {
        self.sql
    }

    /// Set the value of every bind named `name`, coerced to its data type.
    ///
    /// Returns the number of binds updated; names are not deduplicated, so a
    /// placeholder used twice is filled twice.
    pub fn bind_named(&mut self, name: &str, value: impl Into<Value>) -> Result<usize> {
        let value = value.into();
        let mut updated = 0;
        for bind in self
            .binds
            .iter_mut()
            .filter(|b| b.name.as_deref() == Some(name))
        {
            bind.value = bind.data_type.coerce(value.clone())?;
            updated += 1;
        }
        if updated == 0 {
            return Err(QuillError::Statement {
                index: 0,
                message: format!("no parameter named `{name}`"),
            });
        }
        Ok(updated)
    }

    /// [`bind_named`](Self::bind_named) for several names at once. Every
    /// name must match at least one bind.
    pub fn bind_named_all<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<CompactString>,
        V: Into<Value>,
    {
        let values: HashMap<CompactString, Value> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut seen: HashMap<&str, bool> = values.keys().map(|k| (k.as_str(), false)).collect();
        for bind in &mut self.binds {
            let Some(name) = bind.name.as_deref() else {
                continue;
            };
            if let Some((key, value)) = values.get_key_value(name) {
                bind.value = bind.data_type.coerce(value.clone())?;
                seen.insert(key.as_str(), true);
            }
        }

        match seen.into_iter().find(|(_, used)| !used) {
            Some((name, _)) => Err(QuillError::Statement {
                index: 0,
                message: format!("no parameter named `{name}`"),
            }),
            None => Ok(()),
        }
    }
}

/// Render `statement` for `dialect`.
///
/// Listeners are called around every visited part in registration order.
pub fn render(
    statement: &Statement,
    dialect: Dialect,
    settings: &Settings,
    listeners: &[Arc<dyn VisitListener>],
) -> Result<RenderedQuery> {
    settings.validate()?;

    let mut ctx = RenderContext::new(dialect, settings, listeners);
    match statement {
        Statement::Select(select) => ctx.select(select)?,
        Statement::Insert(insert) => ctx.insert(insert)?,
        Statement::Update(update) => ctx.update(update)?,
        Statement::Delete(delete) => ctx.delete(delete)?,
        Statement::Merge(merge) => ctx.merge(merge)?,
        Statement::Call(call) => ctx.call(call)?,
    }
    let (sql, binds, out_parameters, marker_count) = ctx.finish();

    crate::quill_trace_render!(settings, dialect, &sql, binds.len());

    Ok(RenderedQuery {
        sql,
        binds,
        out_parameters,
        marker_count,
        dialect,
        execute_logging: settings.execute_logging,
    })
}
