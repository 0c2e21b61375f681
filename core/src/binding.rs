//! Wire-level bindings and the executor-facing traits.
//!
//! A [`Binding`] controls the five touchpoints of a value's life: rendering
//! into SQL text, registering an OUT parameter, setting an input parameter,
//! reading a result column and reading an OUT parameter. The renderer records
//! exactly what [`Binding::sql`] emitted, so a binding that inlines a literal
//! never produces a bind entry and the binder never calls [`Binding::set`] for
//! it.

use core::fmt;

use compact_str::CompactString;
use quill_types::Dialect;

use crate::error::Result;
use crate::render::literal;
use crate::types::DataTypeInfo;
use crate::value::Value;

/// Prepared statement operations needed by the binder.
///
/// Implemented by the executor. Indices are 1-based marker positions.
pub trait StatementHandle {
    fn set_value(&mut self, index: usize, data_type: &DataTypeInfo, value: &Value) -> Result<()>;

    fn set_null(&mut self, index: usize, data_type: &DataTypeInfo) -> Result<()>;

    fn register_out_parameter(&mut self, index: usize, data_type: &DataTypeInfo) -> Result<()>;

    /// Value of an OUT parameter after execution.
    fn out_parameter(&self, index: usize) -> Result<Value>;
}

/// A fetched result row. Columns are 0-based.
pub trait ResultRow {
    fn value(&self, column: usize) -> Result<Value>;
}

/// Wire-level behaviour of a data type.
///
/// Every method has a default; override only the touchpoints that differ.
pub trait Binding: Send + Sync + fmt::Debug + 'static {
    /// Render a bind marker or an inline literal for the current value.
    fn sql(&self, ctx: &mut BindingSqlContext<'_>) -> Result<()> {
        ctx.render_default()
    }

    fn register(
        &self,
        statement: &mut dyn StatementHandle,
        index: usize,
        data_type: &DataTypeInfo,
    ) -> Result<()> {
        statement.register_out_parameter(index, data_type)
    }

    fn set(
        &self,
        statement: &mut dyn StatementHandle,
        index: usize,
        data_type: &DataTypeInfo,
        value: &Value,
    ) -> Result<()> {
        if value.is_null() {
            statement.set_null(index, data_type)
        } else {
            statement.set_value(index, data_type, value)
        }
    }

    fn get(&self, row: &dyn ResultRow, column: usize, _data_type: &DataTypeInfo) -> Result<Value> {
        row.value(column)
    }

    fn get_out(
        &self,
        statement: &dyn StatementHandle,
        index: usize,
        _data_type: &DataTypeInfo,
    ) -> Result<Value> {
        statement.out_parameter(index)
    }
}

/// Binding used by every standard data type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBinding;

impl Binding for DefaultBinding {}

/// What a binding emitted for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Emission {
    Marker { cast: Option<CompactString> },
    Literal(String),
}

/// Render-time view handed to [`Binding::sql`].
///
/// Exactly one of the `render_*` methods must be called. Calling none, or
/// more than one, is a defect in the binding and panics.
pub struct BindingSqlContext<'a> {
    dialect: Dialect,
    value: &'a Value,
    data_type: &'a DataTypeInfo,
    inline: bool,
    emission: Option<Emission>,
}

impl<'a> BindingSqlContext<'a> {
    pub(crate) fn new(
        dialect: Dialect,
        value: &'a Value,
        data_type: &'a DataTypeInfo,
        inline: bool,
    ) -> Self {
        Self {
            dialect,
            value,
            data_type,
            inline,
            emission: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn value(&self) -> &Value {
        self.value
    }

    pub fn data_type(&self) -> &DataTypeInfo {
        self.data_type
    }

    /// Whether settings or the parameter ask for an inline literal.
    pub fn should_inline(&self) -> bool {
        self.inline
    }

    pub fn render_marker(&mut self) {
        self.emit(Emission::Marker { cast: None });
    }

    /// Render `cast(<marker> as <type_name>)`.
    pub fn render_marker_cast(&mut self, type_name: &str) {
        self.emit(Emission::Marker {
            cast: Some(type_name.into()),
        });
    }

    /// Render the value as the dialect's standard literal.
    pub fn render_inline(&mut self) -> Result<()> {
        let literal = literal::render_literal(self.value, self.data_type, self.dialect)?;
        self.emit(Emission::Literal(literal));
        Ok(())
    }

    /// Render custom literal SQL in place of the value.
    pub fn render_literal(&mut self, sql: impl Into<String>) {
        self.emit(Emission::Literal(sql.into()));
    }

    /// Inline when [`should_inline`](Self::should_inline), otherwise a marker.
    pub fn render_default(&mut self) -> Result<()> {
        if self.inline {
            self.render_inline()
        } else {
            self.render_marker();
            Ok(())
        }
    }

    fn emit(&mut self, emission: Emission) {
        if let Some(previous) = &self.emission {
            panic!(
                "binding for {} emitted {emission:?} after {previous:?}; \
                 a value renders exactly one marker or literal",
                self.data_type.type_name()
            );
        }
        self.emission = Some(emission);
    }

    pub(crate) fn finish(self) -> Emission {
        match self.emission {
            Some(emission) => emission,
            None => panic!(
                "binding for {} rendered neither a marker nor a literal",
                self.data_type.type_name()
            ),
        }
    }
}
