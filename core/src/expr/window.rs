//! Window functions and OVER clause support.
//!
//! Provides:
//! - `WindowSpec` builder for PARTITION BY, ORDER BY and frame clauses
//! - named window definitions for the WINDOW clause
//! - pure window functions: `row_number`, `rank`, `dense_rank`,
//!   `percent_rank`, `ntile`, `lag`, `lead`, `first_value`, `last_value`
//!
//! A [`WindowFunction`] has no SQL meaning without a window, so the only way
//! to turn one into a [`Field`] is [`WindowFunction::over`] or
//! [`WindowFunction::over_named`].
//!
//! ```
//! use quill_core::expr::{row_number, window, Field};
//! use quill_core::table::Table;
//!
//! let emp = Table::new("emp");
//! let dept: Field<String> = emp.column("dept");
//! let salary: Field<i32> = emp.column("salary");
//!
//! let rn: Field<i64> = row_number().over(window().partition_by([&dept]).order_by([salary.desc()]));
//! ```

use core::fmt;

use super::{Expr, Field, FunctionCall, FunctionKind, IntoField, Param, SortField};
use crate::name::Name;
use crate::types::{DataType, sql_data_type};

// =============================================================================
// Frame Bounds
// =============================================================================

/// Bound of a window frame (ROWS/RANGE BETWEEN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameBound {
    /// UNBOUNDED PRECEDING
    UnboundedPreceding,
    /// N PRECEDING
    Preceding(u64),
    /// CURRENT ROW
    CurrentRow,
    /// N FOLLOWING
    Following(u64),
    /// UNBOUNDED FOLLOWING
    UnboundedFollowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnits {
    Rows,
    Range,
}

/// `<units> between <start> and <end>`, or `<units> <start>` without an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    pub units: FrameUnits,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

// =============================================================================
// WindowSpec
// =============================================================================

/// The content of `OVER (...)`.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<SortField>,
    pub frame: Option<Frame>,
}

/// Start an empty window specification.
pub fn window() -> WindowSpec {
    WindowSpec::default()
}

impl WindowSpec {
    #[must_use]
    pub fn partition_by<I, E>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.partition_by
            .extend(exprs.into_iter().map(|e| e.into().unaliased()));
        self
    }

    #[must_use]
    pub fn order_by<I, S>(mut self, sorts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SortField>,
    {
        self.order_by.extend(sorts.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn rows(self, start: FrameBound) -> Self {
        self.frame(FrameUnits::Rows, start, None)
    }

    #[must_use]
    pub fn rows_between(self, start: FrameBound, end: FrameBound) -> Self {
        self.frame(FrameUnits::Rows, start, Some(end))
    }

    #[must_use]
    pub fn range(self, start: FrameBound) -> Self {
        self.frame(FrameUnits::Range, start, None)
    }

    #[must_use]
    pub fn range_between(self, start: FrameBound, end: FrameBound) -> Self {
        self.frame(FrameUnits::Range, start, Some(end))
    }

    fn frame(mut self, units: FrameUnits, start: FrameBound, end: Option<FrameBound>) -> Self {
        self.frame = Some(Frame { units, start, end });
        self
    }

    /// Name this specification for the WINDOW clause.
    pub fn as_(self, name: impl Into<Name>) -> WindowDefinition {
        WindowDefinition {
            name: name.into(),
            spec: self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partition_by.is_empty() && self.order_by.is_empty() && self.frame.is_none()
    }
}

/// `<name> as (<spec>)` in a WINDOW clause.
#[derive(Debug, Clone)]
pub struct WindowDefinition {
    pub name: Name,
    pub spec: WindowSpec,
}

/// Target of an OVER clause.
#[derive(Debug, Clone)]
pub enum Over {
    Spec(WindowSpec),
    /// Reference to a WINDOW clause definition
    Named(Name),
}

impl From<WindowSpec> for Over {
    fn from(spec: WindowSpec) -> Self {
        Over::Spec(spec)
    }
}

impl From<&WindowDefinition> for Over {
    fn from(definition: &WindowDefinition) -> Self {
        Over::Named(definition.name.clone())
    }
}

// =============================================================================
// Window functions
// =============================================================================

/// A window function call waiting for its OVER clause.
pub struct WindowFunction<T> {
    call: FunctionCall,
    data_type: DataType<T>,
}

impl<T> fmt::Debug for WindowFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowFunction")
            .field("call", &self.call)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> WindowFunction<T> {
    fn new(name: &str, args: Vec<Expr>, data_type: DataType<T>) -> Self {
        Self {
            call: FunctionCall {
                name: name.into(),
                args,
                kind: FunctionKind::Window,
                distinct: false,
                filter: None,
                over: None,
            },
            data_type,
        }
    }

    /// `<function>(..) over (<spec>)`.
    pub fn over(self, over: impl Into<Over>) -> Field<T> {
        let mut call = self.call;
        call.over = Some(over.into());
        Field::new(Expr::Function(Box::new(call)), self.data_type)
    }

    /// `<function>(..) over <name>`.
    pub fn over_named(self, name: impl Into<Name>) -> Field<T> {
        self.over(Over::Named(name.into()))
    }
}

fn offset_literal(offset: u32) -> Expr {
    Expr::Param(Param::inlined(offset as i64, &sql_data_type::bigint()))
}

pub fn row_number() -> WindowFunction<i64> {
    WindowFunction::new("row_number", Vec::new(), sql_data_type::bigint())
}

pub fn rank() -> WindowFunction<i64> {
    WindowFunction::new("rank", Vec::new(), sql_data_type::bigint())
}

pub fn dense_rank() -> WindowFunction<i64> {
    WindowFunction::new("dense_rank", Vec::new(), sql_data_type::bigint())
}

pub fn percent_rank() -> WindowFunction<f64> {
    WindowFunction::new("percent_rank", Vec::new(), sql_data_type::double())
}

/// `ntile(<buckets>)`.
pub fn ntile(buckets: u32) -> WindowFunction<i64> {
    WindowFunction::new("ntile", vec![offset_literal(buckets)], sql_data_type::bigint())
}

/// `lag(<field>, <offset>)`.
pub fn lag<F: IntoField>(field: F, offset: u32) -> WindowFunction<F::Type> {
    let field = field.into_field();
    let data_type = field.data_type().clone();
    WindowFunction::new(
        "lag",
        vec![field.into_expr().unaliased(), offset_literal(offset)],
        data_type,
    )
}

/// `lead(<field>, <offset>)`.
pub fn lead<F: IntoField>(field: F, offset: u32) -> WindowFunction<F::Type> {
    let field = field.into_field();
    let data_type = field.data_type().clone();
    WindowFunction::new(
        "lead",
        vec![field.into_expr().unaliased(), offset_literal(offset)],
        data_type,
    )
}

pub fn first_value<F: IntoField>(field: F) -> WindowFunction<F::Type> {
    let field = field.into_field();
    let data_type = field.data_type().clone();
    WindowFunction::new("first_value", vec![field.into_expr().unaliased()], data_type)
}

pub fn last_value<F: IntoField>(field: F) -> WindowFunction<F::Type> {
    let field = field.into_field();
    let data_type = field.data_type().clone();
    WindowFunction::new("last_value", vec![field.into_expr().unaliased()], data_type)
}
