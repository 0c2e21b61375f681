//! Statement entry points.
//!
//! Each function starts a typestate builder. Expression helpers from
//! [`quill_core::expr`] are re-exported here so that `use quill::dsl::*`
//! brings the whole query language into scope.

use quill_core::name::{Name, QualifiedName};
use quill_core::query::Cte;
use quill_core::table::TableRef;

use crate::builder::{
    CallBuilder, CteBuilder, DeleteBuilder, InsertBuilder, MergeBuilder, SelectBuilder,
    SelectFields, SelectInitial, UpdateBuilder, WithBuilder,
};

pub use quill_core::expr::{
    abs, all, and_all, any, array, avg, case, case_when, coalesce, count, count_distinct,
    count_star, default_value, dense_rank, excluded, exists, field, first_value, function, inline,
    lag, last_value, lead, length, lower, max, min, not_exists, ntile, nullif, or_all, param,
    percent_rank, placeholder, rank, replace, round, row_number, sql, sql_condition, sql_with,
    substring, sum, trim, upper, val, window,
};

/// `select <fields>`; `()` selects every column.
pub fn select<F: SelectFields>(fields: F) -> SelectBuilder<F::Row, SelectInitial> {
    SelectBuilder::new(fields, None)
}

/// `select distinct <fields>`.
pub fn select_distinct<F: SelectFields>(fields: F) -> SelectBuilder<F::Row, SelectInitial> {
    select(fields).distinct()
}

pub fn insert_into(table: impl Into<TableRef>) -> InsertBuilder<()> {
    InsertBuilder::new(table, None)
}

pub fn update(table: impl Into<TableRef>) -> UpdateBuilder {
    UpdateBuilder::new(table, None)
}

pub fn delete_from(table: impl Into<TableRef>) -> DeleteBuilder {
    DeleteBuilder::new(table, None)
}

pub fn merge_into(table: impl Into<TableRef>) -> MergeBuilder {
    MergeBuilder::new(table)
}

/// Call a stored procedure; a dotted name is split into schema parts.
pub fn call(procedure: &str) -> CallBuilder {
    CallBuilder::new(QualifiedName::from(procedure))
}

/// Starts a common table expression definition.
pub fn cte(name: impl Into<Name>) -> CteBuilder {
    CteBuilder::new(name)
}

/// `with <ctes> ..`.
pub fn with<I: IntoIterator<Item = Cte>>(ctes: I) -> WithBuilder {
    WithBuilder::new(ctes, false)
}

/// `with recursive <ctes> ..`; the keyword is omitted where the dialect
/// does not use it.
pub fn with_recursive<I: IntoIterator<Item = Cte>>(ctes: I) -> WithBuilder {
    WithBuilder::new(ctes, true)
}
