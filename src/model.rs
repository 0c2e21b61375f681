//! Mutable statement accumulators for dynamic SQL.
//!
//! The typestate builders check clause order at compile time, which gets in
//! the way when clauses are decided at run time. The model types here
//! accumulate clauses imperatively instead and emit an ordinary immutable
//! statement. They are meant to be filled in by one thread and then
//! rendered, so they are deliberately not `Sync`.
//!
//! ```
//! use quill::model::SelectQuery;
//! use quill::prelude::*;
//!
//! let users = Table::new("users");
//! let id: Field<i32> = users.column("id");
//! let name: Field<String> = users.column("name");
//!
//! let mut query = SelectQuery::new();
//! query.add_select(&id);
//! query.add_from(&users);
//! for filter in ["a%", "b%"] {
//!     query.add_conditions(name.like(filter));
//! }
//!
//! let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
//! assert_eq!(
//!     rendered.sql(),
//!     r#"select "id" from "users" where "name" like ? and "name" like ?"#
//! );
//! # Ok::<(), quill::QuillError>(())
//! ```

use std::cell::Cell;
use std::marker::PhantomData;

use quill_core::expr::{Condition, Expr, Field, IntoField, Operand, SortField};
use quill_core::query::{Delete, Distinct, Insert, InsertSource, Select, SetOperator, Statement, Update};
use quill_core::table::{JoinConstraint, JoinKind, TableRef};

use crate::builder::{ToStatement, column_name};

type NotSync = PhantomData<Cell<()>>;

//------------------------------------------------------------------------------
// SelectQuery
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    select: Select,
    _not_sync: NotSync,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_select(&mut self, field: impl IntoField) {
        self.select.fields.push(field.into_field().into_expr());
    }

    pub fn set_distinct(&mut self, distinct: bool) {
        self.select.distinct = if distinct {
            Distinct::Distinct
        } else {
            Distinct::All
        };
    }

    pub fn add_from(&mut self, table: impl Into<TableRef>) {
        self.select.from.push(table.into());
    }

    /// Joins `table` onto the last FROM item.
    pub fn add_join(&mut self, table: impl Into<TableRef>, kind: JoinKind, on: impl Into<Condition>) {
        let table = table.into();
        let constraint = match kind {
            JoinKind::Cross => JoinConstraint::None,
            _ => JoinConstraint::On(on.into().into_expr()),
        };
        let joined = match self.select.from.pop() {
            Some(left) => left.join(kind, table, constraint),
            None => table,
        };
        self.select.from.push(joined);
    }

    /// ANDs `condition` into the WHERE clause.
    pub fn add_conditions(&mut self, condition: impl Into<Condition>) {
        self.select.where_ = std::mem::take(&mut self.select.where_).and(condition);
    }

    pub fn add_group_by(&mut self, field: impl Into<Expr>) {
        self.select.group_by.push(field.into());
    }

    /// ANDs `condition` into the HAVING clause.
    pub fn add_having(&mut self, condition: impl Into<Condition>) {
        self.select.having = std::mem::take(&mut self.select.having).and(condition);
    }

    pub fn add_order_by(&mut self, sort: impl Into<SortField>) {
        self.select.order_by.push(sort.into());
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.select.limit = Some(bigint(limit));
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.select.offset = Some(bigint(offset));
    }

    pub fn union(&mut self, other: impl Into<Select>) {
        self.select.set_ops.push((SetOperator::Union, other.into()));
    }

    pub fn union_all(&mut self, other: impl Into<Select>) {
        self.select.set_ops.push((SetOperator::UnionAll, other.into()));
    }

    pub fn query(&self) -> &Select {
        &self.select
    }

    pub fn into_select(self) -> Select {
        self.select
    }
}

fn bigint(value: u64) -> Expr {
    quill_core::expr::val(i64::try_from(value).unwrap_or(i64::MAX)).into_expr()
}

impl From<SelectQuery> for Select {
    fn from(query: SelectQuery) -> Self {
        query.select
    }
}

//------------------------------------------------------------------------------
// InsertQuery
//------------------------------------------------------------------------------

/// Accumulates one VALUES row at a time.
///
/// `add_value` fills the current row; [`new_record`](Self::new_record)
/// starts the next one. The column list is collected from the first row.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    insert: Insert,
    row: Vec<Expr>,
    rows: Vec<Vec<Expr>>,
    _not_sync: NotSync,
}

impl InsertQuery {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            insert: Insert::new(table),
            row: Vec::new(),
            rows: Vec::new(),
            _not_sync: PhantomData,
        }
    }

    pub fn add_value<T: 'static>(&mut self, column: &Field<T>, value: impl Operand<T>) {
        if self.rows.is_empty() {
            self.insert.columns.push(column_name(column));
        }
        self.row.push(column.operand(value));
    }

    pub fn new_record(&mut self) {
        if !self.row.is_empty() {
            self.rows.push(std::mem::take(&mut self.row));
        }
    }

    pub fn set_select(&mut self, query: impl Into<Select>) {
        self.insert.source = InsertSource::Select(Box::new(query.into()));
    }

    pub fn add_returning(&mut self, field: impl Into<Expr>) {
        self.insert.returning.push(field.into());
    }

    /// The statement with every row added so far.
    pub fn to_insert(&self) -> Insert {
        let mut insert = self.insert.clone();
        if matches!(insert.source, InsertSource::Values(_)) {
            let mut rows = self.rows.clone();
            if !self.row.is_empty() {
                rows.push(self.row.clone());
            }
            insert.source = InsertSource::Values(rows);
        }
        insert
    }
}

//------------------------------------------------------------------------------
// UpdateQuery
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct UpdateQuery {
    update: Update,
    _not_sync: NotSync,
}

impl UpdateQuery {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            update: Update::new(table),
            _not_sync: PhantomData,
        }
    }

    pub fn add_value<T: 'static>(&mut self, column: &Field<T>, value: impl Operand<T>) {
        let value = column.operand(value);
        self.update.set.push((column_name(column), value));
    }

    pub fn add_from(&mut self, table: impl Into<TableRef>) {
        self.update.from.push(table.into());
    }

    pub fn add_conditions(&mut self, condition: impl Into<Condition>) {
        self.update.where_ = std::mem::take(&mut self.update.where_).and(condition);
    }

    pub fn add_returning(&mut self, field: impl Into<Expr>) {
        self.update.returning.push(field.into());
    }

    pub fn query(&self) -> &Update {
        &self.update
    }
}

//------------------------------------------------------------------------------
// DeleteQuery
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DeleteQuery {
    delete: Delete,
    _not_sync: NotSync,
}

impl DeleteQuery {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            delete: Delete::new(table),
            _not_sync: PhantomData,
        }
    }

    pub fn add_using(&mut self, table: impl Into<TableRef>) {
        self.delete.using.push(table.into());
    }

    pub fn add_conditions(&mut self, condition: impl Into<Condition>) {
        self.delete.where_ = std::mem::take(&mut self.delete.where_).and(condition);
    }

    pub fn add_returning(&mut self, field: impl Into<Expr>) {
        self.delete.returning.push(field.into());
    }

    pub fn query(&self) -> &Delete {
        &self.delete
    }
}

impl ToStatement for SelectQuery {
    fn to_statement(&self) -> Statement {
        Statement::Select(self.select.clone())
    }
}

impl ToStatement for InsertQuery {
    fn to_statement(&self) -> Statement {
        Statement::Insert(self.to_insert())
    }
}

impl ToStatement for UpdateQuery {
    fn to_statement(&self) -> Statement {
        Statement::Update(self.update.clone())
    }
}

impl ToStatement for DeleteQuery {
    fn to_statement(&self) -> Statement {
        Statement::Delete(self.delete.clone())
    }
}
