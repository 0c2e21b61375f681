use quill_core::name::Name;
use quill_core::query::{Cte, Select, With};
use quill_core::table::{Table, TableRef};

use super::{DeleteBuilder, InsertBuilder, SelectBuilder, SelectFields, SelectInitial, UpdateBuilder};

/// Names a common table expression: `cte("t").columns(["a"]).as_(query)`.
#[derive(Debug, Clone)]
pub struct CteBuilder {
    name: Name,
    columns: Vec<Name>,
}

impl CteBuilder {
    pub(crate) fn new(name: impl Into<Name>) -> Self {
        CteBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Explicit column names of the CTE.
    pub fn columns<I, N>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches the defining query.
    pub fn as_(&self, query: impl Into<Select>) -> Cte {
        Cte::new(self.name.clone(), query.into()).with_columns(self.columns.clone())
    }

    /// A table reference to the CTE, for use in the main query.
    pub fn table(&self) -> Table {
        Table::new(self.name.clone())
    }
}

/// A `with` clause awaiting its main statement.
///
/// ```
/// use quill::prelude::*;
///
/// let orders = Table::new("orders");
/// let total: Field<i32> = orders.column("total");
///
/// let big = cte("big");
/// let big_total: Field<i32> = big.table().column("total");
/// let query = with([big.as_(select(&total).from(&orders).where_(total.gt(100)))])
///     .select(&big_total)
///     .from(big.table());
///
/// let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
/// assert_eq!(
///     rendered.sql(),
///     r#"with "big" as (select "total" from "orders" where "total" > ?) select "total" from "big""#
/// );
/// # Ok::<(), quill::QuillError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WithBuilder {
    with: With,
}

impl WithBuilder {
    pub(crate) fn new<I>(ctes: I, recursive: bool) -> Self
    where
        I: IntoIterator<Item = Cte>,
    {
        WithBuilder {
            with: With {
                recursive,
                ctes: ctes.into_iter().collect(),
            },
        }
    }

    /// Adds another CTE.
    pub fn with(mut self, cte: Cte) -> Self {
        self.with.ctes.push(cte);
        self
    }

    pub fn select<F: SelectFields>(self, fields: F) -> SelectBuilder<F::Row, SelectInitial> {
        SelectBuilder::new(fields, Some(self.with))
    }

    pub fn select_distinct<F: SelectFields>(self, fields: F) -> SelectBuilder<F::Row, SelectInitial> {
        self.select(fields).distinct()
    }

    pub fn insert_into(self, table: impl Into<TableRef>) -> InsertBuilder<()> {
        InsertBuilder::new(table, Some(self.with))
    }

    pub fn update(self, table: impl Into<TableRef>) -> UpdateBuilder {
        UpdateBuilder::new(table, Some(self.with))
    }

    pub fn delete_from(self, table: impl Into<TableRef>) -> DeleteBuilder {
        DeleteBuilder::new(table, Some(self.with))
    }
}
