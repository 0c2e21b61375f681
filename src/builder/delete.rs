use std::marker::PhantomData;

use quill_core::expr::{Condition, exists, not_exists};
use quill_core::query::{Delete, Select, Statement, With};
use quill_core::table::TableRef;

use super::{ExecutableState, SelectFields, ToStatement};

//------------------------------------------------------------------------------
// Type State Markers
//------------------------------------------------------------------------------

/// Marker for the initial state of DeleteBuilder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteInitial;

/// Marker for the state after USING clause
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteUsingSet;

/// Marker for the state after WHERE clause
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteWhereSet;

/// Marker for the state after RETURNING clause
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteReturningSet;

impl ExecutableState for DeleteInitial {}
impl ExecutableState for DeleteUsingSet {}
impl ExecutableState for DeleteWhereSet {}
impl ExecutableState for DeleteReturningSet {}

/// Builds a DELETE statement.
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
///
/// let query = delete_from(&users).where_(id.is_in([1, 2, 3]));
///
/// let rendered = DslContext::new(Dialect::SQLite).render(&query)?;
/// assert_eq!(rendered.sql(), r#"delete from "users" where "id" in (?, ?, ?)"#);
/// # Ok::<(), quill::QuillError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeleteBuilder<S = DeleteInitial> {
    pub(crate) delete: Delete,
    state: PhantomData<S>,
}

impl<S> DeleteBuilder<S> {
    #[inline]
    fn transition<N>(self) -> DeleteBuilder<N> {
        DeleteBuilder {
            delete: self.delete,
            state: PhantomData,
        }
    }

    pub fn query(&self) -> &Delete {
        &self.delete
    }
}

impl DeleteBuilder<DeleteInitial> {
    pub(crate) fn new(table: impl Into<TableRef>, with: Option<With>) -> Self {
        let mut delete = Delete::new(table);
        delete.with = with;
        DeleteBuilder {
            delete,
            state: PhantomData,
        }
    }

    /// `delete from t using u, v`.
    pub fn using<I, T>(mut self, tables: I) -> DeleteBuilder<DeleteUsingSet>
    where
        I: IntoIterator<Item = T>,
        T: Into<TableRef>,
    {
        self.delete.using.extend(tables.into_iter().map(Into::into));
        self.transition()
    }

    pub fn where_(mut self, condition: impl Into<Condition>) -> DeleteBuilder<DeleteWhereSet> {
        self.delete.where_ = condition.into();
        self.transition()
    }

    pub fn returning(mut self, fields: impl SelectFields) -> DeleteBuilder<DeleteReturningSet> {
        self.delete.returning = fields.into_fields().0;
        self.transition()
    }
}

impl DeleteBuilder<DeleteUsingSet> {
    pub fn where_(mut self, condition: impl Into<Condition>) -> DeleteBuilder<DeleteWhereSet> {
        self.delete.where_ = condition.into();
        self.transition()
    }
}

impl DeleteBuilder<DeleteWhereSet> {
    pub fn and(mut self, condition: impl Into<Condition>) -> Self {
        self.delete.where_ = std::mem::take(&mut self.delete.where_).and(condition);
        self
    }

    pub fn or(mut self, condition: impl Into<Condition>) -> Self {
        self.delete.where_ = std::mem::take(&mut self.delete.where_).or(condition);
        self
    }

    pub fn and_exists(self, query: impl Into<Select>) -> Self {
        self.and(exists(query))
    }

    pub fn and_not_exists(self, query: impl Into<Select>) -> Self {
        self.and(not_exists(query))
    }

    pub fn returning(mut self, fields: impl SelectFields) -> DeleteBuilder<DeleteReturningSet> {
        self.delete.returning = fields.into_fields().0;
        self.transition()
    }
}

impl<S: ExecutableState> DeleteBuilder<S> {
    pub fn into_delete(self) -> Delete {
        self.delete
    }
}

impl<S: ExecutableState> From<DeleteBuilder<S>> for Statement {
    fn from(builder: DeleteBuilder<S>) -> Self {
        Statement::Delete(builder.delete)
    }
}

impl<S: ExecutableState> ToStatement for DeleteBuilder<S> {
    fn to_statement(&self) -> Statement {
        Statement::Delete(self.delete.clone())
    }
}
