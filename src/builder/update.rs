use std::marker::PhantomData;

use quill_core::expr::{Condition, Field, Operand, exists};
use quill_core::query::{Select, Statement, Update, With};
use quill_core::table::TableRef;

use super::{ExecutableState, SelectFields, ToStatement, column_name};

//------------------------------------------------------------------------------
// Type State Markers
//------------------------------------------------------------------------------

/// Marker for the initial state of UpdateBuilder.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateInitial;

/// Marker for the state after SET clause
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateSetClauseSet;

/// Marker for the state after FROM clause
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateFromSet;

/// Marker for the state after WHERE clause
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateWhereSet;

/// Marker for the state after RETURNING clause
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateReturningSet;

impl ExecutableState for UpdateSetClauseSet {}
impl ExecutableState for UpdateFromSet {}
impl ExecutableState for UpdateWhereSet {}
impl ExecutableState for UpdateReturningSet {}

//------------------------------------------------------------------------------
// UpdateBuilder Definition
//------------------------------------------------------------------------------

/// Builds an UPDATE statement.
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
/// let name: Field<String> = users.column("name");
///
/// let query = update(&users)
///     .set(&name, "ada")
///     .where_(id.eq(1))
///     .returning(&id);
///
/// let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
/// assert_eq!(
///     rendered.sql(),
///     r#"update "users" set "name" = ? where "id" = ? returning "id""#
/// );
/// # Ok::<(), quill::QuillError>(())
/// ```
///
/// At least one assignment is required before the statement is complete:
///
/// ```compile_fail
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
///
/// let _ = update(&users).where_(id.eq(1));
/// ```
#[derive(Debug, Clone)]
pub struct UpdateBuilder<S = UpdateInitial> {
    pub(crate) update: Update,
    state: PhantomData<S>,
}

impl<S> UpdateBuilder<S> {
    #[inline]
    fn transition<N>(self) -> UpdateBuilder<N> {
        UpdateBuilder {
            update: self.update,
            state: PhantomData,
        }
    }

    pub fn query(&self) -> &Update {
        &self.update
    }

    fn assign<T: 'static>(&mut self, column: &Field<T>, value: impl Operand<T>) {
        let value = column.operand(value);
        self.update.set.push((column_name(column), value));
    }
}

impl UpdateBuilder<UpdateInitial> {
    pub(crate) fn new(table: impl Into<TableRef>, with: Option<With>) -> Self {
        let mut update = Update::new(table);
        update.with = with;
        UpdateBuilder {
            update,
            state: PhantomData,
        }
    }

    /// `set <column> = <value>`.
    pub fn set<T: 'static>(mut self, column: &Field<T>, value: impl Operand<T>) -> UpdateBuilder<UpdateSetClauseSet> {
        self.assign(column, value);
        self.transition()
    }
}

impl UpdateBuilder<UpdateSetClauseSet> {
    /// Another assignment.
    pub fn set<T: 'static>(mut self, column: &Field<T>, value: impl Operand<T>) -> Self {
        self.assign(column, value);
        self
    }

    /// `update t set .. from u, v`; emulated or rejected where unsupported.
    pub fn from<I, T>(mut self, tables: I) -> UpdateBuilder<UpdateFromSet>
    where
        I: IntoIterator<Item = T>,
        T: Into<TableRef>,
    {
        self.update.from.extend(tables.into_iter().map(Into::into));
        self.transition()
    }
}

impl UpdateBuilder<UpdateSetClauseSet> {
    pub fn where_(mut self, condition: impl Into<Condition>) -> UpdateBuilder<UpdateWhereSet> {
        self.update.where_ = condition.into();
        self.transition()
    }
}

impl UpdateBuilder<UpdateFromSet> {
    pub fn where_(mut self, condition: impl Into<Condition>) -> UpdateBuilder<UpdateWhereSet> {
        self.update.where_ = condition.into();
        self.transition()
    }
}

impl UpdateBuilder<UpdateWhereSet> {
    pub fn and(mut self, condition: impl Into<Condition>) -> Self {
        self.update.where_ = std::mem::take(&mut self.update.where_).and(condition);
        self
    }

    pub fn or(mut self, condition: impl Into<Condition>) -> Self {
        self.update.where_ = std::mem::take(&mut self.update.where_).or(condition);
        self
    }

    pub fn and_exists(self, query: impl Into<Select>) -> Self {
        self.and(exists(query))
    }
}

impl<S: ExecutableState> UpdateBuilder<S> {
    pub fn into_update(self) -> Update {
        self.update
    }
}

macro_rules! returning_impl {
    ($($state:ident),*) => {
        $(
            impl UpdateBuilder<$state> {
                pub fn returning(mut self, fields: impl SelectFields) -> UpdateBuilder<UpdateReturningSet> {
                    self.update.returning = fields.into_fields().0;
                    self.transition()
                }
            }
        )*
    };
}

returning_impl!(UpdateSetClauseSet, UpdateFromSet, UpdateWhereSet);

impl<S: ExecutableState> From<UpdateBuilder<S>> for Statement {
    fn from(builder: UpdateBuilder<S>) -> Self {
        Statement::Update(builder.update)
    }
}

impl<S: ExecutableState> ToStatement for UpdateBuilder<S> {
    fn to_statement(&self) -> Statement {
        Statement::Update(self.update.clone())
    }
}
