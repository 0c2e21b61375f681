use std::fmt;
use std::marker::PhantomData;

use quill_core::expr::{Condition, Field, Operand};
use quill_core::query::{ConflictAction, Insert, InsertSource, OnConflict, Statement, With};
use quill_core::table::TableRef;

use super::{
    ExecutableState, InsertColumns, InsertRow, Row, SelectBuilder, SelectFields, ToStatement,
    column_name,
};

//------------------------------------------------------------------------------
// Type State Markers
//------------------------------------------------------------------------------

/// Marker for the initial state of InsertBuilder.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertInitial;

/// Marker for the state after the column list
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertColumnsSet;

/// Marker for the state after VALUES rows; more rows may follow
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertValuesSet;

/// Marker for the state after an INSERT .. SELECT or DEFAULT VALUES source
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertSourceSet;

/// Marker for ON CONFLICT awaiting its action
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertConflictPending;

/// Marker for DO UPDATE awaiting its first assignment
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertDoUpdatePending;

/// Marker for the state after a DO UPDATE assignment
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertDoUpdateSet;

/// Marker for the state after a complete ON CONFLICT clause
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertOnConflictSet;

/// Marker for the state after RETURNING clause
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertReturningSet;

/// States with a row source, in which conflict handling may be added.
pub trait InsertHasSource {}

/// States in which RETURNING may be set.
pub trait InsertReturnable {}

impl InsertHasSource for InsertValuesSet {}
impl InsertHasSource for InsertSourceSet {}

impl InsertReturnable for InsertValuesSet {}
impl InsertReturnable for InsertSourceSet {}
impl InsertReturnable for InsertDoUpdateSet {}
impl InsertReturnable for InsertOnConflictSet {}

impl ExecutableState for InsertValuesSet {}
impl ExecutableState for InsertSourceSet {}
impl ExecutableState for InsertDoUpdateSet {}
impl ExecutableState for InsertOnConflictSet {}
impl ExecutableState for InsertReturningSet {}

//------------------------------------------------------------------------------
// InsertBuilder Definition
//------------------------------------------------------------------------------

/// Builds an INSERT statement.
///
/// `C` is the phantom row type of the column list; every VALUES row must
/// supply operands of exactly those types:
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
/// let name: Field<String> = users.column("name");
///
/// let query = insert_into(&users)
///     .columns((&id, &name))
///     .values((1, "ada"))
///     .values((2, "grace"))
///     .on_conflict(&id)
///     .do_update()
///     .set(&name, excluded(&name));
///
/// let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
/// assert_eq!(
///     rendered.sql(),
///     r#"insert into "users" ("id", "name") values (?, ?), (?, ?) on conflict ("id") do update set "name" = excluded."name""#
/// );
/// # Ok::<(), quill::QuillError>(())
/// ```
///
/// A row of the wrong shape is rejected at compile time:
///
/// ```compile_fail
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
/// let name: Field<String> = users.column("name");
///
/// let _ = insert_into(&users).columns((&id, &name)).values(("ada", 1));
/// ```
pub struct InsertBuilder<C: Row, S = InsertInitial> {
    pub(crate) insert: Insert,
    types: C::Types,
    state: PhantomData<S>,
}

impl<C: Row, S> Clone for InsertBuilder<C, S> {
    fn clone(&self) -> Self {
        Self {
            insert: self.insert.clone(),
            types: self.types.clone(),
            state: PhantomData,
        }
    }
}

impl<C: Row, S> fmt::Debug for InsertBuilder<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertBuilder")
            .field("insert", &self.insert)
            .finish()
    }
}

impl<C: Row, S> InsertBuilder<C, S> {
    #[inline]
    fn transition<N>(self) -> InsertBuilder<C, N> {
        InsertBuilder {
            insert: self.insert,
            types: self.types,
            state: PhantomData,
        }
    }

    pub fn query(&self) -> &Insert {
        &self.insert
    }

    fn conflict_assignments(&mut self) -> Option<&mut Vec<quill_core::query::Assignment>> {
        match &mut self.insert.on_conflict {
            Some(OnConflict {
                action: ConflictAction::DoUpdate { set, .. },
                ..
            }) => Some(set),
            _ => None,
        }
    }
}

impl InsertBuilder<(), InsertInitial> {
    pub(crate) fn new(table: impl Into<TableRef>, with: Option<With>) -> Self {
        let mut insert = Insert::new(table);
        insert.with = with;
        InsertBuilder {
            insert,
            types: (),
            state: PhantomData,
        }
    }

    /// Sets the target columns; their types fix the shape of every row.
    pub fn columns<F: InsertColumns>(mut self, columns: F) -> InsertBuilder<F::Row, InsertColumnsSet> {
        let (columns, types) = columns.into_columns();
        self.insert.columns = columns;
        InsertBuilder {
            insert: self.insert,
            types,
            state: PhantomData,
        }
    }

    /// `insert into t default values`.
    pub fn default_values(mut self) -> InsertBuilder<(), InsertSourceSet> {
        self.insert.source = InsertSource::DefaultValues;
        self.transition()
    }
}

impl<C: Row> InsertBuilder<C, InsertColumnsSet> {
    /// Adds the first VALUES row.
    pub fn values<V: InsertRow<C::Types>>(mut self, row: V) -> InsertBuilder<C, InsertValuesSet> {
        self.insert.source = InsertSource::Values(vec![row.into_row(&self.types)]);
        self.transition()
    }

    /// Adds every row of `rows`. An empty iterator renders DEFAULT VALUES.
    pub fn values_all<I, V>(mut self, rows: I) -> InsertBuilder<C, InsertValuesSet>
    where
        I: IntoIterator<Item = V>,
        V: InsertRow<C::Types>,
    {
        let rows = rows.into_iter().map(|row| row.into_row(&self.types)).collect();
        self.insert.source = InsertSource::Values(rows);
        self.transition()
    }

    /// `insert into t (..) select ..` with a projection of the same row type.
    pub fn select<S: ExecutableState>(mut self, query: SelectBuilder<C, S>) -> InsertBuilder<C, InsertSourceSet> {
        self.insert.source = InsertSource::Select(Box::new(query.select));
        self.transition()
    }
}

impl<C: Row> InsertBuilder<C, InsertValuesSet> {
    /// Appends another VALUES row.
    pub fn values<V: InsertRow<C::Types>>(mut self, row: V) -> Self {
        let row = row.into_row(&self.types);
        if let InsertSource::Values(rows) = &mut self.insert.source {
            rows.push(row);
        }
        self
    }
}

//------------------------------------------------------------------------------
// Conflict handling
//------------------------------------------------------------------------------

impl<C: Row, S: InsertHasSource> InsertBuilder<C, S> {
    /// `on conflict (<target>)`.
    pub fn on_conflict(mut self, target: impl InsertColumns) -> InsertBuilder<C, InsertConflictPending> {
        self.insert.on_conflict = Some(OnConflict {
            target: target.into_columns().0,
            action: ConflictAction::DoNothing,
        });
        self.transition()
    }

    /// `on conflict do nothing` without a conflict target, `insert ignore` on MySQL.
    pub fn on_conflict_do_nothing(mut self) -> InsertBuilder<C, InsertOnConflictSet> {
        self.insert.on_conflict = Some(OnConflict {
            target: Vec::new(),
            action: ConflictAction::DoNothing,
        });
        self.transition()
    }

    /// MySQL's `on duplicate key update`; other dialects need a conflict
    /// target, so prefer [`on_conflict`](Self::on_conflict) there.
    pub fn on_duplicate_key_update(mut self) -> InsertBuilder<C, InsertDoUpdatePending> {
        self.insert.on_conflict = Some(OnConflict {
            target: Vec::new(),
            action: ConflictAction::DoUpdate {
                set: Vec::new(),
                where_: Condition::none(),
            },
        });
        self.transition()
    }
}

impl<C: Row> InsertBuilder<C, InsertConflictPending> {
    pub fn do_nothing(self) -> InsertBuilder<C, InsertOnConflictSet> {
        self.transition()
    }

    pub fn do_update(mut self) -> InsertBuilder<C, InsertDoUpdatePending> {
        if let Some(on_conflict) = &mut self.insert.on_conflict {
            on_conflict.action = ConflictAction::DoUpdate {
                set: Vec::new(),
                where_: Condition::none(),
            };
        }
        self.transition()
    }
}

impl<C: Row> InsertBuilder<C, InsertDoUpdatePending> {
    pub fn set<T: 'static>(mut self, column: &Field<T>, value: impl Operand<T>) -> InsertBuilder<C, InsertDoUpdateSet> {
        let value = column.operand(value);
        if let Some(set) = self.conflict_assignments() {
            set.push((column_name(column), value));
        }
        self.transition()
    }
}

impl<C: Row> InsertBuilder<C, InsertDoUpdateSet> {
    pub fn set<T: 'static>(mut self, column: &Field<T>, value: impl Operand<T>) -> Self {
        let value = column.operand(value);
        if let Some(set) = self.conflict_assignments() {
            set.push((column_name(column), value));
        }
        self
    }

    /// Only update conflicting rows matching `condition`.
    pub fn where_(mut self, condition: impl Into<Condition>) -> InsertBuilder<C, InsertOnConflictSet> {
        if let Some(OnConflict {
            action: ConflictAction::DoUpdate { where_, .. },
            ..
        }) = &mut self.insert.on_conflict
        {
            *where_ = condition.into();
        }
        self.transition()
    }
}

impl<C: Row, S: InsertReturnable> InsertBuilder<C, S> {
    pub fn returning(mut self, fields: impl SelectFields) -> InsertBuilder<C, InsertReturningSet> {
        self.insert.returning = fields.into_fields().0;
        self.transition()
    }
}

impl<C: Row, S: ExecutableState> InsertBuilder<C, S> {
    pub fn into_insert(self) -> Insert {
        self.insert
    }
}

impl<C: Row, S: ExecutableState> From<InsertBuilder<C, S>> for Statement {
    fn from(builder: InsertBuilder<C, S>) -> Self {
        Statement::Insert(builder.insert)
    }
}

impl<C: Row, S: ExecutableState> ToStatement for InsertBuilder<C, S> {
    fn to_statement(&self) -> Statement {
        Statement::Insert(self.insert.clone())
    }
}
