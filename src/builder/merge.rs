use std::marker::PhantomData;

use quill_core::expr::{Condition, Field, Operand};
use quill_core::query::{Merge, MergeClause, Statement};
use quill_core::table::TableRef;

use super::{ExecutableState, InsertColumns, InsertRow, ToStatement, column_name};

//------------------------------------------------------------------------------
// Type State Markers
//------------------------------------------------------------------------------

/// Marker for the initial state of MergeBuilder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeInitial;

/// Marker for the state after USING clause
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeUsingSet;

/// Marker for the state after ON clause
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOnSet;

/// Marker for WHEN MATCHED THEN UPDATE awaiting its first assignment
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeUpdatePending;

/// Marker for the state after an update assignment
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeUpdateSet;

/// Marker for the state after a complete WHEN clause
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeClauseSet;

/// States in which another WHEN clause may start.
pub trait MergeAcceptsClause {}

impl MergeAcceptsClause for MergeOnSet {}
impl MergeAcceptsClause for MergeUpdateSet {}
impl MergeAcceptsClause for MergeClauseSet {}

impl ExecutableState for MergeUpdateSet {}
impl ExecutableState for MergeClauseSet {}

/// Builds a MERGE statement.
///
/// Dialects without MERGE but with an upsert render the common
/// single-source shape as `insert .. on conflict` or
/// `on duplicate key update`:
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let staged = Table::new("staged");
/// let id: Field<i32> = users.column("id");
/// let name: Field<String> = users.column("name");
/// let new_id: Field<i32> = staged.qualified("id");
/// let new_name: Field<String> = staged.qualified("name");
///
/// let query = merge_into(&users)
///     .using(&staged)
///     .on(users.qualified::<i32>("id").eq(&new_id))
///     .when_matched_then_update()
///     .set(&name, &new_name)
///     .when_not_matched_then_insert((&id, &name), (&new_id, &new_name));
///
/// let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
/// assert!(rendered.sql().starts_with(r#"merge into "users" using "staged" on"#));
/// # Ok::<(), quill::QuillError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MergeBuilder<S = MergeInitial> {
    pub(crate) merge: Merge,
    state: PhantomData<S>,
}

impl<S> MergeBuilder<S> {
    #[inline]
    fn transition<N>(self) -> MergeBuilder<N> {
        MergeBuilder {
            merge: self.merge,
            state: PhantomData,
        }
    }

    pub fn query(&self) -> &Merge {
        &self.merge
    }

    fn assign<T: 'static>(&mut self, column: &Field<T>, value: impl Operand<T>) {
        let value = column.operand(value);
        if let Some(MergeClause::MatchedUpdate { set, .. }) = self.merge.clauses.last_mut() {
            set.push((column_name(column), value));
        }
    }
}

impl MergeBuilder<MergeInitial> {
    pub(crate) fn new(table: impl Into<TableRef>) -> Self {
        let table = table.into();
        // the source is replaced by `using`
        MergeBuilder {
            merge: Merge::new(table.clone(), table),
            state: PhantomData,
        }
    }

    pub fn using(mut self, source: impl Into<TableRef>) -> MergeBuilder<MergeUsingSet> {
        self.merge.using = source.into();
        self.transition()
    }
}

impl MergeBuilder<MergeUsingSet> {
    pub fn on(mut self, condition: impl Into<Condition>) -> MergeBuilder<MergeOnSet> {
        self.merge.on = condition.into();
        self.transition()
    }
}

impl<S: MergeAcceptsClause> MergeBuilder<S> {
    pub fn when_matched_then_update(mut self) -> MergeBuilder<MergeUpdatePending> {
        self.merge.clauses.push(MergeClause::MatchedUpdate {
            set: Vec::new(),
            where_: Condition::none(),
        });
        self.transition()
    }

    pub fn when_matched_then_delete(mut self) -> MergeBuilder<MergeClauseSet> {
        self.merge.clauses.push(MergeClause::MatchedDelete {
            where_: Condition::none(),
        });
        self.transition()
    }

    /// `when not matched then insert (<columns>) values (<row>)`.
    pub fn when_not_matched_then_insert<C, V>(mut self, columns: C, row: V) -> MergeBuilder<MergeClauseSet>
    where
        C: InsertColumns,
        V: InsertRow<<C::Row as super::Row>::Types>,
    {
        let (columns, types) = columns.into_columns();
        self.merge.clauses.push(MergeClause::NotMatchedInsert {
            columns,
            values: row.into_row(&types),
            where_: Condition::none(),
        });
        self.transition()
    }
}

impl MergeBuilder<MergeUpdatePending> {
    pub fn set<T: 'static>(mut self, column: &Field<T>, value: impl Operand<T>) -> MergeBuilder<MergeUpdateSet> {
        self.assign(column, value);
        self.transition()
    }
}

impl MergeBuilder<MergeUpdateSet> {
    pub fn set<T: 'static>(mut self, column: &Field<T>, value: impl Operand<T>) -> Self {
        self.assign(column, value);
        self
    }

    /// Restricts the update to matches satisfying `condition`.
    pub fn where_(mut self, condition: impl Into<Condition>) -> Self {
        set_clause_condition(&mut self.merge, condition.into());
        self
    }
}

impl MergeBuilder<MergeClauseSet> {
    /// Restricts the last WHEN clause to rows satisfying `condition`.
    pub fn where_(mut self, condition: impl Into<Condition>) -> Self {
        set_clause_condition(&mut self.merge, condition.into());
        self
    }
}

fn set_clause_condition(merge: &mut Merge, condition: Condition) {
    let where_ = match merge.clauses.last_mut() {
        Some(MergeClause::MatchedUpdate { where_, .. })
        | Some(MergeClause::MatchedDelete { where_ })
        | Some(MergeClause::NotMatchedInsert { where_, .. }) => where_,
        None => return,
    };
    *where_ = condition;
}

impl<S: ExecutableState> MergeBuilder<S> {
    pub fn into_merge(self) -> Merge {
        self.merge
    }
}

impl<S: ExecutableState> From<MergeBuilder<S>> for Statement {
    fn from(builder: MergeBuilder<S>) -> Self {
        Statement::Merge(builder.merge)
    }
}

impl<S: ExecutableState> ToStatement for MergeBuilder<S> {
    fn to_statement(&self) -> Statement {
        Statement::Merge(self.merge.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::merge_into;
    use quill_core::table::Table;

    #[test]
    fn test_conditions_attach_to_last_clause() {
        let users = Table::new("users");
        let staged = Table::new("staged");
        let id: Field<i32> = users.column("id");
        let src: Field<i32> = staged.column("id");

        let builder = merge_into(&users)
            .using(&staged)
            .on(id.eq(&src))
            .when_matched_then_delete()
            .where_(src.lt(0))
            .when_not_matched_then_insert(&id, (&src,));

        let clauses = &builder.query().clauses;
        assert_eq!(clauses.len(), 2);
        let MergeClause::MatchedDelete { where_ } = &clauses[0] else {
            panic!("expected delete");
        };
        assert!(!where_.is_none());
        let MergeClause::NotMatchedInsert { where_, values, .. } = &clauses[1] else {
            panic!("expected insert");
        };
        assert!(where_.is_none());
        assert_eq!(values.len(), 1);
    }
}
