use std::fmt;
use std::marker::PhantomData;

use paste::paste;
use quill_core::expr::{Condition, ScalarSubquery, WindowDefinition, exists, not_exists, val};
use quill_core::name::Name;
use quill_core::query::{Distinct, Lock, LockMode, LockWait, Select, SetOperator, Statement, With};
use quill_core::table::{DerivedTable, JoinConstraint, JoinKind, TableRef};

use super::{ExecutableState, InsertColumns, Row, SelectFields, SortFields, ToStatement};

//------------------------------------------------------------------------------
// Type State Markers
//------------------------------------------------------------------------------

/// Marker for the initial state of SelectBuilder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectInitial;

/// Marker for the state after FROM clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectFromSet;

/// Marker for a join that still needs its ON or USING constraint
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectJoinPending;

/// Marker for the state after a constrained JOIN
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectJoinSet;

/// Marker for the state after WHERE clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectWhereSet;

/// Marker for the state after GROUP BY clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectGroupSet;

/// Marker for the state after HAVING clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectHavingSet;

/// Marker for the state after WINDOW clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectWindowSet;

/// Marker for the state after set operations (UNION/INTERSECT/EXCEPT)
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectSetOpSet;

/// Marker for the state after ORDER BY clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectOrderSet;

/// Marker for the state after LIMIT clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectLimitSet;

/// Marker for the state after OFFSET clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectOffsetSet;

/// Marker for the state after FOR UPDATE / FOR SHARE
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectLockSet;

/// States after FROM in which another table can be joined.
pub trait Joinable {}

/// States in which WHERE may still be set.
pub trait BeforeWhere {}

/// States in which GROUP BY may still be set.
pub trait BeforeGroupBy {}

/// States in which WINDOW may still be set.
pub trait BeforeWindow {}

/// States in which set operations and ORDER BY may still be added.
pub trait BeforeOrderBy {}

/// States in which LIMIT may still be set.
pub trait BeforeLimit {}

/// States in which OFFSET may still be set.
pub trait BeforeOffset {}

/// States in which a locking clause may still be set.
pub trait Lockable {}

macro_rules! states {
    ($marker:ident: $($state:ident),*) => {
        $(impl $marker for $state {})*
    };
}

states!(Joinable: SelectFromSet, SelectJoinSet);
states!(BeforeWhere: SelectInitial, SelectFromSet, SelectJoinSet);
states!(BeforeGroupBy: SelectInitial, SelectFromSet, SelectJoinSet, SelectWhereSet);
states!(
    BeforeWindow: SelectInitial,
    SelectFromSet,
    SelectJoinSet,
    SelectWhereSet,
    SelectGroupSet,
    SelectHavingSet
);
states!(
    BeforeOrderBy: SelectInitial,
    SelectFromSet,
    SelectJoinSet,
    SelectWhereSet,
    SelectGroupSet,
    SelectHavingSet,
    SelectWindowSet,
    SelectSetOpSet
);
states!(
    BeforeLimit: SelectInitial,
    SelectFromSet,
    SelectJoinSet,
    SelectWhereSet,
    SelectGroupSet,
    SelectHavingSet,
    SelectWindowSet,
    SelectSetOpSet,
    SelectOrderSet
);
states!(
    BeforeOffset: SelectInitial,
    SelectFromSet,
    SelectJoinSet,
    SelectWhereSet,
    SelectGroupSet,
    SelectHavingSet,
    SelectWindowSet,
    SelectSetOpSet,
    SelectOrderSet,
    SelectLimitSet
);
states!(
    Lockable: SelectInitial,
    SelectFromSet,
    SelectJoinSet,
    SelectWhereSet,
    SelectGroupSet,
    SelectHavingSet,
    SelectWindowSet,
    SelectSetOpSet,
    SelectOrderSet,
    SelectLimitSet,
    SelectOffsetSet
);
states!(
    ExecutableState: SelectInitial,
    SelectFromSet,
    SelectJoinSet,
    SelectWhereSet,
    SelectGroupSet,
    SelectHavingSet,
    SelectWindowSet,
    SelectSetOpSet,
    SelectOrderSet,
    SelectLimitSet,
    SelectOffsetSet,
    SelectLockSet
);

//------------------------------------------------------------------------------
// SelectBuilder Definition
//------------------------------------------------------------------------------

/// Builds a SELECT statement.
///
/// `R` is the phantom row type of the projection, `S` the current clause
/// state. Each clause method consumes the builder and returns it in the
/// next state:
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
/// let name: Field<String> = users.column("name");
///
/// let query = select((&id, &name))
///     .from(&users)
///     .where_(id.gt(10))
///     .order_by(name.asc())
///     .limit(5);
///
/// let ctx = DslContext::new(Dialect::PostgreSQL);
/// let rendered = ctx.render(&query)?;
/// assert_eq!(
///     rendered.sql(),
///     r#"select "id", "name" from "users" where "id" > ? order by "name" asc limit ?"#
/// );
/// assert_eq!(rendered.binds().len(), 2);
/// # Ok::<(), quill::QuillError>(())
/// ```
///
/// A single-column select converts into a scalar subquery operand of the
/// same type:
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let orders = Table::new("orders");
/// let id: Field<i32> = users.column("id");
/// let user_id: Field<i32> = orders.column("user_id");
///
/// let buyers = select(&user_id).from(&orders);
/// let query = select(&id).from(&users).where_(id.is_in_select(buyers));
///
/// let rendered = DslContext::new(Dialect::PostgreSQL).render(&query)?;
/// assert_eq!(
///     rendered.sql(),
///     r#"select "id" from "users" where "id" in (select "user_id" from "orders")"#
/// );
/// # Ok::<(), quill::QuillError>(())
/// ```
pub struct SelectBuilder<R: Row, S = SelectInitial> {
    pub(crate) select: Select,
    pub(crate) types: R::Types,
    state: PhantomData<S>,
}

impl<R: Row, S> Clone for SelectBuilder<R, S> {
    fn clone(&self) -> Self {
        Self {
            select: self.select.clone(),
            types: self.types.clone(),
            state: PhantomData,
        }
    }
}

impl<R: Row, S> fmt::Debug for SelectBuilder<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectBuilder")
            .field("select", &self.select)
            .field("types", &self.types)
            .finish()
    }
}

impl<R: Row, S> SelectBuilder<R, S> {
    #[inline]
    fn transition<N>(self) -> SelectBuilder<R, N> {
        SelectBuilder {
            select: self.select,
            types: self.types,
            state: PhantomData,
        }
    }

    /// The statement built so far.
    pub fn query(&self) -> &Select {
        &self.select
    }

    /// Column data types of the projection.
    pub fn types(&self) -> &R::Types {
        &self.types
    }
}

impl<R: Row> SelectBuilder<R, SelectInitial> {
    pub(crate) fn new<F: SelectFields<Row = R>>(fields: F, with: Option<With>) -> Self {
        let (fields, types) = fields.into_fields();
        SelectBuilder {
            select: Select {
                with,
                fields,
                ..Select::default()
            },
            types,
            state: PhantomData,
        }
    }

    /// `select distinct`.
    pub fn distinct(mut self) -> Self {
        self.select.distinct = Distinct::Distinct;
        self
    }

    /// `select distinct on (..)`.
    pub fn distinct_on(mut self, on: impl SelectFields) -> Self {
        self.select.distinct = Distinct::On(on.into_fields().0);
        self
    }

    /// Sets the FROM table.
    pub fn from(mut self, table: impl Into<TableRef>) -> SelectBuilder<R, SelectFromSet> {
        self.select.from.push(table.into());
        self.transition()
    }
}

//------------------------------------------------------------------------------
// Joins
//------------------------------------------------------------------------------

#[doc(hidden)]
macro_rules! join_impl {
    ($($type:ident => $kind:ident),*) => {
        paste! {
            $(
                #[doc = concat!("`", stringify!($type), " join`; constrain it with [`on`](SelectBuilder::on) or [`using`](SelectBuilder::using).")]
                pub fn [<$type _join>](
                    self,
                    table: impl Into<TableRef>,
                ) -> SelectBuilder<R, SelectJoinPending> {
                    self.push_join(JoinKind::$kind, table.into(), JoinConstraint::None)
                        .transition()
                }
            )*
        }
    };
}

impl<R: Row, S: Joinable> SelectBuilder<R, S> {
    join_impl!(inner => Inner, left => Left, right => Right, full => Full);

    /// Alias for [`inner_join`](Self::inner_join).
    pub fn join(self, table: impl Into<TableRef>) -> SelectBuilder<R, SelectJoinPending> {
        self.inner_join(table)
    }

    /// `cross join`, which takes no constraint.
    pub fn cross_join(self, table: impl Into<TableRef>) -> SelectBuilder<R, SelectJoinSet> {
        self.push_join(JoinKind::Cross, table.into(), JoinConstraint::None)
            .transition()
    }

    fn push_join(mut self, kind: JoinKind, table: TableRef, constraint: JoinConstraint) -> Self {
        let joined = match self.select.from.pop() {
            Some(left) => left.join(kind, table, constraint),
            None => table,
        };
        self.select.from.push(joined);
        self
    }
}

impl<R: Row> SelectBuilder<R, SelectJoinPending> {
    /// `.. on <condition>`.
    pub fn on(self, condition: impl Into<Condition>) -> SelectBuilder<R, SelectJoinSet> {
        self.constrain(JoinConstraint::On(condition.into().into_expr()))
    }

    /// `.. using (<columns>)`.
    pub fn using(self, columns: impl InsertColumns) -> SelectBuilder<R, SelectJoinSet> {
        self.constrain(JoinConstraint::Using(columns.into_columns().0))
    }

    fn constrain(mut self, constraint: JoinConstraint) -> SelectBuilder<R, SelectJoinSet> {
        if let Some(TableRef::Join(join)) = self.select.from.last_mut() {
            join.constraint = constraint;
        }
        self.transition()
    }
}

//------------------------------------------------------------------------------
// Filtering and grouping
//------------------------------------------------------------------------------

impl<R: Row, S: BeforeWhere> SelectBuilder<R, S> {
    /// Sets the WHERE condition.
    pub fn where_(mut self, condition: impl Into<Condition>) -> SelectBuilder<R, SelectWhereSet> {
        self.select.where_ = condition.into();
        self.transition()
    }
}

impl<R: Row> SelectBuilder<R, SelectWhereSet> {
    pub fn and(mut self, condition: impl Into<Condition>) -> Self {
        self.select.where_ = std::mem::take(&mut self.select.where_).and(condition);
        self
    }

    pub fn or(mut self, condition: impl Into<Condition>) -> Self {
        self.select.where_ = std::mem::take(&mut self.select.where_).or(condition);
        self
    }

    pub fn and_not(mut self, condition: impl Into<Condition>) -> Self {
        self.select.where_ = std::mem::take(&mut self.select.where_).and_not(condition);
        self
    }

    pub fn and_exists(self, query: impl Into<Select>) -> Self {
        self.and(exists(query))
    }

    pub fn and_not_exists(self, query: impl Into<Select>) -> Self {
        self.and(not_exists(query))
    }
}

impl<R: Row, S: BeforeGroupBy> SelectBuilder<R, S> {
    pub fn group_by(mut self, fields: impl SelectFields) -> SelectBuilder<R, SelectGroupSet> {
        self.select.group_by = fields.into_fields().0;
        self.transition()
    }
}

impl<R: Row> SelectBuilder<R, SelectGroupSet> {
    pub fn having(mut self, condition: impl Into<Condition>) -> SelectBuilder<R, SelectHavingSet> {
        self.select.having = condition.into();
        self.transition()
    }
}

impl<R: Row, S: BeforeWindow> SelectBuilder<R, S> {
    /// Named window definitions referenced by `over_named`.
    pub fn window<I>(mut self, windows: I) -> SelectBuilder<R, SelectWindowSet>
    where
        I: IntoIterator<Item = WindowDefinition>,
    {
        self.select.windows.extend(windows);
        self.transition()
    }
}

//------------------------------------------------------------------------------
// Set operations and ordering
//------------------------------------------------------------------------------

impl<R: Row, S: BeforeOrderBy> SelectBuilder<R, S> {
    fn set_op<S2: ExecutableState>(
        mut self,
        operator: SetOperator,
        other: SelectBuilder<R, S2>,
    ) -> SelectBuilder<R, SelectSetOpSet> {
        self.select.set_ops.push((operator, other.select));
        self.transition()
    }

    pub fn union<S2: ExecutableState>(self, other: SelectBuilder<R, S2>) -> SelectBuilder<R, SelectSetOpSet> {
        self.set_op(SetOperator::Union, other)
    }

    pub fn union_all<S2: ExecutableState>(self, other: SelectBuilder<R, S2>) -> SelectBuilder<R, SelectSetOpSet> {
        self.set_op(SetOperator::UnionAll, other)
    }

    pub fn intersect<S2: ExecutableState>(self, other: SelectBuilder<R, S2>) -> SelectBuilder<R, SelectSetOpSet> {
        self.set_op(SetOperator::Intersect, other)
    }

    /// `except`, rendered as `minus` on Oracle.
    pub fn except<S2: ExecutableState>(self, other: SelectBuilder<R, S2>) -> SelectBuilder<R, SelectSetOpSet> {
        self.set_op(SetOperator::Except, other)
    }

    pub fn order_by(mut self, sorts: impl SortFields) -> SelectBuilder<R, SelectOrderSet> {
        self.select.order_by = sorts.into_sort_fields();
        self.transition()
    }
}

impl<R: Row, S: BeforeLimit> SelectBuilder<R, S> {
    pub fn limit(mut self, limit: u64) -> SelectBuilder<R, SelectLimitSet> {
        self.select.limit = Some(val(i64::try_from(limit).unwrap_or(i64::MAX)).into_expr());
        self.transition()
    }
}

impl<R: Row, S: BeforeOffset> SelectBuilder<R, S> {
    pub fn offset(mut self, offset: u64) -> SelectBuilder<R, SelectOffsetSet> {
        self.select.offset = Some(val(i64::try_from(offset).unwrap_or(i64::MAX)).into_expr());
        self.transition()
    }
}

impl<R: Row, S: Lockable> SelectBuilder<R, S> {
    fn lock(mut self, mode: LockMode) -> SelectBuilder<R, SelectLockSet> {
        self.select.lock = Some(Lock {
            mode,
            wait: LockWait::Wait,
        });
        self.transition()
    }

    pub fn for_update(self) -> SelectBuilder<R, SelectLockSet> {
        self.lock(LockMode::Update)
    }

    pub fn for_share(self) -> SelectBuilder<R, SelectLockSet> {
        self.lock(LockMode::Share)
    }
}

impl<R: Row> SelectBuilder<R, SelectLockSet> {
    fn wait(mut self, wait: LockWait) -> Self {
        if let Some(lock) = &mut self.select.lock {
            lock.wait = wait;
        }
        self
    }

    pub fn nowait(self) -> Self {
        self.wait(LockWait::NoWait)
    }

    pub fn skip_locked(self) -> Self {
        self.wait(LockWait::SkipLocked)
    }
}

//------------------------------------------------------------------------------
// Finished selects
//------------------------------------------------------------------------------

impl<R: Row, S: ExecutableState> SelectBuilder<R, S> {
    /// Use the select as a derived table.
    pub fn as_table(self, alias: impl Into<Name>) -> DerivedTable {
        self.select.as_table(alias)
    }

    pub fn into_select(self) -> Select {
        self.select
    }
}

impl<T: 'static, S: ExecutableState> SelectBuilder<(T,), S> {
    /// Use a single-column select as a scalar subquery operand.
    pub fn as_scalar(self) -> ScalarSubquery<T> {
        let (data_type,) = self.types;
        ScalarSubquery::new(self.select, data_type)
    }
}

impl<T: 'static, S: ExecutableState> From<SelectBuilder<(T,), S>> for ScalarSubquery<T> {
    fn from(builder: SelectBuilder<(T,), S>) -> Self {
        builder.as_scalar()
    }
}

impl<R: Row, S: ExecutableState> From<SelectBuilder<R, S>> for Select {
    fn from(builder: SelectBuilder<R, S>) -> Self {
        builder.select
    }
}

impl<R: Row, S: ExecutableState> From<SelectBuilder<R, S>> for Statement {
    fn from(builder: SelectBuilder<R, S>) -> Self {
        Statement::Select(builder.select)
    }
}

impl<R: Row, S: ExecutableState> ToStatement for SelectBuilder<R, S> {
    fn to_statement(&self) -> Statement {
        Statement::Select(self.select.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::select;
    use quill_core::expr::Field;
    use quill_core::table::Table;

    fn users() -> (Table, Field<i32>, Field<String>) {
        let users = Table::new("users");
        let id = users.column("id");
        let name = users.column("name");
        (users, id, name)
    }

    #[test]
    fn test_join_waits_for_constraint() {
        let (users, id, _) = users();
        let posts = Table::new("posts");
        let author: Field<i32> = posts.column("author_id");

        let builder = select(&id).from(&users).left_join(&posts);
        let Some(TableRef::Join(join)) = builder.query().from.last() else {
            panic!("expected a join");
        };
        assert!(matches!(join.constraint, JoinConstraint::None));

        let builder = builder.on(id.eq(&author));
        let Some(TableRef::Join(join)) = builder.query().from.last() else {
            panic!("expected a join");
        };
        assert_eq!(join.kind, JoinKind::Left);
        assert!(matches!(join.constraint, JoinConstraint::On(_)));
    }

    #[test]
    fn test_where_chain_accumulates() {
        let (users, id, name) = users();
        let builder = select(&id)
            .from(&users)
            .where_(id.gt(1))
            .and(name.is_not_null())
            .or(id.eq(0));
        assert!(!builder.query().where_.is_none());
    }

    #[test]
    fn test_lock_wait_mode() {
        let (users, id, _) = users();
        let builder = select(&id).from(&users).for_update().skip_locked();
        let lock = builder.query().lock.expect("lock");
        assert_eq!(lock.mode, LockMode::Update);
        assert_eq!(lock.wait, LockWait::SkipLocked);
    }

    #[test]
    fn test_scalar_keeps_column_type() {
        let (users, id, _) = users();
        let scalar: ScalarSubquery<i32> = select(&id).from(&users).into();
        assert_eq!(scalar.query().fields.len(), 1);
    }
}
