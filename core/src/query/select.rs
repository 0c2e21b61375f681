use super::With;
use crate::expr::{Condition, Expr, SortField, WindowDefinition};
use crate::name::Name;
use crate::table::{DerivedTable, TableRef};

/// `select [distinct [on (..)]]`.
#[derive(Debug, Clone, Default)]
pub enum Distinct {
    #[default]
    All,
    Distinct,
    On(Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            SetOperator::Union => "union",
            SetOperator::UnionAll => "union all",
            SetOperator::Intersect => "intersect",
            SetOperator::Except => "except",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockMode {
    #[default]
    Update,
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockWait {
    #[default]
    Wait,
    NoWait,
    SkipLocked,
}

/// `for update [nowait | skip locked]`, `for share ..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lock {
    pub mode: LockMode,
    pub wait: LockWait,
}

/// A SELECT statement.
///
/// `limit` and `offset` hold bigint bind values. `set_ops` are applied left
/// to right before `order_by`, `limit` and `offset`, which then apply to the
/// whole compound select.
#[derive(Debug, Clone, Default)]
pub struct Select {
    pub with: Option<With>,
    pub distinct: Distinct,
    pub fields: Vec<Expr>,
    pub from: Vec<TableRef>,
    pub where_: Condition,
    pub group_by: Vec<Expr>,
    pub having: Condition,
    pub windows: Vec<WindowDefinition>,
    pub set_ops: Vec<(SetOperator, Select)>,
    pub order_by: Vec<SortField>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub lock: Option<Lock>,
}

impl Select {
    /// This select as a derived table.
    pub fn as_table(self, alias: impl Into<Name>) -> DerivedTable {
        DerivedTable::new(self, alias)
    }

    /// Whether this select is a compound select (has set operations).
    pub fn is_compound(&self) -> bool {
        !self.set_ops.is_empty()
    }
}
