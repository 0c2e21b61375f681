use super::{Assignment, Select, With};
use crate::expr::{Condition, Expr};
use crate::name::{Name, QualifiedName};
use crate::table::TableRef;

/// Rows of an INSERT.
#[derive(Debug, Clone)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Select(Box<Select>),
    DefaultValues,
}

#[derive(Debug, Clone)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate {
        set: Vec<Assignment>,
        where_: Condition,
    },
}

/// `on conflict (<target>) do ..`.
#[derive(Debug, Clone)]
pub struct OnConflict {
    pub target: Vec<Name>,
    pub action: ConflictAction,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub with: Option<With>,
    pub table: TableRef,
    pub columns: Vec<Name>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<Expr>,
}

impl Insert {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            with: None,
            table: table.into(),
            columns: Vec::new(),
            source: InsertSource::Values(Vec::new()),
            on_conflict: None,
            returning: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Update {
    pub with: Option<With>,
    pub table: TableRef,
    pub set: Vec<Assignment>,
    pub from: Vec<TableRef>,
    pub where_: Condition,
    pub returning: Vec<Expr>,
}

impl Update {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            with: None,
            table: table.into(),
            set: Vec::new(),
            from: Vec::new(),
            where_: Condition::none(),
            returning: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Delete {
    pub with: Option<With>,
    pub table: TableRef,
    pub using: Vec<TableRef>,
    pub where_: Condition,
    pub returning: Vec<Expr>,
}

impl Delete {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            with: None,
            table: table.into(),
            using: Vec::new(),
            where_: Condition::none(),
            returning: Vec::new(),
        }
    }
}

/// A WHEN branch of a MERGE.
#[derive(Debug, Clone)]
pub enum MergeClause {
    MatchedUpdate {
        set: Vec<Assignment>,
        where_: Condition,
    },
    MatchedDelete {
        where_: Condition,
    },
    NotMatchedInsert {
        columns: Vec<Name>,
        values: Vec<Expr>,
        where_: Condition,
    },
}

#[derive(Debug, Clone)]
pub struct Merge {
    pub table: TableRef,
    pub using: TableRef,
    pub on: Condition,
    pub clauses: Vec<MergeClause>,
}

impl Merge {
    pub fn new(table: impl Into<TableRef>, using: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            using: using.into(),
            on: Condition::none(),
            clauses: Vec::new(),
        }
    }
}

/// Stored procedure call.
#[derive(Debug, Clone)]
pub struct Call {
    pub name: QualifiedName,
    pub args: Vec<Expr>,
}

impl Call {
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}
