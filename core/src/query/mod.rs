//! Statement nodes.
//!
//! These are plain data: every clause is a public field, and an empty
//! clause (no condition, empty list, `None`) is simply not rendered. The
//! typestate builders in the `quill` crate are the checked way to assemble
//! them; the model API mutates them directly.

mod dml;
mod select;

pub use dml::{
    Call, ConflictAction, Delete, Insert, InsertSource, Merge, MergeClause, OnConflict, Update,
};
pub use select::{Distinct, Lock, LockMode, LockWait, Select, SetOperator};

use crate::name::Name;

/// `with [recursive] <ctes>`.
#[derive(Debug, Clone, Default)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

/// `<name>(<columns>) as (<query>)`.
#[derive(Debug, Clone)]
pub struct Cte {
    pub name: Name,
    pub columns: Vec<Name>,
    pub query: Box<Select>,
}

impl Cte {
    pub fn new(name: impl Into<Name>, query: Select) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            query: Box::new(query),
        }
    }

    #[must_use]
    pub fn with_columns<I, N>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// `SET <column> = <value>` pair.
pub type Assignment = (Name, crate::expr::Expr);

/// Any renderable statement.
#[derive(Debug, Clone)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(Merge),
    Call(Call),
}

impl Statement {
    pub const fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "SELECT",
            Statement::Insert(_) => "INSERT",
            Statement::Update(_) => "UPDATE",
            Statement::Delete(_) => "DELETE",
            Statement::Merge(_) => "MERGE",
            Statement::Call(_) => "CALL",
        }
    }
}

macro_rules! impl_from_statement {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Statement {
                fn from(statement: $variant) -> Self {
                    Statement::$variant(statement)
                }
            }
        )*
    };
}

impl_from_statement!(Select, Insert, Update, Delete, Merge, Call);
