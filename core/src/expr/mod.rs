//! Expression nodes and the typed DSL surface.
//!
//! [`Expr`] is the closed, untyped node set the renderer walks. The typed
//! surface ([`Field<T>`], [`Condition`], [`SortField`], aggregate and window
//! builders) wraps `Expr` values and only exposes well-typed compositions:
//!
//! ```
//! use quill_core::expr::Field;
//! use quill_core::table::Table;
//!
//! let users = Table::new("users");
//! let age: Field<i32> = users.column("age");
//! let name: Field<String> = users.column("name");
//!
//! let cond = age.gt(18).and(name.is_not_null());
//! ```
//!
//! All nodes are immutable; composition clones the operands into a new node.

mod agg;
mod case;
mod cmp;
mod condition;
mod field;
mod functions;
mod logical;
mod math;
mod param;
mod set;
mod sort;
mod string;
mod subquery;
mod window;

pub use agg::{
    AggregateFunction, avg, count, count_distinct, count_star, max, min, sum,
};
pub use case::{CaseInit, CaseResult, CaseWhen, case, case_when};
pub use condition::Condition;
pub use field::{Field, IntoField, Operand};
pub use functions::{
    abs, array, coalesce, default_value, excluded, field, function, inline, length, lower,
    nullif, param, placeholder, replace, round, sql, sql_condition, sql_with, substring,
    trim, upper, val,
};
pub use logical::{and_all, exists, not_exists, or_all};
pub use param::{Param, ParamMode, WireValue};
pub use sort::{NullsOrder, SortField, SortOrder};
pub use string::{LikeOperand, escape_for_like};
pub use subquery::{Quantified, ScalarSubquery, all, any};
pub use window::{
    Frame, FrameBound, FrameUnits, Over, WindowDefinition, WindowFunction, WindowSpec,
    dense_rank, first_value, lag, last_value, lead, ntile, percent_rank, rank, row_number,
    window,
};

use compact_str::CompactString;

use crate::name::{Name, QualifiedName};
use crate::query::Select;
use crate::types::DataTypeInfo;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Arithmetic, bitwise and concatenation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Any,
}

/// Reference to a column, optionally qualified by a table or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub qualifier: Option<QualifiedName>,
    pub name: Name,
}

/// Plain SQL with `{0}`, `{1}`, .. placeholders for argument nodes.
#[derive(Debug, Clone)]
pub struct PlainSql {
    pub template: CompactString,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
    Window,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: CompactString,
    pub args: Vec<Expr>,
    pub kind: FunctionKind,
    pub distinct: bool,
    pub filter: Option<Expr>,
    pub over: Option<Over>,
}

/// Searched CASE.
#[derive(Debug, Clone)]
pub struct CaseExpr {
    pub whens: Vec<(Expr, Expr)>,
    pub otherwise: Option<Expr>,
}

/// Untyped expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Column(ColumnRef),
    Sql(PlainSql),
    Param(Param),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `all (select ..)` / `any (select ..)` as the right operand of a comparison
    Quantified {
        quantifier: Quantifier,
        query: Box<Select>,
    },
    Subquery(Box<Select>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
        symmetric: bool,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    InSelect {
        expr: Box<Expr>,
        query: Box<Select>,
        negated: bool,
    },
    Exists {
        query: Box<Select>,
        negated: bool,
    },
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<char>,
        negated: bool,
        case_insensitive: bool,
    },
    Function(Box<FunctionCall>),
    Case(Box<CaseExpr>),
    Cast {
        expr: Box<Expr>,
        to: DataTypeInfo,
    },
    Alias {
        expr: Box<Expr>,
        alias: Name,
    },
    Asterisk(Option<QualifiedName>),
    Array(Vec<Expr>),
    /// `DEFAULT` in VALUES and SET
    Default,
    /// Proposed row of an upsert: `excluded.col`
    Excluded(Name),
    Bool(bool),
    /// Neutral element of AND/OR; omitted where a clause can be
    NoCondition,
}

impl Expr {
    pub fn column(name: impl Into<Name>) -> Self {
        Expr::Column(ColumnRef {
            qualifier: None,
            name: name.into(),
        })
    }

    pub fn qualified_column(qualifier: impl Into<QualifiedName>, name: impl Into<Name>) -> Self {
        Expr::Column(ColumnRef {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        })
    }

    /// Variant name for error messages.
    pub const fn node_name(&self) -> &'static str {
        match self {
            Expr::Column(_) => "column",
            Expr::Sql(_) => "plain SQL",
            Expr::Param(_) => "parameter",
            Expr::Unary { .. } => "unary expression",
            Expr::Binary { .. } => "binary expression",
            Expr::Compare { .. } => "comparison",
            Expr::Quantified { .. } => "quantified subquery",
            Expr::Subquery(_) => "scalar subquery",
            Expr::And(_) => "AND",
            Expr::Or(_) => "OR",
            Expr::Not(_) => "NOT",
            Expr::IsNull { .. } => "IS NULL",
            Expr::IsDistinctFrom { .. } => "IS DISTINCT FROM",
            Expr::Between { .. } => "BETWEEN",
            Expr::InList { .. } => "IN list",
            Expr::InSelect { .. } => "IN subquery",
            Expr::Exists { .. } => "EXISTS",
            Expr::Like { .. } => "LIKE",
            Expr::Function(_) => "function call",
            Expr::Case(_) => "CASE",
            Expr::Cast { .. } => "CAST",
            Expr::Alias { .. } => "alias",
            Expr::Asterisk(_) => "asterisk",
            Expr::Array(_) => "array",
            Expr::Default => "DEFAULT",
            Expr::Excluded(_) => "excluded column",
            Expr::Bool(_) => "boolean literal",
            Expr::NoCondition => "no condition",
        }
    }

    #[inline]
    pub const fn is_no_condition(&self) -> bool {
        matches!(self, Expr::NoCondition)
    }

    /// Column name of a column reference, looking through aliases.
    pub fn column_name(&self) -> Option<&Name> {
        match self {
            Expr::Column(c) => Some(&c.name),
            Expr::Alias { alias, .. } => Some(alias),
            _ => None,
        }
    }

    /// Name a select-list item is known by in an enclosing query.
    pub fn output_name(&self) -> Option<&Name> {
        self.column_name()
    }

    pub fn alias(self, alias: impl Into<Name>) -> Self {
        Expr::Alias {
            expr: Box::new(self.unaliased()),
            alias: alias.into(),
        }
    }

    /// Strip one level of aliasing.
    pub fn unaliased(self) -> Self {
        match self {
            Expr::Alias { expr, .. } => *expr,
            other => other,
        }
    }

    /// `self AND other`, flattening nested ANDs and absorbing `NoCondition`.
    pub fn and(self, other: Expr) -> Expr {
        match (self, other) {
            (Expr::NoCondition, e) | (e, Expr::NoCondition) => e,
            (Expr::And(mut left), Expr::And(right)) => {
                left.extend(right);
                Expr::And(left)
            }
            (Expr::And(mut left), e) => {
                left.push(e);
                Expr::And(left)
            }
            (e, Expr::And(mut right)) => {
                right.insert(0, e);
                Expr::And(right)
            }
            (l, r) => Expr::And(vec![l, r]),
        }
    }

    /// `self OR other`, flattening nested ORs and absorbing `NoCondition`.
    pub fn or(self, other: Expr) -> Expr {
        match (self, other) {
            (Expr::NoCondition, e) | (e, Expr::NoCondition) => e,
            (Expr::Or(mut left), Expr::Or(right)) => {
                left.extend(right);
                Expr::Or(left)
            }
            (Expr::Or(mut left), e) => {
                left.push(e);
                Expr::Or(left)
            }
            (e, Expr::Or(mut right)) => {
                right.insert(0, e);
                Expr::Or(right)
            }
            (l, r) => Expr::Or(vec![l, r]),
        }
    }

    pub(crate) fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }
}
