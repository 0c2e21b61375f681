//! Searched CASE expressions.
//!
//! A typestate builder: [`case`] returns a [`CaseInit`] that needs at least
//! one `.when()` before it can be finished. The first branch fixes the
//! result type `T`; later branches and the ELSE value must be operands of
//! the same type.
//!
//! ```
//! use quill_core::expr::{case, Field};
//! use quill_core::table::Table;
//!
//! let users = Table::new("users");
//! let age: Field<i32> = users.column("age");
//!
//! let bracket: Field<String> = case()
//!     .when(age.gt(65), "Senior")
//!     .when(age.gt(18), "Adult")
//!     .otherwise("Minor");
//! ```

use super::{CaseExpr, Condition, Expr, Field, Operand, Param};
use crate::types::{DataType, SqlValue};

// =============================================================================
// Entry Point
// =============================================================================

/// Start building a searched CASE expression.
pub fn case() -> CaseInit {
    CaseInit { _private: () }
}

/// Shorthand for `case().when(condition, result)`.
pub fn case_when<R: CaseResult>(condition: impl Into<Condition>, result: R) -> CaseWhen<R::Type> {
    case().when(condition, result)
}

/// Value or field that can fix the result type of a CASE.
pub trait CaseResult {
    type Type: 'static;

    fn into_result(self) -> (Expr, DataType<Self::Type>);
}

impl<T: SqlValue> CaseResult for T {
    type Type = T;

    fn into_result(self) -> (Expr, DataType<T>) {
        let data_type = T::data_type();
        (Expr::Param(Param::new(self, &data_type)), data_type)
    }
}

impl CaseResult for &str {
    type Type = String;

    fn into_result(self) -> (Expr, DataType<String>) {
        self.to_string().into_result()
    }
}

impl<T: 'static> CaseResult for Field<T> {
    type Type = T;

    fn into_result(self) -> (Expr, DataType<T>) {
        let data_type = self.data_type().clone();
        (self.into_expr().unaliased(), data_type)
    }
}

impl<T: 'static> CaseResult for &Field<T> {
    type Type = T;

    fn into_result(self) -> (Expr, DataType<T>) {
        self.clone().into_result()
    }
}

// =============================================================================
// CaseInit: before the first WHEN
// =============================================================================

/// Builder state before the first WHEN branch.
pub struct CaseInit {
    _private: (),
}

impl CaseInit {
    /// Add the first WHEN branch. This establishes the result type.
    pub fn when<R: CaseResult>(self, condition: impl Into<Condition>, result: R) -> CaseWhen<R::Type> {
        let (result, data_type) = result.into_result();
        CaseWhen {
            node: CaseExpr {
                whens: vec![(condition.into().into_expr(), result)],
                otherwise: None,
            },
            data_type,
        }
    }
}

// =============================================================================
// CaseWhen: after at least one WHEN
// =============================================================================

/// Builder state after at least one WHEN branch.
pub struct CaseWhen<T> {
    node: CaseExpr,
    data_type: DataType<T>,
}

impl<T: 'static> CaseWhen<T> {
    #[must_use]
    pub fn when<O: Operand<T>>(mut self, condition: impl Into<Condition>, result: O) -> Self {
        let result = result.into_operand(&self.data_type);
        self.node
            .whens
            .push((condition.into().into_expr(), result));
        self
    }

    /// Finish with an ELSE branch.
    pub fn otherwise<O: Operand<T>>(mut self, result: O) -> Field<T> {
        self.node.otherwise = Some(result.into_operand(&self.data_type));
        self.end()
    }

    /// Finish without ELSE; unmatched rows produce NULL.
    pub fn end(self) -> Field<T> {
        Field::new(Expr::Case(Box::new(self.node)), self.data_type)
    }
}
