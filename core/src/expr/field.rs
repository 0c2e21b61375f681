use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::{Condition, Expr, Param};
use crate::name::Name;
use crate::types::{DataType, SqlValue};
use crate::value::Value;

/// A typed expression: a column, literal, function result or subquery whose
/// application type is `T`.
pub struct Field<T> {
    expr: Expr,
    data_type: DataType<T>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr.clone(),
            data_type: self.data_type.clone(),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("expr", &self.expr)
            .field("data_type", &self.data_type.type_name())
            .finish()
    }
}

impl<T: 'static> Field<T> {
    pub fn new(expr: Expr, data_type: DataType<T>) -> Self {
        Self { expr, data_type }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub fn data_type(&self) -> &DataType<T> {
        &self.data_type
    }

    /// Column name when this field is a (possibly aliased) column.
    pub fn name(&self) -> Option<&Name> {
        self.expr.column_name()
    }

    /// `<field> as <alias>` in a select list; the alias elsewhere.
    #[must_use]
    pub fn as_(&self, alias: impl Into<Name>) -> Field<T> {
        Field::new(self.expr.clone().alias(alias), self.data_type.clone())
    }

    /// `cast(<field> as <type>)`.
    pub fn cast<U: 'static>(&self, to: &DataType<U>) -> Field<U> {
        Field::new(
            Expr::Cast {
                expr: self.expr.clone().unaliased().boxed(),
                to: to.info().clone(),
            },
            to.clone(),
        )
    }

    /// Reinterpret this field as another type without rendering a cast.
    pub fn coerce<U: 'static>(&self, to: &DataType<U>) -> Field<U> {
        Field::new(self.expr.clone(), to.clone())
    }

    /// Typed operand node for a comparison or assignment against this field.
    pub fn operand<O: Operand<T>>(&self, operand: O) -> Expr {
        operand.into_operand(&self.data_type)
    }

    /// Operand node with any alias stripped.
    pub(crate) fn lhs(&self) -> Box<Expr> {
        self.expr.clone().unaliased().boxed()
    }
}

impl<T> From<Field<T>> for Expr {
    fn from(field: Field<T>) -> Self {
        field.expr
    }
}

impl<T> From<&Field<T>> for Expr {
    fn from(field: &Field<T>) -> Self {
        field.expr.clone()
    }
}

impl From<Field<bool>> for Condition {
    fn from(field: Field<bool>) -> Self {
        Condition::new(field.expr)
    }
}

/// Anything that can stand where a `Field<Type>` is expected.
pub trait IntoField {
    type Type: 'static;

    fn into_field(self) -> Field<Self::Type>;
}

impl<T: 'static> IntoField for Field<T> {
    type Type = T;

    fn into_field(self) -> Field<T> {
        self
    }
}

impl<T: 'static> IntoField for &Field<T> {
    type Type = T;

    fn into_field(self) -> Field<T> {
        self.clone()
    }
}

impl IntoField for Condition {
    type Type = bool;

    fn into_field(self) -> Field<bool> {
        self.as_field()
    }
}

/// Right-hand operand of an operator on `Field<T>`.
///
/// Implemented for plain values (`T`, `Option<T>`, `&str` against text),
/// other fields, scalar subqueries and quantified subqueries. Every shape
/// produces the same comparison node and differs only in the operand.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an operand of a `Field<{T}>`",
    label = "expected a value, a field, a scalar subquery or a quantified subquery of the same type"
)]
pub trait Operand<T> {
    fn into_operand(self, data_type: &DataType<T>) -> Expr;
}

impl<T: Send + Sync + 'static> Operand<T> for T {
    fn into_operand(self, data_type: &DataType<T>) -> Expr {
        Expr::Param(Param::new(self, data_type))
    }
}

impl<T: Send + Sync + 'static> Operand<T> for Option<T> {
    fn into_operand(self, data_type: &DataType<T>) -> Expr {
        match self {
            Some(value) => Expr::Param(Param::new(value, data_type)),
            None => Expr::Param(Param::null(data_type.info().clone())),
        }
    }
}

impl<T: 'static> Operand<T> for Field<T> {
    fn into_operand(self, _data_type: &DataType<T>) -> Expr {
        self.expr.unaliased()
    }
}

impl<T: 'static> Operand<T> for &Field<T> {
    fn into_operand(self, _data_type: &DataType<T>) -> Expr {
        self.expr.clone().unaliased()
    }
}

impl Operand<String> for &str {
    fn into_operand(self, data_type: &DataType<String>) -> Expr {
        Expr::Param(Param::new(self.to_string(), data_type))
    }
}

macro_rules! impl_untyped_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Operand<Value> for $ty {
                fn into_operand(self, _data_type: &DataType<Value>) -> Expr {
                    Expr::Param(Param::new(self, &<$ty as SqlValue>::data_type()))
                }
            }
        )*
    };
}

// Untyped fields (`field("x")`) accept any natively mapped value
impl_untyped_operand!(
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    Decimal,
    String,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<FixedOffset>,
);

impl Operand<Value> for &str {
    fn into_operand(self, _data_type: &DataType<Value>) -> Expr {
        Expr::Param(Param::new(self.to_string(), &String::data_type()))
    }
}
