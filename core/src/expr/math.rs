//! Arithmetic, bitwise and concatenation operators.
//!
//! Both the named methods (`add`, `mul`, ..) and the `std::ops` operators
//! build the same `Expr::Binary` node. The result keeps the left operand's
//! data type.

use core::ops;

use super::{BinaryOp, Expr, Field, Operand, UnaryOp};
use crate::types::sql_data_type;

impl<T: 'static> Field<T> {
    fn binary<O: Operand<T>>(&self, op: BinaryOp, other: O) -> Field<T> {
        Field::new(
            Expr::Binary {
                op,
                left: self.lhs(),
                right: self.operand(other).boxed(),
            },
            self.data_type().clone(),
        )
    }

    fn unary(&self, op: UnaryOp) -> Field<T> {
        Field::new(
            Expr::Unary {
                op,
                expr: self.lhs(),
            },
            self.data_type().clone(),
        )
    }

    pub fn add<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::Add, other)
    }

    pub fn sub<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::Sub, other)
    }

    pub fn mul<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::Mul, other)
    }

    pub fn div<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::Div, other)
    }

    /// `<field> % <other>`; `mod(..)` on dialects without the operator.
    pub fn modulo<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::Mod, other)
    }

    pub fn neg(&self) -> Field<T> {
        self.unary(UnaryOp::Neg)
    }

    pub fn bit_and<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::BitAnd, other)
    }

    pub fn bit_or<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::BitOr, other)
    }

    pub fn bit_xor<O: Operand<T>>(&self, other: O) -> Field<T> {
        self.binary(BinaryOp::BitXor, other)
    }

    pub fn bit_not(&self) -> Field<T> {
        self.unary(UnaryOp::BitNot)
    }

    /// String concatenation, `||` or the dialect's equivalent.
    pub fn concat<U: 'static>(&self, other: impl Into<Field<U>>) -> Field<String> {
        Field::new(
            Expr::Binary {
                op: BinaryOp::Concat,
                left: self.lhs(),
                right: other.into().lhs(),
            },
            sql_data_type::varchar(),
        )
    }
}

macro_rules! impl_binary_ops {
    ($($trait:ident :: $method:ident => $op:ident;)*) => {
        $(
            impl<T: 'static, O: Operand<T>> ops::$trait<O> for Field<T> {
                type Output = Field<T>;

                fn $method(self, rhs: O) -> Field<T> {
                    self.binary(BinaryOp::$op, rhs)
                }
            }

            impl<T: 'static, O: Operand<T>> ops::$trait<O> for &Field<T> {
                type Output = Field<T>;

                fn $method(self, rhs: O) -> Field<T> {
                    self.binary(BinaryOp::$op, rhs)
                }
            }
        )*
    };
}

impl_binary_ops! {
    Add::add => Add;
    Sub::sub => Sub;
    Mul::mul => Mul;
    Div::div => Div;
    Rem::rem => Mod;
}

impl<T: 'static> ops::Neg for Field<T> {
    type Output = Field<T>;

    fn neg(self) -> Field<T> {
        self.unary(UnaryOp::Neg)
    }
}

impl<T: 'static> ops::Neg for &Field<T> {
    type Output = Field<T>;

    fn neg(self) -> Field<T> {
        self.unary(UnaryOp::Neg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn operators_match_methods() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let b: Field<i32> = t.column("b");

        let via_op = &a + &b * 2;
        match via_op.expr() {
            Expr::Binary { op, right, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(**right, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            a.modulo(3).expr(),
            Expr::Binary { op: BinaryOp::Mod, .. }
        ));
        assert!(matches!(
            (-&a).expr(),
            Expr::Unary { op: UnaryOp::Neg, .. }
        ));
    }

    #[test]
    fn concat_is_text() {
        let t = Table::new("t");
        let a: Field<String> = t.column("first");
        let b: Field<String> = t.column("last");
        let full = a.concat(b);
        assert!(full.data_type().is_string());
    }
}
