//! Comparison operators on `Field<T>`.
//!
//! Each operator accepts any [`Operand<T>`]: a value, another field, a scalar
//! subquery or a quantified subquery. All shapes build the same
//! `Expr::Compare` node.

use super::{CompareOp, Condition, Expr, Field, Operand};

impl<T: 'static> Field<T> {
    fn compare<O: Operand<T>>(&self, op: CompareOp, other: O) -> Condition {
        Condition::new(Expr::Compare {
            op,
            left: self.lhs(),
            right: self.operand(other).boxed(),
        })
    }

    /// `=`
    pub fn eq<O: Operand<T>>(&self, other: O) -> Condition {
        self.compare(CompareOp::Eq, other)
    }

    /// `<>`
    pub fn ne<O: Operand<T>>(&self, other: O) -> Condition {
        self.compare(CompareOp::Ne, other)
    }

    /// `<`
    pub fn lt<O: Operand<T>>(&self, other: O) -> Condition {
        self.compare(CompareOp::Lt, other)
    }

    /// `<=`
    pub fn le<O: Operand<T>>(&self, other: O) -> Condition {
        self.compare(CompareOp::Le, other)
    }

    /// `>`
    pub fn gt<O: Operand<T>>(&self, other: O) -> Condition {
        self.compare(CompareOp::Gt, other)
    }

    /// `>=`
    pub fn ge<O: Operand<T>>(&self, other: O) -> Condition {
        self.compare(CompareOp::Ge, other)
    }

    pub fn is_null(&self) -> Condition {
        Condition::new(Expr::IsNull {
            expr: self.lhs(),
            negated: false,
        })
    }

    pub fn is_not_null(&self) -> Condition {
        Condition::new(Expr::IsNull {
            expr: self.lhs(),
            negated: true,
        })
    }

    /// Null-safe inequality.
    pub fn is_distinct_from<O: Operand<T>>(&self, other: O) -> Condition {
        self.distinct(other, false)
    }

    /// Null-safe equality.
    pub fn is_not_distinct_from<O: Operand<T>>(&self, other: O) -> Condition {
        self.distinct(other, true)
    }

    fn distinct<O: Operand<T>>(&self, other: O, negated: bool) -> Condition {
        Condition::new(Expr::IsDistinctFrom {
            left: self.lhs(),
            right: self.operand(other).boxed(),
            negated,
        })
    }

    pub fn between<L: Operand<T>, H: Operand<T>>(&self, low: L, high: H) -> Condition {
        self.between_node(low, high, false, false)
    }

    pub fn not_between<L: Operand<T>, H: Operand<T>>(&self, low: L, high: H) -> Condition {
        self.between_node(low, high, true, false)
    }

    /// `between symmetric`: bounds may be given in either order.
    pub fn between_symmetric<L: Operand<T>, H: Operand<T>>(&self, low: L, high: H) -> Condition {
        self.between_node(low, high, false, true)
    }

    pub fn not_between_symmetric<L: Operand<T>, H: Operand<T>>(
        &self,
        low: L,
        high: H,
    ) -> Condition {
        self.between_node(low, high, true, true)
    }

    fn between_node<L: Operand<T>, H: Operand<T>>(
        &self,
        low: L,
        high: H,
        negated: bool,
        symmetric: bool,
    ) -> Condition {
        Condition::new(Expr::Between {
            expr: self.lhs(),
            low: self.operand(low).boxed(),
            high: self.operand(high).boxed(),
            negated,
            symmetric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn operand_shapes_share_node_shape() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let b: Field<i32> = t.column("b");

        for cond in [a.eq(1), a.eq(&b), a.eq(Some(2)), a.eq(None::<i32>)] {
            assert!(matches!(
                cond.expr(),
                Expr::Compare {
                    op: CompareOp::Eq,
                    ..
                }
            ));
        }
    }

    #[test]
    fn aliases_are_stripped_from_operands() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let cond = a.as_("x").gt(a.as_("y"));
        match cond.expr() {
            Expr::Compare { left, right, .. } => {
                assert!(matches!(**left, Expr::Column(_)));
                assert!(matches!(**right, Expr::Column(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
