//! Set membership (IN, NOT IN).
//!
//! NULL members are kept, so `x not in (1, 2, null)` renders and evaluates
//! with standard three-valued logic. Empty lists have no SQL literal; the
//! renderer emits `1 = 0` for an empty IN and `1 = 1` for an empty NOT IN.

use super::{Condition, Expr, Field, Operand, ScalarSubquery};

impl<T: 'static> Field<T> {
    /// `<field> in (<values>)`.
    pub fn is_in<I, O>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = O>,
        O: Operand<T>,
    {
        self.in_list(values, false)
    }

    /// `<field> not in (<values>)`.
    pub fn not_in<I, O>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = O>,
        O: Operand<T>,
    {
        self.in_list(values, true)
    }

    fn in_list<I, O>(&self, values: I, negated: bool) -> Condition
    where
        I: IntoIterator<Item = O>,
        O: Operand<T>,
    {
        let list = values
            .into_iter()
            .map(|value| self.operand(value))
            .collect();
        Condition::new(Expr::InList {
            expr: self.lhs(),
            list,
            negated,
        })
    }

    /// `<field> in (select ..)`.
    pub fn is_in_select(&self, query: impl Into<ScalarSubquery<T>>) -> Condition {
        self.in_select(query.into(), false)
    }

    /// `<field> not in (select ..)`.
    pub fn not_in_select(&self, query: impl Into<ScalarSubquery<T>>) -> Condition {
        self.in_select(query.into(), true)
    }

    fn in_select(&self, query: ScalarSubquery<T>, negated: bool) -> Condition {
        Condition::new(Expr::InSelect {
            expr: self.lhs(),
            query: Box::new(query.into_select()),
            negated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn nulls_are_kept() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let cond = a.not_in([Some(1), Some(2), None]);
        match cond.expr() {
            Expr::InList { list, negated, .. } => {
                assert!(*negated);
                assert_eq!(list.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_list_is_representable() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let cond = a.is_in(Vec::<i32>::new());
        assert!(matches!(cond.expr(), Expr::InList { list, .. } if list.is_empty()));
    }
}
