//! Subqueries used as scalar or quantified operands.
//!
//! A single-column select of type `T` converts into a [`ScalarSubquery<T>`]
//! and from there into a comparison operand, an IN source or a
//! [`Quantified<T>`] operand (`all (..)`, `any (..)`).

use core::fmt;

use super::{Expr, Field, Operand, Quantifier};
use crate::query::Select;
use crate::types::DataType;

/// `(select <one column> ..)` with element type `T`.
pub struct ScalarSubquery<T> {
    query: Box<Select>,
    data_type: DataType<T>,
}

impl<T> Clone for ScalarSubquery<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            data_type: self.data_type.clone(),
        }
    }
}

impl<T> fmt::Debug for ScalarSubquery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarSubquery")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ScalarSubquery<T> {
    pub fn new(query: Select, data_type: DataType<T>) -> Self {
        Self {
            query: Box::new(query),
            data_type,
        }
    }

    pub fn query(&self) -> &Select {
        &self.query
    }

    pub fn into_select(self) -> Select {
        *self.query
    }

    /// The subquery as a field, e.g. for a select list.
    pub fn as_field(&self) -> Field<T> {
        Field::new(Expr::Subquery(self.query.clone()), self.data_type.clone())
    }
}

impl<T: 'static> Operand<T> for ScalarSubquery<T> {
    fn into_operand(self, _data_type: &DataType<T>) -> Expr {
        Expr::Subquery(self.query)
    }
}

/// `all (select ..)` / `any (select ..)` as the right side of a comparison.
pub struct Quantified<T> {
    quantifier: Quantifier,
    query: ScalarSubquery<T>,
}

impl<T> fmt::Debug for Quantified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantified")
            .field("quantifier", &self.quantifier)
            .field("query", &self.query)
            .finish()
    }
}

impl<T> Quantified<T> {
    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }
}

impl<T: 'static> Operand<T> for Quantified<T> {
    fn into_operand(self, _data_type: &DataType<T>) -> Expr {
        Expr::Quantified {
            quantifier: self.quantifier,
            query: self.query.query,
        }
    }
}

/// `all (<query>)`.
pub fn all<T: 'static>(query: impl Into<ScalarSubquery<T>>) -> Quantified<T> {
    Quantified {
        quantifier: Quantifier::All,
        query: query.into(),
    }
}

/// `any (<query>)`.
pub fn any<T: 'static>(query: impl Into<ScalarSubquery<T>>) -> Quantified<T> {
    Quantified {
        quantifier: Quantifier::Any,
        query: query.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use crate::types::sql_data_type;

    #[test]
    fn quantified_operand_keeps_comparison_shape() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let sub = ScalarSubquery::new(Select::default(), sql_data_type::integer());

        match a.gt(all(sub.clone())).expr() {
            Expr::Compare { right, .. } => assert!(matches!(
                **right,
                Expr::Quantified {
                    quantifier: Quantifier::All,
                    ..
                }
            )),
            other => panic!("unexpected {other:?}"),
        }
        match a.eq(sub).expr() {
            Expr::Compare { right, .. } => assert!(matches!(**right, Expr::Subquery(_))),
            other => panic!("unexpected {other:?}"),
        }
    }
}
