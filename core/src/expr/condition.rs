use super::{Expr, Field};
use crate::query::Select;
use crate::types::sql_data_type;

/// A boolean expression usable in WHERE, HAVING, ON and FILTER clauses.
///
/// [`Condition::none`] is the neutral element: it disappears when combined
/// with another condition and omits the clause when used alone.
#[derive(Debug, Clone)]
pub struct Condition(Expr);

impl Condition {
    pub fn new(expr: Expr) -> Self {
        Condition(expr)
    }

    /// No condition.
    pub fn none() -> Self {
        Condition(Expr::NoCondition)
    }

    /// Always true: `true`, or `1 = 1` where the dialect lacks boolean literals.
    pub fn true_() -> Self {
        Condition(Expr::Bool(true))
    }

    /// Always false: `false`, or `1 = 0`.
    pub fn false_() -> Self {
        Condition(Expr::Bool(false))
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }

    pub fn into_expr(self) -> Expr {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_no_condition()
    }

    #[must_use]
    pub fn and(self, other: impl Into<Condition>) -> Condition {
        Condition(self.0.and(other.into().0))
    }

    #[must_use]
    pub fn or(self, other: impl Into<Condition>) -> Condition {
        Condition(self.0.or(other.into().0))
    }

    #[must_use]
    pub fn and_not(self, other: impl Into<Condition>) -> Condition {
        self.and(other.into().not())
    }

    #[must_use]
    pub fn or_not(self, other: impl Into<Condition>) -> Condition {
        self.or(other.into().not())
    }

    #[must_use]
    pub fn and_exists(self, query: impl Into<Select>) -> Condition {
        self.and(super::exists(query))
    }

    #[must_use]
    pub fn and_not_exists(self, query: impl Into<Select>) -> Condition {
        self.and(super::not_exists(query))
    }

    #[must_use]
    pub fn or_exists(self, query: impl Into<Select>) -> Condition {
        self.or(super::exists(query))
    }

    /// `not (<condition>)`. Negating no condition is still no condition.
    #[must_use]
    pub fn not(self) -> Condition {
        match self.0 {
            Expr::NoCondition => Condition::none(),
            Expr::Not(inner) => Condition(*inner),
            expr => Condition(Expr::Not(expr.boxed())),
        }
    }

    /// This condition as a boolean field, e.g. for a select list.
    pub fn as_field(&self) -> Field<bool> {
        Field::new(self.0.clone(), sql_data_type::boolean())
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::none()
    }
}

impl From<Condition> for Expr {
    fn from(condition: Condition) -> Self {
        condition.0
    }
}

impl From<&Condition> for Condition {
    fn from(condition: &Condition) -> Self {
        condition.clone()
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        Condition(Expr::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn none_is_absorbed() {
        let users = Table::new("users");
        let age: Field<i32> = users.column("age");
        let cond = Condition::none().and(age.gt(1)).or(Condition::none());
        assert!(matches!(cond.expr(), Expr::Compare { .. }));
        assert!(Condition::none().not().is_none());
    }

    #[test]
    fn double_negation_collapses() {
        let users = Table::new("users");
        let age: Field<i32> = users.column("age");
        let cond = age.gt(1).not().not();
        assert!(matches!(cond.expr(), Expr::Compare { .. }));
    }
}
