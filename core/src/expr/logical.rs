//! Logical combinators (AND, OR, EXISTS).

use super::{Condition, Expr};
use crate::query::Select;

/// AND of all conditions. Empty input is no condition.
pub fn and_all<I, C>(conditions: I) -> Condition
where
    I: IntoIterator<Item = C>,
    C: Into<Condition>,
{
    conditions
        .into_iter()
        .fold(Condition::none(), |acc, c| acc.and(c))
}

/// OR of all conditions. Empty input is no condition.
pub fn or_all<I, C>(conditions: I) -> Condition
where
    I: IntoIterator<Item = C>,
    C: Into<Condition>,
{
    conditions
        .into_iter()
        .fold(Condition::none(), |acc, c| acc.or(c))
}

/// `exists (<query>)`.
pub fn exists(query: impl Into<Select>) -> Condition {
    Condition::new(Expr::Exists {
        query: Box::new(query.into()),
        negated: false,
    })
}

/// `not exists (<query>)`.
pub fn not_exists(query: impl Into<Select>) -> Condition {
    Condition::new(Expr::Exists {
        query: Box::new(query.into()),
        negated: true,
    })
}
