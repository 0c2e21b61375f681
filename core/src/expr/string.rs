//! LIKE predicates and pattern helpers.

use super::{Condition, Expr, Field, Operand, Param, functions};
use crate::types::{DataType, sql_data_type};

/// Escape character used by `contains`, `starts_with` and `ends_with`.
pub(crate) const LIKE_ESCAPE: char = '!';

/// Escape `escape`, `%` and `_` in `value` so it matches literally.
///
/// ```
/// use quill_core::expr::escape_for_like;
///
/// assert_eq!(escape_for_like("50%_off!", '!'), "50!%!_off!!");
/// ```
pub fn escape_for_like(value: &str, escape: char) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c == escape || c == '%' || c == '_' {
            out.push(escape);
        }
        out.push(c);
    }
    out
}

/// Operand of `contains`, `starts_with` and `ends_with`.
///
/// Values are escaped client side. Fields are escaped in SQL through nested
/// `replace(..)` calls and wrapped with `'%'` by concatenation.
pub trait LikeOperand {
    fn into_pattern(self, leading: bool, trailing: bool) -> Expr;
}

fn text() -> DataType<String> {
    sql_data_type::varchar()
}

fn literal(value: &str) -> Expr {
    Expr::Param(Param::inlined(value.to_string(), &text()))
}

impl LikeOperand for &str {
    fn into_pattern(self, leading: bool, trailing: bool) -> Expr {
        let mut pattern = String::with_capacity(self.len() + 2);
        if leading {
            pattern.push('%');
        }
        pattern.push_str(&escape_for_like(self, LIKE_ESCAPE));
        if trailing {
            pattern.push('%');
        }
        Expr::Param(Param::new(pattern, &text()))
    }
}

impl LikeOperand for String {
    fn into_pattern(self, leading: bool, trailing: bool) -> Expr {
        self.as_str().into_pattern(leading, trailing)
    }
}

impl LikeOperand for &String {
    fn into_pattern(self, leading: bool, trailing: bool) -> Expr {
        self.as_str().into_pattern(leading, trailing)
    }
}

impl LikeOperand for &Field<String> {
    fn into_pattern(self, leading: bool, trailing: bool) -> Expr {
        let escape = LIKE_ESCAPE.to_string();
        let mut pattern = self.expr().clone().unaliased();
        for special in [escape.as_str(), "%", "_"] {
            pattern = functions::call(
                "replace",
                vec![pattern, literal(special), literal(&format!("{escape}{special}"))],
            );
        }

        if leading {
            pattern = concat(literal("%"), pattern);
        }
        if trailing {
            pattern = concat(pattern, literal("%"));
        }
        pattern
    }
}

impl LikeOperand for Field<String> {
    fn into_pattern(self, leading: bool, trailing: bool) -> Expr {
        (&self).into_pattern(leading, trailing)
    }
}

fn concat(left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op: super::BinaryOp::Concat,
        left: left.boxed(),
        right: right.boxed(),
    }
}

impl<T: 'static> Field<T> {
    fn like_node(&self, pattern: Expr, escape: Option<char>, negated: bool, ci: bool) -> Condition {
        Condition::new(Expr::Like {
            expr: self.lhs(),
            pattern: pattern.boxed(),
            escape,
            negated,
            case_insensitive: ci,
        })
    }

    /// `<field> like <pattern>`. The pattern is used as given.
    pub fn like<P: Operand<String>>(&self, pattern: P) -> Condition {
        self.like_node(pattern.into_operand(&text()), None, false, false)
    }

    pub fn not_like<P: Operand<String>>(&self, pattern: P) -> Condition {
        self.like_node(pattern.into_operand(&text()), None, true, false)
    }

    /// `<field> like <pattern> escape '<escape>'`.
    pub fn like_escape<P: Operand<String>>(&self, pattern: P, escape: char) -> Condition {
        self.like_node(pattern.into_operand(&text()), Some(escape), false, false)
    }

    /// `ilike`, or `lower(..) like lower(..)` where unsupported.
    pub fn like_ignore_case<P: Operand<String>>(&self, pattern: P) -> Condition {
        self.like_node(pattern.into_operand(&text()), None, false, true)
    }

    pub fn not_like_ignore_case<P: Operand<String>>(&self, pattern: P) -> Condition {
        self.like_node(pattern.into_operand(&text()), None, true, true)
    }

    /// Substring match; `%`, `_` and `!` in `value` match literally.
    pub fn contains(&self, value: impl LikeOperand) -> Condition {
        self.like_node(value.into_pattern(true, true), Some(LIKE_ESCAPE), false, false)
    }

    pub fn starts_with(&self, value: impl LikeOperand) -> Condition {
        self.like_node(value.into_pattern(false, true), Some(LIKE_ESCAPE), false, false)
    }

    pub fn ends_with(&self, value: impl LikeOperand) -> Condition {
        self.like_node(value.into_pattern(true, false), Some(LIKE_ESCAPE), false, false)
    }
}
