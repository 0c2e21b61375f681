//! Free-standing expression constructors: bind values, plain SQL and scalar
//! functions.

use compact_str::CompactString;

use super::{Condition, Expr, Field, FunctionCall, FunctionKind, IntoField, Operand, Param, PlainSql};
use crate::name::Name;
use crate::types::{DataType, SqlValue, sql_data_type};
use crate::value::Value;

// =============================================================================
// Values
// =============================================================================

/// Bind value of `T`'s native type.
pub fn val<T: SqlValue>(value: T) -> Field<T> {
    let data_type = T::data_type();
    Field::new(Expr::Param(Param::new(value, &data_type)), data_type)
}

/// Value always rendered as a literal.
pub fn inline<T: SqlValue>(value: T) -> Field<T> {
    let data_type = T::data_type();
    Field::new(Expr::Param(Param::inlined(value, &data_type)), data_type)
}

/// Named bind value.
pub fn param<T: SqlValue>(name: impl Into<CompactString>, value: T) -> Field<T> {
    let data_type = T::data_type();
    Field::new(
        Expr::Param(Param::new(value, &data_type).with_name(name)),
        data_type,
    )
}

/// Named parameter without a value, bound after rendering through
/// `RenderedQuery::bind_named`.
pub fn placeholder<T: SqlValue>(name: impl Into<CompactString>) -> Field<T> {
    let data_type = T::data_type();
    Field::new(
        Expr::Param(Param::placeholder(name, data_type.info().clone())),
        data_type,
    )
}

/// `DEFAULT` as an INSERT or UPDATE value.
pub fn default_value<T: SqlValue>() -> Field<T> {
    Field::new(Expr::Default, T::data_type())
}

/// The proposed value of `column` inside an upsert's update clause.
///
/// Renders `excluded.<column>`, or `values(<column>)` on MySQL.
pub fn excluded<T: 'static>(column: &Field<T>) -> Field<T> {
    let name = column.name().cloned().unwrap_or_else(|| Name::new(""));
    Field::new(Expr::Excluded(name), column.data_type().clone())
}

/// Array constructor.
pub fn array<T: SqlValue>(values: impl IntoIterator<Item = T>) -> Field<Vec<T>> {
    let element = T::data_type();
    let items = values
        .into_iter()
        .map(|v| Expr::Param(Param::new(v, &element)))
        .collect();
    Field::new(Expr::Array(items), element.as_array())
}

// =============================================================================
// Plain SQL
// =============================================================================

/// Plain SQL field, rendered verbatim.
///
/// The text is not parsed or quoted. Comparisons against an untyped field
/// accept any natively mapped value.
pub fn field(sql: &str) -> Field<Value> {
    plain(sql, Vec::new())
}

/// Plain SQL fragment, rendered verbatim.
pub fn sql(template: &str) -> Field<Value> {
    plain(template, Vec::new())
}

/// Plain SQL with `{0}`, `{1}`, .. replaced by rendered arguments.
///
/// ```
/// use quill_core::expr::{sql_with, val};
///
/// let f = sql_with("date_trunc('day', {0})", [val(1)]);
/// ```
pub fn sql_with<I, E>(template: &str, args: I) -> Field<Value>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    plain(template, args.into_iter().map(Into::into).collect())
}

/// Plain SQL condition with `{n}` argument placeholders.
pub fn sql_condition<I, E>(template: &str, args: I) -> Condition
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Condition::new(sql_with(template, args).into_expr())
}

fn plain(template: &str, args: Vec<Expr>) -> Field<Value> {
    Field::new(
        Expr::Sql(PlainSql {
            template: template.into(),
            args,
        }),
        sql_data_type::other(),
    )
}

// =============================================================================
// Functions
// =============================================================================

pub(crate) fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function(Box::new(FunctionCall {
        name: name.into(),
        args,
        kind: FunctionKind::Scalar,
        distinct: false,
        filter: None,
        over: None,
    }))
}

fn arg<F: IntoField>(field: F) -> (Expr, DataType<F::Type>) {
    let field = field.into_field();
    let data_type = field.data_type().clone();
    (field.into_expr().unaliased(), data_type)
}

/// Call an arbitrary scalar function returning `T`.
pub fn function<T, I, E>(name: &str, args: I) -> Field<T>
where
    T: SqlValue,
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    let args = args.into_iter().map(|e| e.into().unaliased()).collect();
    Field::new(call(name, args), T::data_type())
}

/// `coalesce(<field>, <fallback>)`.
pub fn coalesce<F: IntoField, O: Operand<F::Type>>(field: F, fallback: O) -> Field<F::Type> {
    let (first, data_type) = arg(field);
    let fallback = fallback.into_operand(&data_type);
    Field::new(call("coalesce", vec![first, fallback]), data_type)
}

/// `nullif(<field>, <other>)`.
pub fn nullif<F: IntoField, O: Operand<F::Type>>(field: F, other: O) -> Field<F::Type> {
    let (first, data_type) = arg(field);
    let other = other.into_operand(&data_type);
    Field::new(call("nullif", vec![first, other]), data_type)
}

pub fn lower<F: IntoField>(field: F) -> Field<String> {
    Field::new(call("lower", vec![arg(field).0]), sql_data_type::varchar())
}

pub fn upper<F: IntoField>(field: F) -> Field<String> {
    Field::new(call("upper", vec![arg(field).0]), sql_data_type::varchar())
}

pub fn trim<F: IntoField>(field: F) -> Field<String> {
    Field::new(call("trim", vec![arg(field).0]), sql_data_type::varchar())
}

/// Character length; `len` on SQL Server and Sybase.
pub fn length<F: IntoField>(field: F) -> Field<i32> {
    Field::new(call("length", vec![arg(field).0]), sql_data_type::integer())
}

/// `substring(<field>, <start>, <len>)` with a 1-based start.
pub fn substring<F: IntoField>(field: F, start: i32, len: i32) -> Field<String> {
    let int = sql_data_type::integer();
    Field::new(
        call(
            "substring",
            vec![
                arg(field).0,
                Expr::Param(Param::new(start, &int)),
                Expr::Param(Param::new(len, &int)),
            ],
        ),
        sql_data_type::varchar(),
    )
}

/// `replace(<field>, <search>, <replacement>)`.
pub fn replace<F, S, R>(field: F, search: S, replacement: R) -> Field<String>
where
    F: IntoField,
    S: Operand<String>,
    R: Operand<String>,
{
    let text = sql_data_type::varchar();
    Field::new(
        call(
            "replace",
            vec![
                arg(field).0,
                search.into_operand(&text),
                replacement.into_operand(&text),
            ],
        ),
        text,
    )
}

pub fn abs<F: IntoField>(field: F) -> Field<F::Type> {
    let (expr, data_type) = arg(field);
    Field::new(call("abs", vec![expr]), data_type)
}

/// `round(<field>, <decimals>)`.
pub fn round<F: IntoField>(field: F, decimals: i32) -> Field<F::Type> {
    let (expr, data_type) = arg(field);
    let decimals = Expr::Param(Param::new(decimals, &sql_data_type::integer()));
    Field::new(call("round", vec![expr, decimals]), data_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn untyped_fields_accept_native_values() {
        let cond = field("x").eq(1);
        match cond.expr() {
            Expr::Compare { left, right, .. } => {
                assert!(matches!(**left, Expr::Sql(_)));
                match &**right {
                    Expr::Param(p) => assert_eq!(p.wire_value().unwrap(), Value::Int(1)),
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
        let _ = field("y").eq("text").and(field("z").lt(2.5));
    }

    #[test]
    fn coalesce_keeps_type() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        let c = coalesce(&a, 0);
        assert_eq!(c.data_type().code(), a.data_type().code());
        assert!(matches!(c.expr(), Expr::Function(f) if f.name == "coalesce" && f.args.len() == 2));
    }

    #[test]
    fn placeholders_have_no_value() {
        let p = placeholder::<i64>("id");
        match p.expr() {
            Expr::Param(p) => {
                assert_eq!(p.name(), Some("id"));
                assert!(!p.has_value());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn excluded_uses_column_name() {
        let t = Table::new("t");
        let a: Field<i32> = t.column("a");
        assert!(matches!(excluded(&a).expr(), Expr::Excluded(n) if n.as_str() == "a"));
    }
}
