//! Aggregate functions.
//!
//! An [`AggregateFunction<T>`] dereferences to the plain aggregate field, so
//! it can be compared, sorted or selected directly. [`filter_where`] adds a
//! FILTER clause and [`over`] turns it into a window aggregate.
//!
//! [`filter_where`]: AggregateFunction::filter_where
//! [`over`]: AggregateFunction::over

use core::fmt;
use core::ops::Deref;

use rust_decimal::Decimal;

use super::{Condition, Expr, Field, FunctionCall, FunctionKind, IntoField, Over};
use crate::name::Name;
use crate::types::{DataType, sql_data_type};

pub struct AggregateFunction<T> {
    call: FunctionCall,
    field: Field<T>,
}

impl<T> Clone for AggregateFunction<T> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            field: self.field.clone(),
        }
    }
}

impl<T> fmt::Debug for AggregateFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateFunction")
            .field("call", &self.call)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> AggregateFunction<T> {
    fn new(name: &str, args: Vec<Expr>, distinct: bool, data_type: DataType<T>) -> Self {
        let call = FunctionCall {
            name: name.into(),
            args,
            kind: FunctionKind::Aggregate,
            distinct,
            filter: None,
            over: None,
        };
        Self::from_call(call, data_type)
    }

    fn from_call(call: FunctionCall, data_type: DataType<T>) -> Self {
        let field = Field::new(Expr::Function(Box::new(call.clone())), data_type);
        Self { call, field }
    }

    /// `<aggregate> filter (where <condition>)`.
    #[must_use]
    pub fn filter_where(self, condition: impl Into<Condition>) -> Self {
        let condition = condition.into();
        let mut call = self.call;
        call.filter = if condition.is_none() {
            None
        } else {
            Some(condition.into_expr())
        };
        Self::from_call(call, self.field.data_type().clone())
    }

    /// Window aggregate: `<aggregate> over (<spec>)`.
    pub fn over(self, over: impl Into<Over>) -> Field<T> {
        let mut call = self.call;
        call.over = Some(over.into());
        Field::new(Expr::Function(Box::new(call)), self.field.data_type().clone())
    }

    pub fn over_named(self, name: impl Into<Name>) -> Field<T> {
        self.over(Over::Named(name.into()))
    }

    pub fn as_field(&self) -> Field<T> {
        self.field.clone()
    }
}

impl<T> Deref for AggregateFunction<T> {
    type Target = Field<T>;

    fn deref(&self) -> &Field<T> {
        &self.field
    }
}

impl<T: 'static> IntoField for AggregateFunction<T> {
    type Type = T;

    fn into_field(self) -> Field<T> {
        self.field
    }
}

impl<T: 'static> IntoField for &AggregateFunction<T> {
    type Type = T;

    fn into_field(self) -> Field<T> {
        self.field.clone()
    }
}

impl<T> From<AggregateFunction<T>> for Expr {
    fn from(agg: AggregateFunction<T>) -> Self {
        agg.field.into()
    }
}

fn argument<F: IntoField>(field: F) -> (Expr, DataType<F::Type>) {
    let field = field.into_field();
    let data_type = field.data_type().clone();
    (field.into_expr().unaliased(), data_type)
}

/// `count(<field>)`.
pub fn count<F: IntoField>(field: F) -> AggregateFunction<i64> {
    let (arg, _) = argument(field);
    AggregateFunction::new("count", vec![arg], false, sql_data_type::bigint())
}

/// `count(*)`.
pub fn count_star() -> AggregateFunction<i64> {
    AggregateFunction::new(
        "count",
        vec![Expr::Asterisk(None)],
        false,
        sql_data_type::bigint(),
    )
}

/// `count(distinct <field>)`.
pub fn count_distinct<F: IntoField>(field: F) -> AggregateFunction<i64> {
    let (arg, _) = argument(field);
    AggregateFunction::new("count", vec![arg], true, sql_data_type::bigint())
}

/// `sum(<field>)` as a decimal.
pub fn sum<F: IntoField>(field: F) -> AggregateFunction<Decimal> {
    let (arg, _) = argument(field);
    AggregateFunction::new("sum", vec![arg], false, sql_data_type::numeric())
}

/// `avg(<field>)` as a decimal.
pub fn avg<F: IntoField>(field: F) -> AggregateFunction<Decimal> {
    let (arg, _) = argument(field);
    AggregateFunction::new("avg", vec![arg], false, sql_data_type::numeric())
}

pub fn min<F: IntoField>(field: F) -> AggregateFunction<F::Type> {
    let (arg, data_type) = argument(field);
    AggregateFunction::new("min", vec![arg], false, data_type)
}

pub fn max<F: IntoField>(field: F) -> AggregateFunction<F::Type> {
    let (arg, data_type) = argument(field);
    AggregateFunction::new("max", vec![arg], false, data_type)
}
