use quill_core::expr::{Expr, Param, ParamMode};
use quill_core::name::QualifiedName;
use quill_core::query::{Call, Statement};
use quill_core::types::{DataType, SqlValue};

use super::ToStatement;

/// Builds a stored procedure call.
///
/// Arguments are IN values by default; [`out`](Self::out) and
/// [`in_out`](Self::in_out) add markers that are registered on the
/// statement when binding.
///
/// ```
/// use quill::prelude::*;
///
/// let query = call("add_user").arg(val(String::from("ada"))).out::<i32>();
///
/// let rendered = DslContext::new(Dialect::SqlServer).render(&query)?;
/// assert_eq!(rendered.sql(), "exec [add_user] ?, ?");
/// assert_eq!(rendered.out_parameters().len(), 1);
/// # Ok::<(), quill::QuillError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CallBuilder {
    call: Call,
}

impl CallBuilder {
    pub(crate) fn new(name: impl Into<QualifiedName>) -> Self {
        CallBuilder {
            call: Call::new(name),
        }
    }

    /// An IN argument.
    pub fn arg(mut self, value: impl Into<Expr>) -> Self {
        self.call.args.push(value.into());
        self
    }

    /// An OUT argument of the default data type for `T`.
    pub fn out<T: SqlValue>(self) -> Self {
        self.out_of(&T::data_type())
    }

    /// An OUT argument of an explicit data type.
    pub fn out_of<T: 'static>(mut self, data_type: &DataType<T>) -> Self {
        self.call
            .args
            .push(Expr::Param(Param::out(data_type.info().clone())));
        self
    }

    /// An INOUT argument: bound on the way in and registered for the way out.
    pub fn in_out<T: SqlValue>(mut self, value: T) -> Self {
        let param = Param::new(value, &T::data_type()).with_mode(ParamMode::InOut);
        self.call.args.push(Expr::Param(param));
        self
    }

    pub fn query(&self) -> &Call {
        &self.call
    }

    pub fn into_call(self) -> Call {
        self.call
    }
}

impl From<CallBuilder> for Statement {
    fn from(builder: CallBuilder) -> Self {
        Statement::Call(builder.call)
    }
}

impl ToStatement for CallBuilder {
    fn to_statement(&self) -> Statement {
        Statement::Call(self.call.clone())
    }
}
