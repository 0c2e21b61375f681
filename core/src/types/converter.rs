use core::fmt;

use crate::error::DataTypeError;

/// Two-way conversion between a database type `T` and a user type `U`.
///
/// Converters compose with a base data type through
/// [`DataType::as_converted_data_type`](super::DataType::as_converted_data_type).
/// Failures are reported as [`DataTypeError`], usually
/// [`DataTypeError::Converter`].
pub trait Converter<T, U>: Send + Sync + 'static {
    fn from(&self, database: T) -> Result<U, DataTypeError>;

    fn to(&self, user: &U) -> Result<T, DataTypeError>;
}

/// A [`Converter`] built from a pair of closures.
#[derive(Clone, Copy)]
pub struct FnConverter<F, G> {
    from: F,
    to: G,
}

impl<F, G> fmt::Debug for FnConverter<F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnConverter")
    }
}

impl<T, U, F, G> Converter<T, U> for FnConverter<F, G>
where
    F: Fn(T) -> Result<U, DataTypeError> + Send + Sync + 'static,
    G: Fn(&U) -> Result<T, DataTypeError> + Send + Sync + 'static,
{
    fn from(&self, database: T) -> Result<U, DataTypeError> {
        (self.from)(database)
    }

    fn to(&self, user: &U) -> Result<T, DataTypeError> {
        (self.to)(user)
    }
}

/// Build a converter from closures.
///
/// ```
/// use quill_core::types::{converter, sql_data_type};
///
/// let flag = sql_data_type::varchar().as_converted_data_type(converter(
///     |s: String| Ok(s == "Y"),
///     |b: &bool| Ok(if *b { "Y".to_string() } else { "N".to_string() }),
/// ));
/// assert!(flag.convert("Y").unwrap());
/// ```
pub fn converter<T, U, F, G>(from: F, to: G) -> FnConverter<F, G>
where
    F: Fn(T) -> Result<U, DataTypeError> + Send + Sync + 'static,
    G: Fn(&U) -> Result<T, DataTypeError> + Send + Sync + 'static,
{
    FnConverter { from, to }
}
