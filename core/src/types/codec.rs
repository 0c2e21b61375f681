use core::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use quill_types::SqlTypeCode;
use rust_decimal::Decimal;

use super::{Converter, DataType};
use crate::error::DataTypeError;
use crate::value::Value;

type Result<T> = core::result::Result<T, DataTypeError>;

/// Encodes `T` into a wire [`Value`] and decodes it back.
pub trait ValueCodec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<Value>;
    fn decode(&self, value: Value) -> Result<T>;
}

/// Application types with a native wire mapping.
///
/// Implemented for the primitive, text, binary, decimal and chrono types,
/// for `Option<T>` and for [`Value`] itself (untyped fields).
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no native SQL mapping",
    label = "attach a DataType with a converter instead"
)]
pub trait SqlValue: Sized + Send + Sync + 'static {
    const TYPE_CODE: SqlTypeCode;

    /// Default data type for this application type.
    fn data_type() -> DataType<Self> {
        DataType::native(Self::TYPE_CODE)
    }

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

pub(crate) struct NativeCodec<T>(PhantomData<fn() -> T>);

impl<T: SqlValue> NativeCodec<T> {
    pub(crate) fn shared() -> Arc<dyn ValueCodec<T>> {
        Arc::new(NativeCodec(PhantomData))
    }
}

impl<T: SqlValue> ValueCodec<T> for NativeCodec<T> {
    fn encode(&self, value: &T) -> Result<Value> {
        Ok(value.to_value())
    }

    fn decode(&self, value: Value) -> Result<T> {
        T::from_value(value)
    }
}

macro_rules! impl_sql_value {
    ($($ty:ty => $code:ident, $variant:ident;)*) => {
        $(
            impl SqlValue for $ty {
                const TYPE_CODE: SqlTypeCode = SqlTypeCode::$code;

                fn to_value(&self) -> Value {
                    Value::$variant(ToOwned::to_owned(self))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value.coerce(Self::TYPE_CODE)? {
                        Value::$variant(v) => Ok(v),
                        Value::Null => Err(DataTypeError::UnexpectedNull {
                            to: Self::TYPE_CODE,
                        }),
                        other => Err(DataTypeError::Incompatible {
                            from: other.kind(),
                            to: Self::TYPE_CODE,
                        }),
                    }
                }
            }
        )*
    };
}

impl_sql_value! {
    bool => Boolean, Bool;
    i16 => SmallInt, SmallInt;
    i32 => Integer, Int;
    i64 => BigInt, BigInt;
    f32 => Real, Real;
    f64 => Double, Double;
    Decimal => Decimal, Decimal;
    String => VarChar, Text;
    Vec<u8> => VarBinary, Bytes;
    NaiveDate => Date, Date;
    NaiveTime => Time, Time;
    NaiveDateTime => Timestamp, Timestamp;
    DateTime<FixedOffset> => TimestampWithTimeZone, TimestampTz;
    TimeDelta => IntervalDayToSecond, Interval;
}

#[cfg(feature = "uuid")]
impl_sql_value! {
    uuid::Uuid => Uuid, Uuid;
}

impl SqlValue for Value {
    const TYPE_CODE: SqlTypeCode = SqlTypeCode::Other;

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: SqlValue> SqlValue for Option<T> {
    const TYPE_CODE: SqlTypeCode = T::TYPE_CODE;

    fn data_type() -> DataType<Self> {
        T::data_type().as_optional()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, SqlValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

pub(crate) struct OptionCodec<T> {
    inner: Arc<dyn ValueCodec<T>>,
}

impl<T> OptionCodec<T> {
    pub(crate) fn new(inner: Arc<dyn ValueCodec<T>>) -> Self {
        Self { inner }
    }
}

impl<T> ValueCodec<Option<T>> for OptionCodec<T> {
    fn encode(&self, value: &Option<T>) -> Result<Value> {
        match value {
            Some(v) => self.inner.encode(v),
            None => Ok(Value::Null),
        }
    }

    fn decode(&self, value: Value) -> Result<Option<T>> {
        match value {
            Value::Null => Ok(None),
            value => self.inner.decode(value).map(Some),
        }
    }
}

pub(crate) struct ArrayCodec<T> {
    element: Arc<dyn ValueCodec<T>>,
}

impl<T> ArrayCodec<T> {
    pub(crate) fn new(element: Arc<dyn ValueCodec<T>>) -> Self {
        Self { element }
    }
}

impl<T> ValueCodec<Vec<T>> for ArrayCodec<T> {
    fn encode(&self, value: &Vec<T>) -> Result<Value> {
        value
            .iter()
            .map(|item| self.element.encode(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode(&self, value: Value) -> Result<Vec<T>> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.element.decode(item))
                .collect(),
            Value::Null => Err(DataTypeError::UnexpectedNull {
                to: SqlTypeCode::Array,
            }),
            other => Err(DataTypeError::Incompatible {
                from: other.kind(),
                to: SqlTypeCode::Array,
            }),
        }
    }
}

pub(crate) struct ConvertedCodec<T, U, C> {
    inner: Arc<dyn ValueCodec<T>>,
    converter: C,
    _user: PhantomData<fn() -> U>,
}

impl<T, U, C> ConvertedCodec<T, U, C> {
    pub(crate) fn new(inner: Arc<dyn ValueCodec<T>>, converter: C) -> Self {
        Self {
            inner,
            converter,
            _user: PhantomData,
        }
    }
}

impl<T, U, C> ValueCodec<U> for ConvertedCodec<T, U, C>
where
    C: Converter<T, U>,
{
    fn encode(&self, value: &U) -> Result<Value> {
        let database = self.converter.to(value)?;
        self.inner.encode(&database)
    }

    fn decode(&self, value: Value) -> Result<U> {
        let database = self.inner.decode(value)?;
        self.converter.from(database)
    }
}
