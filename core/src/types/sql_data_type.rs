//! Standard SQL data types.
//!
//! Each function returns a fresh immutable [`DataType`] with no precision,
//! scale or length defined. Derive sized variants with the `with_*` methods.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use quill_types::SqlTypeCode;
use rust_decimal::Decimal;

use super::{DataType, DataTypeInfo, SqlValue};
use crate::value::Value;

macro_rules! standard_types {
    ($($(#[$meta:meta])* $name:ident => $ty:ty, $code:ident;)*) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $name() -> DataType<$ty> {
                DataType::native(SqlTypeCode::$code)
            }
        )*
    };
}

standard_types! {
    tinyint => i16, TinyInt;
    smallint => i16, SmallInt;
    integer => i32, Integer;
    bigint => i64, BigInt;
    decimal => Decimal, Decimal;
    numeric => Decimal, Numeric;
    real => f32, Real;
    double => f64, Double;
    char => String, Char;
    varchar => String, VarChar;
    clob => String, Clob;
    nchar => String, NChar;
    nvarchar => String, NVarChar;
    binary => Vec<u8>, Binary;
    varbinary => Vec<u8>, VarBinary;
    blob => Vec<u8>, Blob;
    boolean => bool, Boolean;
    date => NaiveDate, Date;
    time => NaiveTime, Time;
    timestamp => NaiveDateTime, Timestamp;
    timestamp_with_time_zone => DateTime<FixedOffset>, TimestampWithTimeZone;
    interval_day_to_second => TimeDelta, IntervalDayToSecond;
    /// Encoded as the JSON document text
    json => String, Json;
    /// Untyped values
    other => Value, Other;
}

/// Enum type with a database-side type name.
#[must_use]
pub fn enum_type(type_name: &str) -> DataType<String> {
    DataType::new(
        DataTypeInfo::named(SqlTypeCode::Enum, type_name),
        super::codec::NativeCodec::<String>::shared(),
    )
}

/// User defined type carried as an untyped value.
#[must_use]
pub fn udt(type_name: &str) -> DataType<Value> {
    DataType::new(
        DataTypeInfo::named(SqlTypeCode::Struct, type_name),
        super::codec::NativeCodec::<Value>::shared(),
    )
}

#[cfg(feature = "uuid")]
#[must_use]
pub fn uuid() -> DataType<uuid::Uuid> {
    <uuid::Uuid as SqlValue>::data_type()
}

/// Data type of `T`'s native mapping.
#[must_use]
pub fn of<T: SqlValue>() -> DataType<T> {
    T::data_type()
}
