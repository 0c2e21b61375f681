//! Total conversion rules between wire values.
//!
//! `Value::coerce` maps any value onto the wire variant of a target
//! [`SqlTypeCode`], or reports why it cannot. NULL coerces to NULL for every
//! target; rejecting it is the decoder's job.

use core::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use quill_types::SqlTypeCode;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{DATE_FORMAT, TIME_FORMAT, TIMESTAMP_FORMAT, Value};
use crate::error::DataTypeError;

type Result<T> = core::result::Result<T, DataTypeError>;

impl Value {
    /// Convert this value to the wire variant of `to`.
    ///
    /// ```
    /// use quill_core::Value;
    /// use quill_types::SqlTypeCode;
    ///
    /// let v = Value::Text("42".into()).coerce(SqlTypeCode::Integer).unwrap();
    /// assert_eq!(v, Value::Int(42));
    /// assert!(Value::BigInt(1 << 40).coerce(SqlTypeCode::Integer).is_err());
    /// ```
    pub fn coerce(self, to: SqlTypeCode) -> Result<Value> {
        if self.is_null() {
            return Ok(Value::Null);
        }

        use SqlTypeCode as C;
        match to {
            C::TinyInt => {
                let v = self.to_i64(to)?;
                if i8::try_from(v).is_err() {
                    return Err(overflow(v, to));
                }
                Ok(Value::SmallInt(v as i16))
            }
            C::SmallInt => {
                let v = self.to_i64(to)?;
                i16::try_from(v)
                    .map(Value::SmallInt)
                    .map_err(|_| overflow(v, to))
            }
            C::Integer => {
                let v = self.to_i64(to)?;
                i32::try_from(v).map(Value::Int).map_err(|_| overflow(v, to))
            }
            C::BigInt => self.to_i64(to).map(Value::BigInt),
            C::Decimal | C::Numeric => self.to_decimal(to).map(Value::Decimal),
            C::Real => {
                let v = self.to_f64(to)?;
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return Err(overflow(v, to));
                }
                Ok(Value::Real(v as f32))
            }
            C::Double => self.to_f64(to).map(Value::Double),
            C::Char | C::VarChar | C::Clob | C::NChar | C::NVarChar => self.to_text(to).map(Value::Text),
            C::Binary | C::VarBinary | C::Blob => match self {
                Value::Bytes(b) => Ok(Value::Bytes(b)),
                Value::Text(s) => Ok(Value::Bytes(s.into_bytes())),
                other => Err(incompatible(&other, to)),
            },
            C::Boolean => self.to_bool(to).map(Value::Bool),
            C::Date => self.to_date(to).map(Value::Date),
            C::Time => self.to_time(to).map(Value::Time),
            C::Timestamp => self.to_timestamp(to).map(Value::Timestamp),
            C::TimestampWithTimeZone => self.to_timestamptz(to).map(Value::TimestampTz),
            C::IntervalYearToMonth | C::IntervalDayToSecond => self.to_interval(to).map(Value::Interval),
            C::Uuid => self.to_uuid(to),
            C::Json => match self {
                Value::Json(s) | Value::Text(s) => Ok(Value::Json(s)),
                other => other.to_text(to).map(Value::Json),
            },
            C::Enum => match self {
                Value::Enum(s) | Value::Text(s) => Ok(Value::Enum(s)),
                other => Err(incompatible(&other, to)),
            },
            C::Array => match self {
                Value::Array(items) => Ok(Value::Array(items)),
                other => Err(incompatible(&other, to)),
            },
            C::Struct | C::Other => Ok(self),
        }
    }

    /// Convert an array value element-wise to `element`.
    pub fn coerce_array(self, element: SqlTypeCode) -> Result<Value> {
        match self {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => items
                .into_iter()
                .map(|item| item.coerce(element))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Err(incompatible(&other, SqlTypeCode::Array)),
        }
    }

    fn to_i64(self, to: SqlTypeCode) -> Result<i64> {
        match self {
            Value::Bool(b) => Ok(i64::from(b)),
            Value::SmallInt(v) => Ok(i64::from(v)),
            Value::Int(v) => Ok(i64::from(v)),
            Value::BigInt(v) => Ok(v),
            Value::Real(v) => float_to_i64(f64::from(v), to),
            Value::Double(v) => float_to_i64(v, to),
            Value::Decimal(d) => {
                if !d.fract().is_zero() {
                    return Err(DataTypeError::Incompatible {
                        from: "fractional decimal",
                        to,
                    });
                }
                d.to_i64().ok_or_else(|| overflow(d, to))
            }
            Value::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .or_else(|_| {
                        // "12.0" is an integral value written as a decimal
                        Decimal::from_str(trimmed)
                            .ok()
                            .filter(|d| d.fract().is_zero())
                            .and_then(|d| d.to_i64())
                            .ok_or(())
                    })
                    .map_err(|()| parse(&s, to))
            }
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_f64(self, to: SqlTypeCode) -> Result<f64> {
        match self {
            Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            Value::SmallInt(v) => Ok(f64::from(v)),
            Value::Int(v) => Ok(f64::from(v)),
            Value::BigInt(v) => Ok(v as f64),
            Value::Real(v) => Ok(f64::from(v)),
            Value::Double(v) => Ok(v),
            Value::Decimal(d) => d.to_f64().ok_or_else(|| overflow(d, to)),
            Value::Text(s) => s.trim().parse::<f64>().map_err(|_| parse(&s, to)),
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_decimal(self, to: SqlTypeCode) -> Result<Decimal> {
        match self {
            Value::Bool(b) => Ok(Decimal::from(u8::from(b))),
            Value::SmallInt(v) => Ok(Decimal::from(v)),
            Value::Int(v) => Ok(Decimal::from(v)),
            Value::BigInt(v) => Ok(Decimal::from(v)),
            Value::Real(v) => Decimal::try_from(v).map_err(|_| overflow(v, to)),
            Value::Double(v) => Decimal::try_from(v).map_err(|_| overflow(v, to)),
            Value::Decimal(d) => Ok(d),
            Value::Text(s) => Decimal::from_str(s.trim()).map_err(|_| parse(&s, to)),
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_bool(self, to: SqlTypeCode) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::SmallInt(_) | Value::Int(_) | Value::BigInt(_) | Value::Decimal(_) => {
                match self.to_i64(to)? {
                    0 => Ok(false),
                    1 => Ok(true),
                    v => Err(overflow(v, to)),
                }
            }
            Value::Text(s) => parse_bool(&s).ok_or_else(|| parse(&s, to)),
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_text(self, to: SqlTypeCode) -> Result<String> {
        match self {
            Value::Text(s) => Ok(s),
            other => other.text_form().ok_or_else(|| DataTypeError::Incompatible {
                from: "array",
                to,
            }),
        }
    }

    fn to_date(self, to: SqlTypeCode) -> Result<NaiveDate> {
        match self {
            Value::Date(d) => Ok(d),
            Value::Timestamp(ts) => Ok(ts.date()),
            Value::TimestampTz(ts) => Ok(ts.naive_utc().date()),
            Value::Text(s) => {
                NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| parse(&s, to))
            }
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_time(self, to: SqlTypeCode) -> Result<NaiveTime> {
        match self {
            Value::Time(t) => Ok(t),
            Value::Timestamp(ts) => Ok(ts.time()),
            Value::TimestampTz(ts) => Ok(ts.naive_utc().time()),
            Value::Text(s) => {
                NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|_| parse(&s, to))
            }
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_timestamp(self, to: SqlTypeCode) -> Result<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Ok(ts),
            Value::Date(d) => d.and_hms_opt(0, 0, 0).ok_or(DataTypeError::Incompatible {
                from: "date",
                to,
            }),
            Value::TimestampTz(ts) => Ok(ts.naive_utc()),
            Value::Text(s) => parse_timestamp(s.trim())
                .or_else(|| DateTime::parse_from_rfc3339(s.trim()).ok().map(|ts| ts.naive_utc()))
                .ok_or_else(|| parse(&s, to)),
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_timestamptz(self, to: SqlTypeCode) -> Result<DateTime<FixedOffset>> {
        match self {
            Value::TimestampTz(ts) => Ok(ts),
            Value::Timestamp(ts) => Ok(ts.and_utc().fixed_offset()),
            Value::Date(_) => self.to_timestamp(to).map(|ts| ts.and_utc().fixed_offset()),
            Value::Text(s) => {
                let trimmed = s.trim();
                DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .or_else(|| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z").ok())
                    .or_else(|| parse_timestamp(trimmed).map(|ts| ts.and_utc().fixed_offset()))
                    .ok_or_else(|| parse(&s, to))
            }
            other => Err(incompatible(&other, to)),
        }
    }

    fn to_interval(self, to: SqlTypeCode) -> Result<TimeDelta> {
        match self {
            Value::Interval(d) => Ok(d),
            Value::SmallInt(_) | Value::Int(_) | Value::BigInt(_) => {
                let seconds = self.to_i64(to)?;
                TimeDelta::try_seconds(seconds).ok_or_else(|| overflow(seconds, to))
            }
            other => Err(incompatible(&other, to)),
        }
    }

    #[cfg(feature = "uuid")]
    fn to_uuid(self, to: SqlTypeCode) -> Result<Value> {
        match self {
            Value::Uuid(u) => Ok(Value::Uuid(u)),
            Value::Text(s) => uuid::Uuid::parse_str(s.trim())
                .map(Value::Uuid)
                .map_err(|_| parse(&s, to)),
            Value::Bytes(b) => uuid::Uuid::from_slice(&b)
                .map(Value::Uuid)
                .map_err(|_| DataTypeError::Incompatible { from: "bytes", to }),
            other => Err(incompatible(&other, to)),
        }
    }

    #[cfg(not(feature = "uuid"))]
    fn to_uuid(self, to: SqlTypeCode) -> Result<Value> {
        match self {
            Value::Text(s) => Ok(Value::Text(s)),
            other => Err(incompatible(&other, to)),
        }
    }
}

fn float_to_i64(v: f64, to: SqlTypeCode) -> Result<i64> {
    if v.fract() != 0.0 {
        return Err(DataTypeError::Incompatible {
            from: "fractional number",
            to,
        });
    }
    // i64::MAX is not representable as f64; the upper bound is exclusive
    if !v.is_finite() || v < i64::MIN as f64 || v >= i64::MAX as f64 {
        return Err(overflow(v, to));
    }
    Ok(v as i64)
}

fn parse_bool(s: &str) -> Option<bool> {
    const TRUE: &[&str] = &["true", "t", "1", "yes", "y", "on"];
    const FALSE: &[&str] = &["false", "f", "0", "no", "n", "off"];

    let s = s.trim();
    if TRUE.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE.iter().any(|f| s.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

fn incompatible(value: &Value, to: SqlTypeCode) -> DataTypeError {
    DataTypeError::Incompatible {
        from: value.kind(),
        to,
    }
}

fn parse(input: &str, to: SqlTypeCode) -> DataTypeError {
    DataTypeError::Parse {
        input: input.to_string(),
        to,
    }
}

fn overflow(value: impl ToString, to: SqlTypeCode) -> DataTypeError {
    DataTypeError::Overflow {
        value: value.to_string(),
        to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_widening_and_narrowing() {
        assert_eq!(
            Value::SmallInt(7).coerce(SqlTypeCode::BigInt).unwrap(),
            Value::BigInt(7)
        );
        assert_eq!(
            Value::BigInt(300).coerce(SqlTypeCode::SmallInt).unwrap(),
            Value::SmallInt(300)
        );
        assert!(matches!(
            Value::BigInt(300).coerce(SqlTypeCode::TinyInt),
            Err(DataTypeError::Overflow { .. })
        ));
        assert!(matches!(
            Value::BigInt(i64::from(i32::MAX) + 1).coerce(SqlTypeCode::Integer),
            Err(DataTypeError::Overflow { .. })
        ));
    }

    #[test]
    fn floats_become_integers_only_when_integral() {
        assert_eq!(
            Value::Double(3.0).coerce(SqlTypeCode::Integer).unwrap(),
            Value::Int(3)
        );
        assert!(matches!(
            Value::Double(3.5).coerce(SqlTypeCode::Integer),
            Err(DataTypeError::Incompatible { .. })
        ));
        assert!(Value::Double(f64::NAN).coerce(SqlTypeCode::BigInt).is_err());
    }

    #[test]
    fn decimals() {
        let d = Value::Text("10.25".into()).coerce(SqlTypeCode::Decimal).unwrap();
        assert_eq!(d, Value::Decimal(Decimal::new(1025, 2)));
        assert_eq!(
            Value::Decimal(Decimal::new(1200, 2)).coerce(SqlTypeCode::Integer).unwrap(),
            Value::Int(12)
        );
        assert_eq!(
            Value::Int(5).coerce(SqlTypeCode::Numeric).unwrap(),
            Value::Decimal(Decimal::from(5))
        );
    }

    #[test]
    fn booleans() {
        for (input, expected) in [("yes", true), ("OFF", false), ("t", true), ("0", false)] {
            assert_eq!(
                Value::Text(input.into()).coerce(SqlTypeCode::Boolean).unwrap(),
                Value::Bool(expected),
                "{input}"
            );
        }
        assert_eq!(
            Value::Int(1).coerce(SqlTypeCode::Boolean).unwrap(),
            Value::Bool(true)
        );
        assert!(Value::Int(2).coerce(SqlTypeCode::Boolean).is_err());
        assert!(matches!(
            Value::Text("maybe".into()).coerce(SqlTypeCode::Boolean),
            Err(DataTypeError::Parse { .. })
        ));
        assert_eq!(
            Value::Bool(true).coerce(SqlTypeCode::Integer).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn temporal() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let midnight = date.and_hms_opt(0, 0, 0).unwrap();

        assert_eq!(
            Value::Date(date).coerce(SqlTypeCode::Timestamp).unwrap(),
            Value::Timestamp(midnight)
        );
        assert_eq!(
            Value::Text("2024-02-29".into()).coerce(SqlTypeCode::Date).unwrap(),
            Value::Date(date)
        );
        assert_eq!(
            Value::Text("2024-02-29T00:00:00".into())
                .coerce(SqlTypeCode::Timestamp)
                .unwrap(),
            Value::Timestamp(midnight)
        );

        let tz = DateTime::parse_from_rfc3339("2024-02-29T02:00:00+02:00").unwrap();
        assert_eq!(
            Value::TimestampTz(tz).coerce(SqlTypeCode::Timestamp).unwrap(),
            Value::Timestamp(midnight)
        );
        assert_eq!(
            Value::Timestamp(midnight)
                .coerce(SqlTypeCode::TimestampWithTimeZone)
                .unwrap(),
            Value::TimestampTz(midnight.and_utc().fixed_offset())
        );
        assert!(matches!(
            Value::Text("29/02/2024".into()).coerce(SqlTypeCode::Date),
            Err(DataTypeError::Parse { .. })
        ));
    }

    #[test]
    fn anything_to_text() {
        assert_eq!(
            Value::Int(42).coerce(SqlTypeCode::VarChar).unwrap(),
            Value::Text("42".into())
        );
        assert_eq!(
            Value::Bool(false).coerce(SqlTypeCode::Clob).unwrap(),
            Value::Text("false".into())
        );
        assert_eq!(
            Value::Text("ab".into()).coerce(SqlTypeCode::Blob).unwrap(),
            Value::Bytes(b"ab".to_vec())
        );
    }

    #[test]
    fn null_stays_null() {
        for code in SqlTypeCode::ALL {
            assert_eq!(Value::Null.coerce(code).unwrap(), Value::Null);
        }
    }

    #[test]
    fn arrays_convert_element_wise() {
        let v = Value::Array(vec![Value::Text("1".into()), Value::Int(2), Value::Null]);
        assert_eq!(
            v.coerce_array(SqlTypeCode::BigInt).unwrap(),
            Value::Array(vec![Value::BigInt(1), Value::BigInt(2), Value::Null])
        );
        let bad = Value::Array(vec![Value::Text("x".into())]);
        assert!(bad.coerce_array(SqlTypeCode::Integer).is_err());
    }

    #[test]
    fn incompatible_is_reported_not_panicked() {
        let err = Value::Bytes(vec![1]).coerce(SqlTypeCode::Date).unwrap_err();
        assert_eq!(
            err,
            DataTypeError::Incompatible {
                from: "bytes",
                to: SqlTypeCode::Date
            }
        );
    }
}
