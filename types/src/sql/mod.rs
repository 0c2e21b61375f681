//! SQL type codes and their classification.
//!
//! [`SqlTypeCode`] identifies the semantic SQL type of a column, literal or
//! bind value. [`TypeCategory`] is the mutually exclusive classification
//! derived from it; every classification predicate in `quill-core` is a pure
//! function of the code through [`SqlTypeCode::category`].

use crate::Dialect;

/// JDBC-like SQL type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SqlTypeCode {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Numeric,
    Real,
    Double,
    Char,
    VarChar,
    Clob,
    NChar,
    NVarChar,
    Binary,
    VarBinary,
    Blob,
    Boolean,
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
    IntervalYearToMonth,
    IntervalDayToSecond,
    Array,
    /// User defined (structured) type
    Struct,
    Enum,
    Json,
    Uuid,
    Other,
}

/// Mutually exclusive classification of a [`SqlTypeCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TypeCategory {
    Numeric,
    String,
    Date,
    Time,
    Timestamp,
    Interval,
    Binary,
    Boolean,
    Array,
    Udt,
    Enum,
    Json,
    Uuid,
    Other,
}

impl TypeCategory {
    /// Date, time and timestamp types.
    #[inline]
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            TypeCategory::Date | TypeCategory::Time | TypeCategory::Timestamp
        )
    }
}

impl SqlTypeCode {
    /// Every type code, in declaration order.
    pub const ALL: [SqlTypeCode; 29] = [
        SqlTypeCode::TinyInt,
        SqlTypeCode::SmallInt,
        SqlTypeCode::Integer,
        SqlTypeCode::BigInt,
        SqlTypeCode::Decimal,
        SqlTypeCode::Numeric,
        SqlTypeCode::Real,
        SqlTypeCode::Double,
        SqlTypeCode::Char,
        SqlTypeCode::VarChar,
        SqlTypeCode::Clob,
        SqlTypeCode::NChar,
        SqlTypeCode::NVarChar,
        SqlTypeCode::Binary,
        SqlTypeCode::VarBinary,
        SqlTypeCode::Blob,
        SqlTypeCode::Boolean,
        SqlTypeCode::Date,
        SqlTypeCode::Time,
        SqlTypeCode::Timestamp,
        SqlTypeCode::TimestampWithTimeZone,
        SqlTypeCode::IntervalYearToMonth,
        SqlTypeCode::IntervalDayToSecond,
        SqlTypeCode::Array,
        SqlTypeCode::Struct,
        SqlTypeCode::Enum,
        SqlTypeCode::Json,
        SqlTypeCode::Uuid,
        SqlTypeCode::Other,
    ];

    /// Classification of this type code.
    #[must_use]
    pub const fn category(self) -> TypeCategory {
        match self {
            SqlTypeCode::TinyInt
            | SqlTypeCode::SmallInt
            | SqlTypeCode::Integer
            | SqlTypeCode::BigInt
            | SqlTypeCode::Decimal
            | SqlTypeCode::Numeric
            | SqlTypeCode::Real
            | SqlTypeCode::Double => TypeCategory::Numeric,
            SqlTypeCode::Char
            | SqlTypeCode::VarChar
            | SqlTypeCode::Clob
            | SqlTypeCode::NChar
            | SqlTypeCode::NVarChar => TypeCategory::String,
            SqlTypeCode::Binary | SqlTypeCode::VarBinary | SqlTypeCode::Blob => {
                TypeCategory::Binary
            }
            SqlTypeCode::Boolean => TypeCategory::Boolean,
            SqlTypeCode::Date => TypeCategory::Date,
            SqlTypeCode::Time => TypeCategory::Time,
            SqlTypeCode::Timestamp | SqlTypeCode::TimestampWithTimeZone => TypeCategory::Timestamp,
            SqlTypeCode::IntervalYearToMonth | SqlTypeCode::IntervalDayToSecond => {
                TypeCategory::Interval
            }
            SqlTypeCode::Array => TypeCategory::Array,
            SqlTypeCode::Struct => TypeCategory::Udt,
            SqlTypeCode::Enum => TypeCategory::Enum,
            SqlTypeCode::Json => TypeCategory::Json,
            SqlTypeCode::Uuid => TypeCategory::Uuid,
            SqlTypeCode::Other => TypeCategory::Other,
        }
    }

    /// Integral numeric codes.
    #[inline]
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            SqlTypeCode::TinyInt | SqlTypeCode::SmallInt | SqlTypeCode::Integer | SqlTypeCode::BigInt
        )
    }

    /// ISO SQL name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SqlTypeCode::TinyInt => "tinyint",
            SqlTypeCode::SmallInt => "smallint",
            SqlTypeCode::Integer => "integer",
            SqlTypeCode::BigInt => "bigint",
            SqlTypeCode::Decimal => "decimal",
            SqlTypeCode::Numeric => "numeric",
            SqlTypeCode::Real => "real",
            SqlTypeCode::Double => "double precision",
            SqlTypeCode::Char => "char",
            SqlTypeCode::VarChar => "varchar",
            SqlTypeCode::Clob => "clob",
            SqlTypeCode::NChar => "nchar",
            SqlTypeCode::NVarChar => "nvarchar",
            SqlTypeCode::Binary => "binary",
            SqlTypeCode::VarBinary => "varbinary",
            SqlTypeCode::Blob => "blob",
            SqlTypeCode::Boolean => "boolean",
            SqlTypeCode::Date => "date",
            SqlTypeCode::Time => "time",
            SqlTypeCode::Timestamp => "timestamp",
            SqlTypeCode::TimestampWithTimeZone => "timestamp with time zone",
            SqlTypeCode::IntervalYearToMonth => "interval year to month",
            SqlTypeCode::IntervalDayToSecond => "interval day to second",
            SqlTypeCode::Array => "array",
            SqlTypeCode::Struct => "struct",
            SqlTypeCode::Enum => "enum",
            SqlTypeCode::Json => "json",
            SqlTypeCode::Uuid => "uuid",
            SqlTypeCode::Other => "other",
        }
    }

    /// Name used in `cast(.. as <name>)` for the given dialect.
    #[must_use]
    pub const fn cast_name(self, dialect: Dialect) -> &'static str {
        use Dialect as D;
        use SqlTypeCode as C;

        match (self, dialect) {
            (C::Double, D::SqlServer | D::Sybase) => "float",
            (C::Double, D::MySQL | D::MariaDB | D::SQLite) => "double",
            (C::Double, D::BigQuery) => "float64",
            (C::BigInt | C::Integer | C::SmallInt | C::TinyInt, D::BigQuery) => "int64",
            (C::Integer | C::BigInt | C::SmallInt, D::MySQL | D::MariaDB) => "signed",
            (C::VarChar | C::Char | C::Clob, D::MySQL | D::MariaDB) => "char",
            (C::VarChar, D::Oracle) => "varchar2",
            (C::VarChar | C::Clob, D::BigQuery) => "string",
            (C::Clob, D::PostgreSQL | D::CockroachDB | D::Redshift | D::SQLite | D::DuckDB) => {
                "text"
            }
            (C::Clob, D::SqlServer | D::Sybase) => "varchar(max)",
            (C::Boolean, D::SqlServer | D::Sybase) => "bit",
            (C::Boolean, D::Oracle) => "number(1)",
            (C::Blob | C::VarBinary | C::Binary, D::PostgreSQL | D::CockroachDB) => "bytea",
            (C::Timestamp, D::SqlServer) => "datetime2",
            (C::Timestamp, D::MySQL | D::MariaDB | D::Sybase) => "datetime",
            (C::TimestampWithTimeZone, D::PostgreSQL | D::CockroachDB) => "timestamptz",
            (C::TimestampWithTimeZone, D::SqlServer) => "datetimeoffset",
            (C::Uuid, D::SqlServer) => "uniqueidentifier",
            (C::Uuid, D::MySQL | D::MariaDB | D::Oracle | D::SQLite | D::Db2) => "char(36)",
            (C::Json, D::PostgreSQL) => "jsonb",
            (C::Json, D::SqlServer | D::Oracle | D::SQLite) => "varchar(4000)",
            _ => self.name(),
        }
    }
}

impl core::fmt::Display for SqlTypeCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_is_superset_of_date_time_timestamp() {
        for code in SqlTypeCode::ALL {
            let category = code.category();
            let expected = matches!(
                code,
                SqlTypeCode::Date
                    | SqlTypeCode::Time
                    | SqlTypeCode::Timestamp
                    | SqlTypeCode::TimestampWithTimeZone
            );
            assert_eq!(category.is_temporal(), expected, "{code}");
        }
    }

    #[test]
    fn integral_codes_are_numeric() {
        for code in SqlTypeCode::ALL.into_iter().filter(|c| c.is_integral()) {
            assert_eq!(code.category(), TypeCategory::Numeric);
        }
    }

    #[test]
    fn cast_names_follow_dialect() {
        assert_eq!(SqlTypeCode::Double.cast_name(Dialect::PostgreSQL), "double precision");
        assert_eq!(SqlTypeCode::Double.cast_name(Dialect::SqlServer), "float");
        assert_eq!(SqlTypeCode::VarChar.cast_name(Dialect::Oracle), "varchar2");
        assert_eq!(SqlTypeCode::Integer.cast_name(Dialect::MySQL), "signed");
        assert_eq!(SqlTypeCode::Integer.cast_name(Dialect::Default), "integer");
    }
}
