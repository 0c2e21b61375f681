//! Semantic SQL data types.
//!
//! A [`DataType<T>`] describes the SQL type of a column, literal or bind value
//! whose application type is `T`. It is the non-generic [`DataTypeInfo`] (type
//! code, name, precision/scale/length, nullability, identity, default,
//! binding) plus a codec between `T` and the wire [`Value`].
//!
//! Data types are immutable. Every `with_*`/setter method returns a new
//! instance:
//!
//! ```
//! use quill_core::types::sql_data_type;
//!
//! let money = sql_data_type::decimal().with_precision_scale(10, 2);
//! assert_eq!(money.precision(), 10);
//! assert_eq!(money.scale(), 2);
//! assert!(money.precision_defined());
//!
//! let ts = sql_data_type::timestamp();
//! assert!(!ts.precision_defined());
//! assert_eq!(ts.precision(), 0);
//! ```

mod codec;
mod converter;
pub mod sql_data_type;

use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

use compact_str::{CompactString, ToCompactString, format_compact};
use quill_types::{Dialect, SqlTypeCode, TypeCategory};

pub use codec::{SqlValue, ValueCodec};
pub use converter::{Converter, FnConverter, converter};

use crate::binding::{Binding, DefaultBinding, ResultRow, StatementHandle};
use crate::error::{DataTypeError, Result};
use crate::expr::{Expr, Param};
use crate::value::Value;

use codec::{ArrayCodec, ConvertedCodec, OptionCodec};

/// Tri-state nullability.
///
/// `Default` defers to the nullability declared by the column's own DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nullability {
    #[default]
    Default,
    Null,
    NotNull,
}

/// The non-generic part of a data type.
///
/// This is what the tree carries next to every bind value and what a
/// [`StatementHandle`] receives.
#[derive(Clone)]
pub struct DataTypeInfo {
    code: SqlTypeCode,
    type_name: CompactString,
    precision: Option<u32>,
    scale: Option<u32>,
    length: Option<u32>,
    nullability: Nullability,
    identity: bool,
    default: Option<Arc<Expr>>,
    element: Option<Arc<DataTypeInfo>>,
    binding: Arc<dyn Binding>,
}

impl fmt::Debug for DataTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTypeInfo")
            .field("code", &self.code)
            .field("type_name", &self.type_name)
            .field("precision", &self.precision)
            .field("scale", &self.scale)
            .field("length", &self.length)
            .field("nullability", &self.nullability)
            .field("identity", &self.identity)
            .field("defaulted", &self.default.is_some())
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl DataTypeInfo {
    #[must_use]
    pub fn new(code: SqlTypeCode) -> Self {
        Self::named(code, code.name())
    }

    #[must_use]
    pub fn named(code: SqlTypeCode, type_name: &str) -> Self {
        Self {
            code,
            type_name: type_name.to_compact_string(),
            precision: None,
            scale: None,
            length: None,
            nullability: Nullability::Default,
            identity: false,
            default: None,
            element: None,
            binding: Arc::new(DefaultBinding),
        }
    }

    #[inline]
    pub fn code(&self) -> SqlTypeCode {
        self.code
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Precision, 0 when undefined.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision.unwrap_or(0)
    }

    #[inline]
    pub fn precision_defined(&self) -> bool {
        self.precision.is_some()
    }

    /// Scale, 0 when undefined.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale.unwrap_or(0)
    }

    #[inline]
    pub fn scale_defined(&self) -> bool {
        self.scale.is_some()
    }

    /// Length, 0 when undefined.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length.unwrap_or(0)
    }

    #[inline]
    pub fn length_defined(&self) -> bool {
        self.length.is_some()
    }

    #[inline]
    pub fn nullability(&self) -> Nullability {
        self.nullability
    }

    /// Anything but `NotNull` admits NULL.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullability != Nullability::NotNull
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    #[inline]
    pub fn defaulted(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_expression(&self) -> Option<&Expr> {
        self.default.as_deref()
    }

    /// Element type of an array type.
    pub fn element(&self) -> Option<&DataTypeInfo> {
        self.element.as_deref()
    }

    pub fn binding(&self) -> &Arc<dyn Binding> {
        &self.binding
    }

    #[inline]
    pub fn category(&self) -> TypeCategory {
        self.code.category()
    }

    pub fn is_numeric(&self) -> bool {
        self.category() == TypeCategory::Numeric
    }

    pub fn is_string(&self) -> bool {
        self.category() == TypeCategory::String
    }

    pub fn is_temporal(&self) -> bool {
        self.category().is_temporal()
    }

    pub fn is_date(&self) -> bool {
        self.category() == TypeCategory::Date
    }

    pub fn is_time(&self) -> bool {
        self.category() == TypeCategory::Time
    }

    pub fn is_timestamp(&self) -> bool {
        self.category() == TypeCategory::Timestamp
    }

    pub fn is_interval(&self) -> bool {
        self.category() == TypeCategory::Interval
    }

    pub fn is_binary(&self) -> bool {
        self.category() == TypeCategory::Binary
    }

    pub fn is_array(&self) -> bool {
        self.category() == TypeCategory::Array
    }

    pub fn is_udt(&self) -> bool {
        self.category() == TypeCategory::Udt
    }

    pub fn is_enum(&self) -> bool {
        self.category() == TypeCategory::Enum
    }

    pub fn is_boolean(&self) -> bool {
        self.category() == TypeCategory::Boolean
    }

    pub fn is_json(&self) -> bool {
        self.category() == TypeCategory::Json
    }

    /// Type name used in `cast(.. as ..)` for `dialect`, with length or
    /// precision when defined.
    pub fn cast_type_name(&self, dialect: Dialect) -> CompactString {
        let base = self.code.cast_name(dialect);
        if base.contains('(') || base == "signed" {
            return base.into();
        }

        use SqlTypeCode as C;
        match self.code {
            C::Decimal | C::Numeric if self.precision_defined() => {
                if self.scale_defined() {
                    format_compact!("{base}({}, {})", self.precision(), self.scale())
                } else {
                    format_compact!("{base}({})", self.precision())
                }
            }
            C::Char | C::VarChar | C::NChar | C::NVarChar | C::Binary | C::VarBinary
                if self.length_defined() =>
            {
                format_compact!("{base}({})", self.length())
            }
            C::Timestamp | C::Time if self.precision_defined() => {
                format_compact!("{base}({})", self.precision())
            }
            _ => base.into(),
        }
    }

    /// Coerce `value` to this type's wire variant.
    pub fn coerce(&self, value: Value) -> core::result::Result<Value, DataTypeError> {
        match (&self.element, value) {
            (Some(element), Value::Array(items)) => {
                Value::Array(items).coerce_array(element.code)
            }
            (_, value) => value.coerce(self.code),
        }
    }

    fn set_precision(&mut self, precision: u32, scale: Option<u32>) {
        self.precision = Some(precision);
        self.scale = scale;
    }

    fn set_nullability(&mut self, nullability: Nullability) {
        self.nullability = nullability;
        if nullability != Nullability::NotNull {
            self.identity = false;
        }
    }

    fn set_identity(&mut self, identity: bool) {
        self.identity = identity;
        if identity {
            self.default = None;
            self.nullability = Nullability::NotNull;
        }
    }

    fn set_default(&mut self, default: Expr) {
        self.default = Some(Arc::new(default));
        self.identity = false;
    }
}

/// A SQL data type with application type `T`.
pub struct DataType<T> {
    info: DataTypeInfo,
    codec: Arc<dyn ValueCodec<T>>,
}

impl<T> Clone for DataType<T> {
    fn clone(&self) -> Self {
        Self {
            info: self.info.clone(),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<T> fmt::Debug for DataType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataType").field(&self.info).finish()
    }
}

impl<T> Deref for DataType<T> {
    type Target = DataTypeInfo;

    fn deref(&self) -> &Self::Target {
        &self.info
    }
}

impl<T: SqlValue> DataType<T> {
    /// Data type of `code` using `T`'s native wire mapping.
    #[must_use]
    pub fn native(code: SqlTypeCode) -> Self {
        Self::new(DataTypeInfo::new(code), codec::NativeCodec::<T>::shared())
    }
}

impl<T: 'static> DataType<T> {
    pub fn new(info: DataTypeInfo, codec: Arc<dyn ValueCodec<T>>) -> Self {
        Self { info, codec }
    }

    pub fn info(&self) -> &DataTypeInfo {
        &self.info
    }

    pub fn codec(&self) -> &Arc<dyn ValueCodec<T>> {
        &self.codec
    }

    /// Convert an arbitrary value to `T`.
    ///
    /// The value is first coerced to this type's wire variant and then decoded
    /// through the codec, so conversions compose with any converter attached by
    /// [`as_converted_data_type`](Self::as_converted_data_type).
    pub fn convert(&self, value: impl Into<Value>) -> core::result::Result<T, DataTypeError> {
        let wire = self.info.coerce(value.into())?;
        self.codec.decode(wire)
    }

    /// Encode `value` into this type's wire variant.
    pub fn to_wire(&self, value: &T) -> core::result::Result<Value, DataTypeError> {
        let wire = self.codec.encode(value)?;
        self.info.coerce(wire)
    }

    /// Read column `column` of `row` through this type's binding.
    pub fn get(&self, row: &dyn ResultRow, column: usize) -> Result<T> {
        let value = self.info.binding.get(row, column, &self.info)?;
        Ok(self.convert(value)?)
    }

    /// Read OUT parameter `index` of `statement` through this type's binding.
    pub fn get_out(&self, statement: &dyn StatementHandle, index: usize) -> Result<T> {
        let value = self.info.binding.get_out(statement, index, &self.info)?;
        Ok(self.convert(value)?)
    }

    fn map_info(&self, f: impl FnOnce(&mut DataTypeInfo)) -> Self {
        let mut info = self.info.clone();
        f(&mut info);
        Self {
            info,
            codec: Arc::clone(&self.codec),
        }
    }

    #[must_use]
    pub fn with_precision(&self, precision: u32) -> Self {
        self.map_info(|i| i.set_precision(precision, None))
    }

    #[must_use]
    pub fn with_precision_scale(&self, precision: u32, scale: u32) -> Self {
        self.map_info(|i| i.set_precision(precision, Some(scale)))
    }

    #[must_use]
    pub fn with_length(&self, length: u32) -> Self {
        self.map_info(|i| i.length = Some(length))
    }

    #[must_use]
    pub fn with_type_name(&self, type_name: &str) -> Self {
        self.map_info(|i| i.type_name = type_name.to_compact_string())
    }

    #[must_use]
    pub fn with_nullability(&self, nullability: Nullability) -> Self {
        self.map_info(|i| i.set_nullability(nullability))
    }

    /// `true` is `Nullability::Null` and clears identity.
    #[must_use]
    pub fn nullable(&self, nullable: bool) -> Self {
        let nullability = if nullable {
            Nullability::Null
        } else {
            Nullability::NotNull
        };
        self.with_nullability(nullability)
    }

    /// `true` clears any default and forces `NotNull`.
    #[must_use]
    pub fn identity(&self, identity: bool) -> Self {
        self.map_info(|i| i.set_identity(identity))
    }

    /// Default expression. Clears identity.
    #[must_use]
    pub fn default_expr(&self, default: impl Into<Expr>) -> Self {
        let default = default.into();
        self.map_info(|i| i.set_default(default))
    }

    /// Default value, rendered as an inline literal. Clears identity.
    #[must_use]
    pub fn default_value(&self, value: T) -> Self
    where
        T: Send + Sync,
    {
        self.default_expr(Expr::Param(Param::inlined(value, self)))
    }

    /// Array type with this type as element.
    #[must_use]
    pub fn as_array(&self) -> DataType<Vec<T>>
    where
        T: Send + Sync,
    {
        let mut info = DataTypeInfo::named(
            SqlTypeCode::Array,
            &format_compact!("{}[]", self.info.type_name),
        );
        info.element = Some(Arc::new(self.info.clone()));
        DataType::new(info, Arc::new(ArrayCodec::new(Arc::clone(&self.codec))))
    }

    /// Same type decoding NULL as `None` instead of failing.
    #[must_use]
    pub fn as_optional(&self) -> DataType<Option<T>>
    where
        T: Send + Sync,
    {
        DataType::new(
            self.info.clone(),
            Arc::new(OptionCodec::new(Arc::clone(&self.codec))),
        )
    }

    /// Derive a data type for user type `U` through `converter`.
    ///
    /// Precision, scale, length and binding are preserved.
    #[must_use]
    pub fn as_converted_data_type<U, C>(&self, converter: C) -> DataType<U>
    where
        U: 'static,
        C: Converter<T, U>,
    {
        DataType::new(
            self.info.clone(),
            Arc::new(ConvertedCodec::new(Arc::clone(&self.codec), converter)),
        )
    }

    /// Like [`as_converted_data_type`](Self::as_converted_data_type) with a
    /// custom wire-level binding.
    #[must_use]
    pub fn as_bound_data_type<U, C, B>(&self, converter: C, binding: B) -> DataType<U>
    where
        U: 'static,
        C: Converter<T, U>,
        B: Binding,
    {
        let mut converted = self.as_converted_data_type(converter);
        converted.info.binding = Arc::new(binding);
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sql_data_type;

    #[test]
    fn decimal_precision_and_scale() {
        let dt = sql_data_type::decimal().with_precision_scale(10, 2);
        assert_eq!(dt.precision(), 10);
        assert_eq!(dt.scale(), 2);
        assert!(dt.precision_defined());
        assert!(dt.scale_defined());
        assert!(!dt.length_defined());
        assert_eq!(dt.cast_type_name(Dialect::PostgreSQL), "decimal(10, 2)");
    }

    #[test]
    fn timestamp_without_precision() {
        let dt = sql_data_type::timestamp();
        assert!(!dt.precision_defined());
        assert_eq!(dt.precision(), 0);

        let dt = dt.with_precision(0);
        assert!(dt.precision_defined());
        assert_eq!(dt.precision(), 0);
    }

    #[test]
    fn identity_clears_default_and_forces_not_null() {
        let dt = sql_data_type::bigint().default_value(7).nullable(true);
        assert!(dt.defaulted());

        let dt = dt.identity(true);
        assert!(dt.is_identity());
        assert!(!dt.defaulted());
        assert_eq!(dt.nullability(), Nullability::NotNull);
        assert!(!dt.is_nullable());
    }

    #[test]
    fn default_or_nullable_clear_identity() {
        let dt = sql_data_type::integer().identity(true);
        assert!(!dt.default_value(1).is_identity());
        assert!(!dt.nullable(true).is_identity());
        assert!(dt.nullable(false).is_identity());
        assert!(!dt.with_nullability(Nullability::Default).is_identity());
    }

    #[test]
    fn default_value_is_an_inline_literal() {
        let dt = sql_data_type::integer().default_value(5);
        assert!(dt.defaulted());
        assert!(matches!(dt.info().default_expression(), Some(Expr::Param(p)) if p.is_inline()));
    }

    #[test]
    fn derivation_does_not_mutate() {
        let base = sql_data_type::varchar();
        let sized = base.with_length(32);
        assert!(!base.length_defined());
        assert_eq!(sized.length(), 32);
    }

    #[test]
    fn classification_agrees_with_type_code() {
        for code in SqlTypeCode::ALL {
            let info = DataTypeInfo::new(code);
            let category = code.category();
            assert_eq!(info.is_numeric(), category == TypeCategory::Numeric);
            assert_eq!(info.is_string(), category == TypeCategory::String);
            assert_eq!(info.is_binary(), category == TypeCategory::Binary);
            assert_eq!(info.is_interval(), category == TypeCategory::Interval);
            assert_eq!(info.is_array(), category == TypeCategory::Array);
            assert_eq!(info.is_udt(), category == TypeCategory::Udt);
            assert_eq!(info.is_enum(), category == TypeCategory::Enum);
            assert_eq!(info.is_json(), category == TypeCategory::Json);
            assert_eq!(info.is_boolean(), category == TypeCategory::Boolean);
            assert_eq!(
                info.is_temporal(),
                info.is_date() || info.is_time() || info.is_timestamp()
            );
        }
    }

    #[test]
    fn convert_uses_total_rules() {
        assert_eq!(sql_data_type::integer().convert("12").unwrap(), 12);
        assert_eq!(sql_data_type::bigint().convert(3.0f64).unwrap(), 3);
        assert!(matches!(
            sql_data_type::integer().convert("twelve"),
            Err(DataTypeError::Parse { .. })
        ));
        assert!(matches!(
            sql_data_type::integer().convert(Value::Null),
            Err(DataTypeError::UnexpectedNull { .. })
        ));
        assert_eq!(
            sql_data_type::integer().nullable(true).as_optional().convert(Value::Null).unwrap(),
            None
        );
    }

    #[test]
    fn converted_type_keeps_precision() {
        #[derive(Debug, PartialEq)]
        struct Cents(i64);

        let base = sql_data_type::decimal().with_precision_scale(12, 2);
        let cents = base.as_converted_data_type(converter(
            |d: rust_decimal::Decimal| {
                (d * rust_decimal::Decimal::from(100))
                    .try_into()
                    .map(Cents)
                    .map_err(|_| DataTypeError::Converter("too large".into()))
            },
            |c: &Cents| Ok(rust_decimal::Decimal::new(c.0, 2)),
        ));

        assert_eq!(cents.precision(), 12);
        assert_eq!(cents.scale(), 2);
        assert_eq!(cents.convert("1.25").unwrap(), Cents(125));
        assert_eq!(
            cents.to_wire(&Cents(250)).unwrap(),
            Value::Decimal(rust_decimal::Decimal::new(250, 2))
        );
    }

    #[test]
    fn arrays() {
        let ints = sql_data_type::integer().as_array();
        assert!(ints.is_array());
        assert_eq!(ints.element().map(DataTypeInfo::code), Some(SqlTypeCode::Integer));
        assert_eq!(ints.convert(Value::Array(vec![Value::Text("1".into())])).unwrap(), vec![1]);
        assert_eq!(
            ints.to_wire(&vec![1, 2]).unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }
}
