use core::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use crate::error::DataTypeError;
use crate::types::{DataType, DataTypeInfo};
use crate::value::Value;

/// Direction of a procedure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamMode {
    #[default]
    In,
    Out,
    InOut,
}

impl ParamMode {
    /// Whether a value is sent to the statement.
    #[inline]
    pub const fn is_input(self) -> bool {
        matches!(self, ParamMode::In | ParamMode::InOut)
    }

    /// Whether the statement registers an output.
    #[inline]
    pub const fn is_output(self) -> bool {
        matches!(self, ParamMode::Out | ParamMode::InOut)
    }
}

/// A value that produces its wire form on demand.
///
/// Parameters keep the application value and its codec; conversion happens
/// when the tree is rendered, so converter failures surface from `render`.
pub trait WireValue: Send + Sync {
    fn to_wire(&self) -> Result<Value, DataTypeError>;
}

struct TypedValue<T> {
    value: T,
    data_type: DataType<T>,
}

impl<T: Send + Sync + 'static> WireValue for TypedValue<T> {
    fn to_wire(&self) -> Result<Value, DataTypeError> {
        self.data_type.to_wire(&self.value)
    }
}

/// Bind value node.
///
/// Names are not deduplicated: two parameters with the same name render two
/// markers and produce two bind entries.
#[derive(Clone)]
pub struct Param {
    name: Option<CompactString>,
    value: Option<Arc<dyn WireValue>>,
    inline: bool,
    mode: ParamMode,
    data_type: DataTypeInfo,
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("value", &self.value.as_ref().map(|v| v.to_wire()))
            .field("inline", &self.inline)
            .field("mode", &self.mode)
            .field("data_type", &self.data_type.type_name())
            .finish()
    }
}

impl Param {
    pub fn new<T: Send + Sync + 'static>(value: T, data_type: &DataType<T>) -> Self {
        Self {
            name: None,
            value: Some(Arc::new(TypedValue {
                value,
                data_type: data_type.clone(),
            })),
            inline: false,
            mode: ParamMode::In,
            data_type: data_type.info().clone(),
        }
    }

    /// Parameter rendered as a literal regardless of settings.
    pub fn inlined<T: Send + Sync + 'static>(value: T, data_type: &DataType<T>) -> Self {
        Self::new(value, data_type).with_inline(true)
    }

    /// NULL of the given type.
    pub fn null(data_type: DataTypeInfo) -> Self {
        Self {
            name: None,
            value: None,
            inline: false,
            mode: ParamMode::In,
            data_type,
        }
    }

    /// Named parameter without a value, filled after rendering.
    pub fn placeholder(name: impl Into<CompactString>, data_type: DataTypeInfo) -> Self {
        Self::null(data_type).with_name(name)
    }

    /// OUT parameter of a procedure call.
    pub fn out(data_type: DataTypeInfo) -> Self {
        Self {
            mode: ParamMode::Out,
            ..Self::null(data_type)
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<CompactString>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ParamMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    #[inline]
    pub fn mode(&self) -> ParamMode {
        self.mode
    }

    pub fn data_type(&self) -> &DataTypeInfo {
        &self.data_type
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Wire value, NULL when absent.
    pub fn wire_value(&self) -> Result<Value, DataTypeError> {
        match &self.value {
            Some(value) => value.to_wire(),
            None => Ok(Value::Null),
        }
    }
}
