//! Values exchanged with a control surface

use std::fmt;

use crate::core::error::BindingError;

/// Kind of a bound property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Checkbox-style toggle
    Bool,
    /// Slider or number field
    Number,
    /// Free text, hex colors, enumerations of names
    Text,
}

impl ValueKind {
    /// Lowercase name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Text => "text",
        }
    }
}

/// A property value as a control surface sees it
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// Text
    Text(String),
}

impl PropertyValue {
    /// Kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::Text,
        }
    }

    /// Boolean payload or a type mismatch
    pub fn as_bool(&self) -> Result<bool, BindingError> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    /// Numeric payload or a type mismatch
    pub fn as_number(&self) -> Result<f64, BindingError> {
        match self {
            Self::Number(value) => Ok(*value),
            other => Err(other.mismatch(ValueKind::Number)),
        }
    }

    /// Text payload or a type mismatch
    pub fn as_text(&self) -> Result<&str, BindingError> {
        match self {
            Self::Text(value) => Ok(value),
            other => Err(other.mismatch(ValueKind::Text)),
        }
    }

    pub(crate) fn mismatch(&self, expected: ValueKind) -> BindingError {
        BindingError::TypeMismatch {
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
