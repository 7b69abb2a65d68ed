//! Value-domain constraints declared by a control surface

use crate::core::error::BindingError;

use super::color::Rgb;
use super::value::PropertyValue;

/// Constraint a written value must satisfy before it reaches the owner
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Inclusive numeric range
    Range {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// One of an enumerated palette of values
    OneOf(Vec<PropertyValue>),
    /// A parseable hex color string
    HexColor,
}

impl Domain {
    /// Inclusive numeric range
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range { min, max }
    }

    /// Check a value against the domain
    pub fn check(&self, value: &PropertyValue) -> Result<(), BindingError> {
        let reject = |reason: String| BindingError::Domain {
            value: value.to_string(),
            reason,
        };

        match self {
            Self::Range { min, max } => {
                let number = value.as_number()?;
                if number.is_nan() || number < *min || number > *max {
                    return Err(reject(format!("outside [{min}, {max}]")));
                }
            }
            Self::OneOf(options) => {
                if !options.contains(value) {
                    return Err(reject(format!("not one of {} allowed values", options.len())));
                }
            }
            Self::HexColor => {
                let text = value.as_text()?;
                Rgb::from_hex(text).map_err(|e| reject(e.to_string()))?;
            }
        }
        Ok(())
    }
}
