//! Core value union for shape-dispatched interpolation.
//!
//! `Value` is the explicit tagged union the registry dispatches over:
//! numbers, colors, strings, arrays, records, 2D transforms and zoom views.
//! Accessors return `Option` so callers can probe a shape without panicking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::color::Rgb;
use crate::transform::Transform2D;
use crate::zoom::ZoomView;

/// A dynamically-shaped interpolatable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    /// Numeric value.
    Number { value: f64 },
    /// RGB color value.
    Color { rgb: Rgb },
    /// Plain string, possibly with embedded numbers or color syntax.
    Str { value: String },
    /// Ordered list of nested values.
    Array { items: Vec<Value> },
    /// String-keyed record of nested values.
    Record { fields: HashMap<String, Value> },
    /// 2D affine transform.
    Transform {
        #[serde(flatten)]
        matrix: Transform2D,
    },
    /// Pan/zoom viewport descriptor.
    Zoom {
        #[serde(flatten)]
        view: ZoomView,
    },
}

impl Value {
    /// Try to extract a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None,
        }
    }

    /// Try to extract a color.
    pub fn as_color(&self) -> Option<Rgb> {
        match self {
            Self::Color { rgb } => Some(*rgb),
            _ => None,
        }
    }

    /// Try to extract a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str { value } => Some(value),
            _ => None,
        }
    }

    /// Try to extract array items.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array { items } => Some(items),
            _ => None,
        }
    }

    /// Try to extract record fields.
    pub fn as_record(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Record { fields } => Some(fields),
            _ => None,
        }
    }

    /// Try to extract a transform matrix.
    pub fn as_transform(&self) -> Option<Transform2D> {
        match self {
            Self::Transform { matrix } => Some(*matrix),
            _ => None,
        }
    }

    /// Try to extract a zoom view.
    pub fn as_zoom(&self) -> Option<ZoomView> {
        match self {
            Self::Zoom { view } => Some(*view),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number { value }
    }
}

impl From<Rgb> for Value {
    fn from(rgb: Rgb) -> Self {
        Self::Color { rgb }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str { value }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str {
            value: value.to_string(),
        }
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array { items }
    }
}

impl From<Vec<f64>> for Value {
    fn from(items: Vec<f64>) -> Self {
        Self::Array {
            items: items.into_iter().map(Value::from).collect(),
        }
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self::Record { fields }
    }
}

impl From<Transform2D> for Value {
    fn from(matrix: Transform2D) -> Self {
        Self::Transform { matrix }
    }
}

impl From<ZoomView> for Value {
    fn from(view: ZoomView) -> Self {
        Self::Zoom { view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let v: Value = 42.0.into();
        assert_eq!(v.as_number(), Some(42.0));
        assert_eq!(v.as_str(), None);

        let v: Value = Rgb::new(1, 2, 3).into();
        assert_eq!(v.as_color(), Some(Rgb::new(1, 2, 3)));
        assert_eq!(v.as_number(), None);

        let v: Value = vec![1.0, 2.0].into();
        assert_eq!(v.as_array().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_serde_round_trip() {
        let v: Value = vec![Value::from(1.0), Value::from("two")].into();
        let json = serde_json::to_string(&v).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, parsed);
    }
}
