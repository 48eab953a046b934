// models/src/properties.rs
use std::collections::BTreeMap;
use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A scalar property value. Serialized untagged, so it renders as a plain
/// JSON string, number or boolean.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(NotNan<f64>),
    Boolean(bool),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for PropertyValue { fn from(s: String) -> Self { PropertyValue::String(s) } }
impl From<&str> for PropertyValue { fn from(s: &str) -> Self { PropertyValue::String(s.to_string()) } }
impl From<i64> for PropertyValue { fn from(i: i64) -> Self { PropertyValue::Integer(i) } }
impl From<u64> for PropertyValue { fn from(i: u64) -> Self { PropertyValue::Integer(i.min(i64::MAX as u64) as i64) } }
impl From<bool> for PropertyValue { fn from(b: bool) -> Self { PropertyValue::Boolean(b) } }

impl TryFrom<f64> for PropertyValue {
    type Error = ValidationError;

    fn try_from(f: f64) -> Result<Self, Self::Error> {
        NotNan::new(f)
            .map(PropertyValue::Float)
            .map_err(|_| ValidationError::NanProperty)
    }
}

/// A map from property name to property value, ordered for deterministic
/// serialization.
pub type Properties = BTreeMap<String, PropertyValue>;

pub fn get_string<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    match properties.get(key) {
        Some(PropertyValue::String(s)) => Some(s),
        _ => None,
    }
}

pub fn get_integer(properties: &Properties, key: &str) -> Option<i64> {
    match properties.get(key) {
        Some(PropertyValue::Integer(i)) => Some(*i),
        _ => None,
    }
}
