//! DataValue: the closed union of persistent-data value kinds.
//!
//! The host's scripting surface types each annotation entry at write time
//! with one of a fixed set of kinds; modeling that set as a tagged enum
//! (validated at construction, not at read time) replaces the host's
//! loosely-typed property bags.

use serde::{Deserialize, Serialize};

/// Coarse kind tag for pattern-matching and mismatch reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataValueKind {
    Integer,
    Double,
    Str,
    IntegerArray,
    DoubleArray,
    StringArray,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum DataValue {
    /// 32-bit signed integer
    Integer(i32),

    /// Double-precision float
    Double(f64),

    /// UTF-8 string
    Str(String),

    IntegerArray(Vec<i32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl DataValue {
    /// Value returned for reads of keys that were never written.
    /// Matches the host's historical "missing reads are zero" behavior.
    pub const SENTINEL: DataValue = DataValue::Integer(0);

    /// Return the kind of this value.
    #[inline]
    pub fn kind(&self) -> DataValueKind {
        match self {
            DataValue::Integer(_) => DataValueKind::Integer,
            DataValue::Double(_) => DataValueKind::Double,
            DataValue::Str(_) => DataValueKind::Str,
            DataValue::IntegerArray(_) => DataValueKind::IntegerArray,
            DataValue::DoubleArray(_) => DataValueKind::DoubleArray,
            DataValue::StringArray(_) => DataValueKind::StringArray,
        }
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Integer(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Double(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Str(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Str(v)
    }
}
