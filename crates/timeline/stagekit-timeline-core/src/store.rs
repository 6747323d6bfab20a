//! Typed key/value annotation store, attachable to documents, elements and
//! library items.
//!
//! Reads of missing keys return [`DataValue::SENTINEL`] rather than failing,
//! matching long-standing host behavior; typed accessors surface
//! `TypeMismatch` only when an entry exists with a different kind.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use stagekit_api_core::{DataValue, DataValueKind};

use crate::error::StageError;

/// Per-owner persistent data map with publish-visibility flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataStore {
    entries: HashMap<String, DataValue>,
    /// Entry name -> formats the entry is flagged visible for.
    /// Flags may reference names with no entry yet; they stay inert until
    /// the entry is created.
    publish: HashMap<String, Vec<String>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite kind and value atomically.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<DataValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Read an entry, or the documented sentinel when the key was never set.
    #[inline]
    pub fn get(&self, name: &str) -> DataValue {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or(DataValue::SENTINEL)
    }

    /// Read an entry without the sentinel fallback.
    #[inline]
    pub fn entry(&self, name: &str) -> Option<&DataValue> {
        self.entries.get(name)
    }

    #[inline]
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<DataValue> {
        self.entries.remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Typed read: sentinel-compatible zero when missing, `TypeMismatch`
    /// when present with another kind.
    pub fn get_integer(&self, name: &str) -> Result<i32, StageError> {
        match self.entries.get(name) {
            None => Ok(0),
            Some(DataValue::Integer(v)) => Ok(*v),
            Some(other) => Err(StageError::TypeMismatch {
                expected: DataValueKind::Integer,
                actual: other.kind(),
            }),
        }
    }

    pub fn get_double(&self, name: &str) -> Result<f64, StageError> {
        match self.entries.get(name) {
            None => Ok(0.0),
            Some(DataValue::Double(v)) => Ok(*v),
            Some(other) => Err(StageError::TypeMismatch {
                expected: DataValueKind::Double,
                actual: other.kind(),
            }),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str, StageError> {
        match self.entries.get(name) {
            None => Ok(""),
            Some(DataValue::Str(v)) => Ok(v),
            Some(other) => Err(StageError::TypeMismatch {
                expected: DataValueKind::Str,
                actual: other.kind(),
            }),
        }
    }

    /// Flag an entry visible (or not) when publishing to `format`.
    /// Flags for names with no backing entry are accepted and inert.
    pub fn set_publish_flag(&mut self, name: impl Into<String>, format: &str, visible: bool) {
        let formats = self.publish.entry(name.into()).or_default();
        match formats.iter().position(|f| f == format) {
            Some(i) if !visible => {
                formats.remove(i);
            }
            None if visible => formats.push(format.to_string()),
            _ => {}
        }
    }

    #[inline]
    pub fn publish_flag(&self, name: &str, format: &str) -> bool {
        self.publish
            .get(name)
            .is_some_and(|formats| formats.iter().any(|f| f == format))
    }

    /// Entry names visible for `format`; flags without a backing entry are
    /// skipped (inert-until-defined).
    pub fn publish_visible(&self, format: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .publish
            .iter()
            .filter(|(name, formats)| {
                self.entries.contains_key(name.as_str()) && formats.iter().any(|f| f == format)
            })
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
