//! Query descriptors
//!
//! A [`QueryDescriptor`] is the ordered, immutable key/value description of
//! what the retrieval pipeline should fetch. Descriptors are built from a
//! declarative list of [`FieldSpec`]s: each spec names a field, carries the
//! request value, and says when the value counts as "not supplied".
//!
//! - Required fields are always inserted, and a blank value is rejected.
//! - Scalar optionals are dropped when they equal their sentinel (`-1`).
//! - Collection optionals are dropped only when the collection itself is
//!   absent. An empty supplied set is kept.
//!
//! # Example
//!
//! ```
//! use matchgate::query::{FieldSpec, QueryDescriptor, NOT_SUPPLIED_INT};
//!
//! let query = QueryDescriptor::build([
//!     FieldSpec::required("accountId", "ABC"),
//!     FieldSpec::int("beginIndex", 5, NOT_SUPPLIED_INT),
//!     FieldSpec::int("endIndex", -1, NOT_SUPPLIED_INT),
//! ])
//! .unwrap();
//!
//! assert_eq!(query.keys().collect::<Vec<_>>(), vec!["accountId", "beginIndex"]);
//! ```

use crate::platform::Platform;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Sentinel for optional 32-bit parameters that were not supplied
pub const NOT_SUPPLIED_INT: i32 = -1;

/// Sentinel for optional 64-bit parameters that were not supplied
pub const NOT_SUPPLIED_LONG: i64 = -1;

// =============================================================================
// Values
// =============================================================================

/// A single descriptor value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Platform(Platform),
    Int(i32),
    Long(i64),
    Text(String),
    IntSet(BTreeSet<i32>),
}

impl QueryValue {
    fn is_blank(&self) -> bool {
        matches!(self, QueryValue::Text(s) if s.trim().is_empty())
    }

    pub fn as_platform(&self) -> Option<Platform> {
        match self {
            QueryValue::Platform(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Int(v) => Some(i64::from(*v)),
            QueryValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int_set(&self) -> Option<&BTreeSet<i32>> {
        match self {
            QueryValue::IntSet(set) => Some(set),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Platform(p) => write!(f, "{}", p),
            QueryValue::Int(v) => write!(f, "{}", v),
            QueryValue::Long(v) => write!(f, "{}", v),
            QueryValue::Text(s) => write!(f, "{}", s),
            QueryValue::IntSet(set) => {
                let items: Vec<String> = set.iter().map(|v| v.to_string()).collect();
                write!(f, "{{{}}}", items.join(","))
            }
        }
    }
}

impl Serialize for QueryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryValue::Platform(p) => p.serialize(serializer),
            QueryValue::Int(v) => serializer.serialize_i32(*v),
            QueryValue::Long(v) => serializer.serialize_i64(*v),
            QueryValue::Text(s) => serializer.serialize_str(s),
            QueryValue::IntSet(set) => set.serialize(serializer),
        }
    }
}

impl From<Platform> for QueryValue {
    fn from(value: Platform) -> Self {
        QueryValue::Platform(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Long(value)
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<BTreeSet<i32>> for QueryValue {
    fn from(value: BTreeSet<i32>) -> Self {
        QueryValue::IntSet(value)
    }
}

// =============================================================================
// Field specs
// =============================================================================

/// When a field counts as "not supplied"
#[derive(Debug, Clone, PartialEq, Eq)]
enum Presence {
    /// Always inserted; absence or a blank value is an error
    Required,
    /// Dropped when the value equals the sentinel
    UnlessSentinel(QueryValue),
    /// Dropped when the value itself is absent
    UnlessMissing,
}

/// One declared field of an endpoint's descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    value: Option<QueryValue>,
    presence: Presence,
}

impl FieldSpec {
    /// A field that must be present
    pub fn required(name: &'static str, value: impl Into<QueryValue>) -> Self {
        Self::required_opt(name, Some(value.into()))
    }

    /// A required field whose value may be missing at the call site
    pub fn required_opt(name: &'static str, value: Option<QueryValue>) -> Self {
        Self {
            name,
            value,
            presence: Presence::Required,
        }
    }

    /// Optional 32-bit field, absent when equal to `sentinel`
    pub fn int(name: &'static str, value: i32, sentinel: i32) -> Self {
        Self {
            name,
            value: Some(QueryValue::Int(value)),
            presence: Presence::UnlessSentinel(QueryValue::Int(sentinel)),
        }
    }

    /// Optional 64-bit field, absent when equal to `sentinel`
    pub fn long(name: &'static str, value: i64, sentinel: i64) -> Self {
        Self {
            name,
            value: Some(QueryValue::Long(value)),
            presence: Presence::UnlessSentinel(QueryValue::Long(sentinel)),
        }
    }

    /// Optional set field, absent only when the set itself is `None`
    pub fn int_set(name: &'static str, value: Option<BTreeSet<i32>>) -> Self {
        Self {
            name,
            value: value.map(QueryValue::IntSet),
            presence: Presence::UnlessMissing,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve this spec into the value to insert, if any
    fn resolve(self) -> Result<Option<QueryValue>, QueryError> {
        match self.presence {
            Presence::Required => match self.value {
                Some(v) if !v.is_blank() => Ok(Some(v)),
                _ => Err(QueryError::MissingRequiredField(self.name)),
            },
            Presence::UnlessSentinel(sentinel) => {
                Ok(self.value.filter(|value| *value != sentinel))
            }
            Presence::UnlessMissing => Ok(self.value),
        }
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// Errors raised while building a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("required field '{0}' is missing")]
    MissingRequiredField(&'static str),

    #[error("field '{0}' declared more than once")]
    DuplicateField(&'static str),
}

/// Ordered, immutable query description handed to the retrieval pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    fields: Vec<(&'static str, QueryValue)>,
}

impl QueryDescriptor {
    /// Build a descriptor from declared field specs, in declaration order
    pub fn build<I>(specs: I) -> Result<QueryDescriptor, QueryError>
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        let mut fields: Vec<(&'static str, QueryValue)> = Vec::new();
        let mut seen: Vec<&'static str> = Vec::new();

        for spec in specs {
            let name = spec.name();
            if seen.contains(&name) {
                return Err(QueryError::DuplicateField(name));
            }
            seen.push(name);

            if let Some(value) = spec.resolve()? {
                fields.push((name, value));
            }
        }

        Ok(QueryDescriptor { fields })
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &QueryValue)> {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `platform` field, if present
    pub fn platform(&self) -> Option<Platform> {
        self.get("platform").and_then(QueryValue::as_platform)
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl Serialize for QueryDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Tests
// =============================================================================
