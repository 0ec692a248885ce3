//! JSON-RPC 2.0 request identifiers
//!
//! The `id` member correlates a response with the request that caused it. The
//! JSON-RPC 2.0 specification allows a string, an integral number, or null.
//!
//! Identity is exact in both directions:
//!
//! - A JSON string always decodes to [`Id::String`], even when its content looks
//!   numeric (`"5"` and `5` are different ids).
//! - A JSON number decodes to [`Id::Number`] only when it is integral and fits
//!   an `i64`; fractional numbers are rejected.
//! - JSON `null` decodes to [`Id::Null`], which is also the id used for error
//!   responses when no id could be recovered from the request.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// JSON-RPC 2.0 request ID
///
/// # Examples
///
/// ```rust
/// use rpcwire_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// assert_eq!(Id::Null.to_value(), serde_json::Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    /// String identifier, kept verbatim
    String(String),
    /// Integral numeric identifier
    Number(i64),
    /// Null identifier; also used when no id could be recovered
    Null,
}

impl Id {
    /// Encode the id as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Id::String(s) => Value::String(s.clone()),
            Id::Number(n) => Value::from(*n),
            Id::Null => Value::Null,
        }
    }

    /// Decode an id from a JSON value
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` for objects, arrays, booleans, fractional numbers
    /// and integers outside the `i64` range.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Id::String(s.clone())),
            Value::Number(n) => n.as_i64().map(Id::Number).ok_or_else(|| {
                Error::Decode(format!("id {} is not an integral 64-bit number", n))
            }),
            Value::Null => Ok(Id::Null),
            other => Err(Error::Decode(format!(
                "id {} must be a string, an integral number or null",
                other
            ))),
        }
    }

    /// Returns true for [`Id::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Id::Null)
    }
}

impl fmt::Display for Id {
    /// Formats the id the way it appears on the wire
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Id::String(s) => serializer.serialize_str(s),
            Id::Number(n) => serializer.serialize_i64(*n),
            Id::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Id::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<i32> for Id {
    fn from(n: i32) -> Self {
        Id::Number(i64::from(n))
    }
}
