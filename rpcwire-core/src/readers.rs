//! Ready-made payload readers
//!
//! Each reader is a plain function `&Value -> Result<T>` that can be handed to
//! the `*_with` methods of [`crate::payload`]. They are strict: no coercion
//! between JSON types, and numbers must fit the target type exactly.
//!
//! ```rust
//! use rpcwire_core::readers;
//! use serde_json::json;
//!
//! assert_eq!(readers::int(&json!(7)).unwrap(), 7);
//! assert!(readers::int(&json!("7")).is_err());
//!
//! let ints = readers::array_of(readers::int);
//! assert_eq!(ints(&json!([1, 2, 3])).unwrap(), vec![1, 2, 3]);
//! ```

use crate::error::{Error, Result};
use ::serde::de::DeserializeOwned;
use serde_json::Value;

fn mismatch(value: &Value, expected: &str) -> Error {
    Error::Decode(format!(
        "element[{}] JSON type did not match expected {}",
        value, expected
    ))
}

/// Read a JSON string
pub fn string(value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(value, "string"))
}

/// Read a JSON boolean
pub fn boolean(value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| mismatch(value, "boolean"))
}

/// Read an integral number that fits an `i32`
pub fn int(value: &Value) -> Result<i32> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| mismatch(value, "32-bit integer"))
}

/// Read an integral number that fits an `i64`
pub fn long(value: &Value) -> Result<i64> {
    value.as_i64().ok_or_else(|| mismatch(value, "64-bit integer"))
}

/// Read any JSON number as an `f64`
pub fn double(value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| mismatch(value, "number"))
}

/// Build a reader for a JSON array whose elements are read by `element`
///
/// The first failing element fails the whole array and names its index.
pub fn array_of<T, F>(element: F) -> impl Fn(&Value) -> Result<Vec<T>>
where
    F: Fn(&Value) -> Result<T>,
{
    move |value: &Value| {
        let items = value.as_array().ok_or_else(|| mismatch(value, "array"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                element(item).map_err(|e| Error::Decode(format!("at index {}: {}", index, e)))
            })
            .collect()
    }
}

/// Read any `DeserializeOwned` type with serde
pub fn serde<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::Decode(e.to_string()))
}
