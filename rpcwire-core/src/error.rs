//! Error types for rpcwire
//!
//! This module provides error handling for JSON-RPC 2.0 message processing.
//! It defines three families of errors:
//!
//! - **Error**: Library-level errors returned by fallible codec calls (uses thiserror)
//! - **JsonRpcErrorData**: The wire-format error object of a JSON-RPC error response
//! - **RequestError**: The typed outcome of a failed inbound read, one variant per
//!   JSON-RPC error category the codec can detect on its own
//!
//! # Standard Error Codes
//!
//! JSON-RPC 2.0 defines standard error codes:
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid Request (not a valid Request object)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! # Strict code/message pairing
//!
//! Every code in the reserved range `-32768..=-32000` fixes its message. Error
//! objects are validated on construction and on decode: a reserved code with a
//! different message, or a reserved code outside the categories above, is
//! rejected with `Error::InvalidErrorObject`. Codes outside the reserved range
//! are application errors and carry any message.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{JsonRpcErrorData, RequestError, Id};
//!
//! let error = JsonRpcErrorData::method_not_found(Some("unknownMethod".to_string()));
//! assert_eq!(error.code(), -32601);
//! assert_eq!(error.message(), "Method not found");
//!
//! let failure = RequestError::InvalidRequest { details: None, id: Id::Number(3) };
//! assert_eq!(
//!     failure.error_json_string(),
//!     r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":3}"#
//! );
//! ```

use crate::id::Id;
use crate::types::{JsonRpcError, JSONRPC_VERSION};
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Result type for rpcwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of reading an inbound message: the decoded value or a typed
/// failure that can be sent back to the peer as is.
pub type ReadOutcome<T> = std::result::Result<T, RequestError>;

/// Codes reserved by JSON-RPC 2.0 for pre-defined errors
pub const RESERVED_CODES: RangeInclusive<i32> = -32768..=-32000;

/// Codes reserved for implementation-defined server errors
pub const SERVER_ERROR_CODES: RangeInclusive<i32> = -32099..=-32000;

/// Library-level error type
///
/// # Error Categories
///
/// - **Decode**: a message, id or error object could not be decoded. This is the
///   hard failure of the trusted (response) path; the request path reports
///   `RequestError` instead.
/// - **Serialization**: a caller payload could not be turned into JSON
/// - **InvalidErrorObject**: an error object breaks the reserved code table
/// - **Request**: a typed inbound read failure, propagated with `?`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Serialization of a payload to JSON failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error object whose code and message disagree with the reserved code table
    #[error("Invalid error object: code {code} does not allow message {message:?}")]
    InvalidErrorObject {
        /// The offending code
        code: i32,
        /// The message that came with it
        message: String,
    },

    /// A typed inbound read failure
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// The error categories of the JSON-RPC 2.0 reserved code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// -32700
    ParseError,
    /// -32600
    InvalidRequest,
    /// -32601
    MethodNotFound,
    /// -32602
    InvalidParams,
    /// -32603
    InternalError,
    /// -32099 to -32000
    ServerError(i32),
}

impl ErrorCategory {
    /// Numeric code of the category
    pub fn code(&self) -> i32 {
        match self {
            ErrorCategory::ParseError => -32700,
            ErrorCategory::InvalidRequest => -32600,
            ErrorCategory::MethodNotFound => -32601,
            ErrorCategory::InvalidParams => -32602,
            ErrorCategory::InternalError => -32603,
            ErrorCategory::ServerError(code) => *code,
        }
    }

    /// The fixed message of the category
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCategory::ParseError => "Parse error",
            ErrorCategory::InvalidRequest => "Invalid Request",
            ErrorCategory::MethodNotFound => "Method not found",
            ErrorCategory::InvalidParams => "Invalid params",
            ErrorCategory::InternalError => "Internal error",
            ErrorCategory::ServerError(_) => "Server error",
        }
    }

    /// Look up the category of a reserved code
    ///
    /// Returns `None` for application codes and for reserved codes that are
    /// not assigned to any category.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -32700 => Some(ErrorCategory::ParseError),
            -32600 => Some(ErrorCategory::InvalidRequest),
            -32601 => Some(ErrorCategory::MethodNotFound),
            -32602 => Some(ErrorCategory::InvalidParams),
            -32603 => Some(ErrorCategory::InternalError),
            c if SERVER_ERROR_CODES.contains(&c) => Some(ErrorCategory::ServerError(c)),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

/// Check a code/message pair against the reserved code table
fn validate_code(code: i32, message: &str) -> Result<()> {
    let valid = match ErrorCategory::from_code(code) {
        Some(category) => category.message() == message,
        None => !RESERVED_CODES.contains(&code),
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidErrorObject {
            code,
            message: message.to_string(),
        })
    }
}

/// JSON-RPC 2.0 error object
///
/// This is the `error` member of an error response: a `code`, a `message` and
/// an optional `data` payload of caller-chosen type `E`.
///
/// Fields are private so that every value honours the reserved code table;
/// use the category constructors or [`JsonRpcErrorData::new`].
///
/// # Examples
///
/// ```rust
/// use rpcwire_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let custom = JsonRpcErrorData::new(
///     1001,
///     "Insufficient funds",
///     Some(json!({"balance": 50, "required": 100})),
/// ).unwrap();
/// assert_eq!(custom.code(), 1001);
///
/// // Reserved codes fix their message
/// assert!(JsonRpcErrorData::<()>::new(-32601, "Nope", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcErrorData<E = Value> {
    code: i32,
    message: String,
    data: Option<E>,
}

impl<E> JsonRpcErrorData<E> {
    /// Create an error object after validating the code/message pair
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidErrorObject` if `code` is reserved and `message`
    /// is not the category's message, or if `code` is reserved but unassigned.
    pub fn new(code: i32, message: impl Into<String>, data: Option<E>) -> Result<Self> {
        let message = message.into();
        validate_code(code, &message)?;
        Ok(Self {
            code,
            message,
            data,
        })
    }

    fn from_category(category: ErrorCategory, data: Option<E>) -> Self {
        Self {
            code: category.code(),
            message: category.message().to_string(),
            data,
        }
    }

    /// Create a parse error (-32700)
    ///
    /// JSON-RPC 2.0: "Invalid JSON was received by the server."
    pub fn parse_error(data: Option<E>) -> Self {
        Self::from_category(ErrorCategory::ParseError, data)
    }

    /// Create an invalid request error (-32600)
    ///
    /// JSON-RPC 2.0: "The JSON sent is not a valid Request object."
    pub fn invalid_request(data: Option<E>) -> Self {
        Self::from_category(ErrorCategory::InvalidRequest, data)
    }

    /// Create a method not found error (-32601)
    ///
    /// The codec never produces this itself; it is raised by whatever consumes
    /// the decoded request when no handler exists for the method.
    pub fn method_not_found(data: Option<E>) -> Self {
        Self::from_category(ErrorCategory::MethodNotFound, data)
    }

    /// Create an invalid params error (-32602)
    pub fn invalid_params(data: Option<E>) -> Self {
        Self::from_category(ErrorCategory::InvalidParams, data)
    }

    /// Create an internal error (-32603)
    pub fn internal_error(data: Option<E>) -> Self {
        Self::from_category(ErrorCategory::InternalError, data)
    }

    /// Create a server error with an implementation-defined code
    ///
    /// # Panics
    ///
    /// Panics unless `code` lies in `-32099..=-32000`. Passing another code is
    /// a programming error, not a data error.
    pub fn server_error(code: i32, data: Option<E>) -> Self {
        assert!(
            SERVER_ERROR_CODES.contains(&code),
            "code={} outside JSON-RPC server error range",
            code
        );
        Self::from_category(ErrorCategory::ServerError(code), data)
    }

    /// Numeric error code
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Short description of the error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Additional error information, if any
    pub fn data(&self) -> Option<&E> {
        self.data.as_ref()
    }

    /// Consume the error object and return its data
    pub fn into_data(self) -> Option<E> {
        self.data
    }

    /// Category of the code, `None` for application errors
    pub fn category(&self) -> Option<ErrorCategory> {
        ErrorCategory::from_code(self.code)
    }

    /// Replace the data with the result of `f`, keeping code and message
    pub fn map_data<T>(self, f: impl FnOnce(E) -> T) -> JsonRpcErrorData<T> {
        JsonRpcErrorData {
            code: self.code,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

impl JsonRpcErrorData<Value> {
    /// Decode an error object from a JSON tree
    ///
    /// `code` must be an integer in the `i32` range, `message` a string, and
    /// `data` may hold any JSON value. The result is validated against the
    /// reserved code table.
    ///
    /// # Errors
    ///
    /// `Error::Decode` for shape problems, `Error::InvalidErrorObject` for a
    /// code/message pair the table forbids.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Decode(format!("error object {} is not a JSON object", value)))?;

        let code = match object.get("code") {
            None => return Err(Error::Decode("Did not find \"code\" in error object".into())),
            Some(code) => code
                .as_i64()
                .and_then(|c| i32::try_from(c).ok())
                .ok_or_else(|| Error::Decode(format!("\"code\" {} is not an integer", code)))?,
        };

        let message = match object.get("message") {
            None => {
                return Err(Error::Decode(
                    "Did not find \"message\" in error object".into(),
                ))
            }
            Some(Value::String(message)) => message.clone(),
            Some(other) => {
                return Err(Error::Decode(format!(
                    "\"message\" {} is not a string",
                    other
                )))
            }
        };

        Self::new(code, message, object.get("data").cloned())
    }
}

impl<E> fmt::Display for JsonRpcErrorData<E> {
    /// Formats as "[code] message" for logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl<E: fmt::Debug> std::error::Error for JsonRpcErrorData<E> {}

impl<E: Serialize> Serialize for JsonRpcErrorData<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.data.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("JsonRpcErrorData", len)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        if let Some(data) = &self.data {
            state.serialize_field("data", data)?;
        }
        state.end()
    }
}

impl<'de, E: DeserializeOwned> Deserialize<'de> for JsonRpcErrorData<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let raw = JsonRpcErrorData::from_value(&value).map_err(serde::de::Error::custom)?;
        raw.parse_data::<E>().map_err(serde::de::Error::custom)
    }
}

/// Typed failure of an inbound read
///
/// Each variant maps to exactly one error object of the reserved code table,
/// with `details` carried as the object's `data`. `ParseError` and
/// `InternalError` always answer with a null id; the other two carry the id
/// recovered from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The text was not valid JSON (-32700)
    ParseError {
        /// First line of the parser diagnostic
        details: Option<String>,
    },
    /// Valid JSON, but not a valid Request object (-32600)
    InvalidRequest {
        /// What was wrong with the envelope
        details: Option<String>,
        /// Best-effort id recovered before validation failed
        id: Id,
    },
    /// The envelope was valid but its params could not be decoded (-32602)
    InvalidParams {
        /// Why the params did not load
        details: Option<String>,
        /// Id of the enclosing request, null for a notification
        id: Id,
    },
    /// Unexpected failure (-32603)
    InternalError {
        /// First line of the underlying error
        details: Option<String>,
    },
}

impl RequestError {
    /// The reserved category of this failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            RequestError::ParseError { .. } => ErrorCategory::ParseError,
            RequestError::InvalidRequest { .. } => ErrorCategory::InvalidRequest,
            RequestError::InvalidParams { .. } => ErrorCategory::InvalidParams,
            RequestError::InternalError { .. } => ErrorCategory::InternalError,
        }
    }

    /// The JSON-RPC error code
    pub fn code(&self) -> i32 {
        self.category().code()
    }

    /// The id an error response must carry
    pub fn id(&self) -> Id {
        match self {
            RequestError::ParseError { .. } | RequestError::InternalError { .. } => Id::Null,
            RequestError::InvalidRequest { id, .. } | RequestError::InvalidParams { id, .. } => {
                id.clone()
            }
        }
    }

    /// Diagnostic details, if any
    pub fn details(&self) -> Option<&str> {
        match self {
            RequestError::ParseError { details }
            | RequestError::InvalidRequest { details, .. }
            | RequestError::InvalidParams { details, .. }
            | RequestError::InternalError { details } => details.as_deref(),
        }
    }

    /// The error object for this failure, with `details` as `data`
    pub fn to_error_data(&self) -> JsonRpcErrorData<String> {
        JsonRpcErrorData::from_category(self.category(), self.details().map(str::to_string))
    }

    /// The complete error response for this failure
    pub fn to_response(&self) -> JsonRpcError<String> {
        JsonRpcError::new(self.to_error_data(), self.id())
    }

    /// The exact JSON text to send back to the peer
    pub fn error_json_string(&self) -> String {
        let mut error = Map::new();
        error.insert("code".into(), Value::from(self.code()));
        error.insert("message".into(), Value::from(self.category().message()));
        if let Some(details) = self.details() {
            error.insert("data".into(), Value::from(details));
        }

        let mut response = Map::new();
        response.insert("jsonrpc".into(), Value::from(JSONRPC_VERSION));
        response.insert("error".into(), Value::Object(error));
        response.insert("id".into(), self.id().to_value());
        Value::Object(response).to_string()
    }
}

impl fmt::Display for RequestError {
    /// Formats as "[code] message: details"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())?;
        if let Some(details) = self.details() {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestError {}
