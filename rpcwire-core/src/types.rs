//! JSON-RPC 2.0 message types
//!
//! This module implements the message model of the JSON-RPC 2.0 specification
//! (https://www.jsonrpc.org/specification) as closed sum types:
//!
//! - [`Request`] is either a [`JsonRpcRequest`] (has an `id`, expects a reply) or a
//!   [`JsonRpcNotification`] (no `id`, never answered).
//! - [`Response`] is either a [`JsonRpcResult`] or a [`JsonRpcError`], both
//!   correlated to their request by `id`.
//!
//! Every type is generic over its payload (`params`, `result`, error `data`).
//! The codec first decodes messages with raw [`serde_json::Value`] payloads and
//! resolves the payload into a caller type in a second pass (see
//! [`crate::payload`]).
//!
//! # Wire layout
//!
//! `Serialize` is implemented by hand so that members are always written in the
//! order `jsonrpc`, then `method`/`result`/`error`, then `params`, then `id`.
//! The `jsonrpc` member is not stored; it is always written as `"2.0"`.

use crate::error::JsonRpcErrorData;
use crate::id::Id;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// The only protocol version this crate speaks
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request message (a call that expects a response)
///
/// # Examples
///
/// ```rust
/// use rpcwire_core::{JsonRpcRequest, Id};
/// use serde_json::json;
///
/// let req = JsonRpcRequest::new("subtract", Some(json!([42, 23])), Id::Number(1));
/// assert_eq!(req.jsonrpc(), "2.0");
/// assert_eq!(
///     serde_json::to_string(&req).unwrap(),
///     r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest<P = Value> {
    /// Name of the remote method to invoke
    pub method: String,
    /// Optional parameters, omitted from the wire when `None`
    pub params: Option<P>,
    /// Identifier that correlates the response with this request
    pub id: Id,
}

impl<P> JsonRpcRequest<P> {
    /// Create a new request
    pub fn new(method: impl Into<String>, params: Option<P>, id: Id) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }

    /// Protocol version, always "2.0"
    pub fn jsonrpc(&self) -> &'static str {
        JSONRPC_VERSION
    }
}

/// JSON-RPC 2.0 notification message
///
/// A notification has no `id` and the receiver MUST NOT reply to it, not even
/// with an error.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcNotification<P = Value> {
    /// Name of the method or event
    pub method: String,
    /// Optional parameters, omitted from the wire when `None`
    pub params: Option<P>,
}

impl<P> JsonRpcNotification<P> {
    /// Create a new notification
    pub fn new(method: impl Into<String>, params: Option<P>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Protocol version, always "2.0"
    pub fn jsonrpc(&self) -> &'static str {
        JSONRPC_VERSION
    }
}

/// Any inbound client message: a request or a notification
///
/// The presence of the `id` member on the wire decides the variant, including
/// an explicit `"id": null`, which yields a request carrying [`Id::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum Request<P = Value> {
    /// A call that expects a response
    Client(JsonRpcRequest<P>),
    /// A call that is never answered
    Notification(JsonRpcNotification<P>),
}

impl<P> Request<P> {
    /// Name of the invoked method
    pub fn method(&self) -> &str {
        match self {
            Request::Client(req) => &req.method,
            Request::Notification(notif) => &notif.method,
        }
    }

    /// Parameters, if any
    pub fn params(&self) -> Option<&P> {
        match self {
            Request::Client(req) => req.params.as_ref(),
            Request::Notification(notif) => notif.params.as_ref(),
        }
    }

    /// Request id; `None` for notifications
    pub fn id(&self) -> Option<&Id> {
        match self {
            Request::Client(req) => Some(&req.id),
            Request::Notification(_) => None,
        }
    }

    /// Returns true if no response may be sent for this message
    pub fn is_notification(&self) -> bool {
        matches!(self, Request::Notification(_))
    }
}

impl<P> From<JsonRpcRequest<P>> for Request<P> {
    fn from(req: JsonRpcRequest<P>) -> Self {
        Request::Client(req)
    }
}

impl<P> From<JsonRpcNotification<P>> for Request<P> {
    fn from(notif: JsonRpcNotification<P>) -> Self {
        Request::Notification(notif)
    }
}

/// Successful response
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcResult<R = Value> {
    /// The value returned by the method
    pub result: R,
    /// Id of the request this answers
    pub id: Id,
}

impl<R> JsonRpcResult<R> {
    /// Create a successful response
    pub fn new(result: R, id: Id) -> Self {
        Self { result, id }
    }

    /// Protocol version, always "2.0"
    pub fn jsonrpc(&self) -> &'static str {
        JSONRPC_VERSION
    }
}

/// Error response
///
/// Use `Id::Null` when the request id could not be determined.
///
/// # Examples
///
/// ```rust
/// use rpcwire_core::{JsonRpcError, JsonRpcErrorData, Id};
///
/// let error = JsonRpcError::new(
///     JsonRpcErrorData::method_not_found(Some("foobar")),
///     Id::Null,
/// );
/// assert_eq!(
///     serde_json::to_string(&error).unwrap(),
///     r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found","data":"foobar"},"id":null}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcError<E = Value> {
    /// The error object
    pub error: JsonRpcErrorData<E>,
    /// Id of the request this answers
    pub id: Id,
}

impl<E> JsonRpcError<E> {
    /// Create an error response
    pub fn new(error: JsonRpcErrorData<E>, id: Id) -> Self {
        Self { error, id }
    }

    /// Protocol version, always "2.0"
    pub fn jsonrpc(&self) -> &'static str {
        JSONRPC_VERSION
    }
}

/// Any response: exactly one of a result or an error
///
/// `Result` carries no error type and `Error` carries no result type, so a
/// response of either kind converts into any `Response<R, E>` via `From`.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<R = Value, E = Value> {
    /// Success
    Result(JsonRpcResult<R>),
    /// Failure
    Error(JsonRpcError<E>),
}

impl<R, E> Response<R, E> {
    /// Id of the request this answers
    pub fn id(&self) -> &Id {
        match self {
            Response::Result(res) => &res.id,
            Response::Error(err) => &err.id,
        }
    }

    /// Returns true for a successful response
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Result(_))
    }

    /// Returns true for an error response
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

impl<R, E> From<JsonRpcResult<R>> for Response<R, E> {
    fn from(res: JsonRpcResult<R>) -> Self {
        Response::Result(res)
    }
}

impl<R, E> From<JsonRpcError<E>> for Response<R, E> {
    fn from(err: JsonRpcError<E>) -> Self {
        Response::Error(err)
    }
}

impl<P: Serialize> Serialize for JsonRpcRequest<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.params.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("JsonRpcRequest", len)?;
        state.serialize_field("jsonrpc", JSONRPC_VERSION)?;
        state.serialize_field("method", &self.method)?;
        if let Some(params) = &self.params {
            state.serialize_field("params", params)?;
        }
        state.serialize_field("id", &self.id)?;
        state.end()
    }
}

impl<P: Serialize> Serialize for JsonRpcNotification<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.params.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("JsonRpcNotification", len)?;
        state.serialize_field("jsonrpc", JSONRPC_VERSION)?;
        state.serialize_field("method", &self.method)?;
        if let Some(params) = &self.params {
            state.serialize_field("params", params)?;
        }
        state.end()
    }
}

impl<P: Serialize> Serialize for Request<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Request::Client(req) => req.serialize(serializer),
            Request::Notification(notif) => notif.serialize(serializer),
        }
    }
}

impl<R: Serialize> Serialize for JsonRpcResult<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("JsonRpcResult", 3)?;
        state.serialize_field("jsonrpc", JSONRPC_VERSION)?;
        state.serialize_field("result", &self.result)?;
        state.serialize_field("id", &self.id)?;
        state.end()
    }
}

impl<E: Serialize> Serialize for JsonRpcError<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("JsonRpcError", 3)?;
        state.serialize_field("jsonrpc", JSONRPC_VERSION)?;
        state.serialize_field("error", &self.error)?;
        state.serialize_field("id", &self.id)?;
        state.end()
    }
}

impl<R: Serialize, E: Serialize> Serialize for Response<R, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Response::Result(res) => res.serialize(serializer),
            Response::Error(err) => err.serialize(serializer),
        }
    }
}
