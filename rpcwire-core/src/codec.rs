//! Envelope codec for JSON-RPC 2.0 messages
//!
//! This module converts between JSON text (or an already parsed
//! [`serde_json::Value`] tree) and the untyped message envelope: a [`Request`]
//! or [`Response`] whose payload is still a raw JSON value. Payload types are
//! resolved afterwards, in a separate pass (see [`crate::payload`]).
//!
//! # Request path
//!
//! Inbound requests are untrusted. [`decode_request`] never returns a raw
//! internal error: every failure is a [`RequestError`] that can be sent back
//! as is with [`RequestError::error_json_string`]. Validation runs in a fixed
//! order and stops at the first failure:
//!
//! 1. Parse the text. Failure → Parse error, null id.
//! 2. The tree must be a JSON object. Failure → Invalid Request, null id.
//! 3. Read `id` before anything else so later failures can be correlated. A
//!    malformed id → Invalid Request, null id.
//! 4. `jsonrpc` must be exactly `"2.0"`.
//! 5. `method` must be a string.
//! 6. `params`, when present, must be an object or an array.
//! 7. An `id` member (even `null`) makes a request; no `id` makes a notification.
//!
//! Steps 4-6 fail with Invalid Request carrying the id from step 3.
//!
//! # Response path
//!
//! Responses come from a peer we called and are decoded less strictly:
//! any problem is a hard `Error::Decode`.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{codec, Id, Request};
//!
//! let request = codec::decode_request(
//!     r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#,
//! ).unwrap();
//! assert_eq!(request.method(), "subtract");
//! assert_eq!(request.id(), Some(&Id::Number(1)));
//!
//! let failure = codec::decode_request(r#"{"jsonrpc":"2.0","method":1}"#).unwrap_err();
//! assert_eq!(failure.code(), -32600);
//! ```

use crate::error::{Error, JsonRpcErrorData, ReadOutcome, RequestError, Result};
use crate::id::Id;
use crate::translate::DecodeFailure;
use crate::types::{
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResult, Request, Response,
    JSONRPC_VERSION,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Encode any serializable message to a JSON string
///
/// # Errors
///
/// Returns `Error::Serialization` if a payload cannot be serialized.
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode any serializable message to a JSON tree
pub fn to_value<T: Serialize>(msg: &T) -> Result<Value> {
    serde_json::to_value(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request or notification
///
/// Notifications are written without an `id` member.
pub fn encode_request<P: Serialize>(req: &Request<P>) -> Result<String> {
    encode(req)
}

/// Encode a notification
pub fn encode_notification<P: Serialize>(notif: &JsonRpcNotification<P>) -> Result<String> {
    encode(notif)
}

/// Encode a request or notification to a JSON tree
pub fn request_to_value<P: Serialize>(req: &Request<P>) -> Result<Value> {
    to_value(req)
}

/// Encode a response
pub fn encode_response<R: Serialize, E: Serialize>(resp: &Response<R, E>) -> Result<String> {
    encode(resp)
}

/// Encode a response to a JSON tree
pub fn response_to_value<R: Serialize, E: Serialize>(resp: &Response<R, E>) -> Result<Value> {
    to_value(resp)
}

/// Encode a successful response
pub fn encode_result<R: Serialize>(res: &JsonRpcResult<R>) -> Result<String> {
    encode(res)
}

/// Encode an error response
pub fn encode_error<E: Serialize>(err: &JsonRpcError<E>) -> Result<String> {
    encode(err)
}

/// Decode JSON text into an untyped request envelope
///
/// See the module documentation for the validation order.
#[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
pub fn decode_request(text: &str) -> ReadOutcome<Request<Value>> {
    let outcome = serde_json::from_str::<Value>(text)
        .map_err(|e| DecodeFailure::Parse(e.to_string()))
        .and_then(read_request_envelope)
        .map_err(RequestError::from);
    log_outcome(&outcome);
    outcome
}

/// Decode an already parsed JSON tree into an untyped request envelope
///
/// Identical to [`decode_request`] minus the parse step.
pub fn decode_request_value(value: Value) -> ReadOutcome<Request<Value>> {
    let outcome = read_request_envelope(value).map_err(RequestError::from);
    log_outcome(&outcome);
    outcome
}

/// Decode a request and its params in one call
///
/// Still two passes: the envelope is fully validated before `params` is
/// decoded into `P`, so structural errors are never masked by payload errors.
pub fn decode_request_as<P: DeserializeOwned>(text: &str) -> ReadOutcome<Request<P>> {
    decode_request(text)?.parse_params::<P>()
}

fn log_outcome(outcome: &ReadOutcome<Request<Value>>) {
    match outcome {
        Ok(request) => tracing::trace!(
            method = request.method(),
            notification = request.is_notification(),
            "Decoded request envelope"
        ),
        Err(error) => tracing::debug!(
            code = error.code(),
            id = %error.id(),
            details = error.details().unwrap_or_default(),
            "Rejected request envelope"
        ),
    }
}

fn read_request_envelope(value: Value) -> std::result::Result<Request<Value>, DecodeFailure> {
    let mut object = match value {
        Value::Object(object) => object,
        Value::Array(_) => {
            return Err(DecodeFailure::invalid_request(
                "Invalid JSON-RPC Request: batch requests are not supported",
                None,
            ))
        }
        other => {
            return Err(DecodeFailure::invalid_request(
                format!("Invalid JSON-RPC Request: {} is not a JSON object", other),
                None,
            ))
        }
    };

    // Read the id first so that later failures can still be correlated
    let id = match object.get("id") {
        Some(raw) => Some(Id::from_value(raw).map_err(|e| {
            DecodeFailure::invalid_request(format!("Invalid id {}: {}", raw, e), None)
        })?),
        None => None,
    };

    let method = check_jsonrpc(&object)
        .and_then(|_| required_str(&object, "method"))
        .map(str::to_string)
        .map_err(|e| {
            DecodeFailure::invalid_request(format!("Invalid JSON-RPC Request: {}", e), id.clone())
        })?;

    let params = match object.remove("params") {
        None => None,
        Some(params @ (Value::Object(_) | Value::Array(_))) => Some(params),
        Some(_) => {
            return Err(DecodeFailure::invalid_request(
                "\"params\" must be omitted or contain JSON Object or Array",
                id,
            ))
        }
    };

    Ok(match id {
        Some(id) => Request::Client(JsonRpcRequest::new(method, params, id)),
        None => Request::Notification(JsonRpcNotification::new(method, params)),
    })
}

/// Decode JSON text into an untyped response envelope
///
/// # Errors
///
/// `Error::Decode` if the text is not JSON, the version is wrong, `id` is
/// missing or malformed, or the object does not hold exactly one of `result`
/// and `error`. `Error::InvalidErrorObject` if the error object breaks the
/// reserved code table.
pub fn decode_response(text: &str) -> Result<Response<Value, Value>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::Decode(format!("Error parsing JSON to tree: {}", e)))?;
    decode_response_value(value)
}

/// Decode an already parsed JSON tree into an untyped response envelope
pub fn decode_response_value(value: Value) -> Result<Response<Value, Value>> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(Error::Decode(format!(
                "response {} is not a JSON object",
                other
            )))
        }
    };

    check_jsonrpc(&object).map_err(Error::Decode)?;

    let id = match object.get("id") {
        Some(raw) => Id::from_value(raw)?,
        None => return Err(Error::Decode("Did not find \"id\" in response".into())),
    };

    match (object.remove("result"), object.remove("error")) {
        (Some(result), None) => Ok(Response::Result(JsonRpcResult::new(result, id))),
        (None, Some(error)) => {
            let error = JsonRpcErrorData::from_value(&error)?;
            Ok(Response::Error(JsonRpcError::new(error, id)))
        }
        (Some(_), Some(_)) => Err(Error::Decode(
            "response contained both \"result\" and \"error\"".into(),
        )),
        (None, None) => Err(Error::Decode(
            "response did not contain \"result\" or \"error\"".into(),
        )),
    }
}

/// Decode a response and its `result` or error `data` in one call
pub fn decode_response_as<R, E>(text: &str) -> Result<Response<R, E>>
where
    R: DeserializeOwned,
    E: DeserializeOwned,
{
    decode_response(text)?.parse_payload::<R, E>()
}

fn check_jsonrpc(object: &Map<String, Value>) -> std::result::Result<(), String> {
    let version = required_str(object, "jsonrpc")?;
    if version == JSONRPC_VERSION {
        Ok(())
    } else {
        Err(format!(
            "\"{}\" is only supported value for \"jsonrpc\", got \"{}\"",
            JSONRPC_VERSION, version
        ))
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> std::result::Result<&'a str, String> {
    match object.get(key) {
        None => Err(format!("Did not find \"{}\" in tree", key)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!(
            "element[{}] JSON type did not match expected string for \"{}\"",
            other, key
        )),
    }
}
