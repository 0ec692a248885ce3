//! JSON-RPC 2.0 message model and codec for rpcwire
//!
//! This crate turns untrusted JSON text into strongly typed JSON-RPC 2.0
//! messages and back. It includes:
//!
//! - **Types**: requests, notifications, results, errors and their ids
//! - **Codec**: envelope decoding with strict validation, and encoding with a
//!   fixed field order
//! - **Payload resolution**: a second pass that decodes `params`, `result` or
//!   error `data` into a caller type
//! - **Error handling**: the reserved error-code table, typed read failures
//!   (`RequestError`) that render straight to a wire error response
//! - **Observability**: `tracing` subscriber and OpenTelemetry setup
//!
//! # Two-pass decoding
//!
//! Decoding an inbound request happens in two separate steps. The envelope is
//! validated first (`jsonrpc`, `method`, `id`, shape of `params`), leaving the
//! payload as a raw [`serde_json::Value`]. Only then is the payload decoded into
//! the caller's type. A structural error is therefore never hidden behind a
//! payload error, and failures of each step map to their own JSON-RPC error.
//!
//! The crate is transport-agnostic and has no shared state: every function is
//! safe to call from any number of threads at once.
//!
//! # Example
//!
//! ```rust
//! use rpcwire_core::{codec, JsonRpcErrorData, JsonRpcError, Id, Request, Response};
//! use serde_json::Value;
//!
//! let request = codec::decode_request(r#"{"jsonrpc":"2.0","method":"foobar","id":"1"}"#).unwrap();
//!
//! // No such method: answer with an error that echoes the id
//! let id = request.id().cloned().unwrap_or(Id::Null);
//! let reply: Response<Value, String> =
//!     JsonRpcError::new(JsonRpcErrorData::method_not_found(Some(request.method().to_string())), id).into();
//!
//! assert_eq!(
//!     codec::encode_response(&reply).unwrap(),
//!     r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found","data":"foobar"},"id":"1"}"#
//! );
//!
//! // Malformed input yields a ready-to-send error response
//! let failure = codec::decode_request("{").unwrap_err();
//! assert!(failure.error_json_string().ends_with(r#""id":null}"#));
//! ```

pub mod codec;
pub mod error;
pub mod id;
pub mod observability;
pub mod payload;
pub mod readers;
mod translate;
pub mod types;

pub use error::{
    Error, ErrorCategory, JsonRpcErrorData, ReadOutcome, RequestError, Result, RESERVED_CODES,
    SERVER_ERROR_CODES,
};
pub use id::Id;
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResult, Request, Response,
    JSONRPC_VERSION,
};
