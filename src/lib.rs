//! rpcwire - strict JSON-RPC 2.0 codec
//!
//! This is the convenience crate that re-exports the rpcwire sub-crates.
//! Use it when a single dependency is enough.
//!
//! # Architecture
//!
//! - **rpcwire-core**: Message types, envelope codec, typed payload resolution,
//!   error handling, observability
//! - **rpcwire-handler**: Request lifecycle (read, dispatch, answer) on top of
//!   the codec
//!
//! # Quick Start
//!
//! ```rust
//! use rpcwire::{codec, Id, Request};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AddParams { a: i32, b: i32 }
//!
//! let request = codec::decode_request_as::<AddParams>(
//!     r#"{"jsonrpc":"2.0","method":"add","params":{"a":5,"b":3},"id":1}"#,
//! ).unwrap();
//!
//! if let Request::Client(call) = request {
//!     let sum = call.params.map(|p| p.a + p.b);
//!     assert_eq!(sum, Some(8));
//!     assert_eq!(call.id, Id::Number(1));
//! }
//! ```
//!
//! Any failure renders straight to the error response to send back:
//!
//! ```rust
//! let failure = rpcwire::codec::decode_request(r#"{"jsonrpc":"2.0","method":1}"#).unwrap_err();
//! assert_eq!(
//!     failure.error_json_string(),
//!     r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request","data":"Invalid JSON-RPC Request: element[1] JSON type did not match expected string for \"method\""},"id":null}"#
//! );
//! ```

pub use rpcwire_core as core;
pub use rpcwire_handler as handler;

pub use rpcwire_core::{
    codec, readers, Error, Id, JsonRpcError, JsonRpcErrorData, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResult, ReadOutcome, Request, RequestError, Response, Result,
};
pub use rpcwire_handler::{handler_fn, RequestHandler};
