//! Request lifecycle handling on top of the rpcwire codec
//!
//! [`RequestHandler`] owns everything between "a line of JSON arrived" and
//! "this is the JSON to send back, if anything":
//!
//! 1. Decode the envelope. A failure is answered with a Parse error or an
//!    Invalid Request error carrying whatever id could be recovered.
//! 2. Decode `params` with [`RequestHandler::read_params`]. A failure on a
//!    client request is answered with Invalid params and the request's id.
//! 3. Dispatch to [`RequestHandler::handle_client_request`] or
//!    [`RequestHandler::handle_notification`].
//!
//! Notifications are never answered. That holds even when their params fail
//! to decode, or are neither an object nor an array; such failures are only
//! logged. A message without an `id` whose version or method is broken is not
//! a notification and still gets an Invalid Request reply with a null id.
//!
//! This crate does not route methods or carry any transport. Implementors
//! match on `method` themselves and answer with
//! [`JsonRpcErrorData::method_not_found`] when nothing matches.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{JsonRpcRequest, JsonRpcResult, Response};
//! use rpcwire_handler::{handler_fn, method_not_found, RequestHandler};
//! use serde_json::Value;
//!
//! let handler = handler_fn(
//!     |req: JsonRpcRequest<Vec<i64>>| -> Response<i64, Value> {
//!         if req.method != "sum" {
//!             return Response::Error(method_not_found(&req));
//!         }
//!         let total: i64 = req.params.iter().flatten().sum();
//!         Response::Result(JsonRpcResult::new(total, req.id))
//!     },
//!     |_notification| {},
//! );
//!
//! let reply = handler
//!     .respond(r#"{"jsonrpc":"2.0","method":"sum","params":[1,2,3],"id":1}"#)
//!     .unwrap();
//! assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","result":6,"id":1}"#));
//!
//! // Notifications get no reply
//! assert_eq!(handler.respond(r#"{"jsonrpc":"2.0","method":"sum"}"#).unwrap(), None);
//! ```

use rpcwire_core::{
    codec, readers, JsonRpcError, JsonRpcErrorData, JsonRpcNotification, JsonRpcRequest,
    Request, RequestError, Response, Result, JSONRPC_VERSION,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Error response for a failed read, with the failure details as `data`
pub fn failure_response(failure: &RequestError) -> JsonRpcError<Value> {
    JsonRpcError::new(
        failure.to_error_data().map_data(Value::from),
        failure.id(),
    )
}

/// True for an object that is a notification in every respect but `params`
///
/// Only consulted after the envelope was rejected, so the params shape is the
/// one thing left that can be wrong.
fn is_malformed_notification(text: &str) -> bool {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => {
            !object.contains_key("id")
                && object.get("jsonrpc").and_then(Value::as_str) == Some(JSONRPC_VERSION)
                && object.get("method").map_or(false, Value::is_string)
        }
        _ => false,
    }
}

/// Lifecycle of one inbound JSON-RPC message
///
/// Implement the two `handle_*` methods; everything else has a default.
pub trait RequestHandler {
    /// Type the `params` of every message are decoded into
    ///
    /// The default [`read_params`](RequestHandler::read_params) uses serde.
    type Params: DeserializeOwned;
    /// Type of the `result` of successful responses
    type Output: Serialize;

    /// Answer a request that carries an id
    fn handle_client_request(
        &self,
        request: JsonRpcRequest<Self::Params>,
    ) -> Response<Self::Output, Value>;

    /// Act on a notification; nothing is sent back
    fn handle_notification(&self, notification: JsonRpcNotification<Self::Params>);

    /// Hook applied to every error response built from a read failure
    ///
    /// Override to translate errors into custom error objects. The default
    /// returns the error unchanged.
    fn handle_error(&self, error: JsonRpcError<Value>) -> JsonRpcError<Value> {
        error
    }

    /// Decode a present `params` member
    ///
    /// Called for requests and notifications alike. Override to plug in the
    /// [`readers`] or any other decoder; the error text becomes the
    /// Invalid params details.
    fn read_params(&self, params: &Value) -> Result<Self::Params> {
        readers::serde(params)
    }

    /// Decode and dispatch one message
    ///
    /// Returns the response to send, or `None` when the message was a
    /// notification.
    #[tracing::instrument(level = "debug", skip_all)]
    fn read_and_handle(&self, text: &str) -> Option<Response<Self::Output, Value>> {
        let raw = match codec::decode_request(text) {
            Ok(raw) => raw,
            Err(failure @ RequestError::InvalidRequest { .. })
                if is_malformed_notification(text) =>
            {
                tracing::warn!(
                    details = failure.details().unwrap_or_default(),
                    "Dropping notification with invalid params"
                );
                return None;
            }
            Err(failure) => {
                return Some(Response::Error(self.handle_error(failure_response(&failure))))
            }
        };

        match raw {
            Request::Client(request) => match request.parse_params_with(|p| self.read_params(p)) {
                Ok(request) => Some(self.handle_client_request(request)),
                Err(failure) => {
                    tracing::debug!(
                        id = %failure.id(),
                        details = failure.details().unwrap_or_default(),
                        "Answering request with invalid params"
                    );
                    Some(Response::Error(self.handle_error(failure_response(&failure))))
                }
            },
            Request::Notification(notification) => {
                let method = notification.method.clone();
                match notification.parse_params_with(|p| self.read_params(p)) {
                    Ok(notification) => self.handle_notification(notification),
                    Err(failure) => tracing::warn!(
                        method = %method,
                        details = failure.details().unwrap_or_default(),
                        "Dropping notification with invalid params"
                    ),
                }
                None
            }
        }
    }

    /// Encode a response
    fn write_response(&self, response: &Response<Self::Output, Value>) -> Result<String> {
        codec::encode_response(response)
    }

    /// Read, handle and encode in one call
    ///
    /// # Errors
    ///
    /// Only if the handler's `Output` fails to serialize.
    fn respond(&self, text: &str) -> Result<Option<String>> {
        self.read_and_handle(text)
            .map(|response| self.write_response(&response))
            .transpose()
    }
}

/// [`RequestHandler`] built from two closures, see [`handler_fn`]
pub struct FnHandler<P, O, F, N> {
    on_request: F,
    on_notification: N,
    _types: PhantomData<fn(P) -> O>,
}

impl<P, O, F, N> RequestHandler for FnHandler<P, O, F, N>
where
    P: DeserializeOwned,
    O: Serialize,
    F: Fn(JsonRpcRequest<P>) -> Response<O, Value>,
    N: Fn(JsonRpcNotification<P>),
{
    type Params = P;
    type Output = O;

    fn handle_client_request(&self, request: JsonRpcRequest<P>) -> Response<O, Value> {
        (self.on_request)(request)
    }

    fn handle_notification(&self, notification: JsonRpcNotification<P>) {
        (self.on_notification)(notification)
    }
}

/// Create a handler from a request closure and a notification closure
pub fn handler_fn<P, O, F, N>(on_request: F, on_notification: N) -> FnHandler<P, O, F, N>
where
    P: DeserializeOwned,
    O: Serialize,
    F: Fn(JsonRpcRequest<P>) -> Response<O, Value>,
    N: Fn(JsonRpcNotification<P>),
{
    FnHandler {
        on_request,
        on_notification,
        _types: PhantomData,
    }
}

/// Error response for a method with no implementation
///
/// The method name is carried as `data`.
pub fn method_not_found(request: &JsonRpcRequest<impl Sized>) -> JsonRpcError<Value> {
    JsonRpcError::new(
        JsonRpcErrorData::method_not_found(Some(Value::from(request.method.as_str()))),
        request.id.clone(),
    )
}
