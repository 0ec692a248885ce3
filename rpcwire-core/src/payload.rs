//! Typed payload resolution
//!
//! The envelope codec leaves `params`, `result` and error `data` as raw
//! [`serde_json::Value`]s. The functions here run the second pass: they decode
//! that raw payload into a caller type and rebuild the message around it,
//! keeping method and id untouched.
//!
//! A payload that is absent stays absent and the decoder is never called.
//!
//! Decoders come in two flavours:
//!
//! - `*_with` methods take any `FnOnce(&Value) -> Result<T, X>` where `X`
//!   implements `Display`, such as the functions in [`crate::readers`].
//! - The plain methods use `serde` (`T: DeserializeOwned`).
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{codec, Id, RequestError};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Pair {
//!     i1: i32,
//!     i2: i32,
//! }
//!
//! let raw = codec::decode_request(
//!     r#"{"jsonrpc":"2.0","method":"add","params":{"i1":1,"i2":2},"id":1}"#,
//! ).unwrap();
//! let typed = raw.parse_params::<Pair>().unwrap();
//! assert_eq!(typed.params().map(|p| p.i1 + p.i2), Some(3));
//!
//! let raw = codec::decode_request(
//!     r#"{"jsonrpc":"2.0","method":"add","params":{"input":3.1},"id":10}"#,
//! ).unwrap();
//! let failure = raw.parse_params::<Pair>().unwrap_err();
//! assert!(matches!(failure, RequestError::InvalidParams { id: Id::Number(10), .. }));
//! ```

use crate::error::{Error, JsonRpcErrorData, ReadOutcome, Result};
use crate::id::Id;
use crate::translate::DecodeFailure;
use crate::types::{
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResult, Request, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;

/// Run `reader` on a present payload, returning the failure text otherwise
fn resolve<T, X, F>(raw: Option<Value>, reader: F) -> std::result::Result<Option<T>, String>
where
    X: Display,
    F: FnOnce(&Value) -> std::result::Result<T, X>,
{
    match raw {
        None => Ok(None),
        Some(value) => reader(&value).map(Some).map_err(|e| e.to_string()),
    }
}

fn serde_reader<T: DeserializeOwned>(value: &Value) -> std::result::Result<T, serde_json::Error> {
    T::deserialize(value)
}

fn params_failure(reason: String, id: Id) -> crate::error::RequestError {
    let failure = DecodeFailure::InvalidParams {
        message: format!("Unable to load params: {}", reason),
        id,
    };
    tracing::debug!(error = %failure, "Params did not load");
    failure.into()
}

impl JsonRpcRequest<Value> {
    /// Decode `params` with `reader`
    ///
    /// # Errors
    ///
    /// `RequestError::InvalidParams` carrying this request's id.
    pub fn parse_params_with<P, X, F>(self, reader: F) -> ReadOutcome<JsonRpcRequest<P>>
    where
        X: Display,
        F: FnOnce(&Value) -> std::result::Result<P, X>,
    {
        let JsonRpcRequest { method, params, id } = self;
        match resolve(params, reader) {
            Ok(params) => Ok(JsonRpcRequest { method, params, id }),
            Err(reason) => Err(params_failure(reason, id)),
        }
    }

    /// Decode `params` into `P` with serde
    pub fn parse_params<P: DeserializeOwned>(self) -> ReadOutcome<JsonRpcRequest<P>> {
        self.parse_params_with(serde_reader::<P>)
    }
}

impl JsonRpcNotification<Value> {
    /// Decode `params` with `reader`
    ///
    /// A failure still carries a null id. No response may be sent for it.
    pub fn parse_params_with<P, X, F>(self, reader: F) -> ReadOutcome<JsonRpcNotification<P>>
    where
        X: Display,
        F: FnOnce(&Value) -> std::result::Result<P, X>,
    {
        let JsonRpcNotification { method, params } = self;
        match resolve(params, reader) {
            Ok(params) => Ok(JsonRpcNotification { method, params }),
            Err(reason) => Err(params_failure(reason, Id::Null)),
        }
    }

    /// Decode `params` into `P` with serde
    pub fn parse_params<P: DeserializeOwned>(self) -> ReadOutcome<JsonRpcNotification<P>> {
        self.parse_params_with(serde_reader::<P>)
    }
}

impl Request<Value> {
    /// Decode `params` with `reader`, whichever variant this is
    #[tracing::instrument(level = "trace", skip_all, fields(method = %self.method()))]
    pub fn parse_params_with<P, X, F>(self, reader: F) -> ReadOutcome<Request<P>>
    where
        X: Display,
        F: FnOnce(&Value) -> std::result::Result<P, X>,
    {
        match self {
            Request::Client(req) => req.parse_params_with(reader).map(Request::Client),
            Request::Notification(notif) => {
                notif.parse_params_with(reader).map(Request::Notification)
            }
        }
    }

    /// Decode `params` into `P` with serde
    pub fn parse_params<P: DeserializeOwned>(self) -> ReadOutcome<Request<P>> {
        self.parse_params_with(serde_reader::<P>)
    }
}

impl JsonRpcErrorData<Value> {
    /// Decode `data` with `reader`
    ///
    /// Code and message are kept as they are; only the data changes type.
    ///
    /// # Errors
    ///
    /// `Error::Decode` if `reader` rejects the data.
    pub fn parse_data_with<E, X, F>(self, reader: F) -> Result<JsonRpcErrorData<E>>
    where
        X: Display,
        F: FnOnce(&Value) -> std::result::Result<E, X>,
    {
        let code = self.code();
        let message = self.message().to_string();
        let data = resolve(self.into_data(), reader)
            .map_err(|reason| Error::Decode(format!("Unable to load error data: {}", reason)))?;
        JsonRpcErrorData::new(code, message, data)
    }

    /// Decode `data` into `E` with serde
    pub fn parse_data<E: DeserializeOwned>(self) -> Result<JsonRpcErrorData<E>> {
        self.parse_data_with(serde_reader::<E>)
    }
}

impl JsonRpcResult<Value> {
    /// Decode `result` with `reader`
    ///
    /// `result` is always present, possibly as JSON null, so the reader is
    /// always called.
    pub fn parse_result_with<R, X, F>(self, reader: F) -> Result<JsonRpcResult<R>>
    where
        X: Display,
        F: FnOnce(&Value) -> std::result::Result<R, X>,
    {
        let result = reader(&self.result)
            .map_err(|e| Error::Decode(format!("Unable to load result: {}", e)))?;
        Ok(JsonRpcResult::new(result, self.id))
    }
}

impl JsonRpcError<Value> {
    /// Decode the error `data` with `reader`
    pub fn parse_data_with<E, X, F>(self, reader: F) -> Result<JsonRpcError<E>>
    where
        X: Display,
        F: FnOnce(&Value) -> std::result::Result<E, X>,
    {
        let error = self.error.parse_data_with(reader)?;
        Ok(JsonRpcError::new(error, self.id))
    }
}

impl Response<Value, Value> {
    /// Decode the payload with the reader matching the variant
    ///
    /// Only one of the two readers is ever called.
    pub fn parse_payload_with<R, E, XR, XE, FR, FE>(
        self,
        result_reader: FR,
        data_reader: FE,
    ) -> Result<Response<R, E>>
    where
        XR: Display,
        XE: Display,
        FR: FnOnce(&Value) -> std::result::Result<R, XR>,
        FE: FnOnce(&Value) -> std::result::Result<E, XE>,
    {
        match self {
            Response::Result(res) => res.parse_result_with(result_reader).map(Response::Result),
            Response::Error(err) => err.parse_data_with(data_reader).map(Response::Error),
        }
    }

    /// Decode the payload into `R` or `E` with serde
    pub fn parse_payload<R, E>(self) -> Result<Response<R, E>>
    where
        R: DeserializeOwned,
        E: DeserializeOwned,
    {
        self.parse_payload_with(serde_reader::<R>, serde_reader::<E>)
    }
}
