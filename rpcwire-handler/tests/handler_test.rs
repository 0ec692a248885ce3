//! Request lifecycle tests with a small arithmetic service

use rpcwire_core::{
    readers, Id, JsonRpcError, JsonRpcErrorData, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResult, Response,
};
use rpcwire_handler::{handler_fn, method_not_found, RequestHandler};
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;

#[derive(Debug, Deserialize)]
struct IntInput {
    input: i32,
}

#[derive(Default)]
struct MathOps {
    notified: RefCell<Vec<String>>,
    errors_seen: RefCell<usize>,
}

impl MathOps {
    fn invalid_params(id: Id, params: &Value) -> Response<i64, Value> {
        JsonRpcError::new(JsonRpcErrorData::invalid_params(Some(params.clone())), id).into()
    }
}

impl RequestHandler for MathOps {
    type Params = Value;
    type Output = i64;

    fn handle_client_request(&self, request: JsonRpcRequest<Value>) -> Response<i64, Value> {
        let id = request.id.clone();
        let params = match &request.params {
            Some(params) => params.clone(),
            None => return Self::invalid_params(id, &Value::Null),
        };

        let method = request.method.clone();
        let result = match method.as_str() {
            "sum" => match readers::array_of(readers::long)(&params) {
                Ok(inputs) => inputs.iter().sum(),
                Err(_) => return Self::invalid_params(id, &params),
            },
            "subtract" => match &params {
                Value::Array(_) => match readers::array_of(readers::long)(&params) {
                    Ok(inputs) if inputs.len() == 2 => inputs[0] - inputs[1],
                    _ => return Self::invalid_params(id, &params),
                },
                Value::Object(named) => {
                    let minuend = named.get("minuend").and_then(Value::as_i64);
                    let subtrahend = named.get("subtrahend").and_then(Value::as_i64);
                    match (minuend, subtrahend) {
                        (Some(minuend), Some(subtrahend)) => minuend - subtrahend,
                        _ => return Self::invalid_params(id, &params),
                    }
                }
                _ => return Self::invalid_params(id, &params),
            },
            "square" => match request.parse_params::<IntInput>() {
                Ok(typed) => {
                    let input = typed.params.map(|p| i64::from(p.input)).unwrap_or(0);
                    input * input
                }
                Err(failure) => {
                    return Response::Error(
                        self.handle_error(rpcwire_handler::failure_response(&failure)),
                    )
                }
            },
            _ => return Response::Error(method_not_found(&request)),
        };

        JsonRpcResult::new(result, id).into()
    }

    fn handle_notification(&self, notification: JsonRpcNotification<Value>) {
        self.notified.borrow_mut().push(notification.method);
    }

    fn handle_error(&self, error: JsonRpcError<Value>) -> JsonRpcError<Value> {
        *self.errors_seen.borrow_mut() += 1;
        error
    }
}

#[test]
fn test_sum() {
    let handler = MathOps::default();
    let reply = handler
        .respond(r#"{"jsonrpc":"2.0","method":"sum","params":[1,2,3,4,5],"id":"UUID-1"}"#)
        .unwrap();
    assert_eq!(
        reply.as_deref(),
        Some(r#"{"jsonrpc":"2.0","result":15,"id":"UUID-1"}"#)
    );
}

#[test]
fn test_subtract_positional_and_named() {
    let handler = MathOps::default();
    let positional = handler
        .respond(r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#)
        .unwrap();
    assert_eq!(
        positional.as_deref(),
        Some(r#"{"jsonrpc":"2.0","result":19,"id":1}"#)
    );

    let named = handler
        .respond(
            r#"{"jsonrpc":"2.0","method":"subtract","params":{"minuend":42,"subtrahend":23},"id":4}"#,
        )
        .unwrap();
    assert_eq!(named.as_deref(), Some(r#"{"jsonrpc":"2.0","result":19,"id":4}"#));
}

#[test]
fn test_square_with_typed_params() {
    let handler = MathOps::default();
    let reply = handler
        .read_and_handle(r#"{"jsonrpc":"2.0","method":"square","params":{"input":12},"id":2}"#)
        .unwrap();
    assert_eq!(reply, Response::Result(JsonRpcResult::new(144, Id::Number(2))));
}

#[test]
fn test_square_with_wrong_params_type() {
    let handler = MathOps::default();
    let reply = handler
        .read_and_handle(r#"{"jsonrpc":"2.0","method":"square","params":{"input":3.1},"id":10}"#)
        .unwrap();
    match reply {
        Response::Error(err) => {
            assert_eq!(err.error.code(), -32602);
            assert_eq!(err.id, Id::Number(10));
        }
        other => panic!("expected error response, got {:?}", other),
    }
    assert_eq!(*handler.errors_seen.borrow(), 1);
}

#[test]
fn test_unknown_method() {
    let handler = MathOps::default();
    let reply = handler
        .respond(r#"{"jsonrpc":"2.0","method":"foobar","params":[],"id":"1"}"#)
        .unwrap();
    assert_eq!(
        reply.as_deref(),
        Some(r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found","data":"foobar"},"id":"1"}"#)
    );
}

#[test]
fn test_notifications_are_never_answered() {
    let handler = MathOps::default();
    assert_eq!(
        handler
            .respond(r#"{"jsonrpc":"2.0","method":"update","params":[1,2,3,4,5]}"#)
            .unwrap(),
        None
    );
    assert_eq!(
        handler.respond(r#"{"jsonrpc":"2.0","method":"foobar"}"#).unwrap(),
        None
    );
    assert_eq!(
        handler.notified.borrow().clone(),
        vec!["update".to_string(), "foobar".to_string()]
    );
}

#[test]
fn test_read_failures_go_through_handle_error() {
    let handler = MathOps::default();

    let parse = handler
        .respond(r#"{"jsonrpc": "2.0", "method": "foobar, "params": "bar", "baz]"#)
        .unwrap()
        .unwrap();
    assert!(parse.starts_with(r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error""#));
    assert!(parse.ends_with(r#""id":null}"#));

    let invalid = handler
        .read_and_handle(r#"{"jsonrpc":"2.0","method":1,"params":"bar"}"#)
        .unwrap();
    assert_eq!(invalid.id(), &Id::Null);
    assert!(invalid.is_error());

    assert_eq!(*handler.errors_seen.borrow(), 2);
}

#[test]
fn test_notification_with_bad_params_is_dropped() {
    let handler = handler_fn(
        |req: JsonRpcRequest<Vec<i64>>| -> Response<i64, Value> {
            Response::Result(JsonRpcResult::new(req.params.iter().flatten().sum(), req.id))
        },
        |notification: JsonRpcNotification<Vec<i64>>| {
            panic!("unexpected notification {}", notification.method)
        },
    );

    assert_eq!(
        handler
            .read_and_handle(r#"{"jsonrpc":"2.0","method":"sum","params":{"a":1}}"#),
        None
    );

    // the same params on a request are answered with Invalid params
    let reply = handler
        .read_and_handle(r#"{"jsonrpc":"2.0","method":"sum","params":{"a":1},"id":8}"#)
        .unwrap();
    match reply {
        Response::Error(err) => {
            assert_eq!(err.error.code(), -32602);
            assert_eq!(err.id, Id::Number(8));
        }
        other => panic!("expected error response, got {:?}", other),
    }
}

/// Decodes positional integer params with the core readers instead of serde
struct Totals;

impl RequestHandler for Totals {
    type Params = Vec<i32>;
    type Output = i64;

    fn handle_client_request(&self, request: JsonRpcRequest<Vec<i32>>) -> Response<i64, Value> {
        let total = request.params.iter().flatten().map(|n| i64::from(*n)).sum();
        JsonRpcResult::new(total, request.id).into()
    }

    fn handle_notification(&self, _notification: JsonRpcNotification<Vec<i32>>) {}

    fn read_params(&self, params: &Value) -> rpcwire_core::Result<Vec<i32>> {
        readers::array_of(readers::int)(params)
    }
}

#[test]
fn test_read_params_override() {
    let reply = Totals
        .respond(r#"{"jsonrpc":"2.0","method":"total","params":[1,2,3],"id":1}"#)
        .unwrap();
    assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","result":6,"id":1}"#));

    let reply = Totals
        .read_and_handle(r#"{"jsonrpc":"2.0","method":"total","params":[1,"2"],"id":2}"#)
        .unwrap();
    match reply {
        Response::Error(err) => {
            assert_eq!(err.error.code(), -32602);
            assert_eq!(err.id, Id::Number(2));
            let details = err.error.data().and_then(Value::as_str).unwrap_or_default();
            assert!(details.starts_with("Unable to load params: at index 1: "));
        }
        other => panic!("expected error response, got {:?}", other),
    }
}

#[test]
fn test_notification_with_scalar_params_is_dropped() {
    let handler = MathOps::default();
    assert_eq!(
        handler
            .respond(r#"{"jsonrpc":"2.0","method":"update","params":"bar"}"#)
            .unwrap(),
        None
    );
    assert!(handler.notified.borrow().is_empty());
    assert_eq!(*handler.errors_seen.borrow(), 0);
}
