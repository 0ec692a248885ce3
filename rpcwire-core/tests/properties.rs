use proptest::prelude::*;
use rpcwire_core::{
    codec, Id, JsonRpcError, JsonRpcErrorData, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResult, Request, RequestError, Response, RESERVED_CODES, SERVER_ERROR_CODES,
};
use serde_json::{Map, Value};

fn arb_id() -> impl Strategy<Value = Id> {
    prop_oneof![
        any::<i64>().prop_map(Id::Number),
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Id::String),
        Just(Id::Null),
    ]
}

fn arb_method() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_./]{0,15}"
}

fn arb_params() -> impl Strategy<Value = Option<Value>> {
    prop::option::of(prop_oneof![
        prop::collection::vec(any::<i32>(), 0..4).prop_map(|items| Value::from(items)),
        prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 0..4).prop_map(|pairs| {
            let mut map = Map::new();
            for (key, value) in pairs {
                map.insert(key, Value::from(value));
            }
            Value::Object(map)
        }),
    ])
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,10}".prop_map(Value::from),
    ]
}

fn application_code() -> impl Strategy<Value = i32> {
    any::<i32>().prop_filter("reserved codes fix their message", |code| {
        !RESERVED_CODES.contains(code)
    })
}

proptest! {
    #[test]
    fn test_request_round_trip(method in arb_method(), params in arb_params(), id in arb_id()) {
        let original = Request::Client(JsonRpcRequest::new(method, params, id));
        let text = codec::encode_request(&original).unwrap();
        prop_assert_eq!(codec::decode_request(&text).unwrap(), original);
    }

    #[test]
    fn test_notification_round_trip(method in arb_method(), params in arb_params()) {
        let original = Request::Notification(JsonRpcNotification::new(method, params));
        let text = codec::encode_request(&original).unwrap();
        prop_assert_eq!(codec::decode_request(&text).unwrap(), original);
    }

    #[test]
    fn test_result_round_trip(result in any::<i64>(), text_result in "\\PC{0,10}", id in arb_id()) {
        let numeric: Response<i64, Value> = JsonRpcResult::new(result, id.clone()).into();
        let text = codec::encode_response(&numeric).unwrap();
        prop_assert_eq!(codec::decode_response_as::<i64, Value>(&text).unwrap(), numeric);

        let textual: Response<String, Value> = JsonRpcResult::new(text_result, id).into();
        let text = codec::encode_response(&textual).unwrap();
        prop_assert_eq!(codec::decode_response_as::<String, Value>(&text).unwrap(), textual);
    }

    #[test]
    fn test_error_round_trip(
        code in application_code(),
        message in "[a-zA-Z ]{0,20}",
        data in prop::option::of(any::<i64>()),
        id in arb_id(),
    ) {
        let error = JsonRpcErrorData::new(code, message, data).unwrap();
        let original: Response<Value, i64> = JsonRpcError::new(error, id).into();
        let text = codec::encode_response(&original).unwrap();
        prop_assert_eq!(codec::decode_response_as::<Value, i64>(&text).unwrap(), original);
    }

    #[test]
    fn test_id_member_decides_variant(method in arb_method(), id in arb_id(), with_id in any::<bool>()) {
        let mut object = Map::new();
        object.insert("jsonrpc".to_string(), Value::from("2.0"));
        object.insert("method".to_string(), Value::from(method));
        if with_id {
            object.insert("id".to_string(), id.to_value());
        }
        let request = codec::decode_request_value(Value::Object(object)).unwrap();
        if with_id {
            prop_assert_eq!(request.id(), Some(&id));
        } else {
            prop_assert!(request.is_notification());
        }
    }

    #[test]
    fn test_scalar_params_never_decode(params in arb_scalar(), id in arb_id()) {
        let mut object = Map::new();
        object.insert("jsonrpc".to_string(), Value::from("2.0"));
        object.insert("method".to_string(), Value::from("m"));
        object.insert("params".to_string(), params);
        object.insert("id".to_string(), id.to_value());
        let failure = codec::decode_request_value(Value::Object(object)).unwrap_err();
        let is_invalid_request = matches!(failure, RequestError::InvalidRequest { .. });
        prop_assert!(is_invalid_request);
        prop_assert_eq!(failure.id(), id);
    }

    #[test]
    fn test_server_error_range(code in -33000i32..-31000) {
        let outcome = std::panic::catch_unwind(|| JsonRpcErrorData::<()>::server_error(code, None));
        prop_assert_eq!(outcome.is_ok(), SERVER_ERROR_CODES.contains(&code));
    }

    #[test]
    fn test_arbitrary_text_never_panics(text in "\\PC{0,64}") {
        let first = codec::decode_request(&text);
        let second = codec::decode_request(&text);
        prop_assert_eq!(&first, &second);
        if let Err(failure) = first {
            let wire: Value = serde_json::from_str(&failure.error_json_string()).unwrap();
            prop_assert_eq!(&wire["jsonrpc"], &Value::from("2.0"));
        }
    }
}
