//! Translation of internal decode failures into [`RequestError`]
//!
//! The envelope and payload stages signal failures with [`DecodeFailure`]. Only
//! the public decode boundary converts them, so every failure reaching a caller
//! has gone through the same mapping:
//!
//! | signal          | variant          | id                          |
//! |-----------------|------------------|-----------------------------|
//! | `Parse`         | `ParseError`     | null                        |
//! | `InvalidRequest`| `InvalidRequest` | recovered id, else null     |
//! | `InvalidParams` | `InvalidParams`  | id of the enclosing message |
//! | `Internal`      | `InternalError`  | null                        |
//!
//! Diagnostics are cut to their first line before they become `details`, which
//! keeps multi-line parser output out of the `data` member of wire errors.

use crate::error::{Error, RequestError};
use crate::id::Id;
use thiserror::Error;

/// Failure signal raised inside the decode stages
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum DecodeFailure {
    #[error("Error parsing JSON to tree: {0}")]
    Parse(String),

    #[error("{message}")]
    InvalidRequest { message: String, id: Option<Id> },

    #[error("{message}")]
    InvalidParams { message: String, id: Id },

    #[error("{0}")]
    Internal(String),
}

impl DecodeFailure {
    pub(crate) fn invalid_request(message: impl Into<String>, id: Option<Id>) -> Self {
        DecodeFailure::InvalidRequest {
            message: message.into(),
            id,
        }
    }
}

/// First line of a diagnostic; empty input yields an empty string
pub(crate) fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

impl From<DecodeFailure> for RequestError {
    fn from(failure: DecodeFailure) -> Self {
        let details = Some(first_line(&failure.to_string()));
        match failure {
            DecodeFailure::Parse(_) => RequestError::ParseError { details },
            DecodeFailure::InvalidRequest { id, .. } => RequestError::InvalidRequest {
                details,
                id: id.unwrap_or(Id::Null),
            },
            DecodeFailure::InvalidParams { id, .. } => RequestError::InvalidParams { details, id },
            DecodeFailure::Internal(_) => RequestError::InternalError { details },
        }
    }
}

impl From<Error> for RequestError {
    /// Typed failures pass through; anything else is unexpected and becomes an
    /// internal error with a null id.
    fn from(error: Error) -> Self {
        match error {
            Error::Request(request_error) => request_error,
            other => DecodeFailure::Internal(other.to_string()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("one\ntwo\nthree"), "one");
        assert_eq!(first_line("only"), "only");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("crlf\r\nnext"), "crlf");
    }

    #[test]
    fn test_parse_failure_has_null_id() {
        let error: RequestError = DecodeFailure::Parse("EOF while parsing".into()).into();
        assert_eq!(
            error,
            RequestError::ParseError {
                details: Some("Error parsing JSON to tree: EOF while parsing".into())
            }
        );
        assert_eq!(error.id(), Id::Null);
    }

    #[test]
    fn test_invalid_request_defaults_to_null_id() {
        let error: RequestError = DecodeFailure::invalid_request("bad", None).into();
        assert_eq!(error.id(), Id::Null);

        let error: RequestError =
            DecodeFailure::invalid_request("bad", Some(Id::from("abc"))).into();
        assert_eq!(error.id(), Id::from("abc"));
    }

    #[test]
    fn test_multiline_details_truncated() {
        let error: RequestError = DecodeFailure::InvalidParams {
            message: "Unable to load params: first\n  at line 2\n  at line 3".into(),
            id: Id::Number(4),
        }
        .into();
        assert_eq!(error.details(), Some("Unable to load params: first"));
        assert_eq!(error.id(), Id::Number(4));
    }

    #[test]
    fn test_unexpected_errors_become_internal() {
        let error: RequestError = Error::Serialization("boom\nstack".into()).into();
        assert_eq!(
            error,
            RequestError::InternalError {
                details: Some("Serialization error: boom".into())
            }
        );
    }

    #[test]
    fn test_request_errors_pass_through() {
        let original = RequestError::InvalidParams {
            details: None,
            id: Id::Number(1),
        };
        let converted: RequestError = Error::Request(original.clone()).into();
        assert_eq!(converted, original);
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let failure = DecodeFailure::invalid_request("Invalid JSON-RPC Request: x\ny", None);
        let first: RequestError = failure.clone().into();
        let second: RequestError = failure.into();
        assert_eq!(first, second);
    }
}
