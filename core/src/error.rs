//! Error types for the ProsperWorks client.
//!
//! # Design
//! Every HTTP status the vendor documents gets its own `ErrorKind`; the
//! mapping lives in a single table so adding a code is a one-line change.
//! Classified failures carry the parsed response body untouched. Transport
//! faults are kept apart from the status taxonomy and never reclassified.

use std::fmt;

use crate::response::Payload;

/// Boxed error returned by a `Transport` when the round-trip itself fails.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of a failed HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    RequestEntityTooLarge,
    UnsupportedMediaType,
    RequestedRangeNotSatisfiable,
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
    NotImplemented,
    ServiceUnavailable,
    GatewayTimeout,
    InsufficientStorage,
    BandwidthLimitExceeded,
    /// Any status without a dedicated kind.
    UnknownError,
}

const STATUS_KINDS: &[(u16, ErrorKind)] = &[
    (400, ErrorKind::BadRequest),
    (401, ErrorKind::Unauthorized),
    (403, ErrorKind::Forbidden),
    (404, ErrorKind::NotFound),
    (405, ErrorKind::MethodNotAllowed),
    (406, ErrorKind::NotAcceptable),
    (409, ErrorKind::Conflict),
    (410, ErrorKind::Gone),
    (411, ErrorKind::LengthRequired),
    (412, ErrorKind::PreconditionFailed),
    (413, ErrorKind::RequestEntityTooLarge),
    (415, ErrorKind::UnsupportedMediaType),
    (416, ErrorKind::RequestedRangeNotSatisfiable),
    (422, ErrorKind::UnprocessableEntity),
    (429, ErrorKind::TooManyRequests),
    (500, ErrorKind::InternalServerError),
    (501, ErrorKind::NotImplemented),
    (503, ErrorKind::ServiceUnavailable),
    (504, ErrorKind::GatewayTimeout),
    (507, ErrorKind::InsufficientStorage),
    (509, ErrorKind::BandwidthLimitExceeded),
];

impl ErrorKind {
    /// Look up the kind for a status code. Codes outside the table map to
    /// `UnknownError`.
    pub fn from_status(status: u16) -> Self {
        STATUS_KINDS
            .iter()
            .find(|(code, _)| *code == status)
            .map_or(ErrorKind::UnknownError, |(_, kind)| *kind)
    }

    /// The status code this kind is assigned to, `None` for `UnknownError`.
    pub fn status(self) -> Option<u16> {
        STATUS_KINDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(code, _)| *code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MethodNotAllowed => "MethodNotAllowed",
            ErrorKind::NotAcceptable => "NotAcceptable",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Gone => "Gone",
            ErrorKind::LengthRequired => "LengthRequired",
            ErrorKind::PreconditionFailed => "PreconditionFailed",
            ErrorKind::RequestEntityTooLarge => "RequestEntityTooLarge",
            ErrorKind::UnsupportedMediaType => "UnsupportedMediaType",
            ErrorKind::RequestedRangeNotSatisfiable => "RequestedRangeNotSatisfiable",
            ErrorKind::UnprocessableEntity => "UnprocessableEntity",
            ErrorKind::TooManyRequests => "TooManyRequests",
            ErrorKind::InternalServerError => "InternalServerError",
            ErrorKind::NotImplemented => "NotImplemented",
            ErrorKind::ServiceUnavailable => "ServiceUnavailable",
            ErrorKind::GatewayTimeout => "GatewayTimeout",
            ErrorKind::InsufficientStorage => "InsufficientStorage",
            ErrorKind::BandwidthLimitExceeded => "BandwidthLimitExceeded",
            ErrorKind::UnknownError => "UnknownError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the client and the gateway.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status outside 200/201/202/204.
    #[error("{kind} (HTTP {status}): {payload}")]
    Status {
        kind: ErrorKind,
        status: u16,
        payload: Payload,
    },

    /// The request never produced a response (DNS, refused connection, I/O).
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The response declared a JSON content type but the body did not parse.
    #[error("response body is not valid JSON: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request body could not be serialized to JSON.
    #[error("request body could not be serialized: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ApiError::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Errors raised while assembling a `ClientConfig` from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_roundtrips_through_status() {
        for (code, kind) in STATUS_KINDS {
            assert_eq!(ErrorKind::from_status(*code), *kind);
            assert_eq!(kind.status(), Some(*code));
        }
    }

    #[test]
    fn unlisted_statuses_are_unknown() {
        for code in [100, 203, 302, 402, 408, 418, 451, 502, 505, 599] {
            assert_eq!(ErrorKind::from_status(code), ErrorKind::UnknownError, "{code}");
        }
        assert_eq!(ErrorKind::UnknownError.status(), None);
    }

    #[test]
    fn status_error_display_includes_kind_and_payload() {
        let err = ApiError::Status {
            kind: ErrorKind::Conflict,
            status: 409,
            payload: Payload::Text("duplicate".to_string()),
        };
        assert_eq!(err.to_string(), "Conflict (HTTP 409): duplicate");
        assert_eq!(err.kind(), Some(ErrorKind::Conflict));
    }

    #[test]
    fn transport_error_has_no_kind() {
        let err = ApiError::Transport("connection refused".into());
        assert!(err.kind().is_none());
        assert!(err.payload().is_none());
    }
}
