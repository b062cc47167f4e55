//! Error types for the todo service.
//!
//! This module defines the central `Error` enum, which captures all recoverable
//! and reportable error cases within the service. It implements
//! [`IntoResponse`] so handlers can propagate errors with `?` and have them
//! rendered with the appropriate HTTP status code and message.
//!
//! ## Error Cases
//! - `MalformedRequest`: The request path does not have the expected shape.
//! - `Decode`: The request body could not be decoded into the expected type.
//! - `Validation`: An item failed a domain rule (e.g., non-zero ID on insert).
//! - `Persistence`: The underlying database operation failed.
//! - `Serialization`: A response body could not be encoded.
//! - `Channel`: An internal communication failure between tasks.
//! - `ServiceShutdown`: A request arrived while the service was shutting down.
//! - `NotFound`: The requested item (or a non-empty list) does not exist.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the todo service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The request path did not match the expected collection shape.
    #[error("Malformed request path: {detail}")]
    MalformedRequest { detail: String },

    /// The request body could not be decoded.
    #[error("Failed to decode request body: {detail}")]
    Decode { detail: String },

    /// An item failed validation against the domain rules.
    #[error("Validation failure: {detail}")]
    Validation { detail: String },

    /// The underlying persistence operation failed.
    #[error("Persistence error: {detail}")]
    Persistence { detail: String },

    /// A response body could not be encoded.
    #[error("Failed to serialize response: {detail}")]
    Serialization { detail: String },

    /// Internal channel send/receive failure (e.g., closed channel).
    #[error("Channel error: {context}")]
    Channel { context: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,

    /// No matching todo item exists.
    #[error("ToDo not found")]
    NotFound,
}

impl Error {
    /// The HTTP status code this error maps to at the transport boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest { .. } | Self::Decode { .. } | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ServiceShutdown => StatusCode::SERVICE_UNAVAILABLE,
            Self::Persistence { .. } | Self::Serialization { .. } | Self::Channel { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            Error::MalformedRequest {
                detail: "x".into(),
            },
            Error::Decode { detail: "x".into() },
            Error::Validation { detail: "x".into() },
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn server_errors_map_to_500() {
        for err in [
            Error::Persistence { detail: "x".into() },
            Error::Serialization { detail: "x".into() },
            Error::Channel { context: "x".into() },
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(Error::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn shutdown_maps_to_503() {
        assert_eq!(Error::ServiceShutdown.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn display_carries_detail() {
        let err = Error::Persistence {
            detail: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "Persistence error: connection refused");
    }
}
