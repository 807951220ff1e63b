use std::fmt;

use bytes::Bytes;
use http::StatusCode;
use pixgate_protocol::openai::error::ErrorResponse;

/// Stable `code` values of the error envelope. Clients branch on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unauthorized,
    InvalidApiKey,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    MissingParameter,
    InvalidModel,
    InvalidRequest,
    UpstreamError,
    BadGateway,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InvalidApiKey => "invalid_api_key",
            ErrorCode::NotFound => "not_found",
            ErrorCode::MethodNotAllowed => "method_not_allowed",
            ErrorCode::PayloadTooLarge => "payload_too_large",
            ErrorCode::MissingParameter => "missing_parameter",
            ErrorCode::InvalidModel => "invalid_model",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::UpstreamError => "upstream_error",
            ErrorCode::BadGateway => "bad_gateway",
            ErrorCode::InternalServerError => "internal_server_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure of one inbound request, already carrying the status and `code`
/// it is reported with.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code} ({status}): {message}")]
pub struct GatewayError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl GatewayError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
    }

    pub fn invalid_api_key(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorCode::InvalidApiKey, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::MethodNotAllowed,
            message,
        )
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::PayloadTooLarge,
            message,
        )
    }

    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::MissingParameter, message)
    }

    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidModel, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest, message)
    }

    /// Upstream replied with a non-success status. The status is propagated
    /// as-is when it is a valid HTTP status.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        Self::new(status, ErrorCode::UpstreamError, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, ErrorCode::BadGateway, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            message,
        )
    }

    pub fn to_envelope(&self) -> ErrorResponse {
        ErrorResponse::new(self.message.clone(), "api_error", self.code.as_str())
    }

    pub fn body(&self) -> Bytes {
        // A struct of three strings always serializes.
        serde_json::to_vec(&self.to_envelope())
            .map(Bytes::from)
            .unwrap_or_default()
    }
}
