//!
//! # Response Envelope
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! { "success": true, "status": 200, "message": "...", "data": ..., "details": ... }
//! ```
//!
//! Default status codes and messages come from two closed enums, [`SuccessKind`] and
//! [`ErrorKind`]. Handlers build an [`ApiResponse`] from one of them and override
//! `data`, `message` or `details` as needed. The HTTP status written on the wire is
//! always the `status` carried in the body.

use actix_web::{body::BoxBody, http::StatusCode, HttpRequest, HttpResponse, Responder};
use serde::{Serialize, Serializer};

/// Symbolic success outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessKind {
    Ok,
    Created,
    Accepted,
    NoContent,
    ResetContent,
    PartialContent,
}

impl SuccessKind {
    pub fn status(self) -> StatusCode {
        match self {
            SuccessKind::Ok => StatusCode::OK,
            SuccessKind::Created => StatusCode::CREATED,
            SuccessKind::Accepted => StatusCode::ACCEPTED,
            SuccessKind::NoContent => StatusCode::NO_CONTENT,
            SuccessKind::ResetContent => StatusCode::RESET_CONTENT,
            SuccessKind::PartialContent => StatusCode::PARTIAL_CONTENT,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SuccessKind::Ok => "Request was successful",
            SuccessKind::Created => "Resource created successfully",
            SuccessKind::Accepted => "Request has been accepted for processing",
            SuccessKind::NoContent => "No content",
            SuccessKind::ResetContent => "Reset content",
            SuccessKind::PartialContent => "Partial content delivered",
        }
    }
}

/// Symbolic error outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    InternalServerError,
    NotImplemented,
    ServiceUnavailable,
    GatewayTimeout,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::MethodNotAllowed => "Method Not Allowed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::NotImplemented => "Not Implemented",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
            ErrorKind::GatewayTimeout => "Gateway Timeout",
        }
    }
}

/// The uniform response body.
///
/// `data` and `details` are always serialized, as `null` when unset.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = ()> {
    pub success: bool,
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub message: String,
    pub data: Option<T>,
    pub details: Option<String>,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

impl ApiResponse<()> {
    /// Starts a successful envelope with the defaults of `kind`.
    pub fn success(kind: SuccessKind) -> Self {
        Self {
            success: true,
            status: kind.status(),
            message: kind.message().to_string(),
            data: None,
            details: None,
        }
    }

    /// Starts a failed envelope with the defaults of `kind`.
    pub fn error(kind: ErrorKind) -> Self {
        Self {
            success: false,
            status: kind.status(),
            message: kind.message().to_string(),
            data: None,
            details: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data<U: Serialize>(self, data: U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            status: self.status,
            message: self.message,
            data: Some(data),
            details: self.details,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Overrides the status code, keeping the message.
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Renders the envelope, writing its `status` as the HTTP status code.
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.status).json(&self)
    }
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        self.into_response()
    }
}
