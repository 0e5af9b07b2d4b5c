//! HTTP response handling for errors

use super::types::GateError;
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, ResponseError};
use serde_json::{Value, json};
use tracing::error;

/// `error` label for a missing CSRF token
pub const CSRF_MISSING_LABEL: &str = "CSRF token missing";
/// `error` label for an invalid or expired CSRF token
pub const CSRF_INVALID_LABEL: &str = "Invalid CSRF token";

impl ResponseError for GateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GateError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            GateError::CsrfTokenMissing
            | GateError::CsrfTokenInvalid
            | GateError::CsrfTokenExpired => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        match self {
            GateError::RateLimitExceeded(rejection) => {
                let mut body = serde_json::to_value(rejection).unwrap_or_else(|_| json!({}));
                if let Value::Object(fields) = &mut body {
                    fields.insert("error".to_string(), json!(rejection.error_label()));
                    fields.insert("message".to_string(), json!(rejection.message()));
                }

                let mut response = HttpResponse::build(status_code);
                if let Ok(value) = HeaderValue::from_str(&rejection.retry_after().to_string()) {
                    response.insert_header((HeaderName::from_static("retry-after"), value));
                }
                response.json(body)
            }
            GateError::CsrfTokenMissing => HttpResponse::build(status_code).json(json!({
                "error": CSRF_MISSING_LABEL,
                "message": "A CSRF token is required for this request",
            })),
            GateError::CsrfTokenInvalid => HttpResponse::build(status_code).json(json!({
                "error": CSRF_INVALID_LABEL,
                "message": "The CSRF token does not match this session",
            })),
            GateError::CsrfTokenExpired => HttpResponse::build(status_code).json(json!({
                "error": CSRF_INVALID_LABEL,
                "message": "The CSRF token has expired; request a new token",
            })),
            other => {
                // Log the real error server-side, return a generic message to the client
                error!(error = %other, "Internal error while admitting request");
                HttpResponse::build(status_code).json(json!({
                    "error": "Internal server error",
                    "message": "An internal error occurred",
                }))
            }
        }
    }
}
