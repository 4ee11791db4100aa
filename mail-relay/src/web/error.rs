//! Request rejections and their HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::email::ValidationError;

/// Every way a request can end without being accepted.
#[derive(Debug, Error)]
pub enum RejectReason {
    #[error("route not found")]
    NotFound,

    #[error("could not authenticate")]
    Unauthorized,

    #[error("request body could not be read")]
    BodyUnreadable,

    #[error("request body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("request body is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// JSON body for 400 responses that carry detail.
#[derive(Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
enum ErrorBody {
    ParseError { message: String },
    ValidationError(ValidationError),
}

impl IntoResponse for RejectReason {
    fn into_response(self) -> Response {
        match self {
            RejectReason::NotFound => (StatusCode::NOT_FOUND, "Not found.").into_response(),
            RejectReason::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Could not authenticate").into_response()
            }
            RejectReason::BodyUnreadable => StatusCode::BAD_REQUEST.into_response(),
            RejectReason::Parse(e) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::ParseError {
                    message: e.to_string(),
                }),
            )
                .into_response(),
            RejectReason::Invalid(e) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::ValidationError(e))).into_response()
            }
        }
    }
}
