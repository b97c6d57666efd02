//! HTTP error mapping.

use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Body, Method, Response, StatusCode};
use psy_engine::CalculationError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("No route for {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Calculation(err) if err.is_input_error() => StatusCode::BAD_REQUEST,
            Self::Calculation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `{"success": false, "error": "..."}` with the mapped status.
    pub fn into_response(self) -> Response<Body> {
        let body = json!({ "success": false, "error": self.to_string() });
        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = self.status();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
