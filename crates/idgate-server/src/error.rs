use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use idgate_registration::BatchError;

/// Header carrying the human-readable explanation of a rejected request.
pub const REQUEST_EXCEPTION_HEADER: &str = "Request-Exception";

/// Application error type for the batch endpoints.
///
/// Batch-level failures answer with an empty body and the explanation in
/// the `Request-Exception` header; per-item failures never surface here,
/// they are part of the 200 response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// A batch rejection, phrased per API version by the caller.
    pub fn batch(message: String) -> Self {
        ApiError::BadRequest(message)
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during email only registration process...".to_string(),
                )
            }
        };

        let mut response = status.into_response();
        let name = HeaderName::from_bytes(REQUEST_EXCEPTION_HEADER.as_bytes());
        if let (Ok(name), Ok(value)) = (name, HeaderValue::from_str(&message)) {
            response.headers_mut().insert(name, value);
        }
        response
    }
}
