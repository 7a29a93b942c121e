use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rota_core::RotaError;

/// Private sentinel error type used to carry a plain-text HTTP 400 (for
/// example a malformed request body) through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given plain-text message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            return (StatusCode::BAD_REQUEST, b.0.clone()).into_response();
        }
        if let Some(RotaError::InvalidCount(kind)) = self.0.downcast_ref::<RotaError>() {
            return (StatusCode::BAD_REQUEST, kind.count_message()).into_response();
        }

        tracing::error!(error = %format!("{:#}", self.0), "request failed");
        let body = serde_json::json!({ "error": self.0.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
