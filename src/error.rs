use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

// Taken from https://github.com/tokio-rs/axum/blob/main/examples/anyhow-error-response/src/main.rs
#[derive(Debug)]
pub struct ModelServeError {
    pub status: StatusCode,
    pub message: HttpErrorResponse,
}

/// Error payload sent to clients. Serializes as `{"detail": "..."}`, the
/// shape every error response of this API shares.
#[derive(Debug, Serialize)]
pub struct HttpErrorResponse {
    detail: String,
}

impl From<String> for HttpErrorResponse {
    fn from(message: String) -> Self {
        HttpErrorResponse { detail: message }
    }
}

impl From<&str> for HttpErrorResponse {
    fn from(message: &str) -> Self {
        HttpErrorResponse {
            detail: message.to_string(),
        }
    }
}

impl IntoResponse for ModelServeError {
    fn into_response(self) -> Response {
        let mut res = Json(self.message).into_response();
        *res.status_mut() = self.status;
        res
    }
}

impl<E> From<E> for ModelServeError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ModelServeError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: HttpErrorResponse::from(err.into().to_string()),
        }
    }
}

pub type ServeResult<T, E = ModelServeError> = Result<T, E>;

#[macro_export]
macro_rules! bail_serve {
    ($error_message:expr) => {
        return Err($crate::error::ModelServeError { status: StatusCode::INTERNAL_SERVER_ERROR, message: HttpErrorResponse::from($error_message) })
    };
    ($status_code:expr, $error_message:expr) => {
        return Err($crate::error::ModelServeError { status: $status_code, message: HttpErrorResponse::from($error_message) })
    };
    ($status:expr, $fmt:expr $(, $arg:expr)*) => {
        return Err(ModelServeError {
            status: $status,
            message: HttpErrorResponse::from(format!($fmt $(, $arg)*)),
        })
    };
}
