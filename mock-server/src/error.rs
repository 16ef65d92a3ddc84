use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Body of every error response: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Rejections produced by the books endpoints. The display text is the exact
/// message clients see.
#[derive(Error, Debug)]
pub enum BooksError {
    #[error("The request is not valid.")]
    InvalidRequest,

    #[error("The book entity is not valid.")]
    InvalidEntity,

    #[error("There is no such book | books.")]
    NotFound,

    #[error("No implementation for `{0}` method")]
    MethodNotImplemented(Method),
}

impl BooksError {
    pub fn status(&self) -> StatusCode {
        match self {
            BooksError::InvalidRequest | BooksError::InvalidEntity => StatusCode::BAD_REQUEST,
            BooksError::NotFound => StatusCode::NOT_FOUND,
            BooksError::MethodNotImplemented(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for BooksError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), message = %self, "request rejected");
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
