use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Failures of the backing log store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("tls setup failed: {0}")]
    Tls(#[from] rustls::Error),

    #[error("store task was cancelled")]
    Canceled,

    #[error("store lock poisoned")]
    Poisoned,
}

/// Request-level failures of the log and view endpoints.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing field: {0}")]
    Validation(&'static str),

    #[error("invalid credentials")]
    Auth,

    #[error("session not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Error::Validation(field) => {
                tracing::debug!(field, "rejected log entry");
                "Missing data"
            }
            Error::Auth => {
                tracing::warn!("failed login attempt");
                "Invalid credentials"
            }
            Error::NotFound(_) => "Session not found",
            Error::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                "Internal server error"
            }
        };

        HttpResponse::build(self.status_code())
            .content_type("text/plain")
            .body(body)
    }
}
