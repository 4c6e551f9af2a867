//! Proxy for the third-party elevation API, so browsers can query it without
//! running into CORS.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("missing lat/lon")]
    MissingCoordinates,

    #[error("elevation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("elevation api returned {0}")]
    Status(reqwest::StatusCode),
}

impl ResponseError for ElevationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ElevationError::MissingCoordinates => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ElevationError::MissingCoordinates => "Missing lat/lon",
            err => {
                tracing::error!(error = %err, "elevation fetch failed");
                "Failed to fetch elevation"
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

#[derive(Debug, Clone)]
pub struct ElevationClient {
    http: reqwest::Client,
    base_url: String,
}

impl ElevationClient {
    pub fn new(base_url: impl Into<String>) -> ElevationClient {
        ElevationClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn request_url(&self, lat: &str, lon: &str) -> String {
        format!("{}?locations={},{}", self.base_url, lat, lon)
    }

    /// Look up a coordinate and hand back the upstream JSON unchanged.
    pub async fn lookup(&self, lat: &str, lon: &str) -> Result<Value, ElevationError> {
        let response = self.http.get(self.request_url(lat, lon)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ElevationError::Status(status));
        }
        Ok(response.json::<Value>().await?)
    }
}
