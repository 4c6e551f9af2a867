use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Number;

use crate::error::Error;

/// One stored GPS + elevation sample. `id` and `timestamp` are assigned by
/// the store at insert.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub session_id: String,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timestamp: DateTime<Utc>,
}

/// A validated sample waiting to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub session_id: String,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl NewLogEntry {
    pub fn into_entry(self, id: i64, timestamp: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id,
            session_id: self.session_id,
            user_id: self.user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
            timestamp,
        }
    }
}

/// A JSON field that clients send either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
}

/// Body of `POST /log`.
#[derive(Debug, Default, Deserialize)]
pub struct LogRequest {
    pub session_id: Option<Scalar>,
    pub user_id: Option<Scalar>,
    pub latitude: Option<Scalar>,
    pub longitude: Option<Scalar>,
    pub elevation: Option<Scalar>,
}

impl LogRequest {
    /// Every field must be present and truthy: empty strings and a value of
    /// exactly zero are rejected. Numeric identifiers are kept as their
    /// decimal text, numeric strings are accepted as readings.
    pub fn validate(self) -> Result<NewLogEntry, Error> {
        Ok(NewLogEntry {
            session_id: required_text("session_id", self.session_id)?,
            user_id: required_text("user_id", self.user_id)?,
            latitude: required_number("latitude", self.latitude)?,
            longitude: required_number("longitude", self.longitude)?,
            elevation: required_number("elevation", self.elevation)?,
        })
    }
}

fn required_text(field: &'static str, value: Option<Scalar>) -> Result<String, Error> {
    match value {
        Some(Scalar::Text(v)) if !v.is_empty() => Ok(v),
        Some(Scalar::Number(n)) if n.as_f64().map_or(false, |v| v != 0.0) => Ok(n.to_string()),
        _ => Err(Error::Validation(field)),
    }
}

fn required_number(field: &'static str, value: Option<Scalar>) -> Result<f64, Error> {
    let reading = match value {
        Some(Scalar::Number(n)) => n.as_f64(),
        Some(Scalar::Text(t)) => t.trim().parse::<f64>().ok(),
        None => None,
    };
    match reading {
        Some(v) if v != 0.0 && v.is_finite() => Ok(v),
        _ => Err(Error::Validation(field)),
    }
}

/// A session as seen by the listing page: one distinct (session, user) pair
/// and the time of its earliest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
}

/// Body of `POST /view`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Query of `GET /elevation`.
#[derive(Debug, Default, Deserialize)]
pub struct ElevationQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}
