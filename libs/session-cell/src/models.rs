// libs/session-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Ended,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Ended => write!(f, "ended"),
        }
    }
}

/// Problem domain a neurofeedback session targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum IssueType {
    Focus,
    Learning,
    Anxiety,
    Depression,
}

/// One EEG reading. The signal is an opaque metric from the headset
/// bridge; this service records it without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EegSample {
    pub signal: f64,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub therapist_id: Uuid,
    pub issue_type: IssueType,
    #[serde(default)]
    pub eeg_data: Vec<EegSample>,
    pub status: SessionStatus,
    pub focus_alert: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub therapist_id: Uuid,
    pub issue_type: IssueType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendEegRequest {
    pub signal: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session has already ended")]
    SessionEnded,

    #[error("Unauthorized access to session")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
