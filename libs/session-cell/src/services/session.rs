// libs/session-cell/src/services/session.rs
use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{
    AppendEegRequest, EegSample, Session, SessionError, SessionStatus, StartSessionRequest,
};

/// Signals below this level flag a focus drop on the session record. The
/// headset bridge reports a 0-100 metric.
const FOCUS_ALERT_THRESHOLD: f64 = 50.0;
const FOCUS_ALERT_MESSAGE: &str = "Focus dropped! Please refocus.";

pub struct SessionService {
    store: Arc<StoreClient>,
}

impl SessionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(StoreClient::new(config)),
        }
    }

    pub async fn start_session(
        &self,
        patient_id: Uuid,
        request: StartSessionRequest,
        auth_token: &str,
    ) -> Result<Session, SessionError> {
        info!(
            "Starting session for patient {} with therapist {}",
            patient_id, request.therapist_id
        );

        let record = json!({
            "patient_id": patient_id,
            "therapist_id": request.therapist_id,
            "issue_type": request.issue_type,
            "eeg_data": [],
            "status": SessionStatus::Active,
        });

        let session: Session = self
            .store
            .insert_returning("sessions", record, auth_token)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(session)
    }

    /// Append one EEG reading. The samples array lives on the session row,
    /// so this is a read-modify-write of a single document; no cross-row
    /// coordination is involved.
    pub async fn append_eeg(
        &self,
        session_id: Uuid,
        patient_id: Uuid,
        request: AppendEegRequest,
        auth_token: &str,
    ) -> Result<Session, SessionError> {
        let session = self.get_session(session_id, auth_token).await?;

        if session.patient_id != patient_id {
            return Err(SessionError::Unauthorized);
        }
        if session.status != SessionStatus::Active {
            return Err(SessionError::SessionEnded);
        }

        let mut eeg_data = session.eeg_data.clone();
        eeg_data.push(EegSample {
            signal: request.signal,
            timestamp_ms: Utc::now().timestamp_millis(),
        });

        let mut patch = serde_json::Map::new();
        patch.insert("eeg_data".to_string(), json!(eeg_data));
        if request.signal < FOCUS_ALERT_THRESHOLD {
            patch.insert("focus_alert".to_string(), json!(FOCUS_ALERT_MESSAGE));
        }

        let updated: Session = self
            .store
            .update_returning(
                "sessions",
                &session_id.to_string(),
                serde_json::Value::Object(patch),
                auth_token,
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => SessionError::NotFound,
                other => SessionError::DatabaseError(other.to_string()),
            })?;

        Ok(updated)
    }

    pub async fn end_session(
        &self,
        session_id: Uuid,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Session, SessionError> {
        debug!("Ending session {}", session_id);

        let session = self.get_session(session_id, auth_token).await?;

        if session.patient_id != patient_id {
            return Err(SessionError::Unauthorized);
        }
        if session.status != SessionStatus::Active {
            return Err(SessionError::SessionEnded);
        }

        let patch = json!({ "status": SessionStatus::Ended });
        let updated: Session = self
            .store
            .update_returning("sessions", &session_id.to_string(), patch, auth_token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => SessionError::NotFound,
                other => SessionError::DatabaseError(other.to_string()),
            })?;

        info!("Session {} ended", session_id);
        Ok(updated)
    }

    pub async fn get_session(
        &self,
        session_id: Uuid,
        auth_token: &str,
    ) -> Result<Session, SessionError> {
        let path = format!("/rest/v1/sessions?id=eq.{}", session_id);
        let result: Vec<Session> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(SessionError::NotFound)
    }

    pub async fn list_patient_sessions(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Session>, SessionError> {
        debug!("Listing sessions for patient {}", patient_id);

        let path = format!(
            "/rest/v1/sessions?patient_id=eq.{}&order=created_at.desc",
            patient_id
        );
        let sessions: Vec<Session> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(sessions)
    }
}
