// libs/assessment-cell/src/services/assessment.rs
use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{Assessment, AssessmentError, AssessmentOutcome, AssessmentResponses};
use crate::services::scoring;

pub struct AssessmentService {
    store: Arc<StoreClient>,
}

impl AssessmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(StoreClient::new(config)),
        }
    }

    /// Score the questionnaire and persist the outcome with the raw
    /// responses, so past results remain reproducible even if the scoring
    /// weights evolve.
    pub async fn submit(
        &self,
        patient_id: Uuid,
        responses: AssessmentResponses,
        auth_token: &str,
    ) -> Result<Assessment, AssessmentError> {
        let outcome: AssessmentOutcome = scoring::evaluate(&responses);

        info!(
            "Assessment for patient {}: focus={} anxiety={} mood={} learning={}",
            patient_id,
            outcome.scores.focus_raw_score,
            outcome.scores.anxiety_raw_score,
            outcome.scores.mood_raw_score,
            outcome.scores.learning_raw_score
        );

        let record = json!({
            "patient_id": patient_id,
            "responses": responses,
            "focus_raw_score": outcome.scores.focus_raw_score,
            "anxiety_raw_score": outcome.scores.anxiety_raw_score,
            "mood_raw_score": outcome.scores.mood_raw_score,
            "learning_raw_score": outcome.scores.learning_raw_score,
            "indicators": outcome.indicators,
            "recommendation": outcome.recommendation,
        });

        let assessment: Assessment = self
            .store
            .insert_returning("assessments", record, auth_token)
            .await
            .map_err(|e| AssessmentError::DatabaseError(e.to_string()))?;

        Ok(assessment)
    }

    pub async fn list_patient_assessments(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Assessment>, AssessmentError> {
        debug!("Listing assessments for patient {}", patient_id);

        let path = format!(
            "/rest/v1/assessments?patient_id=eq.{}&order=created_at.desc",
            patient_id
        );
        let assessments: Vec<Assessment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AssessmentError::DatabaseError(e.to_string()))?;

        Ok(assessments)
    }
}
