use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{AvailabilityTemplate, TherapistError, TherapistProfile};

pub struct TherapistService {
    store: Arc<StoreClient>,
}

impl TherapistService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(StoreClient::new(config)),
        }
    }

    pub fn with_store(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    /// Patient-facing directory listing.
    pub async fn list_therapists(
        &self,
        auth_token: &str,
    ) -> Result<Vec<TherapistProfile>, TherapistError> {
        debug!("Listing therapist profiles");

        let path = "/rest/v1/therapist_profiles?order=full_name.asc";
        let result: Vec<TherapistProfile> = self
            .store
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| TherapistError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn get_profile(
        &self,
        therapist_id: Uuid,
        auth_token: &str,
    ) -> Result<TherapistProfile, TherapistError> {
        debug!("Fetching therapist profile: {}", therapist_id);

        let path = format!("/rest/v1/therapist_profiles?id=eq.{}", therapist_id);
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| TherapistError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(TherapistError::NotFound);
        }

        let profile: TherapistProfile = serde_json::from_value(result[0].clone())
            .map_err(|e| TherapistError::DatabaseError(format!("Failed to parse profile: {}", e)))?;

        Ok(profile)
    }

    /// The weekly template patients book against. Missing template is its
    /// own error so callers can distinguish "no schedule yet" from a missing
    /// therapist.
    pub async fn get_availability(
        &self,
        therapist_id: Uuid,
        auth_token: &str,
    ) -> Result<AvailabilityTemplate, TherapistError> {
        let profile = self.get_profile(therapist_id, auth_token).await?;
        profile.availability.ok_or(TherapistError::NoAvailability)
    }

    /// Replace the therapist's weekly template wholesale. The caller has
    /// already been authorized as the profile owner.
    pub async fn update_availability(
        &self,
        therapist_id: Uuid,
        template: AvailabilityTemplate,
        auth_token: &str,
    ) -> Result<TherapistProfile, TherapistError> {
        debug!("Updating availability for therapist {}", therapist_id);

        template.validate()?;

        let patch = json!({
            "availability": template,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let updated: TherapistProfile = self
            .store
            .update_returning("therapist_profiles", &therapist_id.to_string(), patch, auth_token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => TherapistError::NotFound,
                other => TherapistError::DatabaseError(other.to_string()),
            })?;

        Ok(updated)
    }
}
