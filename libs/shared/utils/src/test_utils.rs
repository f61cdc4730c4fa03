use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn therapist(email: &str) -> Self {
        Self::new(email, "therapist")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned store rows used by cell tests against a wiremock server.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn therapist_profile_response(therapist_id: &str, full_name: &str) -> serde_json::Value {
        json!({
            "id": therapist_id,
            "full_name": full_name,
            "designation": "Neurofeedback Therapist",
            "bio": "Licensed therapist focused on attention training",
            "specializations": ["Focus & Attention"],
            "approaches": ["Neurofeedback"],
            "qualifications": ["PhD Clinical Psychology"],
            "clinical_location": null,
            "availability": Self::weekday_availability(),
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    /// A template available Monday through Friday, 09:00-17:00, 50 minute
    /// sessions.
    pub fn weekday_availability() -> serde_json::Value {
        json!({
            "schedule": [
                { "day_of_week": 0, "available": false, "start_time": null, "end_time": null },
                { "day_of_week": 1, "available": true, "start_time": "09:00:00", "end_time": "17:00:00" },
                { "day_of_week": 2, "available": true, "start_time": "09:00:00", "end_time": "17:00:00" },
                { "day_of_week": 3, "available": true, "start_time": "09:00:00", "end_time": "17:00:00" },
                { "day_of_week": 4, "available": true, "start_time": "09:00:00", "end_time": "17:00:00" },
                { "day_of_week": 5, "available": true, "start_time": "09:00:00", "end_time": "17:00:00" },
                { "day_of_week": 6, "available": false, "start_time": null, "end_time": null }
            ],
            "session_duration_minutes": 50
        })
    }

    pub fn booking_response(
        therapist_id: &str,
        patient_id: &str,
        slot_date: &str,
        slot_time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "therapist_id": therapist_id,
            "therapist_name": "Dr. Test Therapist",
            "patient_id": patient_id,
            "patient_name": "Test Patient",
            "patient_email": "patient@example.com",
            "patient_phone": "+1 555 0100",
            "patient_gender": "female",
            "patient_date_of_birth": "1990-01-01",
            "patient_address": "1 Test Street",
            "problem_area": "Focus & Attention",
            "reason_for_booking": "Trouble focusing at work",
            "slot_date": slot_date,
            "slot_time": slot_time,
            "status": status,
            "booking_timestamp": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
