use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weekday row of a therapist's recurring schedule.
/// `day_of_week` follows store convention: 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub day_of_week: i32,
    pub available: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Weekly recurring schedule plus the length of one bookable unit.
/// Stored as a field on the therapist's profile row, not as its own
/// collection; bookable slots are always recomputed from it and never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityTemplate {
    pub schedule: Vec<DayAvailability>,
    pub session_duration_minutes: i32,
}

impl AvailabilityTemplate {
    /// Schedule must cover each weekday exactly once; enabled days need a
    /// well-ordered time window, disabled days carry no times.
    pub fn validate(&self) -> Result<(), TherapistError> {
        if self.session_duration_minutes <= 0 {
            return Err(TherapistError::InvalidSchedule(
                "Session duration must be positive".to_string(),
            ));
        }

        if self.schedule.len() != 7 {
            return Err(TherapistError::InvalidSchedule(format!(
                "Schedule must have exactly 7 entries, got {}",
                self.schedule.len()
            )));
        }

        let mut seen_days = [false; 7];
        for day in &self.schedule {
            if day.day_of_week < 0 || day.day_of_week > 6 {
                return Err(TherapistError::InvalidSchedule(
                    "Day of week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
                ));
            }
            let idx = day.day_of_week as usize;
            if seen_days[idx] {
                return Err(TherapistError::InvalidSchedule(format!(
                    "Duplicate schedule entry for day {}",
                    day.day_of_week
                )));
            }
            seen_days[idx] = true;

            if day.available {
                match (day.start_time, day.end_time) {
                    (Some(start), Some(end)) => {
                        if start >= end {
                            return Err(TherapistError::InvalidSchedule(
                                "Start time must be before end time".to_string(),
                            ));
                        }
                    }
                    _ => {
                        return Err(TherapistError::InvalidSchedule(
                            "Available days require start and end times".to_string(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn day(&self, day_of_week: i32) -> Option<&DayAvailability> {
        self.schedule.iter().find(|d| d.day_of_week == day_of_week)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalLocation {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TherapistProfile {
    pub id: Uuid,
    pub full_name: String,
    pub designation: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub approaches: Vec<String>,
    #[serde(default)]
    pub qualifications: Vec<String>,
    pub clinical_location: Option<ClinicalLocation>,
    pub availability: Option<AvailabilityTemplate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TherapistError {
    #[error("Therapist not found")]
    NotFound,

    #[error("Invalid availability schedule: {0}")]
    InvalidSchedule(String),

    #[error("Therapist has not configured availability")]
    NoAvailability,

    #[error("Unauthorized access to therapist profile")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
