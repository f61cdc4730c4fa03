// libs/assessment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often the respondent experiences a symptom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Never,
    Rarely,
    Sometimes,
    Often,
    VeryOften,
}

impl Frequency {
    pub fn weight(self) -> i32 {
        match self {
            Frequency::Never => 0,
            Frequency::Rarely => 1,
            Frequency::Sometimes => 2,
            Frequency::Often => 3,
            Frequency::VeryOften => 4,
        }
    }

    /// Some anxiety items only score when the symptom is frequent.
    pub fn is_frequent(self) -> bool {
        matches!(self, Frequency::Often | Frequency::VeryOften)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    NotDifficult,
    SlightlyDifficult,
    ModeratelyDifficult,
    VeryDifficult,
}

impl Difficulty {
    pub fn weight(self) -> i32 {
        match self {
            Difficulty::NotDifficult => 1,
            Difficulty::SlightlyDifficult => 2,
            Difficulty::ModeratelyDifficult => 3,
            Difficulty::VeryDifficult => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SadnessDuration {
    Rarely,
    Sometimes,
    MoreThanTwoWeeks,
    AlmostDaily,
}

impl SadnessDuration {
    pub fn weight(self) -> i32 {
        match self {
            SadnessDuration::Rarely => 1,
            SadnessDuration::Sometimes => 2,
            SadnessDuration::MoreThanTwoWeeks => 3,
            SadnessDuration::AlmostDaily => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppetiteChange {
    NoChange,
    Increased,
    Decreased,
}

impl AppetiteChange {
    pub fn weight(self) -> i32 {
        match self {
            AppetiteChange::NoChange => 0,
            AppetiteChange::Increased => 1,
            AppetiteChange::Decreased => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryConcern {
    Focus,
    Anxiety,
    Depression,
    Learning,
}

/// Raw questionnaire answers. Intensity items (`worry_intensity`,
/// `pleasure_loss`, `fatigue_level`) arrive as 0-4 self-ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponses {
    pub primary_concern: PrimaryConcern,

    // Focus & attention
    pub difficulty_concentrating: Frequency,
    pub mind_wandering: Frequency,
    pub task_completion: Frequency,
    pub organizing_tasks: Difficulty,

    // Anxiety
    pub worry_intensity: i32,
    pub racing_thoughts: Frequency,
    pub avoiding_situations: Frequency,
    pub sleep_disturbance: Frequency,

    // Depression & mood
    pub sadness_duration: SadnessDuration,
    pub pleasure_loss: i32,
    pub fatigue_level: i32,
    pub appetite_changes: AppetiteChange,

    // Learning & memory
    pub recent_memory_issues: Frequency,
    pub following_instructions: Frequency,
    pub new_skill_learning: Difficulty,
    pub expressing_thoughts: Frequency,
}

/// Raw per-domain sums, reported alongside the narrative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainScores {
    pub focus_raw_score: i32,
    pub anxiety_raw_score: i32,
    pub mood_raw_score: i32,
    pub learning_raw_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    #[serde(flatten)]
    pub scores: DomainScores,
    pub indicators: Vec<String>,
    pub recommendation: String,
}

/// Persisted assessment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub responses: AssessmentResponses,
    #[serde(flatten)]
    pub scores: DomainScores,
    pub indicators: Vec<String>,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Assessment not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
