// libs/assessment-cell/src/services/scoring.rs
//
// Weighted-threshold scoring of the cognitive self-assessment. Each domain
// sums four weighted items; crossing the threshold adds an indicator and a
// targeted recommendation. The narrative only speaks to the respondent's
// primary concern, but all four raw scores are reported.
use crate::models::{
    AssessmentOutcome, AssessmentResponses, DomainScores, PrimaryConcern,
};

pub const DOMAIN_THRESHOLD: i32 = 8;

const DISCLAIMER: &str = "This is a preliminary self-assessment and not a clinical diagnosis. \
     A comprehensive evaluation by a qualified professional is essential for \
     accurate diagnosis and personalized recommendations.";

pub fn score_responses(responses: &AssessmentResponses) -> DomainScores {
    let focus_raw_score = responses.difficulty_concentrating.weight()
        + responses.mind_wandering.weight()
        + responses.task_completion.weight()
        + responses.organizing_tasks.weight();

    // Avoidance and sleep disturbance only count when frequent, and then
    // weigh heavier than a plain frequency item.
    let anxiety_raw_score = responses.worry_intensity
        + responses.racing_thoughts.weight()
        + if responses.avoiding_situations.is_frequent() { 2 } else { 0 }
        + if responses.sleep_disturbance.is_frequent() { 2 } else { 0 };

    let mood_raw_score = responses.sadness_duration.weight()
        + responses.pleasure_loss
        + responses.fatigue_level
        + responses.appetite_changes.weight();

    let learning_raw_score = responses.recent_memory_issues.weight()
        + responses.following_instructions.weight()
        + responses.new_skill_learning.weight()
        + responses.expressing_thoughts.weight();

    DomainScores {
        focus_raw_score,
        anxiety_raw_score,
        mood_raw_score,
        learning_raw_score,
    }
}

pub fn evaluate(responses: &AssessmentResponses) -> AssessmentOutcome {
    let scores = score_responses(responses);
    let mut indicators = Vec::new();
    let mut recommendation = String::new();

    match responses.primary_concern {
        PrimaryConcern::Focus => {
            if scores.focus_raw_score >= DOMAIN_THRESHOLD {
                indicators.push(
                    "Responses suggest potential difficulties with focus and attention."
                        .to_string(),
                );
                recommendation.push_str(
                    "Strategies focusing on attention regulation, time management, and \
                     minimizing distractions may be helpful. Neurofeedback training is a \
                     potential avenue to explore for enhancing focus. ",
                );
            } else {
                recommendation.push_str(
                    "Continue to be mindful of your attention and focus in daily activities. ",
                );
            }
        }
        PrimaryConcern::Anxiety => {
            if scores.anxiety_raw_score >= DOMAIN_THRESHOLD {
                indicators.push(
                    "Responses indicate potential experiences with anxiety.".to_string(),
                );
                recommendation.push_str(
                    "Techniques such as mindfulness, relaxation exercises, and cognitive \
                     restructuring can be beneficial for managing anxiety. Seeking guidance \
                     from a therapist specializing in anxiety disorders is recommended. ",
                );
            } else {
                recommendation.push_str(
                    "Continue to practice healthy coping mechanisms for stress and worry. ",
                );
            }
        }
        PrimaryConcern::Depression => {
            if scores.mood_raw_score >= DOMAIN_THRESHOLD {
                indicators.push(
                    "Responses suggest potential symptoms of low mood or depression."
                        .to_string(),
                );
                recommendation.push_str(
                    "Engaging in enjoyable activities, maintaining social connections, and \
                     establishing a consistent routine can be supportive. Consulting with a \
                     mental health professional for a thorough assessment is advised. ",
                );
            } else {
                recommendation
                    .push_str("Continue to prioritize self-care and monitor your mood. ");
            }
        }
        PrimaryConcern::Learning => {
            if scores.learning_raw_score >= DOMAIN_THRESHOLD {
                indicators.push(
                    "Responses indicate potential areas of learning or cognitive processing \
                     challenges."
                        .to_string(),
                );
                recommendation.push_str(
                    "Exploring strategies for memory enhancement, organization, and \
                     communication may be helpful. Consulting with an educational \
                     psychologist could provide valuable insights and support. ",
                );
            } else {
                recommendation.push_str(
                    "Continue to be aware of your learning style and seek strategies that \
                     work best for you. ",
                );
            }
        }
    }

    recommendation.push_str(DISCLAIMER);

    AssessmentOutcome {
        scores,
        indicators,
        recommendation,
    }
}
