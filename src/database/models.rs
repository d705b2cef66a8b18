use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::DatabaseError;

/// One of the four behavioral dimensions of the DISC model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    D,
    I,
    S,
    C,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::D => "D",
            Dimension::I => "I",
            Dimension::S => "S",
            Dimension::C => "C",
        }
    }
}

impl FromStr for Dimension {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(Dimension::D),
            "I" => Ok(Dimension::I),
            "S" => Ok(Dimension::S),
            "C" => Ok(Dimension::C),
            other => Err(DatabaseError::InvalidValue {
                field: "dimension",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The answer slot a candidate picked on one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        }
    }
}

impl FromStr for AnswerOption {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AnswerOption::A),
            "B" => Ok(AnswerOption::B),
            "C" => Ok(AnswerOption::C),
            "D" => Ok(AnswerOption::D),
            other => Err(DatabaseError::InvalidValue {
                field: "selected_option",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    InProgress,
    Completed,
    Expired,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Expired => "expired",
        }
    }
}

impl FromStr for AssessmentStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(AssessmentStatus::InProgress),
            "completed" => Ok(AssessmentStatus::Completed),
            "expired" => Ok(AssessmentStatus::Expired),
            other => Err(DatabaseError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position tier of the role the candidate is assessed for. Opaque to
/// scoring; stored and returned verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionLevel {
    Entry,
    Mid,
    Senior,
}

impl PositionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionLevel::Entry => "entry",
            PositionLevel::Mid => "mid",
            PositionLevel::Senior => "senior",
        }
    }
}

impl FromStr for PositionLevel {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(PositionLevel::Entry),
            "mid" => Ok(PositionLevel::Mid),
            "senior" => Ok(PositionLevel::Senior),
            other => Err(DatabaseError::InvalidValue {
                field: "position_level",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PositionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One forced-choice scenario question. Each answer slot carries the DISC
/// dimension it expresses. Immutable once seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub question_number: i32,
    pub scenario_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub dimension_a: Dimension,
    pub dimension_b: Dimension,
    pub dimension_c: Dimension,
    pub dimension_d: Dimension,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// The dimension tag stored in the slot matching the selected option.
    pub fn dimension_for(&self, option: AnswerOption) -> Dimension {
        match option {
            AnswerOption::A => self.dimension_a,
            AnswerOption::B => self.dimension_b,
            AnswerOption::C => self.dimension_c,
            AnswerOption::D => self.dimension_d,
        }
    }
}

/// Record used to seed a catalog entry; id and timestamp are assigned by
/// the store on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question_number: i32,
    pub scenario_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub dimension_a: Dimension,
    pub dimension_b: Dimension,
    pub dimension_c: Dimension,
    pub dimension_d: Dimension,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub position_level: PositionLevel,
    pub status: AssessmentStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dominance_score: i32,
    pub influence_score: i32,
    pub steadiness_score: i32,
    pub conscientiousness_score: i32,
    pub total_time_minutes: i32,
}

/// One submitted answer. Append-only; repeated submissions for the same
/// question_number are all kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub question_number: i32,
    pub selected_option: AnswerOption,
    pub response_time_seconds: i32,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied by administrative callers. `None` leaves the
/// column untouched; cross-field invariants are not re-checked here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentPatch {
    pub candidate_id: Option<Uuid>,
    pub position_level: Option<PositionLevel>,
    pub status: Option<AssessmentStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dominance_score: Option<i32>,
    pub influence_score: Option<i32>,
    pub steadiness_score: Option<i32>,
    pub conscientiousness_score: Option<i32>,
    pub total_time_minutes: Option<i32>,
}

impl AssessmentPatch {
    pub fn is_empty(&self) -> bool {
        self.candidate_id.is_none()
            && self.position_level.is_none()
            && self.status.is_none()
            && self.completed_at.is_none()
            && self.dominance_score.is_none()
            && self.influence_score.is_none()
            && self.steadiness_score.is_none()
            && self.conscientiousness_score.is_none()
            && self.total_time_minutes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            AssessmentStatus::InProgress,
            AssessmentStatus::Completed,
            AssessmentStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<AssessmentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("archived".parse::<AssessmentStatus>().is_err());
    }

    #[test]
    fn dimension_lookup_follows_slots() {
        let question = Question {
            id: Uuid::new_v4(),
            question_number: 1,
            scenario_text: String::new(),
            option_a: String::new(),
            option_b: String::new(),
            option_c: String::new(),
            option_d: String::new(),
            dimension_a: Dimension::S,
            dimension_b: Dimension::C,
            dimension_c: Dimension::D,
            dimension_d: Dimension::I,
            created_at: Utc::now(),
        };

        assert_eq!(question.dimension_for(AnswerOption::A), Dimension::S);
        assert_eq!(question.dimension_for(AnswerOption::C), Dimension::D);
    }

    #[test]
    fn assessment_serializes_with_wire_field_names() {
        let assessment = Assessment {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            position_level: PositionLevel::Entry,
            status: AssessmentStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
            dominance_score: 0,
            influence_score: 0,
            steadiness_score: 0,
            conscientiousness_score: 0,
            total_time_minutes: 0,
        };

        let value = serde_json::to_value(&assessment).unwrap();
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["position_level"], "entry");
        assert!(value["completed_at"].is_null());
        assert_eq!(value["dominance_score"], 0);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(AssessmentPatch::default().is_empty());
        let patch = AssessmentPatch {
            total_time_minutes: Some(42),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
