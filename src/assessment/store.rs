//! Data-access contracts the engine runs against. `DatabaseManager` backs
//! them with Postgres; `MemoryStore` backs them with an in-process map.

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{
    AnswerOption, Assessment, AssessmentPatch, PositionLevel, Question, Response,
};
use crate::database::Result;

/// Read-only view of the seeded question bank.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// Every catalog entry, ordered by `question_number` ascending.
    async fn list_questions(&self) -> Result<Vec<Question>>;

    /// `Ok(None)` when no entry carries that number.
    async fn get_question(&self, question_number: i32) -> Result<Option<Question>>;
}

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert_assessment(
        &self,
        candidate_id: Uuid,
        position_level: PositionLevel,
    ) -> Result<Assessment>;

    /// `Ok(None)` when the id is unknown; store failures are still errors.
    async fn get_assessment(&self, id: Uuid) -> Result<Option<Assessment>>;

    async fn list_assessments(&self) -> Result<Vec<Assessment>>;

    async fn list_assessments_by_candidate(&self, candidate_id: Uuid) -> Result<Vec<Assessment>>;

    /// Applies the non-`None` patch fields; `AssessmentNotFound` when the id
    /// does not exist.
    async fn update_assessment(&self, id: Uuid, patch: AssessmentPatch) -> Result<Assessment>;

    /// Runs the scoring pass over the stored responses and catalog, then
    /// finalizes the assessment in one atomic step: status `completed`,
    /// `completed_at` set, the four dimension scores, and the caller-supplied
    /// total time. Re-running on a completed assessment overwrites.
    async fn complete_assessment(&self, id: Uuid, total_time_minutes: i32) -> Result<Assessment>;

    /// Removes the assessment and every response it owns; both deletes commit
    /// together or not at all. Returns whether the assessment row existed.
    async fn delete_assessment(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Appends one answer with a store-assigned creation timestamp. Neither
    /// the assessment's status nor catalog membership of `question_number`
    /// is checked here; unmatched numbers fall out at scoring time.
    async fn insert_response(
        &self,
        assessment_id: Uuid,
        question_number: i32,
        selected_option: AnswerOption,
        response_time_seconds: i32,
    ) -> Result<Uuid>;

    /// Every response for one assessment in submission order.
    async fn list_responses(&self, assessment_id: Uuid) -> Result<Vec<Response>>;
}
