use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::store::{AssessmentStore, QuestionCatalog, ResponseStore};
use crate::database::models::{
    AnswerOption, Assessment, AssessmentPatch, PositionLevel, Question, Response,
};
use crate::database::{DatabaseError, Result};

/// Front door of the engine: boundary validation and logging around the
/// store contracts. Holds the catalog as an injected read-only collaborator
/// so scoring stays a pure function of (responses, catalog).
pub struct AssessmentEngine {
    catalog: Arc<dyn QuestionCatalog>,
    assessments: Arc<dyn AssessmentStore>,
    responses: Arc<dyn ResponseStore>,
}

impl AssessmentEngine {
    pub fn new(
        catalog: Arc<dyn QuestionCatalog>,
        assessments: Arc<dyn AssessmentStore>,
        responses: Arc<dyn ResponseStore>,
    ) -> Self {
        AssessmentEngine {
            catalog,
            assessments,
            responses,
        }
    }

    /// Convenience constructor for backends that implement all three
    /// contracts on one type, which both built-in stores do.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: QuestionCatalog + AssessmentStore + ResponseStore + 'static,
    {
        AssessmentEngine {
            catalog: store.clone(),
            assessments: store.clone(),
            responses: store,
        }
    }

    pub async fn create_assessment(
        &self,
        candidate_id: Uuid,
        position_level: PositionLevel,
    ) -> Result<Assessment> {
        let assessment = self
            .assessments
            .insert_assessment(candidate_id, position_level)
            .await?;
        info!(
            "Created assessment {} for candidate {} ({})",
            assessment.id, candidate_id, position_level
        );
        Ok(assessment)
    }

    pub async fn update_assessment(&self, id: Uuid, patch: AssessmentPatch) -> Result<Assessment> {
        let assessment = self.assessments.update_assessment(id, patch).await?;
        info!("Updated assessment {}", id);
        Ok(assessment)
    }

    /// Scores the stored responses and finalizes the assessment. The elapsed
    /// time is caller-supplied and trusted verbatim; it is not derived from
    /// response timestamps.
    pub async fn complete_assessment(
        &self,
        id: Uuid,
        total_time_minutes: i32,
    ) -> Result<Assessment> {
        if total_time_minutes < 0 {
            return Err(DatabaseError::InvalidValue {
                field: "total_time_minutes",
                value: total_time_minutes.to_string(),
            });
        }

        let assessment = self
            .assessments
            .complete_assessment(id, total_time_minutes)
            .await?;
        info!(
            "Completed assessment {}: D={} I={} S={} C={} in {}min",
            id,
            assessment.dominance_score,
            assessment.influence_score,
            assessment.steadiness_score,
            assessment.conscientiousness_score,
            total_time_minutes
        );
        Ok(assessment)
    }

    /// Removes the assessment together with its responses; returns whether
    /// the assessment existed.
    pub async fn delete_assessment(&self, id: Uuid) -> Result<bool> {
        let removed = self.assessments.delete_assessment(id).await?;
        if removed {
            info!("Deleted assessment {} and its responses", id);
        } else {
            warn!("Delete requested for unknown assessment {}", id);
        }
        Ok(removed)
    }

    pub async fn get_assessment(&self, id: Uuid) -> Result<Option<Assessment>> {
        self.assessments.get_assessment(id).await
    }

    pub async fn list_assessments(&self) -> Result<Vec<Assessment>> {
        self.assessments.list_assessments().await
    }

    pub async fn list_assessments_by_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Assessment>> {
        self.assessments
            .list_assessments_by_candidate(candidate_id)
            .await
    }

    /// Appends one answer. The assessment's status is not checked and the
    /// question_number is not required to exist in the catalog; a number
    /// that matches nothing is dropped at scoring time.
    pub async fn submit_response(
        &self,
        assessment_id: Uuid,
        question_number: i32,
        selected_option: AnswerOption,
        response_time_seconds: i32,
    ) -> Result<Uuid> {
        if response_time_seconds < 0 {
            return Err(DatabaseError::InvalidValue {
                field: "response_time_seconds",
                value: response_time_seconds.to_string(),
            });
        }

        let response_id = self
            .responses
            .insert_response(
                assessment_id,
                question_number,
                selected_option,
                response_time_seconds,
            )
            .await?;
        info!(
            "Recorded response {} for assessment {} (question {}, option {})",
            response_id, assessment_id, question_number, selected_option
        );
        Ok(response_id)
    }

    pub async fn list_responses(&self, assessment_id: Uuid) -> Result<Vec<Response>> {
        self.responses.list_responses(assessment_id).await
    }

    pub async fn list_questions(&self) -> Result<Vec<Question>> {
        self.catalog.list_questions().await
    }

    pub async fn get_question(&self, question_number: i32) -> Result<Option<Question>> {
        self.catalog.get_question(question_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{AssessmentStatus, Dimension, NewQuestion};
    use crate::database::MemoryStore;

    fn seeded_engine() -> AssessmentEngine {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_question(NewQuestion {
                question_number: 7,
                scenario_text: "A project deadline is suddenly moved up a week.".to_string(),
                option_a: "Take charge and set a new plan".to_string(),
                option_b: "Rally the team around the change".to_string(),
                option_c: "Keep everyone calm and steady".to_string(),
                option_d: "Re-check the requirements first".to_string(),
                dimension_a: Dimension::D,
                dimension_b: Dimension::I,
                dimension_c: Dimension::S,
                dimension_d: Dimension::C,
            })
            .unwrap();
        AssessmentEngine::with_store(store)
    }

    #[tokio::test]
    async fn create_starts_in_progress_with_zero_scores() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();

        assert_eq!(assessment.status, AssessmentStatus::InProgress);
        assert!(assessment.completed_at.is_none());
        assert_eq!(assessment.dominance_score, 0);
        assert_eq!(assessment.influence_score, 0);
        assert_eq!(assessment.steadiness_score, 0);
        assert_eq!(assessment.conscientiousness_score, 0);
        assert_eq!(assessment.total_time_minutes, 0);
    }

    #[tokio::test]
    async fn get_missing_assessment_is_none_not_error() {
        let engine = seeded_engine();
        assert!(engine.get_assessment(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn complete_with_no_responses_scores_all_zero() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Mid)
            .await
            .unwrap();

        let completed = engine.complete_assessment(assessment.id, 5).await.unwrap();
        assert_eq!(completed.status, AssessmentStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert_eq!(completed.dominance_score, 0);
        assert_eq!(completed.influence_score, 0);
        assert_eq!(completed.steadiness_score, 0);
        assert_eq!(completed.conscientiousness_score, 0);
        assert_eq!(completed.total_time_minutes, 5);
    }

    #[tokio::test]
    async fn option_b_completes_to_influence_one() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Senior)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 7, AnswerOption::B, 12)
            .await
            .unwrap();

        let completed = engine.complete_assessment(assessment.id, 3).await.unwrap();
        assert_eq!(completed.influence_score, 1);
        assert_eq!(completed.dominance_score, 0);
        assert_eq!(completed.steadiness_score, 0);
        assert_eq!(completed.conscientiousness_score, 0);
    }

    #[tokio::test]
    async fn duplicate_question_answers_both_count() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 7, AnswerOption::A, 8)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 7, AnswerOption::C, 9)
            .await
            .unwrap();

        let completed = engine.complete_assessment(assessment.id, 2).await.unwrap();
        assert_eq!(completed.dominance_score, 1);
        assert_eq!(completed.steadiness_score, 1);
    }

    #[tokio::test]
    async fn unmatched_question_number_never_scores() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 99, AnswerOption::A, 4)
            .await
            .unwrap();

        let completed = engine.complete_assessment(assessment.id, 1).await.unwrap();
        assert_eq!(completed.dominance_score, 0);
        assert_eq!(completed.influence_score, 0);
        assert_eq!(completed.steadiness_score, 0);
        assert_eq!(completed.conscientiousness_score, 0);
        assert_eq!(completed.status, AssessmentStatus::Completed);
    }

    #[tokio::test]
    async fn complete_is_idempotent_for_a_fixed_response_set() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Mid)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 7, AnswerOption::D, 20)
            .await
            .unwrap();

        let first = engine.complete_assessment(assessment.id, 4).await.unwrap();
        let second = engine.complete_assessment(assessment.id, 4).await.unwrap();

        assert_eq!(first.conscientiousness_score, 1);
        assert_eq!(second.conscientiousness_score, first.conscientiousness_score);
        assert_eq!(second.dominance_score, first.dominance_score);
        assert_eq!(second.influence_score, first.influence_score);
        assert_eq!(second.steadiness_score, first.steadiness_score);
    }

    #[tokio::test]
    async fn recompleting_after_new_responses_overwrites_scores() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Mid)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 7, AnswerOption::A, 6)
            .await
            .unwrap();
        let first = engine.complete_assessment(assessment.id, 2).await.unwrap();
        assert_eq!(first.dominance_score, 1);

        // Submission is not blocked on completed assessments; a later
        // scoring pass picks the new response up.
        engine
            .submit_response(assessment.id, 7, AnswerOption::A, 6)
            .await
            .unwrap();
        let second = engine.complete_assessment(assessment.id, 2).await.unwrap();
        assert_eq!(second.dominance_score, 2);
    }

    #[tokio::test]
    async fn completing_unknown_assessment_signals_not_found() {
        let engine = seeded_engine();
        let missing = Uuid::new_v4();
        match engine.complete_assessment(missing, 1).await {
            Err(DatabaseError::AssessmentNotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected AssessmentNotFound, got {:?}", other.map(|a| a.id)),
        }
    }

    #[tokio::test]
    async fn delete_removes_assessment_and_responses() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();
        engine
            .submit_response(assessment.id, 7, AnswerOption::B, 15)
            .await
            .unwrap();

        assert!(engine.delete_assessment(assessment.id).await.unwrap());
        assert!(engine.list_assessments().await.unwrap().is_empty());
        assert!(engine
            .list_responses(assessment.id)
            .await
            .unwrap()
            .is_empty());
        // Second delete reports the row as already gone.
        assert!(!engine.delete_assessment(assessment.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_by_candidate_filters_on_owner() {
        let engine = seeded_engine();
        let candidate = Uuid::new_v4();
        engine
            .create_assessment(candidate, PositionLevel::Entry)
            .await
            .unwrap();
        engine
            .create_assessment(candidate, PositionLevel::Senior)
            .await
            .unwrap();
        engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Mid)
            .await
            .unwrap();

        let mine = engine
            .list_assessments_by_candidate(candidate)
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|a| a.candidate_id == candidate));
        assert_eq!(engine.list_assessments().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_patches_only_supplied_fields() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();

        let patch = AssessmentPatch {
            position_level: Some(PositionLevel::Senior),
            total_time_minutes: Some(17),
            ..Default::default()
        };
        let updated = engine.update_assessment(assessment.id, patch).await.unwrap();

        assert_eq!(updated.position_level, PositionLevel::Senior);
        assert_eq!(updated.total_time_minutes, 17);
        assert_eq!(updated.status, AssessmentStatus::InProgress);
        assert_eq!(updated.candidate_id, assessment.candidate_id);
    }

    #[tokio::test]
    async fn negative_response_time_is_rejected_at_the_boundary() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();

        let err = engine
            .submit_response(assessment.id, 7, AnswerOption::A, -1)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn negative_total_time_is_rejected_at_the_boundary() {
        let engine = seeded_engine();
        let assessment = engine
            .create_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();

        let err = engine
            .complete_assessment(assessment.id, -5)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn catalog_reads_come_back_ordered() {
        let store = Arc::new(MemoryStore::new());
        for number in [3, 1, 2] {
            store
                .insert_question(NewQuestion {
                    question_number: number,
                    scenario_text: format!("Scenario {}", number),
                    option_a: "a".to_string(),
                    option_b: "b".to_string(),
                    option_c: "c".to_string(),
                    option_d: "d".to_string(),
                    dimension_a: Dimension::D,
                    dimension_b: Dimension::I,
                    dimension_c: Dimension::S,
                    dimension_d: Dimension::C,
                })
                .unwrap();
        }
        let engine = AssessmentEngine::with_store(store);

        let numbers: Vec<i32> = engine
            .list_questions()
            .await
            .unwrap()
            .iter()
            .map(|q| q.question_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(engine.get_question(2).await.unwrap().is_some());
        assert!(engine.get_question(42).await.unwrap().is_none());
    }
}
