//! In-process store backing the same contracts as Postgres. Used by the
//! test suite and by callers that want an ephemeral backend without a
//! database.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use super::models::{
    AnswerOption, Assessment, AssessmentPatch, AssessmentStatus, NewQuestion, PositionLevel,
    Question, Response,
};
use super::{DatabaseError, Result};
use crate::assessment::scoring;
use crate::assessment::store::{AssessmentStore, QuestionCatalog, ResponseStore};

#[derive(Default)]
struct Inner {
    // BTreeMap keeps catalog listings in question_number order for free.
    questions: BTreeMap<i32, Question>,
    assessments: HashMap<Uuid, Assessment>,
    responses: Vec<Response>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seeds one catalog entry. Mirrors the unique-number constraint the
    /// Postgres schema enforces.
    pub fn insert_question(&self, record: NewQuestion) -> Result<Question> {
        let mut inner = self.inner.write();
        if inner.questions.contains_key(&record.question_number) {
            return Err(DatabaseError::QueryFailed(format!(
                "duplicate question_number {}",
                record.question_number
            )));
        }

        let question = Question {
            id: Uuid::new_v4(),
            question_number: record.question_number,
            scenario_text: record.scenario_text,
            option_a: record.option_a,
            option_b: record.option_b,
            option_c: record.option_c,
            option_d: record.option_d,
            dimension_a: record.dimension_a,
            dimension_b: record.dimension_b,
            dimension_c: record.dimension_c,
            dimension_d: record.dimension_d,
            created_at: Utc::now(),
        };
        inner
            .questions
            .insert(question.question_number, question.clone());
        Ok(question)
    }

    pub fn question_count(&self) -> usize {
        self.inner.read().questions.len()
    }
}

#[async_trait]
impl QuestionCatalog for MemoryStore {
    async fn list_questions(&self) -> Result<Vec<Question>> {
        Ok(self.inner.read().questions.values().cloned().collect())
    }

    async fn get_question(&self, question_number: i32) -> Result<Option<Question>> {
        Ok(self.inner.read().questions.get(&question_number).cloned())
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn insert_assessment(
        &self,
        candidate_id: Uuid,
        position_level: PositionLevel,
    ) -> Result<Assessment> {
        let assessment = Assessment {
            id: Uuid::new_v4(),
            candidate_id,
            position_level,
            status: AssessmentStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
            dominance_score: 0,
            influence_score: 0,
            steadiness_score: 0,
            conscientiousness_score: 0,
            total_time_minutes: 0,
        };
        self.inner
            .write()
            .assessments
            .insert(assessment.id, assessment.clone());
        Ok(assessment)
    }

    async fn get_assessment(&self, id: Uuid) -> Result<Option<Assessment>> {
        Ok(self.inner.read().assessments.get(&id).cloned())
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>> {
        let mut all: Vec<Assessment> = self.inner.read().assessments.values().cloned().collect();
        all.sort_by_key(|a| a.started_at);
        Ok(all)
    }

    async fn list_assessments_by_candidate(&self, candidate_id: Uuid) -> Result<Vec<Assessment>> {
        let mut mine: Vec<Assessment> = self
            .inner
            .read()
            .assessments
            .values()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect();
        mine.sort_by_key(|a| a.started_at);
        Ok(mine)
    }

    async fn update_assessment(&self, id: Uuid, patch: AssessmentPatch) -> Result<Assessment> {
        let mut inner = self.inner.write();
        let assessment = inner
            .assessments
            .get_mut(&id)
            .ok_or(DatabaseError::AssessmentNotFound(id))?;

        if let Some(candidate_id) = patch.candidate_id {
            assessment.candidate_id = candidate_id;
        }
        if let Some(position_level) = patch.position_level {
            assessment.position_level = position_level;
        }
        if let Some(status) = patch.status {
            assessment.status = status;
        }
        if let Some(completed_at) = patch.completed_at {
            assessment.completed_at = Some(completed_at);
        }
        if let Some(score) = patch.dominance_score {
            assessment.dominance_score = score;
        }
        if let Some(score) = patch.influence_score {
            assessment.influence_score = score;
        }
        if let Some(score) = patch.steadiness_score {
            assessment.steadiness_score = score;
        }
        if let Some(score) = patch.conscientiousness_score {
            assessment.conscientiousness_score = score;
        }
        if let Some(minutes) = patch.total_time_minutes {
            assessment.total_time_minutes = minutes;
        }

        Ok(assessment.clone())
    }

    async fn complete_assessment(&self, id: Uuid, total_time_minutes: i32) -> Result<Assessment> {
        // One write lock spans read-tally-write, matching the transactional
        // scope of the Postgres backend.
        let mut inner = self.inner.write();

        let responses: Vec<Response> = inner
            .responses
            .iter()
            .filter(|r| r.assessment_id == id)
            .cloned()
            .collect();
        let catalog: Vec<Question> = inner.questions.values().cloned().collect();
        let scores = scoring::tally(&responses, &catalog);

        let assessment = inner
            .assessments
            .get_mut(&id)
            .ok_or(DatabaseError::AssessmentNotFound(id))?;
        assessment.status = AssessmentStatus::Completed;
        assessment.completed_at = Some(Utc::now());
        assessment.dominance_score = scores.dominance;
        assessment.influence_score = scores.influence;
        assessment.steadiness_score = scores.steadiness;
        assessment.conscientiousness_score = scores.conscientiousness;
        assessment.total_time_minutes = total_time_minutes;
        Ok(assessment.clone())
    }

    async fn delete_assessment(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write();
        inner.responses.retain(|r| r.assessment_id != id);
        Ok(inner.assessments.remove(&id).is_some())
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn insert_response(
        &self,
        assessment_id: Uuid,
        question_number: i32,
        selected_option: AnswerOption,
        response_time_seconds: i32,
    ) -> Result<Uuid> {
        let response = Response {
            id: Uuid::new_v4(),
            assessment_id,
            question_number,
            selected_option,
            response_time_seconds,
            created_at: Utc::now(),
        };
        let id = response.id;
        self.inner.write().responses.push(response);
        Ok(id)
    }

    async fn list_responses(&self, assessment_id: Uuid) -> Result<Vec<Response>> {
        Ok(self
            .inner
            .read()
            .responses
            .iter()
            .filter(|r| r.assessment_id == assessment_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Dimension;

    fn sample_question(number: i32) -> NewQuestion {
        NewQuestion {
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
        }
    }

    #[test]
    fn duplicate_question_number_is_rejected() {
        let store = MemoryStore::new();
        store.insert_question(sample_question(1)).unwrap();
        assert!(store.insert_question(sample_question(1)).is_err());
        assert_eq!(store.question_count(), 1);
    }

    #[tokio::test]
    async fn responses_survive_only_their_own_assessment() {
        let store = MemoryStore::new();
        let kept = store
            .insert_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();
        let dropped = store
            .insert_assessment(Uuid::new_v4(), PositionLevel::Entry)
            .await
            .unwrap();
        store
            .insert_response(kept.id, 1, AnswerOption::A, 5)
            .await
            .unwrap();
        store
            .insert_response(dropped.id, 1, AnswerOption::B, 5)
            .await
            .unwrap();

        assert!(store.delete_assessment(dropped.id).await.unwrap());
        assert_eq!(store.list_responses(kept.id).await.unwrap().len(), 1);
        assert!(store.list_responses(dropped.id).await.unwrap().is_empty());
    }
}
