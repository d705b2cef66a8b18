use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::{Config, Pool, Runtime};
use log::{error, info, warn};
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use super::models::{
    AnswerOption, Assessment, AssessmentPatch, AssessmentStatus, Dimension, NewQuestion,
    PositionLevel, Question, Response,
};
use super::{DatabaseError, Result};
use crate::assessment::scoring;
use crate::assessment::store::{AssessmentStore, QuestionCatalog, ResponseStore};
use crate::config::DatabaseConfig;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id UUID PRIMARY KEY,
    question_number INTEGER NOT NULL UNIQUE,
    scenario_text TEXT NOT NULL,
    option_a TEXT NOT NULL,
    option_b TEXT NOT NULL,
    option_c TEXT NOT NULL,
    option_d TEXT NOT NULL,
    dimension_a TEXT NOT NULL,
    dimension_b TEXT NOT NULL,
    dimension_c TEXT NOT NULL,
    dimension_d TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS assessments (
    id UUID PRIMARY KEY,
    candidate_id UUID NOT NULL,
    position_level TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'in_progress',
    started_at TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ,
    dominance_score INTEGER NOT NULL DEFAULT 0,
    influence_score INTEGER NOT NULL DEFAULT 0,
    steadiness_score INTEGER NOT NULL DEFAULT 0,
    conscientiousness_score INTEGER NOT NULL DEFAULT 0,
    total_time_minutes INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS responses (
    id UUID PRIMARY KEY,
    assessment_id UUID NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
    question_number INTEGER NOT NULL,
    selected_option TEXT NOT NULL,
    response_time_seconds INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);
"#;

const ASSESSMENT_COLUMNS: &str = "id, candidate_id, position_level, status, started_at, \
     completed_at, dominance_score, influence_score, steadiness_score, \
     conscientiousness_score, total_time_minutes";

const QUESTION_COLUMNS: &str = "id, question_number, scenario_text, option_a, option_b, \
     option_c, option_d, dimension_a, dimension_b, dimension_c, dimension_d, created_at";

const RESPONSE_COLUMNS: &str =
    "id, assessment_id, question_number, selected_option, response_time_seconds, created_at";

#[derive(Debug)]
pub struct DatabaseManager {
    pool: Pool,
}

impl DatabaseManager {
    /// Connects with settings from the environment (see `DatabaseConfig`).
    pub async fn new() -> Result<Self> {
        DatabaseManager::with_config(&DatabaseConfig::from_env()).await
    }

    pub async fn with_config(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to database: {}@{}:{}/{}",
            config.user, config.host, config.port, config.dbname
        );

        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.dbname.clone());
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::ConnectionFailed(format!("Pool creation failed: {}", e)))?;

        // Test connection
        let _client = pool.get().await.map_err(|e| {
            DatabaseError::ConnectionFailed(format!("Connection test failed: {}", e))
        })?;

        info!("Database connection established successfully");

        Ok(DatabaseManager { pool })
    }

    /// Creates the three tables when missing. Safe to call on every start.
    pub async fn initialize_schema(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        client.batch_execute(SCHEMA_SQL).await.map_err(|e| {
            error!("Schema initialization failed: {}", e);
            DatabaseError::QueryFailed(format!("Schema initialization failed: {}", e))
        })?;

        info!("Database schema initialized");
        Ok(())
    }

    /// Seeds one catalog entry; provisioning-time only, never called by the
    /// engine itself.
    pub async fn insert_question(&self, record: NewQuestion) -> Result<Question> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

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

        client
            .execute(
                r#"
                INSERT INTO questions
                (id, question_number, scenario_text, option_a, option_b, option_c, option_d,
                 dimension_a, dimension_b, dimension_c, dimension_d, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
                &[
                    &question.id,
                    &question.question_number,
                    &question.scenario_text,
                    &question.option_a,
                    &question.option_b,
                    &question.option_c,
                    &question.option_d,
                    &question.dimension_a.as_str(),
                    &question.dimension_b.as_str(),
                    &question.dimension_c.as_str(),
                    &question.dimension_d.as_str(),
                    &question.created_at,
                ],
            )
            .await
            .map_err(|e| {
                error!(
                    "Failed to insert question {}: {}",
                    question.question_number, e
                );
                DatabaseError::QueryFailed(format!("Failed to insert question: {}", e))
            })?;

        info!("Seeded question {}", question.question_number);
        Ok(question)
    }

    pub async fn count_questions(&self) -> Result<i64> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let row = client
            .query_one("SELECT COUNT(*) FROM questions", &[])
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to count questions: {}", e)))?;

        Ok(row.get(0))
    }

    pub async fn test_connection(&self) -> Result<String> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let row = client
            .query_one("SELECT version()", &[])
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Test query failed: {}", e)))?;

        let version: String = row.get(0);
        info!("Database connection test successful: {}", version);
        Ok(version)
    }
}

fn question_from_row(row: &Row) -> Result<Question> {
    let dimension_a: String = row.get(7);
    let dimension_b: String = row.get(8);
    let dimension_c: String = row.get(9);
    let dimension_d: String = row.get(10);

    Ok(Question {
        id: row.get(0),
        question_number: row.get(1),
        scenario_text: row.get(2),
        option_a: row.get(3),
        option_b: row.get(4),
        option_c: row.get(5),
        option_d: row.get(6),
        dimension_a: dimension_a.parse::<Dimension>()?,
        dimension_b: dimension_b.parse::<Dimension>()?,
        dimension_c: dimension_c.parse::<Dimension>()?,
        dimension_d: dimension_d.parse::<Dimension>()?,
        created_at: row.get(11),
    })
}

fn assessment_from_row(row: &Row) -> Result<Assessment> {
    let position_level: String = row.get(2);
    let status: String = row.get(3);

    Ok(Assessment {
        id: row.get(0),
        candidate_id: row.get(1),
        position_level: position_level.parse::<PositionLevel>()?,
        status: status.parse::<AssessmentStatus>()?,
        started_at: row.get(4),
        completed_at: row.get(5),
        dominance_score: row.get(6),
        influence_score: row.get(7),
        steadiness_score: row.get(8),
        conscientiousness_score: row.get(9),
        total_time_minutes: row.get(10),
    })
}

fn response_from_row(row: &Row) -> Result<Response> {
    let selected_option: String = row.get(3);

    Ok(Response {
        id: row.get(0),
        assessment_id: row.get(1),
        question_number: row.get(2),
        selected_option: selected_option.parse::<AnswerOption>()?,
        response_time_seconds: row.get(4),
        created_at: row.get(5),
    })
}

#[async_trait]
impl QuestionCatalog for DatabaseManager {
    async fn list_questions(&self) -> Result<Vec<Question>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM questions ORDER BY question_number ASC",
            QUESTION_COLUMNS
        );
        let rows = client.query(sql.as_str(), &[]).await.map_err(|e| {
            error!("Failed to fetch question catalog: {}", e);
            DatabaseError::QueryFailed(format!("Failed to fetch questions: {}", e))
        })?;

        rows.iter().map(question_from_row).collect()
    }

    async fn get_question(&self, question_number: i32) -> Result<Option<Question>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM questions WHERE question_number = $1",
            QUESTION_COLUMNS
        );
        let row = client
            .query_opt(sql.as_str(), &[&question_number])
            .await
            .map_err(|e| {
                error!("Failed to fetch question {}: {}", question_number, e);
                DatabaseError::QueryFailed(format!("Failed to fetch question: {}", e))
            })?;

        row.as_ref().map(question_from_row).transpose()
    }
}

#[async_trait]
impl AssessmentStore for DatabaseManager {
    async fn insert_assessment(
        &self,
        candidate_id: Uuid,
        position_level: PositionLevel,
    ) -> Result<Assessment> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

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

        client
            .execute(
                r#"
                INSERT INTO assessments
                (id, candidate_id, position_level, status, started_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
                &[
                    &assessment.id,
                    &assessment.candidate_id,
                    &assessment.position_level.as_str(),
                    &assessment.status.as_str(),
                    &assessment.started_at,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to insert assessment: {}", e);
                DatabaseError::QueryFailed(format!("Failed to insert assessment: {}", e))
            })?;

        info!(
            "Inserted assessment {} for candidate {}",
            assessment.id, candidate_id
        );
        Ok(assessment)
    }

    async fn get_assessment(&self, id: Uuid) -> Result<Option<Assessment>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let sql = format!("SELECT {} FROM assessments WHERE id = $1", ASSESSMENT_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await.map_err(|e| {
            error!("Failed to fetch assessment {}: {}", id, e);
            DatabaseError::QueryFailed(format!("Failed to fetch assessment: {}", e))
        })?;

        row.as_ref().map(assessment_from_row).transpose()
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM assessments ORDER BY started_at ASC",
            ASSESSMENT_COLUMNS
        );
        let rows = client.query(sql.as_str(), &[]).await.map_err(|e| {
            error!("Failed to list assessments: {}", e);
            DatabaseError::QueryFailed(format!("Failed to list assessments: {}", e))
        })?;

        rows.iter().map(assessment_from_row).collect()
    }

    async fn list_assessments_by_candidate(&self, candidate_id: Uuid) -> Result<Vec<Assessment>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM assessments WHERE candidate_id = $1 ORDER BY started_at ASC",
            ASSESSMENT_COLUMNS
        );
        let rows = client
            .query(sql.as_str(), &[&candidate_id])
            .await
            .map_err(|e| {
                error!(
                    "Failed to list assessments for candidate {}: {}",
                    candidate_id, e
                );
                DatabaseError::QueryFailed(format!("Failed to list assessments: {}", e))
            })?;

        rows.iter().map(assessment_from_row).collect()
    }

    async fn update_assessment(&self, id: Uuid, patch: AssessmentPatch) -> Result<Assessment> {
        if patch.is_empty() {
            return self
                .get_assessment(id)
                .await?
                .ok_or(DatabaseError::AssessmentNotFound(id));
        }

        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let position_level = patch.position_level.map(|p| p.as_str());
        let status = patch.status.map(|s| s.as_str());

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&id];

        if let Some(candidate_id) = patch.candidate_id.as_ref() {
            params.push(candidate_id);
            sets.push(format!("candidate_id = ${}", params.len()));
        }
        if let Some(level) = position_level.as_ref() {
            params.push(level);
            sets.push(format!("position_level = ${}", params.len()));
        }
        if let Some(status) = status.as_ref() {
            params.push(status);
            sets.push(format!("status = ${}", params.len()));
        }
        if let Some(completed_at) = patch.completed_at.as_ref() {
            params.push(completed_at);
            sets.push(format!("completed_at = ${}", params.len()));
        }
        if let Some(score) = patch.dominance_score.as_ref() {
            params.push(score);
            sets.push(format!("dominance_score = ${}", params.len()));
        }
        if let Some(score) = patch.influence_score.as_ref() {
            params.push(score);
            sets.push(format!("influence_score = ${}", params.len()));
        }
        if let Some(score) = patch.steadiness_score.as_ref() {
            params.push(score);
            sets.push(format!("steadiness_score = ${}", params.len()));
        }
        if let Some(score) = patch.conscientiousness_score.as_ref() {
            params.push(score);
            sets.push(format!("conscientiousness_score = ${}", params.len()));
        }
        if let Some(minutes) = patch.total_time_minutes.as_ref() {
            params.push(minutes);
            sets.push(format!("total_time_minutes = ${}", params.len()));
        }

        let sql = format!(
            "UPDATE assessments SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            ASSESSMENT_COLUMNS
        );

        let row = client
            .query_opt(sql.as_str(), &params)
            .await
            .map_err(|e| {
                error!("Failed to update assessment {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to update assessment: {}", e))
            })?
            .ok_or(DatabaseError::AssessmentNotFound(id))?;

        assessment_from_row(&row)
    }

    async fn complete_assessment(&self, id: Uuid, total_time_minutes: i32) -> Result<Assessment> {
        let mut client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        // Response read, catalog read, tally, and the final update share one
        // transaction; a failure anywhere leaves the assessment untouched.
        let transaction = client
            .transaction()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Transaction error: {}", e)))?;

        let responses_sql = format!(
            "SELECT {} FROM responses WHERE assessment_id = $1 ORDER BY created_at ASC",
            RESPONSE_COLUMNS
        );
        let response_rows = transaction
            .query(responses_sql.as_str(), &[&id])
            .await
            .map_err(|e| {
                error!("Failed to fetch responses for assessment {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to fetch responses: {}", e))
            })?;
        let responses: Vec<Response> = response_rows
            .iter()
            .map(response_from_row)
            .collect::<Result<_>>()?;

        let catalog_sql = format!(
            "SELECT {} FROM questions ORDER BY question_number ASC",
            QUESTION_COLUMNS
        );
        let question_rows = transaction
            .query(catalog_sql.as_str(), &[])
            .await
            .map_err(|e| {
                error!("Failed to fetch question catalog: {}", e);
                DatabaseError::QueryFailed(format!("Failed to fetch questions: {}", e))
            })?;
        let catalog: Vec<Question> = question_rows
            .iter()
            .map(question_from_row)
            .collect::<Result<_>>()?;

        let scores = scoring::tally(&responses, &catalog);
        if scores.dropped() > 0 {
            warn!(
                "Assessment {}: {} of {} responses matched no catalog question and were dropped",
                id,
                scores.dropped(),
                scores.responses_submitted
            );
        }

        let now = Utc::now();
        let finalize_sql = format!(
            r#"
            UPDATE assessments
            SET status = $2,
                completed_at = $3,
                dominance_score = $4,
                influence_score = $5,
                steadiness_score = $6,
                conscientiousness_score = $7,
                total_time_minutes = $8
            WHERE id = $1
            RETURNING {}
            "#,
            ASSESSMENT_COLUMNS
        );
        let row = transaction
            .query_opt(
                finalize_sql.as_str(),
                &[
                    &id,
                    &AssessmentStatus::Completed.as_str(),
                    &now,
                    &scores.dominance,
                    &scores.influence,
                    &scores.steadiness,
                    &scores.conscientiousness,
                    &total_time_minutes,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to finalize assessment {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to finalize assessment: {}", e))
            })?
            .ok_or(DatabaseError::AssessmentNotFound(id))?;

        let assessment = assessment_from_row(&row)?;

        transaction
            .commit()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Transaction commit error: {}", e)))?;

        info!(
            "Assessment {} scored: D={} I={} S={} C={} ({} of {} responses considered)",
            id,
            scores.dominance,
            scores.influence,
            scores.steadiness,
            scores.conscientiousness,
            scores.responses_considered,
            scores.responses_submitted
        );
        Ok(assessment)
    }

    async fn delete_assessment(&self, id: Uuid) -> Result<bool> {
        let mut client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        // Cascade in one transaction so responses never outlive a failed
        // assessment delete, nor the reverse.
        let transaction = client
            .transaction()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Transaction error: {}", e)))?;

        transaction
            .execute("DELETE FROM responses WHERE assessment_id = $1", &[&id])
            .await
            .map_err(|e| {
                error!("Failed to delete responses for assessment {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to delete responses: {}", e))
            })?;

        let rows_affected = transaction
            .execute("DELETE FROM assessments WHERE id = $1", &[&id])
            .await
            .map_err(|e| {
                error!("Failed to delete assessment {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to delete assessment: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Transaction commit error: {}", e)))?;

        if rows_affected > 0 {
            info!("Deleted assessment {} and its responses", id);
        }
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl ResponseStore for DatabaseManager {
    async fn insert_response(
        &self,
        assessment_id: Uuid,
        question_number: i32,
        selected_option: AnswerOption,
        response_time_seconds: i32,
    ) -> Result<Uuid> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let response_id = Uuid::new_v4();
        let now = Utc::now();

        client
            .execute(
                r#"
                INSERT INTO responses
                (id, assessment_id, question_number, selected_option,
                 response_time_seconds, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
                &[
                    &response_id,
                    &assessment_id,
                    &question_number,
                    &selected_option.as_str(),
                    &response_time_seconds,
                    &now,
                ],
            )
            .await
            .map_err(|e| {
                error!(
                    "Failed to insert response for assessment {}: {}",
                    assessment_id, e
                );
                DatabaseError::QueryFailed(format!("Failed to insert response: {}", e))
            })?;

        info!(
            "Inserted response {} for assessment {} (question {})",
            response_id, assessment_id, question_number
        );
        Ok(response_id)
    }

    async fn list_responses(&self, assessment_id: Uuid) -> Result<Vec<Response>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM responses WHERE assessment_id = $1 ORDER BY created_at ASC",
            RESPONSE_COLUMNS
        );
        let rows = client
            .query(sql.as_str(), &[&assessment_id])
            .await
            .map_err(|e| {
                error!(
                    "Failed to fetch responses for assessment {}: {}",
                    assessment_id, e
                );
                DatabaseError::QueryFailed(format!("Failed to fetch responses: {}", e))
            })?;

        rows.iter().map(response_from_row).collect()
    }
}
