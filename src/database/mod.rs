pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::{
    AnswerOption, Assessment, AssessmentPatch, AssessmentStatus, Dimension, NewQuestion,
    PositionLevel, Question, Response,
};
pub use postgres::DatabaseManager;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Assessment not found: {0}")]
    AssessmentNotFound(Uuid),
    #[error("Invalid {field} value: {value}")]
    InvalidValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
