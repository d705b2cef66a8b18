pub mod assessment;
pub mod config;
pub mod database;
pub mod seed;

pub use assessment::{tally, AssessmentEngine, AssessmentStore, QuestionCatalog, ResponseStore, ScoreTally};
pub use config::DatabaseConfig;
pub use database::{
    AnswerOption, Assessment, AssessmentPatch, AssessmentStatus, DatabaseError, DatabaseManager,
    Dimension, MemoryStore, NewQuestion, PositionLevel, Question, Response, Result,
};
