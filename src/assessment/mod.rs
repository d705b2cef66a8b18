pub mod lifecycle;
pub mod scoring;
pub mod store;

pub use lifecycle::AssessmentEngine;
pub use scoring::{tally, ScoreTally};
pub use store::{AssessmentStore, QuestionCatalog, ResponseStore};
