//! DISC tally: a pure pass over one assessment's responses against the
//! question catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::{Dimension, Question, Response};

/// Result of one scoring pass. The four counters sum to
/// `responses_considered`; the gap to `responses_submitted` is the number of
/// responses whose question_number matched no catalog entry and were
/// therefore dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    pub dominance: i32,
    pub influence: i32,
    pub steadiness: i32,
    pub conscientiousness: i32,
    pub responses_submitted: usize,
    pub responses_considered: usize,
}

impl ScoreTally {
    pub fn total(&self) -> i32 {
        self.dominance + self.influence + self.steadiness + self.conscientiousness
    }

    pub fn dropped(&self) -> usize {
        self.responses_submitted - self.responses_considered
    }

    fn bump(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::D => self.dominance += 1,
            Dimension::I => self.influence += 1,
            Dimension::S => self.steadiness += 1,
            Dimension::C => self.conscientiousness += 1,
        }
        self.responses_considered += 1;
    }
}

/// Aggregates responses into the four dimension counters.
///
/// Each response is resolved against the catalog by `question_number`; a
/// response with no matching question is skipped. Repeated answers to the
/// same question all count independently and nothing is normalized.
pub fn tally(responses: &[Response], catalog: &[Question]) -> ScoreTally {
    let by_number: HashMap<i32, &Question> = catalog
        .iter()
        .map(|question| (question.question_number, question))
        .collect();

    let mut scores = ScoreTally {
        responses_submitted: responses.len(),
        ..Default::default()
    };

    for response in responses {
        if let Some(question) = by_number.get(&response.question_number) {
            scores.bump(question.dimension_for(response.selected_option));
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AnswerOption;
    use chrono::Utc;
    use uuid::Uuid;

    fn question(number: i32, dims: [Dimension; 4]) -> Question {
        Question {
            id: Uuid::new_v4(),
            question_number: number,
            scenario_text: format!("Scenario {}", number),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            dimension_a: dims[0],
            dimension_b: dims[1],
            dimension_c: dims[2],
            dimension_d: dims[3],
            created_at: Utc::now(),
        }
    }

    fn response(number: i32, option: AnswerOption) -> Response {
        Response {
            id: Uuid::new_v4(),
            assessment_id: Uuid::new_v4(),
            question_number: number,
            selected_option: option,
            response_time_seconds: 10,
            created_at: Utc::now(),
        }
    }

    fn standard_catalog() -> Vec<Question> {
        vec![question(
            7,
            [Dimension::D, Dimension::I, Dimension::S, Dimension::C],
        )]
    }

    #[test]
    fn option_b_lands_on_influence() {
        let scores = tally(&[response(7, AnswerOption::B)], &standard_catalog());
        assert_eq!(scores.influence, 1);
        assert_eq!(scores.dominance, 0);
        assert_eq!(scores.steadiness, 0);
        assert_eq!(scores.conscientiousness, 0);
        assert_eq!(scores.responses_considered, 1);
    }

    #[test]
    fn duplicate_answers_both_count() {
        let responses = vec![response(7, AnswerOption::A), response(7, AnswerOption::C)];
        let scores = tally(&responses, &standard_catalog());
        assert_eq!(scores.dominance, 1);
        assert_eq!(scores.steadiness, 1);
        assert_eq!(scores.total(), 2);
    }

    #[test]
    fn unmatched_question_number_is_dropped() {
        let responses = vec![response(7, AnswerOption::A), response(99, AnswerOption::A)];
        let scores = tally(&responses, &standard_catalog());
        assert_eq!(scores.total(), 1);
        assert_eq!(scores.responses_submitted, 2);
        assert_eq!(scores.responses_considered, 1);
        assert_eq!(scores.dropped(), 1);
    }

    #[test]
    fn empty_response_set_scores_zero() {
        let scores = tally(&[], &standard_catalog());
        assert_eq!(scores, ScoreTally::default());
    }

    #[test]
    fn total_equals_matched_responses() {
        let catalog = vec![
            question(1, [Dimension::D, Dimension::I, Dimension::S, Dimension::C]),
            question(2, [Dimension::D, Dimension::I, Dimension::S, Dimension::C]),
            question(3, [Dimension::D, Dimension::I, Dimension::S, Dimension::C]),
        ];
        let responses = vec![
            response(1, AnswerOption::A),
            response(2, AnswerOption::B),
            response(3, AnswerOption::D),
            response(2, AnswerOption::C),
            response(50, AnswerOption::A),
        ];
        let scores = tally(&responses, &catalog);
        assert_eq!(scores.total(), 4);
        assert_eq!(scores.total() as usize, scores.responses_considered);
    }

    #[test]
    fn per_question_mapping_is_honored() {
        // Counterbalanced entry: slot A expresses Steadiness here.
        let catalog = vec![question(
            4,
            [Dimension::S, Dimension::D, Dimension::C, Dimension::I],
        )];
        let scores = tally(&[response(4, AnswerOption::A)], &catalog);
        assert_eq!(scores.steadiness, 1);
        assert_eq!(scores.dominance, 0);
    }
}
