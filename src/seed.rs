//! Fixed battery of forced-choice scenario questions used to provision the
//! catalog. Every bank entry maps slot A to D, B to I, C to S and D to C;
//! scoring still reads the per-question tags, so a counterbalanced bank can
//! be dropped in without code changes.

use log::info;

use crate::database::models::{Dimension, NewQuestion};
use crate::database::{DatabaseManager, Result};

fn question(number: i32, scenario: &str, options: [&str; 4]) -> NewQuestion {
    NewQuestion {
        question_number: number,
        scenario_text: scenario.to_string(),
        option_a: options[0].to_string(),
        option_b: options[1].to_string(),
        option_c: options[2].to_string(),
        option_d: options[3].to_string(),
        dimension_a: Dimension::D,
        dimension_b: Dimension::I,
        dimension_c: Dimension::S,
        dimension_d: Dimension::C,
    }
}

pub fn default_question_bank() -> Vec<NewQuestion> {
    vec![
        question(
            1,
            "Your team's project is behind schedule and the client is asking for an update.",
            [
                "Take control, cut scope and push the team to the deadline",
                "Call the client, share the story and win back their confidence",
                "Reassure the team and keep everyone working at a sustainable pace",
                "Prepare a detailed status report with a revised, realistic plan",
            ],
        ),
        question(
            2,
            "A new colleague joins and is struggling to find their footing.",
            [
                "Give them a clear list of goals and hold them to it",
                "Introduce them around and make them feel part of the group",
                "Offer to pair with them regularly until they feel settled",
                "Walk them through the documentation and standard procedures",
            ],
        ),
        question(
            3,
            "Management announces a sudden reorganization of your department.",
            [
                "Push for a seat at the table to shape the outcome",
                "Talk it up with colleagues and focus on the opportunities",
                "Wait for things to settle and help keep the team stable",
                "Study the new structure carefully before drawing conclusions",
            ],
        ),
        question(
            4,
            "You disagree with a decision made in a meeting you attended.",
            [
                "Challenge it openly and argue your position on the spot",
                "Win people over to your view in conversations afterwards",
                "Accept it for now and raise it gently when the time is right",
                "Put your objections in writing with the supporting evidence",
            ],
        ),
        question(
            5,
            "An important deadline and a colleague's request for help arrive together.",
            [
                "Prioritize the deadline; results come first",
                "Persuade someone else to help the colleague while you deliver",
                "Split your time so the colleague is not left alone",
                "Estimate both tasks and schedule them in a defensible order",
            ],
        ),
        question(
            6,
            "You are asked to present your team's work to senior leadership.",
            [
                "Focus on results, decisions needed and what you want from them",
                "Tell an engaging story that gets the room excited",
                "Share credit broadly and present the team's common view",
                "Back every claim with data and anticipate detailed questions",
            ],
        ),
        question(
            7,
            "A process you rely on keeps producing errors.",
            [
                "Replace it now; waiting costs more than changing",
                "Rally the people involved to redesign it together",
                "Adjust gradually so nobody is disrupted",
                "Trace the root cause and document the fix before changing anything",
            ],
        ),
        question(
            8,
            "Two team members are in an escalating conflict that affects the work.",
            [
                "Step in, make a call and tell both how it is going to be",
                "Get them talking again over coffee and lighten the mood",
                "Hear each one out patiently and look for common ground",
                "Establish the facts of the dispute before taking any side",
            ],
        ),
        question(
            9,
            "You receive an offer to lead a risky but high-visibility project.",
            [
                "Take it immediately; this is what you have been waiting for",
                "Take it and start recruiting allies for the journey",
                "Ask for time to weigh how it affects your current commitments",
                "Request the project history and success criteria before deciding",
            ],
        ),
        question(
            10,
            "Your routine work suddenly includes an unfamiliar tool everyone must adopt.",
            [
                "Learn the minimum fast and get back to delivering",
                "Organize a lunch-and-learn so the team picks it up together",
                "Keep the old workflow alongside until the new one feels safe",
                "Read the manual end to end before touching production",
            ],
        ),
        question(
            11,
            "A customer complains loudly about something that was not your fault.",
            [
                "Own the situation and drive it to a resolution",
                "Defuse the tension and turn the conversation around",
                "Listen until they feel heard, then work through it calmly",
                "Collect the details and follow the escalation procedure",
            ],
        ),
        question(
            12,
            "You are given a day with no meetings and a free choice of what to do.",
            [
                "Attack the hardest problem on your list",
                "Catch up with people you have been meaning to talk to",
                "Clear the backlog of small tasks others are waiting on",
                "Review and improve documentation and quality of past work",
            ],
        ),
    ]
}

/// Inserts the default bank when the catalog is empty. Re-running against a
/// seeded database is a no-op, so provisioning scripts can call it blindly.
pub async fn seed_question_catalog(db: &DatabaseManager) -> Result<usize> {
    let existing = db.count_questions().await?;
    if existing > 0 {
        info!(
            "Question catalog already holds {} entries, skipping seed",
            existing
        );
        return Ok(0);
    }

    let bank = default_question_bank();
    let mut seeded = 0;
    for record in bank {
        db.insert_question(record).await?;
        seeded += 1;
    }

    info!("Seeded {} questions into the catalog", seeded);
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_numbers_are_unique_and_ascending() {
        let bank = default_question_bank();
        let numbers: Vec<i32> = bank.iter().map(|q| q.question_number).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(numbers, sorted);
    }

    #[test]
    fn bank_uses_the_uniform_slot_mapping() {
        for entry in default_question_bank() {
            assert_eq!(entry.dimension_a, Dimension::D);
            assert_eq!(entry.dimension_b, Dimension::I);
            assert_eq!(entry.dimension_c, Dimension::S);
            assert_eq!(entry.dimension_d, Dimension::C);
        }
    }

    #[test]
    fn bank_entries_are_fully_populated() {
        for entry in default_question_bank() {
            assert!(!entry.scenario_text.is_empty());
            assert!(!entry.option_a.is_empty());
            assert!(!entry.option_b.is_empty());
            assert!(!entry.option_c.is_empty());
            assert!(!entry.option_d.is_empty());
        }
    }
}
