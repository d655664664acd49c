#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::{
        models::domain::{
            assessment_session::{AssessmentSession, SubmissionReason},
            question_item::{DifficultyLevel, QuestionItem, QuestionType},
            AssessmentResult, SkillAssessment,
        },
        services::scoring::{recommend_next_level, PASSING_SCORE},
    };

    /// Builds `count` questions cycling multiple-choice, coding, practical,
    /// starting with multiple-choice.
    pub fn question_set(count: usize, difficulty: DifficultyLevel) -> Vec<QuestionItem> {
        (0..count)
            .map(|i| match i % 3 {
                0 => QuestionItem {
                    id: format!("q-{}", i),
                    question_type: QuestionType::MultipleChoice,
                    prompt_text: format!("Which service replicates state (#{})?", i),
                    options: vec![
                        "ReplicatedStorage".to_string(),
                        "ServerStorage".to_string(),
                        "StarterGui".to_string(),
                        "Lighting".to_string(),
                    ],
                    correct_answer: "ReplicatedStorage".to_string(),
                    explanation: "Both client and server can see it".to_string(),
                    difficulty,
                },
                1 => QuestionItem {
                    id: format!("q-{}", i),
                    question_type: QuestionType::Coding,
                    prompt_text: format!("Write a function returning a + b (#{})", i),
                    options: vec![],
                    correct_answer: "return a + b".to_string(),
                    explanation: "Simple addition".to_string(),
                    difficulty,
                },
                _ => QuestionItem {
                    id: format!("q-{}", i),
                    question_type: QuestionType::Practical,
                    prompt_text: format!("Name the event fired on character spawn (#{})", i),
                    options: vec![],
                    correct_answer: "CharacterAdded".to_string(),
                    explanation: "Player.CharacterAdded".to_string(),
                    difficulty,
                },
            })
            .collect()
    }

    /// A ten-question, one-hour session already started at `now`.
    pub fn started_session(difficulty: DifficultyLevel, now: DateTime<Utc>) -> AssessmentSession {
        let mut session = AssessmentSession::new(
            "user-1",
            "Luau Scripting",
            difficulty,
            question_set(10, difficulty),
            3600,
        )
        .expect("fixture session should build");
        session.start(now).expect("fixture session should start");
        session
    }

    /// A persisted assessment with the given final score.
    pub fn skill_assessment(score: u32, difficulty: DifficultyLevel) -> SkillAssessment {
        let now = Utc::now();
        SkillAssessment {
            id: "assessment-1".to_string(),
            user_id: "user-1".to_string(),
            skill_name: "Luau Scripting".to_string(),
            difficulty,
            proctoring_enabled: difficulty.requires_proctoring(),
            tab_switch_count: 0,
            submission_reason: SubmissionReason::Completed,
            result: AssessmentResult {
                score,
                raw_score: score,
                correct_count: score / 10,
                total_count: 10,
                penalty_applied: 0,
                passed: score >= PASSING_SCORE,
                time_taken_minutes: 30,
                flags: vec![],
                recommended_next_level: recommend_next_level(difficulty, score),
            },
            answers: vec![],
            started_at: now,
            completed_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::question_item::{DifficultyLevel, QuestionType};

    #[test]
    fn test_fixtures_question_set() {
        let questions = question_set(4, DifficultyLevel::Beginner);
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].question_type, QuestionType::MultipleChoice);
        assert_eq!(questions[1].question_type, QuestionType::Coding);
        assert_eq!(questions[3].question_type, QuestionType::MultipleChoice);
        assert!(questions.iter().all(|q| q.difficulty == DifficultyLevel::Beginner));
    }

    #[test]
    fn test_fixtures_started_session() {
        let session = started_session(DifficultyLevel::Expert, chrono::Utc::now());
        assert!(session.proctoring_enabled());
        assert_eq!(session.questions().len(), 10);
    }
}
