use std::collections::BTreeMap;

use crate::models::domain::{
    answer_record::AnswerRecord,
    assessment_result::AssessmentResult,
    integrity_flag::{FlagSeverity, IntegrityFlag},
    question_item::{DifficultyLevel, QuestionItem},
};

pub const PASSING_SCORE: u32 = 70;
pub const STEP_UP_SCORE: u32 = 90;
pub const STEP_DOWN_SCORE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub raw_score: u32,
    pub penalty: u32,
    pub final_score: u32,
    pub passed: bool,
}

impl ScoreBreakdown {
    pub fn compute(correct_count: u32, total_count: u32, high_flags: u32, medium_flags: u32) -> Self {
        let raw = if total_count == 0 {
            0.0
        } else {
            100.0 * f64::from(correct_count) / f64::from(total_count)
        };
        let penalty = high_flags * FlagSeverity::High.penalty()
            + medium_flags * FlagSeverity::Medium.penalty();
        let final_score = (raw - f64::from(penalty)).max(0.0).round() as u32;

        ScoreBreakdown {
            raw_score: raw.round() as u32,
            penalty,
            final_score,
            passed: final_score >= PASSING_SCORE,
        }
    }
}

/// Grades a submitted session. Pure: same inputs, same result.
pub fn evaluate(
    questions: &[QuestionItem],
    answers: &BTreeMap<usize, AnswerRecord>,
    flags: &[IntegrityFlag],
    difficulty: DifficultyLevel,
    elapsed_seconds: u32,
) -> AssessmentResult {
    let correct_count = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .get(index)
                .is_some_and(|a| question.is_answered_correctly(&a.answer_value))
        })
        .count() as u32;
    let total_count = questions.len() as u32;

    let count_of = |severity| flags.iter().filter(|f| f.severity == severity).count() as u32;
    let breakdown = ScoreBreakdown::compute(
        correct_count,
        total_count,
        count_of(FlagSeverity::High),
        count_of(FlagSeverity::Medium),
    );

    AssessmentResult {
        score: breakdown.final_score,
        raw_score: breakdown.raw_score,
        correct_count,
        total_count,
        penalty_applied: breakdown.penalty,
        passed: breakdown.passed,
        time_taken_minutes: (f64::from(elapsed_seconds) / 60.0).round() as u32,
        flags: flags.to_vec(),
        recommended_next_level: recommend_next_level(difficulty, breakdown.final_score),
    }
}

/// Advisory tier for the candidate's next attempt.
pub fn recommend_next_level(current: DifficultyLevel, final_score: u32) -> DifficultyLevel {
    if final_score >= STEP_UP_SCORE {
        current.step_up()
    } else if final_score < STEP_DOWN_SCORE {
        current.step_down()
    } else {
        current
    }
}
