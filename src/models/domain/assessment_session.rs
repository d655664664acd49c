use std::collections::BTreeMap;

use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        answer_record::AnswerRecord,
        integrity_flag::IntegrityFlag,
        question_item::{DifficultyLevel, QuestionItem},
    },
    services::integrity_monitor::{IntegrityMonitor, IntegritySignal},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Submitted,
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionReason {
    TimeExpired,
    Completed,
    EarlySubmit,
}

/// What asked for the session to be closed.
#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum SubmitTrigger {
    Timer,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum TickOutcome {
    Idle,
    Running { remaining_seconds: u32 },
    Expired,
}

/// One timed attempt at a skill test. Owned by exactly one live-session slot;
/// every mutation takes `now` so callers control the clock.
#[derive(Debug)]
pub struct AssessmentSession {
    id: String,
    user_id: String,
    skill_name: String,
    difficulty: DifficultyLevel,
    questions: Vec<QuestionItem>,
    answers: BTreeMap<usize, AnswerRecord>,
    flags: Vec<IntegrityFlag>,
    monitor: IntegrityMonitor,
    duration_seconds: u32,
    remaining_seconds: u32,
    current_question_index: usize,
    question_displayed_at: Option<DateTime<Utc>>,
    status: SessionStatus,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    submission_reason: Option<SubmissionReason>,
}

impl AssessmentSession {
    pub fn new(
        user_id: &str,
        skill_name: &str,
        difficulty: DifficultyLevel,
        questions: Vec<QuestionItem>,
        duration_seconds: u32,
    ) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(AppError::NoQuestions(format!(
                "no {} questions available for '{}'",
                difficulty, skill_name
            )));
        }

        Ok(AssessmentSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            skill_name: skill_name.to_string(),
            difficulty,
            questions,
            answers: BTreeMap::new(),
            flags: Vec::new(),
            monitor: IntegrityMonitor::new(difficulty.requires_proctoring()),
            duration_seconds,
            remaining_seconds: duration_seconds,
            current_question_index: 0,
            question_displayed_at: None,
            status: SessionStatus::NotStarted,
            started_at: None,
            submitted_at: None,
            submission_reason: None,
        })
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.status != SessionStatus::NotStarted {
            return Err(AppError::InvalidState(format!(
                "session {} has already been started",
                self.id
            )));
        }

        self.status = SessionStatus::InProgress;
        self.started_at = Some(now);
        self.remaining_seconds = self.duration_seconds;
        self.current_question_index = 0;
        self.question_displayed_at = Some(now);
        Ok(())
    }

    /// Advances the countdown by one second. `Expired` is reported only on the
    /// tick that reaches zero; later ticks are `Idle`.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != SessionStatus::InProgress || self.remaining_seconds == 0 {
            return TickOutcome::Idle;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    pub fn record_answer(
        &mut self,
        question_index: usize,
        answer_value: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AnswerRecord> {
        self.ensure_in_progress()?;

        let question = self.questions.get(question_index).ok_or_else(|| {
            AppError::ValidationError(format!(
                "question index {} is out of range (0..{})",
                question_index,
                self.questions.len()
            ))
        })?;

        if question_index != self.current_question_index {
            return Err(AppError::InvalidState(format!(
                "question {} is not on display (current is {})",
                question_index, self.current_question_index
            )));
        }

        let displayed_at = self.question_displayed_at.unwrap_or(now);
        let record = AnswerRecord::new(question_index, answer_value, displayed_at, now);

        if let Some(flag) =
            self.monitor
                .on_answer_timed(question.question_type, record.time_spent_seconds, now)
        {
            self.flags.push(flag);
        }

        self.answers.insert(question_index, record.clone());
        Ok(record)
    }

    pub fn next_question(&mut self, now: DateTime<Utc>) -> AppResult<usize> {
        self.ensure_in_progress()?;

        let answered = self
            .answers
            .get(&self.current_question_index)
            .is_some_and(|a| !a.is_blank());
        if !answered {
            return Err(AppError::InvalidState(
                "answer the current question before moving on".to_string(),
            ));
        }

        if self.current_question_index + 1 >= self.questions.len() {
            return Err(AppError::InvalidState(
                "already on the last question; submit to finish".to_string(),
            ));
        }

        self.current_question_index += 1;
        self.question_displayed_at = Some(now);
        Ok(self.current_question_index)
    }

    pub fn previous_question(&mut self, now: DateTime<Utc>) -> AppResult<usize> {
        self.ensure_in_progress()?;

        if self.current_question_index == 0 {
            return Err(AppError::InvalidState(
                "already on the first question".to_string(),
            ));
        }

        self.current_question_index -= 1;
        self.question_displayed_at = Some(now);
        Ok(self.current_question_index)
    }

    /// Applies a signal from the integrity bus. Signals arriving outside an
    /// active session are dropped.
    pub fn apply_signal(&mut self, signal: &IntegritySignal) -> Option<IntegrityFlag> {
        if self.status != SessionStatus::InProgress {
            return None;
        }

        let flag = match signal {
            IntegritySignal::VisibilityLost { at } => self.monitor.on_visibility_lost(*at),
            IntegritySignal::FrameFinding { finding, at } => {
                self.monitor.on_frame_finding(finding, *at)
            }
        }?;

        self.flags.push(flag.clone());
        Some(flag)
    }

    /// InProgress -> Submitted. Any second call fails, which is what keeps a
    /// timer expiry racing a manual submit from producing two results.
    pub fn close(&mut self, trigger: SubmitTrigger, now: DateTime<Utc>) -> AppResult<SubmissionReason> {
        if self.status != SessionStatus::InProgress {
            return Err(AppError::InvalidState(format!(
                "session {} is not in progress",
                self.id
            )));
        }

        let reason = match trigger {
            SubmitTrigger::Timer => SubmissionReason::TimeExpired,
            SubmitTrigger::User if self.all_answered() => SubmissionReason::Completed,
            SubmitTrigger::User => SubmissionReason::EarlySubmit,
        };

        self.status = SessionStatus::Submitted;
        self.submitted_at = Some(now);
        self.submission_reason = Some(reason);
        Ok(reason)
    }

    /// InProgress -> Abandoned. The session can no longer be closed, so it is
    /// never graded or persisted.
    pub fn abandon(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.ensure_in_progress()?;
        self.status = SessionStatus::Abandoned;
        self.submitted_at = Some(now);
        Ok(())
    }

    fn ensure_in_progress(&self) -> AppResult<()> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::NotStarted => Err(AppError::InvalidState(format!(
                "session {} has not started",
                self.id
            ))),
            SessionStatus::Submitted => Err(AppError::InvalidState(format!(
                "session {} has already been submitted",
                self.id
            ))),
            SessionStatus::Abandoned => Err(AppError::InvalidState(format!(
                "session {} was abandoned",
                self.id
            ))),
        }
    }

    pub fn all_answered(&self) -> bool {
        (0..self.questions.len()).all(|i| self.answers.get(&i).is_some_and(|a| !a.is_blank()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn proctoring_enabled(&self) -> bool {
        self.monitor.is_enabled()
    }

    pub fn questions(&self) -> &[QuestionItem] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, AnswerRecord> {
        &self.answers
    }

    pub fn flags(&self) -> &[IntegrityFlag] {
        &self.flags
    }

    pub fn tab_switch_count(&self) -> u32 {
        self.monitor.tab_switch_count()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&QuestionItem> {
        self.questions.get(self.current_question_index)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.duration_seconds - self.remaining_seconds
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn submission_reason(&self) -> Option<SubmissionReason> {
        self.submission_reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::integrity_flag::{FlagSeverity, FlagType},
        services::proctoring::FrameFinding,
        test_utils::fixtures::{question_set, started_session},
    };
    use chrono::Duration;

    #[test]
    fn empty_question_list_cannot_start() {
        let result = AssessmentSession::new("u-1", "Luau", DifficultyLevel::Beginner, vec![], 3600);
        assert!(matches!(result, Err(AppError::NoQuestions(_))));
    }

    #[test]
    fn starting_resets_timer_and_position() {
        let now = Utc::now();
        let session = started_session(DifficultyLevel::Intermediate, now);

        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.remaining_seconds(), 3600);
        assert_eq!(session.current_question_index(), 0);
        assert_eq!(session.started_at(), Some(now));
    }

    #[test]
    fn cannot_start_twice() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Beginner, now);
        assert!(matches!(session.start(now), Err(AppError::InvalidState(_))));
    }

    #[test]
    fn tick_reports_expiry_exactly_once() {
        let mut session = AssessmentSession::new(
            "u-1",
            "Luau",
            DifficultyLevel::Beginner,
            question_set(3, DifficultyLevel::Beginner),
            2,
        )
        .expect("session");
        assert_eq!(session.tick(), TickOutcome::Idle);

        session.start(Utc::now()).expect("start");
        assert_eq!(session.tick(), TickOutcome::Running { remaining_seconds: 1 });
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(session.elapsed_seconds(), 2);
    }

    #[test]
    fn re_answering_overwrites_the_previous_record() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Intermediate, now);

        session.record_answer(0, "A", now + Duration::seconds(10)).expect("first");
        session.record_answer(0, "C", now + Duration::seconds(20)).expect("second");

        assert_eq!(session.answers().len(), 1);
        let record = &session.answers()[&0];
        assert_eq!(record.answer_value, "C");
        assert_eq!(record.time_spent_seconds, 20);
    }

    #[test]
    fn answers_are_bounded_by_question_count() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Beginner, now);
        let total = session.questions().len();

        assert!(session.record_answer(total, "A", now).is_err());
        assert!(session.record_answer(total + 5, "A", now).is_err());

        for index in 0..total {
            session.record_answer(index, "A", now).expect("answer");
            session.record_answer(index, "B", now).expect("overwrite");
            if index + 1 < total {
                session.next_question(now).expect("advance");
            }
            assert!(session.answers().len() <= total);
        }
        assert_eq!(session.answers().len(), total);
        assert!(session.all_answered());
    }

    #[test]
    fn only_the_displayed_question_can_be_answered() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Beginner, now);

        let result = session.record_answer(3, "A", now);
        assert!(matches!(result, Err(AppError::InvalidState(_))));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn cannot_advance_without_an_answer() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Beginner, now);

        assert!(session.next_question(now).is_err());
        session.record_answer(0, "  ", now).expect("blank answer is stored");
        assert!(session.next_question(now).is_err());

        session.record_answer(0, "B", now).expect("answer");
        assert_eq!(session.next_question(now).expect("advance"), 1);
    }

    #[test]
    fn stepping_back_resets_display_time() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Beginner, now);

        assert!(session.previous_question(now).is_err());
        session.record_answer(0, "A", now).expect("answer");
        session.next_question(now + Duration::seconds(30)).expect("advance");
        session
            .previous_question(now + Duration::seconds(60))
            .expect("back");

        let record = session
            .record_answer(0, "D", now + Duration::seconds(75))
            .expect("re-answer");
        assert_eq!(record.time_spent_seconds, 15);
    }

    #[test]
    fn fast_multiple_choice_answer_flags_only_under_proctoring() {
        let now = Utc::now();

        let mut proctored = started_session(DifficultyLevel::Expert, now);
        proctored
            .record_answer(0, "A", now + Duration::seconds(2))
            .expect("answer");
        assert_eq!(proctored.flags().len(), 1);
        assert_eq!(proctored.flags()[0].flag_type, FlagType::UnusualSpeed);
        assert_eq!(proctored.flags()[0].severity, FlagSeverity::Low);

        let mut open = started_session(DifficultyLevel::Advanced, now);
        open.record_answer(0, "A", now + Duration::seconds(2))
            .expect("answer");
        assert!(open.flags().is_empty());
    }

    #[test]
    fn flags_only_grow() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Expert, now);
        let mut last_len = 0;

        for i in 0..6 {
            session.apply_signal(&IntegritySignal::VisibilityLost {
                at: now + Duration::seconds(i),
            });
            session.apply_signal(&IntegritySignal::FrameFinding {
                finding: FrameFinding::new("looking away"),
                at: now + Duration::seconds(i),
            });
            assert!(session.flags().len() >= last_len);
            last_len = session.flags().len();
        }

        assert_eq!(session.tab_switch_count(), 6);
        assert_eq!(last_len, 12);
    }

    #[test]
    fn close_is_guarded_against_double_submit() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Beginner, now);

        let reason = session.close(SubmitTrigger::Timer, now).expect("first close");
        assert_eq!(reason, SubmissionReason::TimeExpired);
        assert!(matches!(
            session.close(SubmitTrigger::User, now),
            Err(AppError::InvalidState(_))
        ));
        assert_eq!(session.submission_reason(), Some(SubmissionReason::TimeExpired));
        assert!(session.record_answer(0, "A", now).is_err());
        assert!(session
            .apply_signal(&IntegritySignal::VisibilityLost { at: now })
            .is_none());
    }

    #[test]
    fn abandoned_session_cannot_be_closed() {
        let now = Utc::now();
        let mut session = started_session(DifficultyLevel::Expert, now);

        session.abandon(now).expect("abandon");
        assert_eq!(session.status(), SessionStatus::Abandoned);
        assert!(matches!(
            session.close(SubmitTrigger::User, now),
            Err(AppError::InvalidState(_))
        ));
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert!(session.abandon(now).is_err());
        assert!(session.submission_reason().is_none());
    }

    #[test]
    fn user_submit_reason_depends_on_completion() {
        let now = Utc::now();
        let mut early = started_session(DifficultyLevel::Beginner, now);
        assert_eq!(
            early.close(SubmitTrigger::User, now).expect("close"),
            SubmissionReason::EarlySubmit
        );

        let mut complete = started_session(DifficultyLevel::Beginner, now);
        let total = complete.questions().len();
        for index in 0..total {
            complete.record_answer(index, "A", now).expect("answer");
            if index + 1 < total {
                complete.next_question(now).expect("advance");
            }
        }
        assert_eq!(
            complete.close(SubmitTrigger::User, now).expect("close"),
            SubmissionReason::Completed
        );
    }
}
