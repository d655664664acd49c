use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        integrity_flag::{FlagSeverity, FlagType, IntegrityFlag},
        question_item::QuestionType,
    },
    services::proctoring::FrameFinding,
};

/// Tab switches beyond this count are flagged as high severity.
pub const TAB_SWITCH_ESCALATION_THRESHOLD: u32 = 3;
/// Multiple-choice answers given faster than this are flagged.
pub const UNUSUAL_SPEED_THRESHOLD_SECS: i64 = 5;

/// Integrity rules for one session. Inactive monitors never raise flags.
#[derive(Clone, Debug, Default)]
pub struct IntegrityMonitor {
    enabled: bool,
    tab_switch_count: u32,
}

impl IntegrityMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            tab_switch_count: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tab_switch_count(&self) -> u32 {
        self.tab_switch_count
    }

    pub fn on_visibility_lost(&mut self, at: DateTime<Utc>) -> Option<IntegrityFlag> {
        if !self.enabled {
            return None;
        }

        self.tab_switch_count += 1;
        let severity = if self.tab_switch_count > TAB_SWITCH_ESCALATION_THRESHOLD {
            FlagSeverity::High
        } else {
            FlagSeverity::Medium
        };

        Some(IntegrityFlag::new(
            FlagType::TabSwitch,
            severity,
            format!("Page lost visibility (switch #{})", self.tab_switch_count),
            at,
        ))
    }

    pub fn on_answer_timed(
        &self,
        question_type: QuestionType,
        seconds_on_question: i64,
        at: DateTime<Utc>,
    ) -> Option<IntegrityFlag> {
        if !self.enabled
            || question_type != QuestionType::MultipleChoice
            || seconds_on_question >= UNUSUAL_SPEED_THRESHOLD_SECS
        {
            return None;
        }

        Some(IntegrityFlag::new(
            FlagType::UnusualSpeed,
            FlagSeverity::Low,
            format!("Multiple-choice answer after {}s", seconds_on_question),
            at,
        ))
    }

    pub fn on_frame_finding(&self, finding: &FrameFinding, at: DateTime<Utc>) -> Option<IntegrityFlag> {
        if !self.enabled {
            return None;
        }

        Some(IntegrityFlag::new(
            FlagType::AiProctoringAlert,
            FlagSeverity::Medium,
            finding.detail.clone(),
            at,
        ))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IntegritySignal {
    VisibilityLost { at: DateTime<Utc> },
    FrameFinding { finding: FrameFinding, at: DateTime<Utc> },
}

/// Publishing side of a session's integrity channel. Signals are delivered to
/// the single subscriber in publish order.
#[derive(Clone, Debug)]
pub struct IntegrityBus {
    sender: mpsc::UnboundedSender<IntegritySignal>,
}

pub struct IntegritySubscription {
    receiver: mpsc::UnboundedReceiver<IntegritySignal>,
}

impl IntegrityBus {
    pub fn channel() -> (IntegrityBus, IntegritySubscription) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (IntegrityBus { sender }, IntegritySubscription { receiver })
    }

    pub fn publish(&self, signal: IntegritySignal) -> AppResult<()> {
        self.sender
            .send(signal)
            .map_err(|_| AppError::InvalidState("integrity monitoring has stopped".to_string()))
    }
}

impl IntegritySubscription {
    pub async fn next(&mut self) -> Option<IntegritySignal> {
        self.receiver.recv().await
    }
}
