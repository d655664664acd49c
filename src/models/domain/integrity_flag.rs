use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct IntegrityFlag {
    pub flag_type: FlagType,
    pub severity: FlagSeverity,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    TabSwitch,
    UnusualSpeed,
    AiProctoringAlert,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FlagSeverity {
    Low,
    Medium,
    High,
}

impl FlagSeverity {
    /// Points deducted from the raw score per flag. Low flags are informational.
    pub fn penalty(self) -> u32 {
        match self {
            FlagSeverity::Low => 0,
            FlagSeverity::Medium => 5,
            FlagSeverity::High => 10,
        }
    }
}

impl IntegrityFlag {
    pub fn new(
        flag_type: FlagType,
        severity: FlagSeverity,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        IntegrityFlag {
            flag_type,
            severity,
            detail: detail.into(),
            timestamp,
        }
    }
}
