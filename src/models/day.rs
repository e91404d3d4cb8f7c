use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DailyChallenge, DevotionalRecord};

/// The persisted unit: the record for `date` and the challenge taken that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub record: DevotionalRecord,
    #[serde(default)]
    pub challenge: Option<DailyChallenge>,
    /// Qur'an merit already added to `record.points` by earlier rollovers.
    #[serde(default)]
    pub committed_quran_merit: u64,
}

impl DaySnapshot {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            record: DevotionalRecord::default(),
            challenge: None,
            committed_quran_merit: 0,
        }
    }
}
