use serde::{Deserialize, Serialize};

/// One finished day as written by the rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayLog {
    pub date: String,
    pub daily_points: u64,
    pub prayers_completed: u8,
}

impl DayLog {
    pub fn is_full_day(&self) -> bool {
        self.prayers_completed >= 5
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}
