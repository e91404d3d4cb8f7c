pub mod challenge;
pub mod day;
pub mod prayer;
pub mod record;
pub mod stats;

pub use challenge::{ChallengePayload, DailyChallenge};
pub use day::DaySnapshot;
pub use prayer::{PrayerDetail, PrayerKey, PrayerMode};
pub use record::{DevotionalRecord, GoodDeed};
pub use stats::{DayLog, Streak};
