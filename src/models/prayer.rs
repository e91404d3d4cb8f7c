use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerKey {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerKey {
    pub const ALL: [PrayerKey; 5] = [
        PrayerKey::Fajr,
        PrayerKey::Dhuhr,
        PrayerKey::Asr,
        PrayerKey::Maghrib,
        PrayerKey::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "fajr",
            PrayerKey::Dhuhr => "dhuhr",
            PrayerKey::Asr => "asr",
            PrayerKey::Maghrib => "maghrib",
            PrayerKey::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "Fajr",
            PrayerKey::Dhuhr => "Dhuhr",
            PrayerKey::Asr => "Asr",
            PrayerKey::Maghrib => "Maghrib",
            PrayerKey::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerKey::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerKey::Dhuhr),
            "asr" => Ok(PrayerKey::Asr),
            "maghrib" => Ok(PrayerKey::Maghrib),
            "isha" => Ok(PrayerKey::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// How an obligatory prayer was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrayerMode {
    Alone,
    Jamaah,
}

/// `is_jamaah` implies `completed`; go through [`PrayerDetail::performed`]
/// and [`PrayerDetail::missed`] rather than setting the fields by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerDetail {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_jamaah: bool,
}

impl PrayerDetail {
    pub fn performed(mode: PrayerMode) -> Self {
        Self {
            completed: true,
            is_jamaah: mode == PrayerMode::Jamaah,
        }
    }

    pub fn missed() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<PrayerMode> {
        match (self.completed, self.is_jamaah) {
            (true, true) => Some(PrayerMode::Jamaah),
            (true, false) => Some(PrayerMode::Alone),
            _ => None,
        }
    }
}
