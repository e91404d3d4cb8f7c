use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{PrayerDetail, PrayerKey, PrayerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoodDeed {
    Iftar,
    Sadaqah,
    General,
}

impl GoodDeed {
    pub fn display_name(&self) -> &'static str {
        match self {
            GoodDeed::Iftar => "Iftar for a fasting person",
            GoodDeed::Sadaqah => "Sadaqah",
            GoodDeed::General => "General good deed",
        }
    }
}

impl std::str::FromStr for GoodDeed {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iftar" => Ok(GoodDeed::Iftar),
            "sadaqah" | "sadaqa" | "charity" => Ok(GoodDeed::Sadaqah),
            "general" => Ok(GoodDeed::General),
            _ => Err(anyhow::anyhow!("Unknown good deed: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodDeeds {
    #[serde(default)]
    pub iftar: bool,
    #[serde(default)]
    pub sadaqah: bool,
    #[serde(default)]
    pub general: bool,
}

impl GoodDeeds {
    fn slot(&mut self, deed: GoodDeed) -> &mut bool {
        match deed {
            GoodDeed::Iftar => &mut self.iftar,
            GoodDeed::Sadaqah => &mut self.sadaqah,
            GoodDeed::General => &mut self.general,
        }
    }
}

/// Everything the user logged for one day, plus the running totals that
/// survive the day boundary (`points`, `streak`, `level` and the Qur'an
/// counters).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevotionalRecord {
    pub detailed_prayers: BTreeMap<PrayerKey, PrayerDetail>,
    pub adhkar_after_prayer: BTreeMap<PrayerKey, bool>,
    pub adhkar: BTreeMap<String, bool>,
    pub completed_adhkar_ids: BTreeMap<String, bool>,
    pub qiyam_rakats: u32,
    pub witr_completed: bool,
    pub nawafil_rakats: u32,
    pub good_deeds: GoodDeeds,
    pub quran_pages: u64,
    pub quran_juz: u64,
    pub points: u64,
    pub streak: u32,
    pub level: String,
}

impl DevotionalRecord {
    /// Absent keys read as "not prayed". A stored jamaah entry always reads
    /// as completed.
    pub fn prayer(&self, key: PrayerKey) -> PrayerDetail {
        let detail = self.detailed_prayers.get(&key).copied().unwrap_or_default();
        PrayerDetail {
            completed: detail.completed || detail.is_jamaah,
            ..detail
        }
    }

    pub fn completed(&self, key: PrayerKey) -> bool {
        self.prayer(key).completed
    }

    pub fn adhkar_done_after(&self, key: PrayerKey) -> bool {
        self.adhkar_after_prayer.get(&key).copied().unwrap_or(false)
    }

    pub fn prayers_completed(&self) -> usize {
        PrayerKey::ALL.iter().filter(|k| self.completed(**k)).count()
    }

    pub fn set_prayer(&mut self, key: PrayerKey, mode: Option<PrayerMode>) {
        let detail = match mode {
            Some(mode) => PrayerDetail::performed(mode),
            None => PrayerDetail::missed(),
        };
        self.detailed_prayers.insert(key, detail);
    }

    /// Pressing the same mode twice clears the prayer; pressing the other
    /// mode switches to it.
    pub fn toggle_prayer(&mut self, key: PrayerKey, mode: PrayerMode) -> Option<PrayerMode> {
        let next = if self.prayer(key).mode() == Some(mode) {
            None
        } else {
            Some(mode)
        };
        self.set_prayer(key, next);
        next
    }

    pub fn toggle_adhkar_after(&mut self, key: PrayerKey) -> bool {
        let now = !self.adhkar_done_after(key);
        self.adhkar_after_prayer.insert(key, now);
        now
    }

    pub fn toggle_dhikr(&mut self, id: &str) -> bool {
        toggle_flag(&mut self.completed_adhkar_ids, id)
    }

    pub fn toggle_general_dhikr(&mut self, id: &str) -> bool {
        toggle_flag(&mut self.adhkar, id)
    }

    pub fn add_qiyam(&mut self) {
        self.qiyam_rakats = even(self.qiyam_rakats).saturating_add(2);
    }

    pub fn remove_qiyam(&mut self) {
        self.qiyam_rakats = even(self.qiyam_rakats).saturating_sub(2);
    }

    pub fn toggle_witr(&mut self) -> bool {
        self.witr_completed = !self.witr_completed;
        self.witr_completed
    }

    pub fn add_nawafil(&mut self) {
        self.nawafil_rakats = even(self.nawafil_rakats).saturating_add(2);
    }

    pub fn remove_nawafil(&mut self) {
        self.nawafil_rakats = even(self.nawafil_rakats).saturating_sub(2);
    }

    pub fn toggle_good_deed(&mut self, deed: GoodDeed) -> bool {
        let slot = self.good_deeds.slot(deed);
        *slot = !*slot;
        *slot
    }

    pub fn adjust_quran_pages(&mut self, delta: i64) {
        self.quran_pages = adjust(self.quran_pages, delta);
    }

    pub fn adjust_quran_juz(&mut self, delta: i64) {
        self.quran_juz = adjust(self.quran_juz, delta);
    }

    /// Clear everything that belongs to a single day. Totals and the
    /// cumulative Qur'an counters are kept.
    pub fn reset_day(&mut self) {
        self.detailed_prayers.clear();
        self.adhkar_after_prayer.clear();
        self.adhkar.clear();
        self.completed_adhkar_ids.clear();
        self.qiyam_rakats = 0;
        self.witr_completed = false;
        self.nawafil_rakats = 0;
        self.good_deeds = GoodDeeds::default();
    }
}

fn toggle_flag(map: &mut BTreeMap<String, bool>, id: &str) -> bool {
    let now = !map.get(id).copied().unwrap_or(false);
    map.insert(id.to_string(), now);
    now
}

fn even(rakats: u32) -> u32 {
    rakats - rakats % 2
}

fn adjust(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}
