use serde::Serialize;

use crate::models::{DailyChallenge, DevotionalRecord, PrayerKey};

pub const PRAYER_ALONE: u64 = 5;
pub const PRAYER_JAMAAH: u64 = 135;
pub const ADHKAR_AFTER_PRAYER: u64 = 15;
pub const QIYAM_PER_TWO_RAKATS: u64 = 8;
pub const WITR: u64 = 10;
pub const NAWAFIL_PER_TWO_RAKATS: u64 = 10;
pub const IFTAR: u64 = 200;
pub const SADAQAH: u64 = 100;
pub const GENERAL_DEED: u64 = 50;
pub const INDIVIDUAL_DHIKR: u64 = 5;
pub const GENERAL_DHIKR: u64 = 50;
/// About 500 letters a page at 10 hasanat a letter.
pub const PER_QURAN_PAGE: u64 = 5_000;
pub const PER_QURAN_JUZ: u64 = 100_000;

/// Points per rule for one day. `total()` is what the dashboard shows as
/// today's hasanat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointsBreakdown {
    pub prayers: u64,
    pub adhkar_after_prayer: u64,
    pub qiyam: u64,
    pub witr: u64,
    pub nawafil: u64,
    pub good_deeds: u64,
    pub individual_adhkar: u64,
    pub general_adhkar: u64,
    pub challenge: u64,
    pub quran: u64,
}

impl PointsBreakdown {
    pub fn total(&self) -> u64 {
        self.deeds().saturating_add(self.quran)
    }

    /// Everything except the Qur'an rows.
    pub fn deeds(&self) -> u64 {
        [
            self.prayers,
            self.adhkar_after_prayer,
            self.qiyam,
            self.witr,
            self.nawafil,
            self.good_deeds,
            self.individual_adhkar,
            self.general_adhkar,
            self.challenge,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

pub fn breakdown(record: &DevotionalRecord, challenge: Option<&DailyChallenge>) -> PointsBreakdown {
    let mut b = PointsBreakdown::default();

    for key in PrayerKey::ALL {
        let detail = record.prayer(key);
        if detail.completed {
            b.prayers += if detail.is_jamaah { PRAYER_JAMAAH } else { PRAYER_ALONE };
        }
        if record.adhkar_done_after(key) {
            b.adhkar_after_prayer += ADHKAR_AFTER_PRAYER;
        }
    }

    b.qiyam = (record.qiyam_rakats / 2) as u64 * QIYAM_PER_TWO_RAKATS;
    if record.witr_completed {
        b.witr = WITR;
    }
    b.nawafil = (record.nawafil_rakats / 2) as u64 * NAWAFIL_PER_TWO_RAKATS;

    let deeds = &record.good_deeds;
    b.good_deeds = [
        (deeds.iftar, IFTAR),
        (deeds.sadaqah, SADAQAH),
        (deeds.general, GENERAL_DEED),
    ]
    .iter()
    .filter(|(done, _)| *done)
    .map(|(_, pts)| pts)
    .sum();

    b.individual_adhkar =
        record.completed_adhkar_ids.values().filter(|v| **v).count() as u64 * INDIVIDUAL_DHIKR;
    b.general_adhkar = record.adhkar.values().filter(|v| **v).count() as u64 * GENERAL_DHIKR;

    if let Some(c) = challenge.filter(|c| c.completed) {
        b.challenge = c.points as u64;
    }

    b.quran = compute_quran_merit(record);

    b
}

pub fn compute_daily_points(record: &DevotionalRecord, challenge: Option<&DailyChallenge>) -> u64 {
    breakdown(record, challenge).total()
}

pub fn compute_quran_merit(record: &DevotionalRecord) -> u64 {
    record
        .quran_pages
        .saturating_mul(PER_QURAN_PAGE)
        .saturating_add(record.quran_juz.saturating_mul(PER_QURAN_JUZ))
}

/// Share of the five obligatory prayers completed today, 0..=100.
pub fn compute_progress_percent(record: &DevotionalRecord) -> u8 {
    let total = PrayerKey::ALL.len();
    let done = record.prayers_completed();
    ((done * 100 + total / 2) / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoodDeed, PrayerMode};

    #[test]
    fn empty_record_scores_nothing() {
        let record = DevotionalRecord::default();
        assert_eq!(compute_daily_points(&record, None), 0);
        assert_eq!(compute_quran_merit(&record), 0);
        assert_eq!(compute_progress_percent(&record), 0);
    }

    #[test]
    fn single_jamaah_prayer() {
        let mut record = DevotionalRecord::default();
        record.set_prayer(PrayerKey::Maghrib, Some(PrayerMode::Jamaah));
        assert_eq!(compute_daily_points(&record, None), 135);
    }

    #[test]
    fn stored_jamaah_flag_alone_still_scores() {
        let record: DevotionalRecord =
            serde_json::from_str(r#"{"detailed_prayers":{"isha":{"is_jamaah":true}}}"#).unwrap();
        assert_eq!(compute_daily_points(&record, None), 135);
        assert_eq!(compute_progress_percent(&record), 20);
    }

    #[test]
    fn single_prayer_alone_with_adhkar() {
        let mut record = DevotionalRecord::default();
        record.set_prayer(PrayerKey::Fajr, Some(PrayerMode::Alone));
        record.toggle_adhkar_after(PrayerKey::Fajr);
        assert_eq!(compute_daily_points(&record, None), 20);
    }

    #[test]
    fn adhkar_after_prayer_counts_without_the_prayer() {
        let mut record = DevotionalRecord::default();
        record.toggle_adhkar_after(PrayerKey::Asr);
        record.toggle_adhkar_after(PrayerKey::Isha);
        assert_eq!(compute_daily_points(&record, None), 30);
    }

    #[test]
    fn qiyam_and_witr() {
        let record = DevotionalRecord {
            qiyam_rakats: 4,
            witr_completed: true,
            ..Default::default()
        };
        assert_eq!(compute_daily_points(&record, None), 26);
    }

    #[test]
    fn nawafil_and_good_deeds() {
        let mut record = DevotionalRecord {
            nawafil_rakats: 6,
            ..Default::default()
        };
        record.toggle_good_deed(GoodDeed::Iftar);
        record.toggle_good_deed(GoodDeed::Sadaqah);
        record.toggle_good_deed(GoodDeed::General);
        assert_eq!(compute_daily_points(&record, None), 30 + 350);
    }

    #[test]
    fn only_true_dhikr_entries_count() {
        let mut record = DevotionalRecord::default();
        record.toggle_dhikr("tasbih");
        record.toggle_dhikr("tahmid");
        record.toggle_dhikr("tahmid");
        record.toggle_general_dhikr("morning");
        record.adhkar.insert("evening".to_string(), false);

        let b = breakdown(&record, None);
        assert_eq!(b.individual_adhkar, 5);
        assert_eq!(b.general_adhkar, 50);
        assert_eq!(b.total(), 55);
    }

    #[test]
    fn challenge_counts_once_completed() {
        let record = DevotionalRecord::default();
        let mut challenge = DailyChallenge {
            title: "Visit the sick".to_string(),
            description: "Visit someone who is ill.".to_string(),
            points: 300,
            completed: false,
        };
        assert_eq!(compute_daily_points(&record, Some(&challenge)), 0);
        challenge.complete();
        assert_eq!(compute_daily_points(&record, Some(&challenge)), 300);
    }

    #[test]
    fn quran_merit_is_included_once() {
        let record = DevotionalRecord {
            quran_pages: 2,
            quran_juz: 1,
            ..Default::default()
        };
        let merit = compute_quran_merit(&record);
        assert_eq!(merit, 110_000);

        let daily = compute_daily_points(&record, None);
        assert_eq!(daily, 110_000);
        assert!(merit <= daily);
        assert_eq!(breakdown(&record, None).deeds(), 0);
    }

    #[test]
    fn huge_quran_counts_saturate_instead_of_overflowing() {
        let mut record = DevotionalRecord::default();
        record.adjust_quran_pages(4_000_000_000_000_000);
        record.set_prayer(PrayerKey::Fajr, Some(PrayerMode::Jamaah));
        record.toggle_good_deed(GoodDeed::Iftar);

        assert_eq!(compute_quran_merit(&record), u64::MAX);
        assert_eq!(compute_daily_points(&record, None), u64::MAX);
        assert_eq!(breakdown(&record, None).deeds(), 335);
    }

    #[test]
    fn progress_is_monotone_and_bounded() {
        let mut record = DevotionalRecord::default();
        let mut last = compute_progress_percent(&record);
        for key in PrayerKey::ALL {
            record.set_prayer(key, Some(PrayerMode::Alone));
            let now = compute_progress_percent(&record);
            assert!(now >= last);
            assert!(now <= 100);
            last = now;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn progress_steps_by_twenty() {
        let mut record = DevotionalRecord::default();
        record.set_prayer(PrayerKey::Fajr, Some(PrayerMode::Jamaah));
        record.set_prayer(PrayerKey::Dhuhr, Some(PrayerMode::Alone));
        assert_eq!(compute_progress_percent(&record), 40);
    }

    #[test]
    fn full_day_total() {
        let mut record = DevotionalRecord::default();
        for key in PrayerKey::ALL {
            record.set_prayer(key, Some(PrayerMode::Jamaah));
            record.toggle_adhkar_after(key);
        }
        record.qiyam_rakats = 8;
        record.witr_completed = true;
        record.nawafil_rakats = 2;
        record.toggle_good_deed(GoodDeed::Sadaqah);

        // 5*135 + 5*15 + 4*8 + 10 + 10 + 100
        assert_eq!(compute_daily_points(&record, None), 902);
    }
}
