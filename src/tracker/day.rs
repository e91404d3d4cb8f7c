use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;

use crate::config::LevelsConfig;
use crate::content::Clock;
use crate::db::repository::{DayLogRepo, SnapshotRepo};
use crate::models::{DayLog, DaySnapshot};
use crate::scoring;

/// Load the snapshot for today, closing out any earlier day first.
pub fn load_today(conn: &Connection, levels: &LevelsConfig, clock: &impl Clock) -> Result<DaySnapshot> {
    let today = clock.today();
    let mut snapshot = match SnapshotRepo::load(conn)? {
        Some(s) => s,
        None => {
            let mut s = DaySnapshot::new(today);
            s.record.level = levels.label_for(0);
            s
        }
    };

    if snapshot.date < today {
        rollover(conn, &mut snapshot, today, levels)?;
    }
    SnapshotRepo::save(conn, &snapshot)?;
    Ok(snapshot)
}

pub fn save(conn: &Connection, snapshot: &DaySnapshot) -> Result<()> {
    SnapshotRepo::save(conn, snapshot)
}

/// Commit the finished day to the all-time total and start `today` fresh.
///
/// Qur'an counters are cumulative, so only the merit gained since the last
/// commit is added to `points`.
pub fn rollover(
    conn: &Connection,
    snapshot: &mut DaySnapshot,
    today: NaiveDate,
    levels: &LevelsConfig,
) -> Result<()> {
    let record = &mut snapshot.record;
    let breakdown = scoring::breakdown(record, snapshot.challenge.as_ref());

    DayLogRepo::record(
        conn,
        &DayLog {
            date: snapshot.date.format("%Y-%m-%d").to_string(),
            daily_points: breakdown.total(),
            prayers_completed: record.prayers_completed() as u8,
        },
    )?;

    let merit = breakdown.quran;
    let earned = breakdown
        .deeds()
        .saturating_add(merit.saturating_sub(snapshot.committed_quran_merit));
    record.points = record.points.saturating_add(earned);
    snapshot.committed_quran_merit = snapshot.committed_quran_merit.max(merit);

    info!(
        "closing {}: +{} points, {} prayers",
        snapshot.date,
        earned,
        record.prayers_completed()
    );

    record.reset_day();
    snapshot.challenge = None;
    snapshot.date = today;

    record.streak = DayLogRepo::calculate_streak(conn, today)?.current;
    record.level = levels.label_for(record.points);
    Ok(())
}
