use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::content::KeyValueStore;
use crate::models::{DayLog, DaySnapshot, Streak};

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

/// `app_meta` seen as the key-value store the content cache writes into.
pub struct MetaStore<'a> {
    conn: &'a Connection,
}

impl<'a> MetaStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for MetaStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        MetaRepo::get(self.conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        MetaRepo::set(self.conn, key, value)
    }
}

// ─── Day snapshot ────────────────────────────────────────────────────────────

const SNAPSHOT_KEY: &str = "day_snapshot_v1";

pub struct SnapshotRepo;

impl SnapshotRepo {
    pub fn load(conn: &Connection) -> Result<Option<DaySnapshot>> {
        match MetaRepo::get(conn, SNAPSHOT_KEY)? {
            None => Ok(None),
            Some(json) => {
                let snapshot = serde_json::from_str(&json).context("Parsing stored day snapshot")?;
                Ok(Some(snapshot))
            }
        }
    }

    pub fn save(conn: &Connection, snapshot: &DaySnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot).context("Serializing day snapshot")?;
        MetaRepo::set(conn, SNAPSHOT_KEY, &json)
    }
}

// ─── Day log ─────────────────────────────────────────────────────────────────

pub struct DayLogRepo;

impl DayLogRepo {
    pub fn record(conn: &Connection, log: &DayLog) -> Result<()> {
        conn.execute(
            "INSERT INTO day_log (date, daily_points, prayers_completed) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET daily_points = ?2, prayers_completed = ?3",
            params![
                log.date,
                i64::try_from(log.daily_points).unwrap_or(i64::MAX),
                log.prayers_completed
            ],
        )?;
        Ok(())
    }

    pub fn get_range(conn: &Connection, start: &str, end: &str) -> Result<Vec<DayLog>> {
        let mut stmt = conn.prepare(
            "SELECT date, daily_points, prayers_completed
             FROM day_log WHERE date >= ?1 AND date <= ?2
             ORDER BY date",
        )?;

        let rows = stmt.query_map(params![start, end], |row| {
            Ok(DayLog {
                date: row.get(0)?,
                daily_points: row.get::<_, i64>(1)?.max(0) as u64,
                prayers_completed: row.get(2)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn calculate_streak(conn: &Connection, today: NaiveDate) -> Result<Streak> {
        // Days with all 5 prayers done, newest first
        let mut stmt = conn.prepare(
            "SELECT date FROM day_log
             WHERE prayers_completed >= 5
             ORDER BY date DESC",
        )?;

        let dates: Vec<NaiveDate> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .iter()
            .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .collect();

        // Today is only logged once it is over, so a streak may end yesterday
        let mut expected = match dates.first() {
            Some(d) if *d == today => today,
            _ => today.pred_opt().unwrap_or(today),
        };
        let mut current = 0u32;
        for d in &dates {
            if *d > expected {
                continue;
            }
            if *d != expected {
                break;
            }
            current += 1;
            expected = expected.pred_opt().unwrap_or(expected);
        }

        let best = calculate_best_streak(&dates).max(current);
        Ok(Streak { current, best })
    }
}

fn calculate_best_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut sorted = dates.to_vec();
    sorted.sort();

    let mut best = 0u32;
    let mut current = 1u32;

    for i in 1..sorted.len() {
        let prev = sorted[i - 1];
        let curr = sorted[i];
        if curr == prev.succ_opt().unwrap_or(curr) {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
    }
    best.max(current)
}
