use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );

        CREATE TABLE IF NOT EXISTS day_log (
            date              TEXT PRIMARY KEY,
            daily_points      INTEGER NOT NULL DEFAULT 0,
            prayers_completed INTEGER NOT NULL DEFAULT 0
                              CHECK(prayers_completed BETWEEN 0 AND 5),
            created_at        TEXT DEFAULT (datetime('now'))
        );
    ")?;
    Ok(())
}
