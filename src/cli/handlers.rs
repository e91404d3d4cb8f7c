use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::str::FromStr;

use crate::cli::args::{ChallengeCommands, DhikrCommands, QiyamCommands, RakatCommands};
use crate::config::AppConfig;
use crate::content::{Clock, DailyContentCache, GeminiProvider, SlotState, SystemClock};
use crate::db::repository::{DayLogRepo, MetaStore};
use crate::models::{DaySnapshot, GoodDeed, PrayerKey, PrayerMode};
use crate::scoring::{self, PointsBreakdown};
use crate::tracker;
use crate::utils::format::{format_points, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

type ContentCache<'a> = DailyContentCache<GeminiProvider, MetaStore<'a>, SystemClock>;

fn content_cache<'a>(conn: &'a Connection, config: &AppConfig) -> Result<ContentCache<'a>> {
    let provider = GeminiProvider::from_config(&config.provider)?;
    Ok(DailyContentCache::new(provider, MetaStore::new(conn), SystemClock)
        .with_temperature(config.provider.temperature))
}

fn load(conn: &Connection, config: &AppConfig) -> Result<DaySnapshot> {
    tracker::load_today(conn, &config.levels, &SystemClock)
}

/// Load today, apply `change`, save, and print the new daily total.
fn update<F>(conn: &Connection, config: &AppConfig, change: F) -> Result<()>
where
    F: FnOnce(&mut DaySnapshot) -> Result<()>,
{
    let mut snapshot = load(conn, config)?;
    change(&mut snapshot)?;
    tracker::save(conn, &snapshot)?;
    let today = scoring::compute_daily_points(&snapshot.record, snapshot.challenge.as_ref());
    println_colored!(DIM, "  Today: {} hasanat", format_points(today));
    Ok(())
}

fn parse_prayer(s: &str) -> Result<PrayerKey> {
    PrayerKey::from_str(s)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", s))
}

fn tick(done: bool) -> String {
    if done {
        format!("{}✓\x1b[0m", GREEN)
    } else {
        "○".to_string()
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub async fn handle_status(conn: &Connection, config: &AppConfig) -> Result<()> {
    let snapshot = load(conn, config)?;
    let record = &snapshot.record;
    let breakdown = scoring::breakdown(record, snapshot.challenge.as_ref());
    let progress = scoring::compute_progress_percent(record);

    println!();
    println_colored!(GOLD, "  {}  ·  {}", record.level, snapshot.date.format("%A, %b %d, %Y"));
    println!();
    println_colored!(
        BOLD,
        "  Today:     {} hasanat",
        format_points(breakdown.total())
    );
    println!("  All time:  {}", format_points(record.points));
    println!("  Streak:    {} days", record.streak);
    println!(
        "  Prayers:   {} {}%",
        progress_bar(progress as u32, 100, 20),
        progress
    );
    println!();

    print_breakdown(&breakdown);

    let inspiration = content_cache(conn, config)?.fetch_daily_inspiration().await;
    println!();
    println_colored!(AMBER, "  {}", inspiration);
    println!();
    Ok(())
}

fn print_breakdown(b: &PointsBreakdown) {
    let rows = [
        ("Prayers", b.prayers),
        ("Adhkar after prayer", b.adhkar_after_prayer),
        ("Qiyam", b.qiyam),
        ("Witr", b.witr),
        ("Nawafil", b.nawafil),
        ("Good deeds", b.good_deeds),
        ("Adhkar", b.individual_adhkar),
        ("General adhkar", b.general_adhkar),
        ("Challenge", b.challenge),
        ("Qur'an", b.quran),
    ];
    for (label, pts) in rows.iter().filter(|(_, pts)| *pts > 0) {
        println_colored!(DIM, "  {:<22} {:>12}", label, format_points(*pts));
    }
}

// ─── Prayers ─────────────────────────────────────────────────────────────────

pub fn handle_pray(
    conn: &Connection,
    config: &AppConfig,
    prayer: &str,
    jamaah: bool,
    undo: bool,
) -> Result<()> {
    let key = parse_prayer(prayer)?;
    update(conn, config, |s| {
        if undo {
            s.record.set_prayer(key, None);
            println_colored!(DIM, "  ○ {} cleared", key);
            return Ok(());
        }
        let mode = if jamaah { PrayerMode::Jamaah } else { PrayerMode::Alone };
        match s.record.toggle_prayer(key, mode) {
            Some(PrayerMode::Jamaah) => println_colored!(GREEN, "  ✓ {} prayed in jamaah", key),
            Some(PrayerMode::Alone) => println_colored!(GREEN, "  ✓ {} prayed", key),
            None => println_colored!(DIM, "  ○ {} cleared", key),
        }
        Ok(())
    })
}

pub fn handle_adhkar(conn: &Connection, config: &AppConfig, prayer: &str) -> Result<()> {
    let key = parse_prayer(prayer)?;
    update(conn, config, |s| {
        if s.record.toggle_adhkar_after(key) {
            println_colored!(GREEN, "  ✓ Adhkar after {} — done", key);
        } else {
            println_colored!(DIM, "  ○ Adhkar after {} — unmarked", key);
        }
        Ok(())
    })
}

// ─── Dhikr ───────────────────────────────────────────────────────────────────

pub fn handle_dhikr(conn: &Connection, config: &AppConfig, action: &DhikrCommands) -> Result<()> {
    match action {
        DhikrCommands::Toggle { id } => update(conn, config, |s| {
            let done = s.record.toggle_dhikr(id);
            println!("  {} {}", tick(done), id);
            Ok(())
        }),
        DhikrCommands::General { id } => update(conn, config, |s| {
            let done = s.record.toggle_general_dhikr(id);
            println!("  {} {}", tick(done), id);
            Ok(())
        }),
        DhikrCommands::List => {
            let snapshot = load(conn, config)?;
            let record = &snapshot.record;
            println!();
            println_colored!(GOLD, "  Adhkar after prayer");
            for key in PrayerKey::ALL {
                println!("  {:<10}  {}", key.display_name(), tick(record.adhkar_done_after(key)));
            }
            if !record.completed_adhkar_ids.is_empty() {
                println!();
                println_colored!(GOLD, "  Adhkar");
                for (id, done) in &record.completed_adhkar_ids {
                    println!("  {:<30}  {}", id, tick(*done));
                }
            }
            if !record.adhkar.is_empty() {
                println!();
                println_colored!(GOLD, "  General adhkar");
                for (id, done) in &record.adhkar {
                    println!("  {:<30}  {}", id, tick(*done));
                }
            }
            println!();
            Ok(())
        }
    }
}

// ─── Qiyam / nawafil ─────────────────────────────────────────────────────────

pub fn handle_qiyam(conn: &Connection, config: &AppConfig, action: &QiyamCommands) -> Result<()> {
    update(conn, config, |s| {
        let record = &mut s.record;
        match action {
            QiyamCommands::Add => record.add_qiyam(),
            QiyamCommands::Remove => record.remove_qiyam(),
            QiyamCommands::Witr => {
                let done = record.toggle_witr();
                println!("  {} Witr", tick(done));
                return Ok(());
            }
        }
        println_colored!(GREEN, "  Qiyam: {} rak'ahs", record.qiyam_rakats);
        Ok(())
    })
}

pub fn handle_nawafil(conn: &Connection, config: &AppConfig, action: &RakatCommands) -> Result<()> {
    update(conn, config, |s| {
        match action {
            RakatCommands::Add => s.record.add_nawafil(),
            RakatCommands::Remove => s.record.remove_nawafil(),
        }
        println_colored!(GREEN, "  Nawafil: {} rak'ahs", s.record.nawafil_rakats);
        Ok(())
    })
}

// ─── Deeds / Qur'an ──────────────────────────────────────────────────────────

pub fn handle_deed(conn: &Connection, config: &AppConfig, deed: &str) -> Result<()> {
    let deed = GoodDeed::from_str(deed)
        .map_err(|_| anyhow!("Unknown deed '{}'. Use: iftar, sadaqah, general", deed))?;
    update(conn, config, |s| {
        let done = s.record.toggle_good_deed(deed);
        println!("  {} {}", tick(done), deed.display_name());
        Ok(())
    })
}

pub fn handle_quran(
    conn: &Connection,
    config: &AppConfig,
    pages: Option<i64>,
    juz: Option<i64>,
) -> Result<()> {
    if pages.is_none() && juz.is_none() {
        return Err(anyhow!("Nothing to log. Pass --pages and/or --juz"));
    }
    update(conn, config, |s| {
        if let Some(delta) = pages {
            s.record.adjust_quran_pages(delta);
        }
        if let Some(delta) = juz {
            s.record.adjust_quran_juz(delta);
        }
        println_colored!(
            GREEN,
            "  ✓ Qur'an: {} pages, {} juz — {} merit",
            s.record.quran_pages,
            s.record.quran_juz,
            format_points(scoring::compute_quran_merit(&s.record))
        );
        Ok(())
    })
}

// ─── Challenge / inspiration ─────────────────────────────────────────────────

pub async fn handle_challenge(
    conn: &Connection,
    config: &AppConfig,
    action: Option<&ChallengeCommands>,
) -> Result<()> {
    let mut snapshot = load(conn, config)?;

    match action {
        None | Some(ChallengeCommands::Show) => {
            if snapshot.challenge.is_none() {
                let payload = content_cache(conn, config)?
                    .fetch_daily_challenge(snapshot.record.points)
                    .await;
                snapshot.challenge = Some(payload.into());
                tracker::save(conn, &snapshot)?;
            }
        }
        Some(ChallengeCommands::Complete) => {
            let challenge = snapshot
                .challenge
                .as_mut()
                .ok_or_else(|| anyhow!("No challenge taken today. Run `hasanat challenge` first"))?;
            if challenge.complete() {
                tracker::save(conn, &snapshot)?;
                println_colored!(GREEN, "  ✓ Challenge completed");
            } else {
                println_colored!(DIM, "  Challenge already completed today");
            }
        }
    }

    if let Some(challenge) = &snapshot.challenge {
        println!();
        println_colored!(GOLD, "  {}  (+{})", challenge.title, format_points(challenge.points as u64));
        println!("  {}", challenge.description);
        println!("  {}", tick(challenge.completed));
        println!();
    }
    Ok(())
}

pub async fn handle_inspire(conn: &Connection, config: &AppConfig) -> Result<()> {
    let inspiration = content_cache(conn, config)?.fetch_daily_inspiration().await;
    println_colored!(AMBER, "  {}", inspiration);
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

fn slot_label(state: &SlotState) -> &'static str {
    match state {
        SlotState::Fresh(_) => "fresh",
        SlotState::Stale(_) => "stale",
        SlotState::Cold => "empty",
    }
}

pub fn handle_stats(conn: &Connection, config: &AppConfig, week: bool) -> Result<()> {
    let snapshot = load(conn, config)?;
    let today = SystemClock.today();
    let streak = DayLogRepo::calculate_streak(conn, today)?;

    println!();
    println_colored!(GOLD, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Streak:      {} days current  |  {} days best",
        streak.current,
        streak.best
    );
    println!("  Level:       {}", snapshot.record.level);
    println!("  All time:    {} hasanat", format_points(snapshot.record.points));

    let cache = content_cache(conn, config)?;
    println_colored!(
        DIM,
        "  Content:     inspiration {}  ·  challenge {}",
        slot_label(&cache.inspiration_state()),
        slot_label(&cache.challenge_state())
    );

    if week {
        let start = (today - chrono::Duration::days(7)).format("%Y-%m-%d").to_string();
        let end = (today - chrono::Duration::days(1)).format("%Y-%m-%d").to_string();
        let days = DayLogRepo::get_range(conn, &start, &end)?;

        println!();
        println_colored!(DIM, "  Last 7 days");
        println!();
        for day in &days {
            let bar = progress_bar(day.prayers_completed as u32, 5, 5);
            let color = if day.is_full_day() { GREEN } else { AMBER };
            println!(
                "  {}  {}{}\x1b[0m  {}/5  {:>12}",
                day.date,
                color,
                bar,
                day.prayers_completed,
                format_points(day.daily_points)
            );
        }
    }

    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Export<'a> {
    snapshot: &'a DaySnapshot,
    breakdown: PointsBreakdown,
    daily_points: u64,
    quran_merit: u64,
    progress_percent: u8,
}

pub fn handle_export(conn: &Connection, config: &AppConfig) -> Result<()> {
    let snapshot = load(conn, config)?;
    let breakdown = scoring::breakdown(&snapshot.record, snapshot.challenge.as_ref());
    let export = Export {
        snapshot: &snapshot,
        breakdown,
        daily_points: breakdown.total(),
        quran_merit: scoring::compute_quran_merit(&snapshot.record),
        progress_percent: scoring::compute_progress_percent(&snapshot.record),
    };
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}
