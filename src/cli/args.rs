use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hasanat", version, author, about = "Turn your daily worship into hasanat, streaks and levels")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Today's score, progress, streak and inspiration
    Status,
    /// Mark an obligatory prayer (pressing the same mode again clears it)
    Pray {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
        /// Prayed in congregation
        #[arg(long)]
        jamaah: bool,
        /// Clear the prayer for today
        #[arg(long, conflicts_with = "jamaah")]
        undo: bool,
    },
    /// Toggle the adhkar said after a prayer
    Adhkar {
        /// Prayer name
        prayer: String,
    },
    /// Individual and general remembrances
    Dhikr {
        #[command(subcommand)]
        action: DhikrCommands,
    },
    /// Night prayer
    Qiyam {
        #[command(subcommand)]
        action: QiyamCommands,
    },
    /// Voluntary prayer
    Nawafil {
        #[command(subcommand)]
        action: RakatCommands,
    },
    /// Toggle a good deed
    Deed {
        /// iftar, sadaqah or general
        deed: String,
    },
    /// Adjust Qur'an reading (use negative numbers to correct)
    Quran {
        /// Pages to add
        #[arg(long, allow_hyphen_values = true)]
        pages: Option<i64>,
        /// Juz to add
        #[arg(long, allow_hyphen_values = true)]
        juz: Option<i64>,
    },
    /// Today's challenge
    Challenge {
        #[command(subcommand)]
        action: Option<ChallengeCommands>,
    },
    /// Print today's inspiration
    Inspire,
    /// Show statistics
    Stats {
        /// Show the last 7 logged days
        #[arg(long)]
        week: bool,
    },
    /// Print today's snapshot and scores as JSON
    Export,
}

#[derive(Subcommand, Debug)]
pub enum DhikrCommands {
    /// Toggle an individual remembrance by id
    Toggle {
        id: String,
    },
    /// Toggle a general remembrance (e.g. morning, evening) by id
    General {
        id: String,
    },
    /// List today's remembrances
    List,
}

#[derive(Subcommand, Debug)]
pub enum RakatCommands {
    /// Add two rak'ahs
    Add,
    /// Remove two rak'ahs
    Remove,
}

#[derive(Subcommand, Debug)]
pub enum QiyamCommands {
    /// Add two rak'ahs
    Add,
    /// Remove two rak'ahs
    Remove,
    /// Toggle witr
    Witr,
}

#[derive(Subcommand, Debug)]
pub enum ChallengeCommands {
    /// Show today's challenge
    Show,
    /// Mark today's challenge as completed
    Complete,
}

