mod cli;
mod config;
mod content;
mod db;
mod models;
mod scoring;
mod tracker;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => handlers::handle_status(&conn, &config).await?,
        Commands::Pray { prayer, jamaah, undo } => {
            handlers::handle_pray(&conn, &config, &prayer, jamaah, undo)?;
        }
        Commands::Adhkar { prayer } => handlers::handle_adhkar(&conn, &config, &prayer)?,
        Commands::Dhikr { action } => handlers::handle_dhikr(&conn, &config, &action)?,
        Commands::Qiyam { action } => handlers::handle_qiyam(&conn, &config, &action)?,
        Commands::Nawafil { action } => handlers::handle_nawafil(&conn, &config, &action)?,
        Commands::Deed { deed } => handlers::handle_deed(&conn, &config, &deed)?,
        Commands::Quran { pages, juz } => handlers::handle_quran(&conn, &config, pages, juz)?,
        Commands::Challenge { action } => {
            handlers::handle_challenge(&conn, &config, action.as_ref()).await?;
        }
        Commands::Inspire => handlers::handle_inspire(&conn, &config).await?,
        Commands::Stats { week } => handlers::handle_stats(&conn, &config, week)?,
        Commands::Export => handlers::handle_export(&conn, &config)?,
    }

    Ok(())
}
