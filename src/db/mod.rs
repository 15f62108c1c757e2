//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for registrations and admin sessions.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id TEXT PRIMARY KEY,
            team_name TEXT NOT NULL,
            leader_name TEXT NOT NULL,
            leader_email TEXT NOT NULL,
            leader_whats_app TEXT NOT NULL,
            leader_roll_number TEXT NOT NULL,
            leader_residency TEXT NOT NULL,
            leader_mess_food INTEGER,
            leader_course TEXT,
            leader_batch TEXT,
            members TEXT NOT NULL DEFAULT '[]',
            is_checked_in INTEGER NOT NULL DEFAULT 0,
            room_number TEXT,
            allocated_team_id TEXT,
            problem_statement TEXT,
            github_repo TEXT,
            extension_board_given INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_teams_created_at ON teams(created_at);
        CREATE INDEX IF NOT EXISTS idx_teams_name ON teams(team_name COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_teams_board ON teams(trim(allocated_team_id))
            WHERE allocated_team_id IS NOT NULL AND trim(allocated_team_id) != '';
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
