// src/common/migrations.rs
//! Database schema management: tables are created on startup if absent

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Create every table and index the application needs.
///
/// With `reset` set, all tables are dropped first (RESET_DB=true).
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        drop_all_tables(pool).await?;
    } else {
        info!("Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_user_tables(pool).await?;
    create_game_tables(pool).await?;
    create_session_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database schema ready");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Reverse dependency order
    let tables = ["oauth_states", "sessions", "game_players", "games", "users"];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            surname TEXT NOT NULL DEFAULT '',
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            google_id TEXT,
            picture TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_game_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            location TEXT NOT NULL,
            sport_type TEXT NOT NULL,
            capacity INTEGER NOT NULL CHECK (capacity > 0),
            price REAL NOT NULL CHECK (price >= 0),
            age_bracket TEXT NOT NULL,
            description TEXT,
            creator_id TEXT NOT NULL,
            created_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY(creator_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_players (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            game_id TEXT NOT NULL,
            joined_at TEXT DEFAULT (datetime('now')),
            UNIQUE(user_id, game_id),
            FOREIGN KEY(user_id) REFERENCES users(id),
            FOREIGN KEY(game_id) REFERENCES games(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_session_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            email TEXT NOT NULL,
            name TEXT,
            picture TEXT,
            google_id TEXT,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS oauth_states (
            state TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_games_creator_id ON games(creator_id)",
        "CREATE INDEX IF NOT EXISTS idx_games_date ON games(date, time)",
        "CREATE INDEX IF NOT EXISTS idx_game_players_game_id ON game_players(game_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::setup_test_db;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = setup_test_db().await;

        // Second run must not fail on existing tables
        run_migrations(&pool, false).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        assert_eq!(
            names,
            vec!["game_players", "games", "oauth_states", "sessions", "users"]
        );
    }

    #[tokio::test]
    async fn test_capacity_check_constraint() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ('U_1', 'A', 'a@x.com', 'h')")
            .execute(&pool)
            .await
            .unwrap();

        let result = sqlx::query(
            r#"
            INSERT INTO games (id, name, date, time, location, sport_type, capacity, price, age_bracket, creator_id)
            VALUES ('G_1', 'Bad', '2030-01-01', '18:00', 'Park', 'football', 0, 0, '18+', 'U_1')
            "#,
        )
        .execute(&pool)
        .await;

        assert!(result.is_err(), "capacity 0 should violate the CHECK constraint");
    }

    #[tokio::test]
    async fn test_reset_drops_rows() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ('U_1', 'A', 'a@x.com', 'h')")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool, true).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
