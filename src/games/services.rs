use chrono::{SecondsFormat, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{info, warn};

use super::models::{Game, GamePlayer, GameSummary, NewGame};
use crate::common::error::is_unique_violation;
use crate::common::{generate_game_id, generate_game_player_id, ApiError};

const GAME_COLUMNS: &str = "g.id AS id, g.name AS name, g.date AS date, g.time AS time, \
     g.location AS location, g.sport_type AS sport_type, g.capacity AS capacity, \
     g.price AS price, g.age_bracket AS age_bracket, g.description AS description, \
     g.creator_id AS creator_id, g.created_at AS created_at";

/// Game row with its participant count and the viewer's join flag
#[derive(FromRow)]
struct GameWithCounts {
    #[sqlx(flatten)]
    game: Game,
    joined_count: i64,
    joined: bool,
}

impl From<GameWithCounts> for GameSummary {
    fn from(row: GameWithCounts) -> Self {
        GameSummary::new(row.game, row.joined_count, row.joined)
    }
}

pub struct GamesService {
    db: SqlitePool,
}

impl GamesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Persist a validated game owned by `creator_id`
    pub async fn create_game(&self, creator_id: &str, new_game: NewGame) -> Result<Game, ApiError> {
        let game_id = generate_game_id();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        sqlx::query(
            r#"
            INSERT INTO games (
                id, name, date, time, location, sport_type, capacity, price,
                age_bracket, description, creator_id, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&game_id)
        .bind(&new_game.name)
        .bind(&new_game.date)
        .bind(&new_game.time)
        .bind(&new_game.location)
        .bind(&new_game.sport_type)
        .bind(new_game.capacity)
        .bind(new_game.price)
        .bind(&new_game.age_bracket)
        .bind(&new_game.description)
        .bind(creator_id)
        .bind(&now)
        .execute(&self.db)
        .await?;

        info!(
            game_id = %game_id,
            creator_id = %creator_id,
            capacity = new_game.capacity,
            "Game created"
        );

        self.get_game(&game_id).await
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Game, ApiError> {
        sqlx::query_as::<_, Game>(&format!("SELECT {} FROM games g WHERE g.id = ?", GAME_COLUMNS))
            .bind(game_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))
    }

    /// Every game, ordered by date then time, annotated for `viewer_id`
    pub async fn list_available(&self, viewer_id: &str) -> Result<Vec<GameSummary>, ApiError> {
        self.list_where("1 = 1", viewer_id, None).await
    }

    /// Games created by `user_id`
    pub async fn list_created_by(&self, user_id: &str) -> Result<Vec<GameSummary>, ApiError> {
        self.list_where("g.creator_id = ?", user_id, Some(user_id))
            .await
    }

    /// Games `user_id` has joined
    pub async fn list_joined_by(&self, user_id: &str) -> Result<Vec<GameSummary>, ApiError> {
        self.list_where(
            "EXISTS (SELECT 1 FROM game_players jp WHERE jp.game_id = g.id AND jp.user_id = ?)",
            user_id,
            Some(user_id),
        )
        .await
    }

    async fn list_where(
        &self,
        filter: &str,
        viewer_id: &str,
        filter_arg: Option<&str>,
    ) -> Result<Vec<GameSummary>, ApiError> {
        let sql = format!(
            r#"
            SELECT {},
                   (SELECT COUNT(*) FROM game_players p WHERE p.game_id = g.id) AS joined_count,
                   EXISTS (
                       SELECT 1 FROM game_players p WHERE p.game_id = g.id AND p.user_id = ?
                   ) AS joined
            FROM games g
            WHERE {}
            ORDER BY g.date ASC, g.time ASC, g.created_at ASC
            "#,
            GAME_COLUMNS, filter
        );

        let mut query = sqlx::query_as::<_, GameWithCounts>(&sql).bind(viewer_id);
        if let Some(arg) = filter_arg {
            query = query.bind(arg);
        }

        let rows = query.fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(GameSummary::from).collect())
    }

    async fn has_joined(&self, user_id: &str, game_id: &str) -> Result<bool, ApiError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT id FROM game_players WHERE user_id = ? AND game_id = ?")
                .bind(user_id)
                .bind(game_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(row.is_some())
    }

    /// Add `user_id` to a game.
    ///
    /// The capacity check and the insert are one statement, and the
    /// `(user_id, game_id)` pair is UNIQUE, so concurrent joins can neither
    /// overfill a game nor duplicate a participant.
    pub async fn join_game(&self, user_id: &str, game_id: &str) -> Result<GamePlayer, ApiError> {
        let game = self.get_game(game_id).await?;

        if self.has_joined(user_id, game_id).await? {
            info!(user_id = %user_id, game_id = %game_id, "Join rejected: already joined");
            return Err(ApiError::AlreadyJoined);
        }

        let player = GamePlayer {
            id: generate_game_player_id(),
            user_id: user_id.to_string(),
            game_id: game.id.clone(),
            joined_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO game_players (id, user_id, game_id, joined_at)
            SELECT ?, ?, ?, ?
            WHERE (SELECT COUNT(*) FROM game_players WHERE game_id = ?)
                < (SELECT capacity FROM games WHERE id = ?)
            "#,
        )
        .bind(&player.id)
        .bind(&player.user_id)
        .bind(&player.game_id)
        .bind(&player.joined_at)
        .bind(&game.id)
        .bind(&game.id)
        .execute(&self.db)
        .await;

        match inserted {
            Ok(result) if result.rows_affected() == 0 => {
                info!(user_id = %user_id, game_id = %game_id, capacity = game.capacity, "Join rejected: game full");
                Err(ApiError::GameFull)
            }
            Ok(_) => {
                info!(user_id = %user_id, game_id = %game_id, "User joined game");
                Ok(player)
            }
            Err(e) if is_unique_violation(&e) => {
                // Lost a race against the same user's other request
                if self.has_joined(user_id, game_id).await? {
                    warn!(user_id = %user_id, game_id = %game_id, "Concurrent duplicate join rejected");
                    Err(ApiError::AlreadyJoined)
                } else {
                    Err(ApiError::DatabaseError(e))
                }
            }
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }
}
