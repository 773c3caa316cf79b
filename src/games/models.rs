// src/games/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A pickup game posted by a user
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub sport_type: String,
    pub capacity: i64,
    pub price: f64,
    pub age_bracket: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub created_at: Option<String>,
}

/// Join record: one row per participant
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct GamePlayer {
    pub id: String,
    pub user_id: String,
    pub game_id: String,
    pub joined_at: Option<String>,
}

/// POST /create-game form body.
///
/// Every field arrives as text so that parse failures become field errors
/// instead of a rejected request.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CreateGameForm {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub sport_type: Option<String>,
    pub capacity: Option<String>,
    pub price: Option<String>,
    pub age_bracket: Option<String>,
    pub description: Option<String>,
}

/// Validated game fields ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub sport_type: String,
    pub capacity: i64,
    pub price: f64,
    pub age_bracket: String,
    pub description: Option<String>,
}

/// A game as listed to a particular viewer
#[derive(Serialize, Debug, Clone)]
pub struct GameSummary {
    #[serde(flatten)]
    pub game: Game,
    pub joined_count: i64,
    pub spots_left: i64,
    /// Whether the viewer holds a join record for this game
    pub joined: bool,
}

impl GameSummary {
    pub fn new(game: Game, joined_count: i64, joined: bool) -> Self {
        let spots_left = (game.capacity - joined_count).max(0);
        Self {
            game,
            joined_count,
            spots_left,
            joined,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct AvailableGamesResponse {
    pub games: Vec<GameSummary>,
    pub total: usize,
}
