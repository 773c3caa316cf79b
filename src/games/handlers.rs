// src/games/handlers.rs

use axum::extract::{Extension, Form, Json, Path};
use axum::response::Redirect;
use std::sync::Arc;
use tracing::{debug, info};

use super::models::{AvailableGamesResponse, CreateGameForm};
use super::services::GamesService;
use super::validators::parse_game_form;
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState, FormDescriptor};

/// GET /create-game
pub async fn create_game_form(_authed: AuthedUser) -> Json<FormDescriptor> {
    Json(
        FormDescriptor::post("create-game", "/create-game")
            .field("name", "Name", "text")
            .field("date", "Date (YYYY-MM-DD)", "date")
            .field("time", "Time (HH:MM)", "time")
            .field("location", "Location", "text")
            .field("sport_type", "Sport type", "text")
            .field("capacity", "Capacity", "number")
            .field("price", "Price", "number")
            .field("age_bracket", "Age bracket", "text")
            .optional_field("description", "Description", "textarea"),
    )
}

/// POST /create-game
pub async fn create_game(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Form(form): Form<CreateGameForm>,
) -> Result<Redirect, ApiError> {
    let new_game = parse_game_form(&form).map_err(|result| {
        info!(
            user = %safe_email_log(&authed.email),
            errors = result.errors.len(),
            "Create game rejected: invalid form"
        );
        ApiError::from(result)
    })?;

    GamesService::new(state.db.clone())
        .create_game(&authed.user_id, new_game)
        .await?;

    Ok(Redirect::to("/available-games"))
}

/// GET /available-games
pub async fn available_games(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<AvailableGamesResponse>, ApiError> {
    let games = GamesService::new(state.db.clone())
        .list_available(&authed.user_id)
        .await?;

    debug!(user_id = %authed.user_id, count = games.len(), "Listed available games");

    Ok(Json(AvailableGamesResponse {
        total: games.len(),
        games,
    }))
}

/// POST /join-game/:id
pub async fn join_game(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(game_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let player = GamesService::new(state.db.clone())
        .join_game(&authed.user_id, &game_id)
        .await?;

    debug!(player_id = %player.id, user_id = %authed.user_id, game_id = %game_id, "Join recorded");

    Ok(Redirect::to("/available-games"))
}
