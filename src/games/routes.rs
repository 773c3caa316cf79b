// src/games/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the games router; every route requires a session
pub fn games_routes() -> Router {
    Router::new()
        .route(
            "/create-game",
            get(handlers::create_game_form).post(handlers::create_game),
        )
        .route("/available-games", get(handlers::available_games))
        .route("/join-game/:id", post(handlers::join_game))
}
