pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod lobby;
pub mod logging;
pub mod tls;

use api::AppState;
use axum::Router;
use lobby::{LobbyManager, LobbyStore, SqliteLobbyStore};
use sqlx::SqlitePool;
use std::sync::Arc;

pub fn app(pool: SqlitePool) -> Router {
    app_with_store(SqliteLobbyStore::new(pool))
}

pub fn app_with_store<S: LobbyStore>(store: S) -> Router {
    let state = AppState {
        lobbies: Arc::new(LobbyManager::new(store)),
    };
    api::router(state)
}
