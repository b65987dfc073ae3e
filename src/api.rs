use crate::error::LobbyError;
use crate::lobby::{CreateLobby, Lobby, LobbyManager, LobbyStore};
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

pub struct AppState<S> {
    pub lobbies: Arc<LobbyManager<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            lobbies: self.lobbies.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateLobbyRequest {
    pub lobby_id: Option<String>,
    pub player_name: Option<String>,
    pub game_state: Option<String>,
    pub current_turn: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JoinLobbyRequest {
    pub player_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLobbyRequest {
    pub game_state: Option<String>,
    pub current_turn: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedLobby {
    pub lobby_id: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

const SUCCESS: Json<Success> = Json(Success { success: true });

/// Unwrap a JSON body, reporting undecodable input as a validation failure
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, LobbyError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| LobbyError::Validation(rejection.body_text()))
}

/// Same for the `lobby_id` path segment, e.g. when it decodes to invalid UTF-8
fn path_lobby_id(path: Result<Path<String>, PathRejection>) -> Result<String, LobbyError> {
    path.map(|Path(lobby_id)| lobby_id)
        .map_err(|rejection| LobbyError::Validation(rejection.body_text()))
}

async fn health() -> &'static str {
    "ok"
}

async fn create_lobby<S: LobbyStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateLobbyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, LobbyError> {
    let req = body(payload)?;
    let lobby = state
        .lobbies
        .create(CreateLobby {
            lobby_id: req.lobby_id,
            player_name: req.player_name,
            game_state: req.game_state,
            current_turn: req.current_turn,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedLobby {
            status: lobby.status().as_str(),
            lobby_id: lobby.lobby_id,
        }),
    ))
}

async fn list_lobbies<S: LobbyStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Lobby>>, LobbyError> {
    Ok(Json(state.lobbies.list_open().await?))
}

async fn join_lobby<S: LobbyStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<JoinLobbyRequest>, JsonRejection>,
) -> Result<Json<Success>, LobbyError> {
    let lobby_id = path_lobby_id(path)?;
    let req = body(payload)?;
    state.lobbies.join(&lobby_id, req.player_name).await?;
    Ok(SUCCESS)
}

async fn update_lobby<S: LobbyStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateLobbyRequest>, JsonRejection>,
) -> Result<Json<Success>, LobbyError> {
    let lobby_id = path_lobby_id(path)?;
    let req = body(payload)?;
    match state
        .lobbies
        .update_state(&lobby_id, req.game_state, req.current_turn)
        .await
    {
        Ok(()) => Ok(SUCCESS),
        // Updates to unknown lobbies are reported as successful no-ops
        Err(LobbyError::NotFound(_)) => {
            debug!(lobby_id, "Update matched no lobby");
            Ok(SUCCESS)
        }
        Err(e) => Err(e),
    }
}

async fn get_lobby<S: LobbyStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Lobby>, LobbyError> {
    let lobby_id = path_lobby_id(path)?;
    Ok(Json(state.lobbies.fetch(&lobby_id).await?))
}

async fn delete_lobby<S: LobbyStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Success>, LobbyError> {
    let lobby_id = path_lobby_id(path)?;
    state.lobbies.delete(&lobby_id).await?;
    Ok(SUCCESS)
}

pub fn router<S: LobbyStore>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/lobbies", get(list_lobbies::<S>).post(create_lobby::<S>))
        .route(
            "/lobbies/:lobby_id",
            get(get_lobby::<S>)
                .put(update_lobby::<S>)
                .delete(delete_lobby::<S>),
        )
        .route("/lobbies/:lobby_id/join", post(join_lobby::<S>))
        .layer(cors)
        .with_state(state)
}
