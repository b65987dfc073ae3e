use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Failures of the durable lobby table
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lobby {0} already exists")]
    DuplicateKey(String),

    #[error("lobby store unavailable: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcomes of a lobby lifecycle operation that did not succeed
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    #[error("{0}")]
    Validation(String),

    #[error("lobby {0} already exists")]
    DuplicateKey(String),

    #[error("lobby {0} is full or does not exist")]
    NotJoinable(String),

    #[error("lobby {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LobbyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(lobby_id) => LobbyError::DuplicateKey(lobby_id),
            other => LobbyError::Store(other),
        }
    }
}

impl LobbyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LobbyError::Validation(_) => StatusCode::BAD_REQUEST,
            LobbyError::DuplicateKey(_) => StatusCode::CONFLICT,
            LobbyError::NotJoinable(_) | LobbyError::NotFound(_) => StatusCode::NOT_FOUND,
            LobbyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LobbyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            LobbyError::Store(err) => {
                error!(error = %err, "Lobby store failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
