use super::model::{DEFAULT_TURN, Lobby};
use super::store::LobbyStore;
use crate::error::LobbyError;
use tracing::{debug, info};

/// Current wall-clock time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Host request to open a lobby. `None` and blank fields count as missing;
/// `game_state` is opaque, so only an empty string counts as blank there.
#[derive(Debug, Default)]
pub struct CreateLobby {
    pub lobby_id: Option<String>,
    pub player_name: Option<String>,
    pub game_state: Option<String>,
    pub current_turn: Option<String>,
}

/// Drives the waiting -> playing -> gone lifecycle on top of a store.
/// Holds no lobby state of its own; every call goes to the store.
pub struct LobbyManager<S> {
    store: S,
    default_turn: String,
}

impl<S: LobbyStore> LobbyManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_turn: DEFAULT_TURN.to_string(),
        }
    }

    pub async fn create(&self, request: CreateLobby) -> Result<Lobby, LobbyError> {
        let lobby_id = required(request.lobby_id, "lobby_id")?;
        let host_name = required(request.player_name, "player_name")?;
        let game_state = required_payload(request.game_state, "game_state")?;
        let current_turn = request
            .current_turn
            .filter(|turn| !turn.trim().is_empty())
            .unwrap_or_else(|| self.default_turn.clone());

        let lobby = Lobby::new(lobby_id, host_name, game_state, current_turn, now_millis());
        self.store.create_lobby(&lobby).await?;

        info!(
            lobby_id = lobby.lobby_id,
            host = lobby.host_name,
            "Created lobby"
        );
        Ok(lobby)
    }

    pub async fn list_open(&self) -> Result<Vec<Lobby>, LobbyError> {
        let lobbies = self.store.list_waiting_lobbies().await?;
        debug!(count = lobbies.len(), "Listed open lobbies");
        Ok(lobbies)
    }

    /// Take the guest seat. Only one of several concurrent joins can win.
    pub async fn join(&self, lobby_id: &str, guest_name: Option<String>) -> Result<(), LobbyError> {
        let lobby_id = required_ref(lobby_id, "lobby_id")?;
        let guest_name = required(guest_name, "player_name")?;

        if !self
            .store
            .join_lobby(lobby_id, &guest_name, now_millis())
            .await?
        {
            info!(lobby_id, guest = guest_name, "Join rejected");
            return Err(LobbyError::NotJoinable(lobby_id.to_string()));
        }

        info!(lobby_id, guest = guest_name, "Guest joined lobby");
        Ok(())
    }

    /// Overwrite the game payload and turn token verbatim. Last writer wins.
    pub async fn update_state(
        &self,
        lobby_id: &str,
        game_state: Option<String>,
        current_turn: Option<String>,
    ) -> Result<(), LobbyError> {
        let lobby_id = required_ref(lobby_id, "lobby_id")?;
        let game_state = required_payload(game_state, "game_state")?;
        let current_turn = required(current_turn, "current_turn")?;

        if !self
            .store
            .update_lobby(lobby_id, &game_state, &current_turn, now_millis())
            .await?
        {
            return Err(LobbyError::NotFound(lobby_id.to_string()));
        }

        info!(lobby_id, current_turn, "Updated lobby state");
        Ok(())
    }

    pub async fn fetch(&self, lobby_id: &str) -> Result<Lobby, LobbyError> {
        let lobby_id = required_ref(lobby_id, "lobby_id")?;
        self.store
            .get_lobby(lobby_id)
            .await?
            .ok_or_else(|| LobbyError::NotFound(lobby_id.to_string()))
    }

    /// Succeeds whether or not the lobby existed
    pub async fn delete(&self, lobby_id: &str) -> Result<(), LobbyError> {
        let lobby_id = required_ref(lobby_id, "lobby_id")?;
        self.store.delete_lobby(lobby_id).await?;
        info!(lobby_id, "Deleted lobby");
        Ok(())
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, LobbyError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LobbyError::Validation(format!("{field} is required"))),
    }
}

fn required_payload(value: Option<String>, field: &str) -> Result<String, LobbyError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LobbyError::Validation(format!("{field} is required"))),
    }
}

fn required_ref<'a>(value: &'a str, field: &str) -> Result<&'a str, LobbyError> {
    if value.trim().is_empty() {
        return Err(LobbyError::Validation(format!("{field} is required")));
    }
    Ok(value)
}
