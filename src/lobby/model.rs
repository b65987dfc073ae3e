use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Turn token assigned when the host doesn't pick one
pub const DEFAULT_TURN: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyStatus {
    Waiting,
    Playing,
}

impl LobbyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LobbyStatus::Waiting => "waiting",
            LobbyStatus::Playing => "playing",
        }
    }
}

/// A lobby row. Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Lobby {
    pub lobby_id: String,
    pub host_name: String,
    pub guest_name: Option<String>,
    pub game_state: String,
    pub current_turn: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lobby {
    pub fn new(
        lobby_id: impl Into<String>,
        host_name: impl Into<String>,
        game_state: impl Into<String>,
        current_turn: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            lobby_id: lobby_id.into(),
            host_name: host_name.into(),
            guest_name: None,
            game_state: game_state.into(),
            current_turn: current_turn.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived from guest presence, never stored
    pub fn status(&self) -> LobbyStatus {
        match self.guest_name {
            Some(_) => LobbyStatus::Playing,
            None => LobbyStatus::Waiting,
        }
    }
}

impl Serialize for Lobby {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Lobby", 8)?;
        state.serialize_field("lobby_id", &self.lobby_id)?;
        state.serialize_field("host_name", &self.host_name)?;
        state.serialize_field("guest_name", &self.guest_name)?;
        state.serialize_field("game_state", &self.game_state)?;
        state.serialize_field("current_turn", &self.current_turn)?;
        state.serialize_field("status", self.status().as_str())?;
        state.serialize_field("created_at", &self.created_at)?;
        state.serialize_field("updated_at", &self.updated_at)?;
        state.end()
    }
}
