mod manager;
mod model;
mod store;
mod sweeper;

pub use manager::{CreateLobby, LobbyManager, now_millis};
pub use model::{DEFAULT_TURN, Lobby, LobbyStatus};
pub use store::{LobbyStore, SqliteLobbyStore};
pub use sweeper::{spawn_sweeper, sweep_once};
