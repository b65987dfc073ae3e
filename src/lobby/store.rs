use super::model::Lobby;
use crate::error::StoreError;
use sqlx::SqlitePool;
use std::future::Future;

/// Durable lobby storage. Every operation is a single atomic statement;
/// join and create races are settled here rather than by in-process locks.
pub trait LobbyStore: Send + Sync + 'static {
    /// Insert a new lobby. Fails with `DuplicateKey` if the id is taken.
    fn create_lobby(&self, lobby: &Lobby) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_lobby(
        &self,
        lobby_id: &str,
    ) -> impl Future<Output = Result<Option<Lobby>, StoreError>> + Send;

    /// Lobbies without a guest, most recently created first
    fn list_waiting_lobbies(&self) -> impl Future<Output = Result<Vec<Lobby>, StoreError>> + Send;

    /// Fill the guest slot if the lobby exists and the slot is empty.
    /// Returns whether exactly one row changed.
    fn join_lobby(
        &self,
        lobby_id: &str,
        guest_name: &str,
        now: i64,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Overwrite game state and turn. Returns whether exactly one row changed.
    fn update_lobby(
        &self,
        lobby_id: &str,
        game_state: &str,
        current_turn: &str,
        now: i64,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Remove a lobby. Removing an absent lobby is not an error.
    fn delete_lobby(&self, lobby_id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove every lobby last touched before `cutoff`, returning how many went
    fn delete_stale_before(
        &self,
        cutoff: i64,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

#[derive(Clone)]
pub struct SqliteLobbyStore {
    pool: SqlitePool,
}

impl SqliteLobbyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const LOBBY_COLUMNS: &str =
    "lobby_id, host_name, guest_name, game_state, current_turn, created_at, updated_at";

impl LobbyStore for SqliteLobbyStore {
    async fn create_lobby(&self, lobby: &Lobby) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO lobbies \
             (lobby_id, host_name, guest_name, game_state, current_turn, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT (lobby_id) DO NOTHING",
        )
        .bind(&lobby.lobby_id)
        .bind(&lobby.host_name)
        .bind(&lobby.guest_name)
        .bind(&lobby.game_state)
        .bind(&lobby.current_turn)
        .bind(lobby.created_at)
        .bind(lobby.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateKey(lobby.lobby_id.clone()));
        }
        Ok(())
    }

    async fn get_lobby(&self, lobby_id: &str) -> Result<Option<Lobby>, StoreError> {
        let query = format!("SELECT {LOBBY_COLUMNS} FROM lobbies WHERE lobby_id = ?1");
        let lobby = sqlx::query_as::<_, Lobby>(&query)
            .bind(lobby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lobby)
    }

    async fn list_waiting_lobbies(&self) -> Result<Vec<Lobby>, StoreError> {
        let query = format!(
            "SELECT {LOBBY_COLUMNS} FROM lobbies \
             WHERE guest_name IS NULL \
             ORDER BY created_at DESC, rowid DESC"
        );
        let lobbies = sqlx::query_as::<_, Lobby>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(lobbies)
    }

    async fn join_lobby(
        &self,
        lobby_id: &str,
        guest_name: &str,
        now: i64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE lobbies \
             SET guest_name = ?1, updated_at = MAX(?2, updated_at + 1) \
             WHERE lobby_id = ?3 AND guest_name IS NULL",
        )
        .bind(guest_name)
        .bind(now)
        .bind(lobby_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn update_lobby(
        &self,
        lobby_id: &str,
        game_state: &str,
        current_turn: &str,
        now: i64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE lobbies \
             SET game_state = ?1, current_turn = ?2, updated_at = MAX(?3, updated_at + 1) \
             WHERE lobby_id = ?4",
        )
        .bind(game_state)
        .bind(current_turn)
        .bind(now)
        .bind(lobby_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_lobby(&self, lobby_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM lobbies WHERE lobby_id = ?1")
            .bind(lobby_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_stale_before(&self, cutoff: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM lobbies WHERE updated_at < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
