use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use tracing::info;

/// Open the lobby database, creating it if needed, and bring the schema up to date
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    sqlx::migrate!().run(&pool).await?;
    info!(database_url, "Database ready");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    #[sqlx::test]
    async fn migrations_create_lobby_table(pool: SqlitePool) {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lobbies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[sqlx::test]
    async fn lobby_id_is_unique(pool: SqlitePool) {
        let insert = "INSERT INTO lobbies \
            (lobby_id, host_name, game_state, current_turn, created_at, updated_at) \
            VALUES ('L1', 'Alice', '{}', 'red', 0, 0)";

        sqlx::query(insert).execute(&pool).await.unwrap();
        assert!(sqlx::query(insert).execute(&pool).await.is_err());
    }
}
