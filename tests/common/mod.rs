use serde_json::Value;
use sqlx::SqlitePool;
use tokio::net::TcpListener;

pub struct TestServer {
    base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    pub async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.put(self.url(path)).json(&body).send().await.unwrap()
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    /// Ids of the lobbies currently open for joining, in listing order
    pub async fn open_lobby_ids(&self) -> Vec<String> {
        let response = self.get("/lobbies").await;
        assert!(response.status().is_success());

        let body: Value = response.json().await.unwrap();
        body.as_array()
            .unwrap()
            .iter()
            .map(|lobby| lobby["lobby_id"].as_str().unwrap().to_string())
            .collect()
    }
}

pub async fn spawn_test_server(pool: SqlitePool) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let app = lobbyd::app(pool);
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }
}

pub fn create_body(lobby_id: &str, player_name: &str, game_state: &str) -> Value {
    serde_json::json!({
        "lobby_id": lobby_id,
        "player_name": player_name,
        "game_state": game_state,
    })
}
