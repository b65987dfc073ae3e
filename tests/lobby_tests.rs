mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{Value, json};
use sqlx::SqlitePool;

#[sqlx::test]
async fn lobby_list_is_empty_without_lobbies(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;

    assert!(server.open_lobby_ids().await.is_empty());
}

#[sqlx::test]
async fn full_match_lifecycle(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;

    // Host opens a lobby
    let response = server.post("/lobbies", create_body("L1", "Alice", "{}")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "lobby_id": "L1", "status": "waiting" }));

    assert!(server.open_lobby_ids().await.contains(&"L1".to_string()));

    // Guest takes the seat
    let response = server
        .post("/lobbies/L1/join", json!({ "player_name": "Bob" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    assert!(!server.open_lobby_ids().await.contains(&"L1".to_string()));

    // Push a move
    let response = server
        .put(
            "/lobbies/L1",
            json!({ "game_state": "{turn:2}", "current_turn": "blue" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get("/lobbies/L1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let lobby: Value = response.json().await.unwrap();
    assert_eq!(lobby["game_state"], "{turn:2}");
    assert_eq!(lobby["current_turn"], "blue");
    assert_eq!(lobby["guest_name"], "Bob");
    assert_eq!(lobby["status"], "playing");

    // Match over
    let response = server.delete("/lobbies/L1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get("/lobbies/L1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[sqlx::test]
async fn open_lobbies_are_listed_newest_first(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;

    for id in ["first", "second", "third"] {
        let response = server.post("/lobbies", create_body(id, "Alice", "{}")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    assert_eq!(server.open_lobby_ids().await, vec!["third", "second", "first"]);
}

#[sqlx::test]
async fn duplicate_lobby_is_rejected_without_changes(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;
    server.post("/lobbies", create_body("L1", "Alice", "{}")).await;

    let response = server
        .post("/lobbies", create_body("L1", "Mallory", "{\"cheat\":true}"))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let lobby: Value = server.get("/lobbies/L1").await.json().await.unwrap();
    assert_eq!(lobby["host_name"], "Alice");
    assert_eq!(lobby["game_state"], "{}");
}

#[sqlx::test]
async fn concurrent_creates_with_same_id_keep_one_host(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;

    let (alice, mallory) = tokio::join!(
        server.post("/lobbies", create_body("L1", "Alice", "{}")),
        server.post("/lobbies", create_body("L1", "Mallory", "{}")),
    );

    let winner = match (alice.status().as_u16(), mallory.status().as_u16()) {
        (201, 409) => "Alice",
        (409, 201) => "Mallory",
        other => panic!("expected one 201 and one 409, got {other:?}"),
    };

    let lobby: Value = server.get("/lobbies/L1").await.json().await.unwrap();
    assert_eq!(lobby["host_name"], winner);
    assert_eq!(server.open_lobby_ids().await, vec!["L1"]);
}

#[sqlx::test]
async fn concurrent_joins_seat_exactly_one_guest(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;
    server.post("/lobbies", create_body("L1", "Alice", "{}")).await;

    let (bob, carol) = tokio::join!(
        server.post("/lobbies/L1/join", json!({ "player_name": "Bob" })),
        server.post("/lobbies/L1/join", json!({ "player_name": "Carol" })),
    );

    let mut statuses = vec![bob.status().as_u16(), carol.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 404]);

    let lobby: Value = server.get("/lobbies/L1").await.json().await.unwrap();
    assert!(lobby["guest_name"] == "Bob" || lobby["guest_name"] == "Carol");
}

#[sqlx::test]
async fn join_without_player_name_is_bad_request(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;
    server.post("/lobbies", create_body("L1", "Alice", "{}")).await;

    let response = server.post("/lobbies/L1/join", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.open_lobby_ids().await.contains(&"L1".to_string()));
}

#[sqlx::test]
async fn deleting_unknown_lobby_succeeds(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;

    let response = server.delete("/lobbies/ghost").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));
}

#[sqlx::test]
async fn cors_preflight_is_allowed(pool: SqlitePool) {
    let server = spawn_test_server(pool).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/lobbies"))
        .header("Origin", "https://game.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
