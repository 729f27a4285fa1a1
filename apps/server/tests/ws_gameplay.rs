use std::sync::Arc;

use actix_web::{web, App};
use cardserver::config::settings::BotTiming;
use cardserver::persistence::memory::InMemoryRepository;
use cardserver::persistence::Repository;
use cardserver::routes;
use cardserver::state::app_state::AppState;
use cardserver::ws::session::upgrade;
use futures_util::{SinkExt, StreamExt};

fn test_state() -> AppState {
    let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
    AppState::new(repo, BotTiming::default())
}

#[actix_web::test]
async fn identify_and_request_state_round_trip() {
    let app_state = test_state();
    let server = actix_test::start(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .route("/ws/{session_id}", web::get().to(upgrade))
            .configure(routes::configure)
    });

    let client = awc::Client::new();
    let created: serde_json::Value = client
        .post(server.url("/sessions"))
        .send_json(&serde_json::json!({ "mode": "twenty8" }))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    client
        .post(server.url(&format!("/sessions/{id}/players")))
        .send_json(&serde_json::json!({ "player_id": "alice", "display_name": "Alice" }))
        .await
        .unwrap();

    let (_resp, mut conn) = client
        .ws(server.url(&format!("/ws/{id}")))
        .connect()
        .await
        .unwrap();

    conn.send(awc::ws::Message::Text(
        serde_json::json!({ "type": "identify", "payload": { "seat": 0, "player_id": "alice" } })
            .to_string()
            .into(),
    ))
    .await
    .unwrap();

    let frame = conn.next().await.unwrap().unwrap();
    let text = match frame {
        awc::ws::Frame::Text(bytes) => String::from_utf8(bytes.to_vec()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    };
    let msg: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(msg["type"], "action_ok");
    assert_eq!(msg["payload"]["action"], "identify");
}

#[actix_web::test]
async fn unknown_session_id_rejects_the_upgrade() {
    let app_state = test_state();
    let server = actix_test::start(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .route("/ws/{session_id}", web::get().to(upgrade))
    });

    let client = awc::Client::new();
    let result = client
        .ws(server.url("/ws/00000000-0000-0000-0000-000000000000"))
        .connect()
        .await;
    assert!(result.is_err());
}
