use std::sync::Arc;

use actix_web::{test, web, App};
use cardserver::config::settings::BotTiming;
use cardserver::persistence::memory::InMemoryRepository;
use cardserver::persistence::Repository;
use cardserver::routes;
use cardserver::state::app_state::AppState;

fn test_state() -> AppState {
    let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
    AppState::new(repo, BotTiming::default())
}

#[actix_web::test]
async fn create_session_returns_id_and_short_code() {
    let app_state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(serde_json::json!({ "mode": "twenty8" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["id"].is_string());
    assert!(body["short_code"].as_str().unwrap().contains('-'));
}

#[actix_web::test]
async fn create_session_rejects_unknown_mode() {
    let app_state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(serde_json::json!({ "mode": "bogus" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn join_session_assigns_seat_zero_to_first_player() {
    let app_state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(routes::configure),
    )
    .await;

    let create_req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(serde_json::json!({ "mode": "twenty8" }))
        .to_request();
    let create_resp = test::call_service(&app, create_req).await;
    let created: serde_json::Value = test::read_body_json(create_resp).await;
    let id = created["id"].as_str().unwrap();

    let join_req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/players"))
        .set_json(serde_json::json!({ "player_id": "alice", "display_name": "Alice" }))
        .to_request();
    let join_resp = test::call_service(&app, join_req).await;
    assert_eq!(join_resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(join_resp).await;
    assert_eq!(body["seat"], 0);
}

#[actix_web::test]
async fn join_session_rejects_duplicate_player_id() {
    let app_state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(routes::configure),
    )
    .await;

    let create_resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/sessions")
            .set_json(serde_json::json!({ "mode": "twenty8" }))
            .to_request(),
    )
    .await;
    let created: serde_json::Value = test::read_body_json(create_resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    let join = || {
        test::TestRequest::post()
            .uri(&format!("/sessions/{id}/players"))
            .set_json(serde_json::json!({ "player_id": "alice", "display_name": "Alice" }))
            .to_request()
    };

    let first = test::call_service(&app, join()).await;
    assert_eq!(first.status(), 200);

    let second = test::call_service(&app, join()).await;
    assert_eq!(second.status(), 400);
}

#[actix_web::test]
async fn join_session_on_unknown_id_returns_404() {
    let app_state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/sessions/00000000-0000-0000-0000-000000000000/players")
        .set_json(serde_json::json!({ "player_id": "alice", "display_name": "Alice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
