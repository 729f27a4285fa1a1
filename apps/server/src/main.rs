#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use cardserver::config::settings::{bind_addr, BotTiming};
use cardserver::persistence::sea_orm_repo::SeaOrmRepository;
use cardserver::persistence::Repository;
use cardserver::routes;
use cardserver::state::app_state::AppState;
use cardserver::telemetry;
use cardserver::ws::session::upgrade;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let db_url = cardserver::config::db::db_url().unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to resolve database configuration");
        std::process::exit(1);
    });
    let db = sea_orm::Database::connect(&db_url).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to connect to database");
        std::process::exit(1);
    });
    let bot_timing = BotTiming::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid bot timing configuration");
        std::process::exit(1);
    });

    let repo: Arc<dyn Repository> = Arc::new(SeaOrmRepository::new(db));
    let app_state = AppState::new(repo, bot_timing);

    let addr = bind_addr();
    tracing::info!(%addr, "starting cardserver");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .route("/healthz", web::get().to(health))
            .route("/ws/{session_id}", web::get().to(upgrade))
            .configure(routes::configure)
    })
    .bind(addr)?
    .run()
    .await
}
