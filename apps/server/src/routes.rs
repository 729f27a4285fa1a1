//! The thin HTTP surface: create a session and join it before handing off
//! to the websocket. Everything past that point (bidding, play, scoring)
//! only happens over `/ws/{session_id}`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::rules::Mode;
use crate::domain::state::{HiddenTrumpMode, PlayerInfo};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub mode: String,
    #[serde(default)]
    pub hidden_trump_mode: Option<HiddenTrumpMode>,
    #[serde(default)]
    pub base_seed: Option<u64>,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub id: String,
    pub short_code: String,
}

pub async fn create_session(
    app_state: web::Data<AppState>,
    body: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let mode = Mode::from_str(&body.mode)
        .ok_or_else(|| AppError::invalid(ErrorCode::ValidationError, format!("unknown mode '{}'", body.mode)))?;
    let hidden_trump_mode = body.hidden_trump_mode.unwrap_or_default();
    let base_seed = body.base_seed.unwrap_or_else(|| time::OffsetDateTime::now_utc().unix_timestamp() as u64);

    let engine = app_state.registry.create(mode, hidden_trump_mode, base_seed).await?;
    Ok(HttpResponse::Created().json(CreateSessionResponse {
        id: engine.id().to_string(),
        short_code: engine.short_code(),
    }))
}

#[derive(Deserialize)]
pub struct JoinSessionRequest {
    pub player_id: String,
    pub display_name: String,
}

#[derive(Serialize)]
pub struct JoinSessionResponse {
    pub seat: usize,
}

pub async fn join_session(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<JoinSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let identifier = path.into_inner();
    let id = app_state
        .registry
        .resolve(&identifier)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::SessionNotFound, format!("no session '{identifier}'")))?;
    let engine = app_state
        .registry
        .get_or_load(id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::SessionNotFound, format!("no session '{identifier}'")))?;

    let seat = engine
        .add_player(PlayerInfo {
            player_id: body.player_id.clone(),
            display_name: body.display_name.clone(),
            seat: 0,
            is_bot: false,
        })
        .map_err(|e| AppError::bad_request(ErrorCode::ValidationError, e.to_string()))?;

    crate::persistence::persist(app_state.repo.as_ref(), id, &engine.snapshot_session(), "join").await?;
    app_state.hub.broadcast(id, &engine);

    Ok(HttpResponse::Ok().json(JoinSessionResponse { seat }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/sessions", web::post().to(create_session))
        .route("/sessions/{session_id}/players", web::post().to(join_session));
}
