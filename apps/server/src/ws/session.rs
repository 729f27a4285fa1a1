//! `GameWsSession`: one actix-web-actors actor per websocket connection.
//!
//! The actor itself holds no game state; it forwards parsed client messages
//! to the `CommandDispatcher`, and relays `hub::Push` messages back out to
//! the socket as JSON.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::warn;
use uuid::Uuid;

use crate::state::app_state::AppState;
use crate::ws::dispatcher;
use crate::ws::hub::{Push, SubscriberId};
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Upgrades an HTTP request to a websocket bound to the session named by
/// `session_id` (UUID or short code). Resolution happens before the actor
/// is even started; an unknown identifier never opens a socket.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let identifier = path.into_inner();
    let Some(id) = app_state
        .registry
        .resolve(&identifier)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?
    else {
        return Ok(HttpResponse::NotFound().finish());
    };

    let actor = GameWsSession {
        session_id: id,
        app_state: app_state.into_inner(),
        sub_id: None,
        last_heartbeat: Instant::now(),
    };
    ws::start(actor, &req, stream)
}

pub struct GameWsSession {
    session_id: Uuid,
    app_state: Arc<AppState>,
    sub_id: Option<SubscriberId>,
    last_heartbeat: Instant,
}

impl GameWsSession {
    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound ws message"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for GameWsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let recipient = ctx.address().recipient::<Push>();
        self.sub_id = Some(self.app_state.hub.subscribe(self.session_id, recipient));
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(id) = self.sub_id {
            self.app_state.hub.unsubscribe(id);
        }
    }
}

impl Handler<Push> for GameWsSession {
    type Result = ();

    fn handle(&mut self, msg: Push, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    Self::send_json(ctx, &ServerMsg::Error { message: "malformed message".into() });
                    return;
                };

                if let ClientMsg::Identify { seat, player_id } = &cmd {
                    let Some(sub_id) = self.sub_id else { return };
                    let app_state = self.app_state.clone();
                    let seat = *seat;
                    let player_id = player_id.clone();
                    let session_id = self.session_id;
                    ctx.spawn(
                        async move {
                            let Some(engine) = app_state.registry.get_or_load(session_id).await.ok().flatten() else {
                                return false;
                            };
                            app_state.hub.identify(sub_id, &engine, seat, player_id)
                        }
                        .into_actor(self)
                        .map(move |ok, _actor, ctx| {
                            if ok {
                                Self::send_json(
                                    ctx,
                                    &ServerMsg::ActionOk { action: "identify", message: "identified".into() },
                                );
                            } else {
                                Self::send_json(
                                    ctx,
                                    &ServerMsg::ActionFailed { action: "identify", message: "seat/player mismatch".into() },
                                );
                            }
                        }),
                    );
                    return;
                }

                if matches!(cmd, ClientMsg::RequestState) {
                    let Some(sub_id) = self.sub_id else { return };
                    let app_state = self.app_state.clone();
                    let session_id = self.session_id;
                    ctx.spawn(
                        async move {
                            if let Ok(Some(engine)) = app_state.registry.get_or_load(session_id).await {
                                app_state.hub.send_to(sub_id, &engine);
                            }
                        }
                        .into_actor(self)
                        .map(|_, _, _| {}),
                    );
                    return;
                }

                let app_state = self.app_state.clone();
                let session_id = self.session_id;
                ctx.spawn(
                    async move { dispatcher::dispatch(&app_state, session_id, cmd).await }
                        .into_actor(self)
                        .map(move |result, _actor, ctx| match result {
                            Ok(action) => {
                                Self::send_json(ctx, &ServerMsg::ActionOk { action, message: "ok".into() });
                            }
                            Err((action, message)) => {
                                Self::send_json(ctx, &ServerMsg::ActionFailed { action, message });
                            }
                        }),
                );
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(ctx, &ServerMsg::Error { message: "binary frames not supported".into() });
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(error = %err, "ws protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
