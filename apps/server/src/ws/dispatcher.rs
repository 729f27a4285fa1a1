//! `CommandDispatcher`: the sole caller of `GameEngine` mutators from the
//! websocket layer.
//!
//! On acceptance: persist the new state, broadcast it to every subscriber,
//! then kick the bot driver so it can act if the new current player is a
//! bot. On rejection: nothing is persisted or broadcast; the caller reports
//! `action_failed` to the originating connection only.

use uuid::Uuid;

use crate::state::app_state::AppState;
use crate::ws::protocol::{self, ClientMsg};

type DispatchResult = Result<&'static str, (&'static str, String)>;

pub async fn dispatch(app_state: &AppState, session_id: Uuid, cmd: ClientMsg) -> DispatchResult {
    let action = action_name(&cmd);

    let engine = app_state
        .registry
        .get_or_load(session_id)
        .await
        .map_err(|e| (action, e.to_string()))?
        .ok_or((action, "session does not exist".to_string()))?;

    match cmd {
        ClientMsg::Identify { .. } | ClientMsg::RequestState => {
            // Handled directly by the websocket actor; never reaches here.
            return Ok(action);
        }
        ClientMsg::PlaceBid { seat, value } => {
            let bid = match value {
                Some(v) if v > 0 => crate::domain::state::Bid::Value(v as u8),
                _ => crate::domain::state::Bid::Pass,
            };
            engine.place_bid(seat, bid).map_err(|e| (action, e.to_string()))?;
        }
        ClientMsg::ChooseTrump { seat, suit } => {
            engine.choose_trump(seat, suit).map_err(|e| (action, e.to_string()))?;
        }
        ClientMsg::PlayCard { seat, card_id } => {
            let Some(card) = protocol::parse_card(&card_id) else {
                return Err((action, format!("invalid card id '{card_id}'")));
            };
            engine.play_card(seat, card).map_err(|e| (action, e.to_string()))?;
        }
        ClientMsg::RevealTrump { seat } => {
            engine.reveal_trump(seat).map_err(|e| (action, e.to_string()))?;
        }
    }

    let reason = action;
    let newly_appended = crate::persistence::persist(
        app_state.repo.as_ref(),
        session_id,
        &engine.snapshot_session(),
        reason,
    )
    .await
    .map_err(|e| (action, e.to_string()))?;
    engine.mark_rounds_appended(newly_appended);

    app_state.hub.broadcast(session_id, &engine);
    app_state.bot_driver.notify(session_id);

    Ok(action)
}

fn action_name(cmd: &ClientMsg) -> &'static str {
    match cmd {
        ClientMsg::Identify { .. } => "identify",
        ClientMsg::RequestState => "request_state",
        ClientMsg::PlaceBid { .. } => "place_bid",
        ClientMsg::ChooseTrump { .. } => "choose_trump",
        ClientMsg::PlayCard { .. } => "play_card",
        ClientMsg::RevealTrump { .. } => "reveal_trump",
    }
}
