//! The duplex JSON message protocol spoken over the game websocket.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::snapshot::{HandView, PublicState};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", content = "payload")]
pub enum ClientMsg {
    Identify { seat: usize, player_id: String },
    RequestState,
    PlaceBid { seat: usize, value: Option<i16> },
    ChooseTrump { seat: usize, suit: Suit },
    PlayCard { seat: usize, card_id: String },
    RevealTrump { seat: usize },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", content = "payload")]
pub enum ServerMsg {
    StateSnapshot {
        state: Box<PublicState>,
        #[serde(skip_serializing_if = "Option::is_none")]
        owner_hand: Option<HandView>,
    },
    ActionOk {
        action: &'static str,
        message: String,
    },
    ActionFailed {
        action: &'static str,
        message: String,
    },
    Error {
        message: String,
    },
}

/// `card_id` as sent over the wire resolves to an actual `Card` via the
/// domain's own id parser, so the dispatcher never has to reimplement the
/// `{suit}{rank}{deck}` format here.
pub fn parse_card(card_id: &str) -> Option<Card> {
    crate::domain::cards::parse_card_id(card_id)
}
