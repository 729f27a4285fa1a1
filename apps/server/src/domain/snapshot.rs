//! Public snapshot API: views of a `Session` with hands excluded, plus the
//! one private view each seat is allowed to see of its own hand.

use serde::{Deserialize, Serialize};

use crate::domain::bidding::legal_bids;
use crate::domain::cards::{Card, Suit};
use crate::domain::rules::Mode;
use crate::domain::state::{Bid, CompletedTrick, RoundRecord, Session, SessionPhase};
use crate::domain::tricks::legal_plays;

/// Everything about a session except hand contents, the undealt deck, and
/// the kitty. Safe to broadcast to every subscriber, including spectators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicState {
    pub id: uuid::Uuid,
    pub short_code: String,
    pub mode: Mode,
    pub seats: usize,
    pub phase: SessionPhase,
    pub revision: u64,

    pub players: Vec<Option<crate::domain::state::PlayerInfo>>,
    pub hand_sizes: Vec<usize>,

    pub current_dealer: usize,
    pub leader: usize,
    pub turn: usize,

    pub bids: Vec<Option<Bid>>,
    pub current_highest: u8,
    pub min_bid: u8,
    pub max_bid: u8,
    pub bid_winner: Option<usize>,
    pub bid_value: Option<u8>,

    /// Only populated once `trump_revealed` is true; otherwise `None` even
    /// though the engine already knows the trump suit internally.
    pub trump: Option<Suit>,
    pub trump_revealed: bool,

    pub current_trick: Vec<(usize, Card)>,
    pub last_trick: Option<CompletedTrick>,
    pub points_by_seat: Vec<u32>,
    pub round_number: u32,
    pub rounds_history: Vec<RoundRecord>,

    pub updated_at_unix: i64,
}

/// A single seat's private view: its hand, plus the cards/bids it may
/// currently act with (empty when it is not that seat's turn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandView {
    pub seat: usize,
    pub hand: Vec<Card>,
    pub legal_bids: Vec<u8>,
    pub legal_plays: Vec<Card>,
}

pub fn public_state(session: &Session) -> PublicState {
    PublicState {
        id: session.id,
        short_code: session.short_code.clone(),
        mode: session.mode,
        seats: session.seats,
        phase: session.phase,
        revision: session.revision,
        players: session.players.clone(),
        hand_sizes: session.hands.iter().map(Vec::len).collect(),
        current_dealer: session.current_dealer,
        leader: session.leader,
        turn: session.turn,
        bids: session.bids.clone(),
        current_highest: session.current_highest,
        min_bid: session.min_bid,
        max_bid: session.mode.max_bid(),
        bid_winner: session.bid_winner,
        bid_value: session.bid_value,
        trump: session.trump_revealed.then_some(session.trump).flatten(),
        trump_revealed: session.trump_revealed,
        current_trick: session.current_trick.clone(),
        last_trick: session.last_trick.clone(),
        points_by_seat: session.points_by_seat.clone(),
        round_number: session.round_number,
        rounds_history: session.rounds_history.clone(),
        updated_at_unix: session.updated_at_unix,
    }
}

pub fn hand_for(session: &Session, seat: usize) -> HandView {
    HandView {
        seat,
        hand: session.hands[seat].clone(),
        legal_bids: legal_bids(session, seat),
        legal_plays: legal_plays(session, seat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bidding::{deal_and_open_bidding, place_bid};
    use crate::domain::state::HiddenTrumpMode;
    use uuid::Uuid;

    fn seeded_session() -> Session {
        let mut s = Session::new(
            Uuid::nil(),
            "quiet-heron-42".to_string(),
            Mode::Twenty8,
            HiddenTrumpMode::OnFirstNonfollow,
            9,
            0,
        );
        deal_and_open_bidding(&mut s);
        s
    }

    #[test]
    fn public_state_hides_hand_contents_but_reports_sizes() {
        let s = seeded_session();
        let snap = public_state(&s);
        assert_eq!(snap.hand_sizes, vec![8, 8, 8, 8]);
    }

    #[test]
    fn public_state_hides_trump_until_revealed() {
        let mut s = seeded_session();
        place_bid(&mut s, 1, Bid::Value(28)).unwrap();
        crate::domain::bidding::choose_trump(&mut s, 1, Suit::Clubs).unwrap();
        assert!(!s.trump_revealed);
        let snap = public_state(&s);
        assert_eq!(snap.trump, None);

        s.trump_revealed = true;
        let snap = public_state(&s);
        assert_eq!(snap.trump, Some(Suit::Clubs));
    }

    #[test]
    fn hand_view_exposes_only_the_requested_seat() {
        let s = seeded_session();
        let view = hand_for(&s, 2);
        assert_eq!(view.hand, s.hands[2]);
        assert_eq!(view.legal_bids, legal_bids(&s, 2));
    }
}
