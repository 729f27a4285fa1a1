//! Bidding phase mutations: `place_bid` and `choose_trump`.
//!
//! These are pure functions over `&mut Session`; `GameEngine` is the only
//! caller, and it is responsible for holding the mutation lock around them.

use crate::domain::cards::Suit;
use crate::domain::dealing::{deal_round, derive_round_seed};
use crate::domain::errors::EngineError;
use crate::domain::state::{Bid, Session, SessionPhase};

/// Legal bid values for `seat` right now (empty outside BIDDING or out of turn).
pub fn legal_bids(session: &Session, seat: usize) -> Vec<u8> {
    if session.phase != SessionPhase::Bidding || session.turn != seat {
        return Vec::new();
    }
    if matches!(session.bids[seat], Some(Bid::Pass)) {
        return Vec::new();
    }
    let floor = session.current_highest.max(session.min_bid.saturating_sub(1));
    ((floor + 1)..=session.mode.max_bid()).collect()
}

fn passed_count(session: &Session) -> usize {
    session
        .bids
        .iter()
        .filter(|b| matches!(b, Some(Bid::Pass)))
        .count()
}

fn lone_active_seat(session: &Session) -> Option<usize> {
    let mut active = session
        .bids
        .iter()
        .enumerate()
        .filter(|(_, b)| !matches!(b, Some(Bid::Pass)))
        .map(|(seat, _)| seat);
    let first = active.next()?;
    if active.next().is_some() {
        None
    } else {
        Some(first)
    }
}

fn advance_bidding_turn(session: &mut Session) {
    let seats = session.seats;
    loop {
        session.turn = (session.turn + 1) % seats;
        if !matches!(session.bids[session.turn], Some(Bid::Pass)) {
            return;
        }
    }
}

/// Starts a fresh deal for the current dealer: builds and shuffles a new
/// deck, resets bidding state, and reopens BIDDING. Used both for the first
/// deal after `start_round` and for a mid-bidding redeal (all seats passed).
pub fn deal_and_open_bidding(session: &mut Session) {
    let seed = derive_round_seed(session.base_seed, session.round_number).wrapping_add(session.revision);
    let (deck, hands, kitty) = deal_round(session.mode, session.seats, seed);
    session.deck = deck;
    session.hands = hands;
    session.kitty = kitty;
    session.bids = vec![None; session.seats];
    session.current_highest = 0;
    session.bid_winner = None;
    session.bid_value = None;
    session.trump = None;
    session.trump_revealed = false;
    session.current_trick = Vec::new();
    session.last_trick = None;
    session.captured_tricks = Vec::new();
    session.points_by_seat = vec![0; session.seats];
    session.leader = (session.current_dealer + 1) % session.seats;
    session.turn = session.leader;
    session.phase = SessionPhase::Bidding;
}

pub fn place_bid(session: &mut Session, seat: usize, bid: Bid) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Bidding {
        return Err(EngineError::wrong_state("bidding is not in progress"));
    }
    if session.turn != seat {
        return Err(EngineError::not_your_turn());
    }
    if matches!(session.bids[seat], Some(Bid::Pass)) {
        return Err(EngineError::already_acted());
    }
    if let Bid::Value(value) = bid {
        if value < session.min_bid || value <= session.current_highest || value > session.mode.max_bid() {
            return Err(EngineError::bid_too_low(session.min_bid));
        }
    }

    session.bids[seat] = Some(bid);
    if let Bid::Value(value) = bid {
        session.current_highest = value;
    }

    let seats = session.seats;
    if passed_count(session) == seats {
        // Condition (b): everyone passed this cycle with no bid standing.
        deal_and_open_bidding(session);
        return Ok(());
    }
    if session.current_highest > 0 {
        if let Some(winner) = lone_active_seat(session) {
            // Condition (a): every other seat has passed and a real bid stands.
            session.bid_winner = Some(winner);
            session.bid_value = Some(session.current_highest);
            session.phase = SessionPhase::ChooseTrump;
            session.turn = winner;
            return Ok(());
        }
    }
    if let Bid::Value(value) = bid {
        if value == session.mode.max_bid() {
            // Condition (c): the ceiling bid was just placed.
            session.bid_winner = Some(seat);
            session.bid_value = Some(value);
            session.phase = SessionPhase::ChooseTrump;
            session.turn = seat;
            return Ok(());
        }
    }

    advance_bidding_turn(session);
    Ok(())
}

pub fn choose_trump(session: &mut Session, seat: usize, suit: Suit) -> Result<(), EngineError> {
    if session.phase != SessionPhase::ChooseTrump {
        return Err(EngineError::wrong_state("trump selection is not in progress"));
    }
    match session.bid_winner {
        Some(winner) if winner == seat => {}
        Some(_) => return Err(EngineError::not_bid_winner()),
        None => return Err(EngineError::wrong_state("no bid winner recorded")),
    }

    session.trump = Some(suit);
    session.trump_revealed = matches!(
        session.hidden_trump_mode,
        crate::domain::state::HiddenTrumpMode::OpenImmediately
    );
    session.leader = seat;
    session.turn = seat;
    session.current_trick = Vec::new();
    session.phase = SessionPhase::Play;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::Mode;
    use uuid::Uuid;

    fn four_seat_session() -> Session {
        let mut s = Session::new(
            Uuid::nil(),
            "royal-turtle-65".to_string(),
            Mode::Twenty8,
            crate::domain::state::HiddenTrumpMode::OnFirstNonfollow,
            42,
            0,
        );
        s.current_dealer = 0;
        deal_and_open_bidding(&mut s);
        s
    }

    #[test]
    fn s1_redeal_on_all_pass() {
        let mut s = four_seat_session();
        assert_eq!(s.turn, 1);
        place_bid(&mut s, 1, Bid::Pass).unwrap();
        place_bid(&mut s, 2, Bid::Pass).unwrap();
        place_bid(&mut s, 3, Bid::Pass).unwrap();
        place_bid(&mut s, 0, Bid::Pass).unwrap();
        assert_eq!(s.phase, SessionPhase::Bidding);
        assert_eq!(s.current_dealer, 0);
        assert_eq!(s.turn, 1);
        assert_eq!(s.current_highest, 0);
    }

    #[test]
    fn s2_bidding_closes_on_all_but_one_pass() {
        let mut s = four_seat_session();
        place_bid(&mut s, 1, Bid::Value(16)).unwrap();
        place_bid(&mut s, 2, Bid::Pass).unwrap();
        place_bid(&mut s, 3, Bid::Value(18)).unwrap();
        place_bid(&mut s, 0, Bid::Pass).unwrap();
        place_bid(&mut s, 1, Bid::Pass).unwrap();
        assert_eq!(s.bid_winner, Some(3));
        assert_eq!(s.bid_value, Some(18));
        assert_eq!(s.phase, SessionPhase::ChooseTrump);
    }

    #[test]
    fn out_of_turn_bid_is_rejected() {
        let mut s = four_seat_session();
        let err = place_bid(&mut s, 2, Bid::Value(16)).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::NotYourTurn);
    }

    #[test]
    fn passed_seat_cannot_bid_again() {
        let mut s = four_seat_session();
        place_bid(&mut s, 1, Bid::Pass).unwrap();
        place_bid(&mut s, 2, Bid::Pass).unwrap();
        place_bid(&mut s, 3, Bid::Value(18)).unwrap();
        let err = place_bid(&mut s, 1, Bid::Value(20)).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::AlreadyActed);
    }

    #[test]
    fn bid_must_exceed_current_highest_and_minimum() {
        let mut s = four_seat_session();
        assert!(place_bid(&mut s, 1, Bid::Value(13)).is_err());
        place_bid(&mut s, 1, Bid::Value(16)).unwrap();
        let err = place_bid(&mut s, 2, Bid::Value(16)).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::BidTooLow);
    }

    #[test]
    fn max_bid_reached_ends_bidding_immediately() {
        let mut s = four_seat_session();
        place_bid(&mut s, 1, Bid::Value(28)).unwrap();
        assert_eq!(s.bid_winner, Some(1));
        assert_eq!(s.phase, SessionPhase::ChooseTrump);
    }

    #[test]
    fn choose_trump_only_by_bid_winner() {
        let mut s = four_seat_session();
        place_bid(&mut s, 1, Bid::Value(16)).unwrap();
        place_bid(&mut s, 2, Bid::Pass).unwrap();
        place_bid(&mut s, 3, Bid::Pass).unwrap();
        place_bid(&mut s, 0, Bid::Pass).unwrap();
        assert_eq!(s.bid_winner, Some(1));
        let err = choose_trump(&mut s, 2, Suit::Spades).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::NotBidWinner);
        choose_trump(&mut s, 1, Suit::Spades).unwrap();
        assert_eq!(s.phase, SessionPhase::Play);
        assert_eq!(s.turn, 1);
        assert_eq!(s.leader, 1);
        assert!(!s.trump_revealed);
    }

    #[test]
    fn open_immediately_reveals_trump_at_selection() {
        let mut s = four_seat_session();
        s.hidden_trump_mode = crate::domain::state::HiddenTrumpMode::OpenImmediately;
        place_bid(&mut s, 1, Bid::Value(28)).unwrap();
        choose_trump(&mut s, 1, Suit::Hearts).unwrap();
        assert!(s.trump_revealed);
    }
}
