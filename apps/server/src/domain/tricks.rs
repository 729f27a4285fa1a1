//! Play-phase mutations: `play_card` and `reveal_trump`.

use crate::domain::cards::Card;
use crate::domain::errors::EngineError;
use crate::domain::rules::{playable_cards, trick_points, trick_winner};
use crate::domain::scoring::finish_round;
use crate::domain::state::{CompletedTrick, Session, SessionPhase};

/// Cards `seat` may legally play right now (empty outside PLAY or out of turn).
pub fn legal_plays(session: &Session, seat: usize) -> Vec<Card> {
    if session.phase != SessionPhase::Play || session.turn != seat {
        return Vec::new();
    }
    playable_cards(
        &session.hands[seat],
        session.lead_suit(),
        session.trump,
        session.trump_revealed,
    )
}

fn auto_reveal_on_play(session: &mut Session, seat: usize, card: Card, lead_suit: Option<Suit_>) {
    use crate::domain::state::HiddenTrumpMode::*;
    if session.trump_revealed {
        return;
    }
    let Some(trump) = session.trump else { return };
    let failed_to_follow = lead_suit.map_or(false, |lead| card.suit != lead);
    let reveal = match session.hidden_trump_mode {
        OpenImmediately => false, // already revealed at choose_trump time
        OnFirstNonfollow => failed_to_follow,
        OnFirstTrumpPlay => card.suit == trump,
        OnBidderNonfollow => failed_to_follow && session.bid_winner == Some(seat),
    };
    if reveal {
        session.trump_revealed = true;
    }
}

// Local alias kept distinct from `std::option::Option<Suit>` plumbing above to
// keep the signature readable; `Suit` lives in `cards`.
type Suit_ = crate::domain::cards::Suit;

pub fn play_card(session: &mut Session, seat: usize, card: Card) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Play {
        return Err(EngineError::wrong_state("play is not in progress"));
    }
    if session.turn != seat {
        return Err(EngineError::not_your_turn());
    }
    let hand_pos = session.hands[seat]
        .iter()
        .position(|c| *c == card)
        .ok_or_else(EngineError::card_not_in_hand)?;

    let lead_suit = session.lead_suit();
    let legal = playable_cards(&session.hands[seat], lead_suit, session.trump, session.trump_revealed);
    if !legal.contains(&card) {
        return Err(EngineError::must_follow_suit());
    }

    session.hands[seat].remove(hand_pos);
    session.current_trick.push((seat, card));
    auto_reveal_on_play(session, seat, card, lead_suit);

    if session.current_trick.len() == session.seats {
        let trick = std::mem::take(&mut session.current_trick);
        let winner = trick_winner(&trick, session.trump, session.trump_revealed);
        let points = trick_points(&trick);
        session.points_by_seat[winner] += points;
        let completed = CompletedTrick {
            winner,
            cards: trick,
            points,
        };
        session.captured_tricks.push(completed.clone());
        session.last_trick = Some(completed);
        session.leader = winner;
        session.turn = winner;

        if session.hands.iter().all(|h| h.is_empty()) {
            finish_round(session);
        }
    } else {
        session.turn = (session.turn + 1) % session.seats;
    }

    Ok(())
}

/// Explicit early trump reveal, independent of the automatic policies in
/// `play_card`. Only the seat on turn may call it, only mid-trick, and only
/// when that seat cannot follow the lead suit — the same circumstance that
/// would force a trump reveal anyway under most hidden-trump policies.
pub fn reveal_trump(session: &mut Session, seat: usize) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Play {
        return Err(EngineError::wrong_state("play is not in progress"));
    }
    if session.turn != seat {
        return Err(EngineError::not_your_turn());
    }
    if session.trump_revealed {
        return Err(EngineError::trump_already_revealed());
    }
    let Some(lead_suit) = session.lead_suit() else {
        return Err(EngineError::wrong_state("cannot reveal trump before leading a card"));
    };
    if session.hands[seat].iter().any(|c| c.suit == lead_suit) {
        return Err(EngineError::must_follow_suit());
    }
    session.trump_revealed = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bidding::{choose_trump, deal_and_open_bidding, place_bid};
    use crate::domain::cards::Suit;
    use crate::domain::rules::Mode;
    use crate::domain::state::{Bid, HiddenTrumpMode};
    use uuid::Uuid;

    fn session_in_play(hidden_trump_mode: HiddenTrumpMode) -> Session {
        let mut s = Session::new(
            Uuid::nil(),
            "brave-falcon-19".to_string(),
            Mode::Twenty8,
            hidden_trump_mode,
            7,
            0,
        );
        s.current_dealer = 0;
        deal_and_open_bidding(&mut s);
        place_bid(&mut s, 1, Bid::Value(16)).unwrap();
        place_bid(&mut s, 2, Bid::Pass).unwrap();
        place_bid(&mut s, 3, Bid::Pass).unwrap();
        place_bid(&mut s, 0, Bid::Pass).unwrap();
        choose_trump(&mut s, 1, Suit::Spades).unwrap();
        s
    }

    #[test]
    fn out_of_turn_play_is_rejected() {
        let mut s = session_in_play(HiddenTrumpMode::OnFirstNonfollow);
        let not_turn = (s.turn + 1) % s.seats;
        let card = s.hands[not_turn][0];
        let err = play_card(&mut s, not_turn, card).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::NotYourTurn);
    }

    #[test]
    fn card_not_in_hand_is_rejected() {
        let mut s = session_in_play(HiddenTrumpMode::OnFirstNonfollow);
        let foreign = crate::domain::rules::make_deck(Mode::Twenty8)
            .into_iter()
            .find(|c| !s.hands[s.turn].contains(c))
            .expect("deck has 32 cards across 4 eight-card hands, so some card is held by another seat");
        let err = play_card(&mut s, s.turn, foreign).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::CardNotInHand);
    }

    #[test]
    fn must_follow_suit_when_possible() {
        let mut s = session_in_play(HiddenTrumpMode::OnFirstNonfollow);
        let leader = s.turn;
        let lead_card = s.hands[leader][0];
        play_card(&mut s, leader, lead_card).unwrap();

        let next = s.turn;
        if let Some(offsuit) = s.hands[next]
            .iter()
            .copied()
            .find(|c| c.suit != lead_card.suit)
        {
            if s.hands[next].iter().any(|c| c.suit == lead_card.suit) {
                let err = play_card(&mut s, next, offsuit).unwrap_err();
                assert_eq!(err.kind, crate::domain::errors::ErrorKind::MustFollowSuit);
            }
        }
    }

    #[test]
    fn on_first_nonfollow_reveals_trump_automatically() {
        let mut s = session_in_play(HiddenTrumpMode::OnFirstNonfollow);
        assert!(!s.trump_revealed);
        for _ in 0..s.seats {
            let seat = s.turn;
            let legal = legal_plays(&s, seat);
            let card = legal[0];
            play_card(&mut s, seat, card).unwrap();
            if s.trump_revealed {
                break;
            }
        }
    }

    #[test]
    fn reveal_trump_requires_turn_nonempty_trick_and_cannot_follow() {
        let mut s = session_in_play(HiddenTrumpMode::OnFirstTrumpPlay);
        let bid_winner = s.bid_winner.unwrap();

        // No trick is open yet, so there's nothing to reveal into.
        let err = reveal_trump(&mut s, bid_winner).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::WrongState);

        let lead_card = s.hands[bid_winner]
            .iter()
            .copied()
            .find(|c| c.suit != Suit::Spades)
            .expect("bid winner holds at least one non-trump card in an 8-card hand");
        play_card(&mut s, bid_winner, lead_card).unwrap();

        let next = s.turn;
        let not_turn = (next + 1) % s.seats;
        let err = reveal_trump(&mut s, not_turn).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::NotYourTurn);

        if s.hands[next].iter().any(|c| c.suit == lead_card.suit) {
            let err = reveal_trump(&mut s, next).unwrap_err();
            assert_eq!(err.kind, crate::domain::errors::ErrorKind::MustFollowSuit);
        } else {
            reveal_trump(&mut s, next).unwrap();
            assert!(s.trump_revealed);
            let err = reveal_trump(&mut s, next).unwrap_err();
            assert_eq!(err.kind, crate::domain::errors::ErrorKind::TrumpAlreadyRevealed);
        }
    }

    #[test]
    fn playing_out_every_hand_finishes_the_round() {
        let mut s = session_in_play(HiddenTrumpMode::OpenImmediately);
        assert!(s.trump_revealed);
        let starting_round = s.round_number;
        for _ in 0..(8 * 4) {
            let seat = s.turn;
            let legal = legal_plays(&s, seat);
            if legal.is_empty() {
                break;
            }
            play_card(&mut s, seat, legal[0]).unwrap();
        }
        assert_eq!(s.round_number, starting_round + 1);
        assert_eq!(s.phase, SessionPhase::RoundEnd);
        assert_eq!(s.rounds_history.len(), 1);
    }
}
