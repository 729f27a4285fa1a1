//! Random bot policy - makes random legal moves.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::{AiError, BotPolicy};
use crate::domain::cards::{Card, Suit};
use crate::domain::snapshot::{HandView, PublicState};
use crate::domain::state::Bid;

/// Bot policy that makes random legal moves.
///
/// Can be seeded for deterministic behavior in tests.
pub struct RandomPolicy {
    rng: Mutex<StdRng>,
}

impl RandomPolicy {
    pub const NAME: &'static str = "random";

    /// - If `seed` is Some, uses that seed for deterministic behavior
    /// - If `seed` is None, uses system entropy for randomness
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl BotPolicy for RandomPolicy {
    fn choose_bid(&self, view: &HandView, public: &PublicState) -> Result<Bid, AiError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("rng lock poisoned: {e}")))?;

        // Passing is always legal while bidding is open; weight it alongside
        // the legal value bids so a bot doesn't bid every single turn.
        let mut options: Vec<Bid> = view.legal_bids.iter().copied().map(Bid::Value).collect();
        if public.current_highest > 0 || !options.is_empty() {
            options.push(Bid::Pass);
        }
        if options.is_empty() {
            return Err(AiError::InvalidMove("no legal bids available".into()));
        }
        options
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("failed to choose a random bid".into()))
    }

    fn choose_play(&self, view: &HandView, _public: &PublicState) -> Result<Card, AiError> {
        if view.legal_plays.is_empty() {
            return Err(AiError::InvalidMove("no legal plays available".into()));
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("rng lock poisoned: {e}")))?;
        view.legal_plays
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("failed to choose a random card".into()))
    }

    fn choose_trump(&self, _view: &HandView, _public: &PublicState) -> Result<Suit, AiError> {
        let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("rng lock poisoned: {e}")))?;
        suits
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("failed to choose a random trump".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bidding;
    use crate::domain::rules::Mode;
    use crate::domain::snapshot;
    use crate::domain::state::{HiddenTrumpMode, Session};
    use uuid::Uuid;

    fn fresh_session() -> Session {
        let mut s = Session::new(
            Uuid::new_v4(),
            "brave-falcon-01".into(),
            Mode::Twenty8,
            HiddenTrumpMode::OnFirstNonfollow,
            7,
            0,
        );
        bidding::deal_and_open_bidding(&mut s);
        s
    }

    #[test]
    fn seeded_policy_is_deterministic() {
        let s = fresh_session();
        let policy_a = RandomPolicy::new(Some(42));
        let policy_b = RandomPolicy::new(Some(42));
        let public = snapshot::public_state(&s);
        let view = snapshot::hand_for(&s, s.turn);

        let bid_a = policy_a.choose_bid(&view, &public).unwrap();
        let bid_b = policy_b.choose_bid(&view, &public).unwrap();
        assert_eq!(bid_a, bid_b);
    }

    #[test]
    fn chosen_bid_is_legal_or_pass() {
        let s = fresh_session();
        let policy = RandomPolicy::new(Some(1));
        let public = snapshot::public_state(&s);
        let view = snapshot::hand_for(&s, s.turn);
        let bid = policy.choose_bid(&view, &public).unwrap();
        match bid {
            Bid::Pass => {}
            Bid::Value(v) => assert!(view.legal_bids.contains(&v)),
        }
    }
}
