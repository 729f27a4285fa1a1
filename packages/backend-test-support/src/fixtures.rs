//! Shared session/hand builders for tests across the workspace.

use cardserver::domain::bidding;
use cardserver::domain::rules::Mode;
use cardserver::domain::state::{HiddenTrumpMode, Session};

/// Generates a short, unique string for test data, prefixed for readability
/// in failure output.
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

/// A full 4-seat `28` session with a hand already dealt and bidding open,
/// seeded deterministically so assertions on specific cards are stable.
pub fn four_seat_session(base_seed: u64) -> Session {
    session_with_mode(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, base_seed)
}

/// A full 6-seat `56` session with a hand already dealt and bidding open.
pub fn six_seat_session(base_seed: u64) -> Session {
    session_with_mode(Mode::Fifty6, HiddenTrumpMode::OnFirstNonfollow, base_seed)
}

pub fn session_with_mode(mode: Mode, hidden_trump_mode: HiddenTrumpMode, base_seed: u64) -> Session {
    let mut session = Session::new(
        uuid::Uuid::new_v4(),
        unique_str("session"),
        mode,
        hidden_trump_mode,
        base_seed,
        0,
    );
    bidding::deal_and_open_bidding(&mut session);
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_seat_session_deals_eight_cards_each() {
        let s = four_seat_session(1);
        assert!(s.hands.iter().all(|h| h.len() == 8));
    }

    #[test]
    fn unique_str_is_actually_unique() {
        assert_ne!(unique_str("x"), unique_str("x"));
    }
}
