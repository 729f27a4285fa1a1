//! Round-end settlement: building a `RoundRecord` and parking the session at
//! rest until the next round is explicitly started.

use crate::domain::rules::{bid_outcome, team_scores};
use crate::domain::state::{CompletedTrick, RoundRecord, Session, SessionPhase};

/// Finalizes the just-completed round: records it in `rounds_history` and
/// settles the session at `ROUND_END`.
///
/// Called once a trick resolution leaves every hand empty. Dealer rotation
/// and dealing for the next round are `start_round`'s job, not this one;
/// this only ever moves the session from PLAY to SCORING to ROUND_END.
pub fn finish_round(session: &mut Session) {
    session.phase = SessionPhase::Scoring;

    let bid_winner = session.bid_winner.expect("round ended without a bid winner");
    let bid_value = session.bid_value.expect("round ended without a bid value");
    let trump = session.trump.expect("round ended without a trump suit");
    let (team0, team1) = team_scores(&session.points_by_seat);
    let bid_made = bid_outcome(bid_winner, bid_value, &session.points_by_seat);

    let record = RoundRecord {
        round_number: session.round_number,
        dealer: session.current_dealer,
        bid_winner,
        bid_value,
        trump,
        captured_tricks: std::mem::take(&mut session.captured_tricks),
        points_by_seat: session.points_by_seat.clone(),
        team_scores: (team0, team1),
        bid_made,
    };
    session.rounds_history.push(record);

    session.round_number += 1;
    session.phase = SessionPhase::RoundEnd;
}

/// The most recently recorded completed trick, if any round has finished one.
pub fn last_completed_trick(session: &Session) -> Option<&CompletedTrick> {
    session.last_trick.as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::Suit;
    use crate::domain::rules::Mode;
    use crate::domain::state::HiddenTrumpMode;
    use uuid::Uuid;

    #[test]
    fn finish_round_records_history_and_parks_at_round_end() {
        let mut s = Session::new(
            Uuid::nil(),
            "lucky-otter-07".to_string(),
            Mode::Twenty8,
            HiddenTrumpMode::OnFirstNonfollow,
            1,
            0,
        );
        crate::domain::bidding::deal_and_open_bidding(&mut s);
        s.bid_winner = Some(1);
        s.bid_value = Some(16);
        s.trump = Some(Suit::Hearts);
        s.points_by_seat = vec![10, 8, 6, 4];

        finish_round(&mut s);

        assert_eq!(s.rounds_history.len(), 1);
        let record = &s.rounds_history[0];
        assert_eq!(record.bid_winner, 1);
        assert!(!record.bid_made);
        assert_eq!(s.round_number, 1);
        // Dealer rotation is start_round's job, not finish_round's.
        assert_eq!(s.current_dealer, 0);
        assert_eq!(s.phase, SessionPhase::RoundEnd);
    }
}
