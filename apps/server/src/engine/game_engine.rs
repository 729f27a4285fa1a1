//! `GameEngine`: owns one `Session` behind a mutation lock and is the sole
//! entry point for changing it. Every public mutator here acquires the lock,
//! validates, mutates, and releases — no engine method ever performs I/O
//! while holding it.

use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::cards::{Card, Suit};
use crate::domain::errors::EngineError;
use crate::domain::rules::Mode;
use crate::domain::snapshot::{self, HandView, PublicState};
use crate::domain::state::{Bid, HiddenTrumpMode, PlayerInfo, Session, SessionPhase};
use crate::domain::{bidding, short_code, tricks};

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// What a `BotDriver` needs to decide whether, and as whom, to act next.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSlot {
    pub seat: usize,
    pub is_bot: bool,
}

pub struct GameEngine {
    session: Mutex<Session>,
}

impl GameEngine {
    pub fn new(session: Session) -> Self {
        GameEngine {
            session: Mutex::new(session),
        }
    }

    /// Starts a brand-new, empty lobby.
    pub fn start_new(mode: Mode, hidden_trump_mode: HiddenTrumpMode, base_seed: u64) -> Self {
        let session = Session::new(
            Uuid::new_v4(),
            short_code::generate_short_code(),
            mode,
            hidden_trump_mode,
            base_seed,
            now_unix(),
        );
        GameEngine::new(session)
    }

    pub fn id(&self) -> Uuid {
        self.session.lock().id
    }

    pub fn short_code(&self) -> String {
        self.session.lock().short_code.clone()
    }

    pub fn revision(&self) -> u64 {
        self.session.lock().revision
    }

    /// A full clone of the session, for persistence. Only ever read, never
    /// mutated in place, so the engine lock is held only as long as the copy
    /// takes to make.
    pub fn snapshot_session(&self) -> Session {
        self.session.lock().clone()
    }

    pub fn public_state(&self) -> PublicState {
        snapshot::public_state(&self.session.lock())
    }

    pub fn hand_for(&self, seat: usize) -> HandView {
        snapshot::hand_for(&self.session.lock(), seat)
    }

    /// `(phase, turn, bid_winner)`, for `BotDriver` to decide whether a bot
    /// should act next, without holding the lock across its own decision.
    pub fn current_actor(&self) -> (SessionPhase, usize, Option<usize>) {
        let s = self.session.lock();
        (s.phase, s.turn, s.bid_winner)
    }

    pub fn player_at(&self, seat: usize) -> Option<PlayerSlot> {
        let s = self.session.lock();
        s.players.get(seat).and_then(|p| p.as_ref()).map(|p| PlayerSlot {
            seat: p.seat,
            is_bot: p.is_bot,
        })
    }

    /// Assigns `info` the lowest free seat and returns it. `info.seat` is
    /// ignored on input; callers pass a placeholder.
    pub fn add_player(&self, info: PlayerInfo) -> Result<usize, EngineError> {
        let mut s = self.session.lock();
        if s.phase != SessionPhase::Lobby {
            return Err(EngineError::wrong_state("players may only join while in the lobby"));
        }
        if s.players.iter().flatten().any(|p| p.player_id == info.player_id) {
            return Err(EngineError::duplicate_action("player has already joined this session"));
        }
        let seat = s.free_seat().ok_or_else(EngineError::session_full)?;
        let mut info = info;
        info.seat = seat;
        s.players[seat] = Some(info);
        s.touch(now_unix());
        Ok(seat)
    }

    /// Begins the first round of play (or the round following one that
    /// parked in `ROUND_END`). Subsequent rounds within a running game are
    /// opened automatically by `scoring::finish_round`, so this is normally
    /// only called once per game.
    pub fn start_round(&self, caller_may_fill_bots: bool) -> Result<(), EngineError> {
        let mut s = self.session.lock();
        if !matches!(s.phase, SessionPhase::Lobby | SessionPhase::RoundEnd) {
            return Err(EngineError::wrong_state("a round is already in progress"));
        }
        if s.player_count() < 2 {
            return Err(EngineError::wrong_state("at least two players are required to start"));
        }

        if caller_may_fill_bots {
            let seats = s.seats;
            for seat in 0..seats {
                if s.players[seat].is_none() {
                    s.players[seat] = Some(PlayerInfo {
                        player_id: format!("bot-{}-{seat}", s.id),
                        display_name: format!("Bot {}", seat + 1),
                        seat,
                        is_bot: true,
                    });
                }
            }
        }

        if s.round_number > 0 {
            s.current_dealer = (s.current_dealer + s.seats - 1) % s.seats;
        }

        bidding::deal_and_open_bidding(&mut s);
        s.touch(now_unix());
        Ok(())
    }

    pub fn place_bid(&self, seat: usize, bid: Bid) -> Result<(), EngineError> {
        let mut s = self.session.lock();
        bidding::place_bid(&mut s, seat, bid)?;
        s.touch(now_unix());
        Ok(())
    }

    pub fn choose_trump(&self, seat: usize, suit: Suit) -> Result<(), EngineError> {
        let mut s = self.session.lock();
        bidding::choose_trump(&mut s, seat, suit)?;
        s.touch(now_unix());
        Ok(())
    }

    pub fn play_card(&self, seat: usize, card: Card) -> Result<(), EngineError> {
        let mut s = self.session.lock();
        tricks::play_card(&mut s, seat, card)?;
        s.touch(now_unix());
        Ok(())
    }

    pub fn reveal_trump(&self, seat: usize) -> Result<(), EngineError> {
        let mut s = self.session.lock();
        tricks::reveal_trump(&mut s, seat)?;
        s.touch(now_unix());
        Ok(())
    }

    /// Advances the at-most-once round-append counter after the persistence
    /// layer has durably appended `newly_appended` more rounds.
    pub fn mark_rounds_appended(&self, newly_appended: usize) {
        let mut s = self.session.lock();
        s.rounds_appended += newly_appended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::start_new(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 99)
    }

    fn join(engine: &GameEngine, n: usize) {
        for i in 0..n {
            engine
                .add_player(PlayerInfo {
                    player_id: format!("p{i}"),
                    display_name: format!("Player {i}"),
                    seat: 0,
                    is_bot: false,
                })
                .unwrap();
        }
    }

    #[test]
    fn add_player_assigns_lowest_free_seat() {
        let e = engine();
        join(&e, 2);
        let s = e.snapshot_session();
        assert_eq!(s.players[0].as_ref().unwrap().player_id, "p0");
        assert_eq!(s.players[1].as_ref().unwrap().player_id, "p1");
    }

    #[test]
    fn start_round_requires_two_players() {
        let e = engine();
        join(&e, 1);
        let err = e.start_round(false).unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::WrongState);
    }

    #[test]
    fn start_round_fills_remaining_seats_with_bots_and_opens_bidding() {
        let e = engine();
        join(&e, 2);
        e.start_round(true).unwrap();
        let s = e.snapshot_session();
        assert_eq!(s.phase, SessionPhase::Bidding);
        assert!(s.players.iter().all(|p| p.is_some()));
        assert!(s.players[2].as_ref().unwrap().is_bot);
    }

    #[test]
    fn revision_advances_on_every_accepted_mutation() {
        let e = engine();
        join(&e, 4);
        let before = e.revision();
        e.start_round(false).unwrap();
        assert!(e.revision() > before);
    }

    #[test]
    fn full_session_has_no_free_seat() {
        let e = engine();
        join(&e, 4);
        let err = e
            .add_player(PlayerInfo {
                player_id: "p5".into(),
                display_name: "Player 5".into(),
                seat: 0,
                is_bot: false,
            })
            .unwrap_err();
        assert_eq!(err.kind, crate::domain::errors::ErrorKind::SessionFull);
    }
}
