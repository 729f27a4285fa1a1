//! The `Session` aggregate: everything a `GameEngine` owns for one game.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::{Card, Suit};
use crate::domain::rules::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    Lobby,
    Dealing,
    Bidding,
    ChooseTrump,
    Play,
    Scoring,
    RoundEnd,
}

/// Governs when `trump_revealed` flips from false to true during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HiddenTrumpMode {
    OpenImmediately,
    OnFirstNonfollow,
    OnFirstTrumpPlay,
    OnBidderNonfollow,
}

impl Default for HiddenTrumpMode {
    fn default() -> Self {
        HiddenTrumpMode::OnFirstNonfollow
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: String,
    pub display_name: String,
    pub seat: usize,
    pub is_bot: bool,
}

/// A recorded bid: either a pass or a value at or above the mode's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bid {
    Pass,
    Value(u8),
}

impl Bid {
    pub fn value(self) -> Option<u8> {
        match self {
            Bid::Pass => None,
            Bid::Value(v) => Some(v),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub winner: usize,
    pub cards: Vec<(usize, Card)>,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_number: u32,
    pub dealer: usize,
    pub bid_winner: usize,
    pub bid_value: u8,
    pub trump: Suit,
    pub captured_tricks: Vec<CompletedTrick>,
    pub points_by_seat: Vec<u32>,
    pub team_scores: (u32, u32),
    pub bid_made: bool,
}

/// Owns everything about one game: seating, deck, bids, tricks, and history.
///
/// A `Session` has no behavior of its own beyond simple accessors; all
/// mutation and validation lives in `GameEngine`, which holds one `Session`
/// behind a mutation lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub short_code: String,
    pub mode: Mode,
    pub seats: usize,
    pub min_bid: u8,
    pub hidden_trump_mode: HiddenTrumpMode,

    pub phase: SessionPhase,
    pub revision: u64,

    pub players: Vec<Option<PlayerInfo>>,

    pub current_dealer: usize,
    pub leader: usize,
    pub turn: usize,

    pub deck: Vec<Card>,
    pub hands: Vec<Vec<Card>>,
    pub kitty: Vec<Card>,

    pub bids: Vec<Option<Bid>>,
    pub current_highest: u8,
    pub bid_winner: Option<usize>,
    pub bid_value: Option<u8>,

    pub trump: Option<Suit>,
    pub trump_revealed: bool,

    pub current_trick: Vec<(usize, Card)>,
    pub last_trick: Option<CompletedTrick>,
    pub captured_tricks: Vec<CompletedTrick>,
    pub points_by_seat: Vec<u32>,

    pub rounds_history: Vec<RoundRecord>,
    /// How many rounds have already been appended to the persisted
    /// `round_history` collection, to guarantee at-most-once append.
    pub rounds_appended: usize,

    pub base_seed: u64,
    pub round_number: u32,

    pub created_at_unix: i64,
    pub updated_at_unix: i64,
    pub last_activity_at_unix: i64,
}

impl Session {
    pub fn new(
        id: Uuid,
        short_code: String,
        mode: Mode,
        hidden_trump_mode: HiddenTrumpMode,
        base_seed: u64,
        now_unix: i64,
    ) -> Self {
        let seats = mode.seats();
        Session {
            id,
            short_code,
            mode,
            seats,
            min_bid: mode.min_bid(),
            hidden_trump_mode,
            phase: SessionPhase::Lobby,
            revision: 0,
            players: vec![None; seats],
            current_dealer: 0,
            leader: 0,
            turn: 0,
            deck: Vec::new(),
            hands: vec![Vec::new(); seats],
            kitty: Vec::new(),
            bids: vec![None; seats],
            current_highest: 0,
            bid_winner: None,
            bid_value: None,
            trump: None,
            trump_revealed: false,
            current_trick: Vec::new(),
            last_trick: None,
            captured_tricks: Vec::new(),
            points_by_seat: vec![0; seats],
            rounds_history: Vec::new(),
            rounds_appended: 0,
            base_seed,
            round_number: 0,
            created_at_unix: now_unix,
            updated_at_unix: now_unix,
            last_activity_at_unix: now_unix,
        }
    }

    pub fn free_seat(&self) -> Option<usize> {
        self.players.iter().position(|p| p.is_none())
    }

    pub fn player_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_some()).count()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.current_trick.first().map(|(_, c)| c.suit)
    }

    pub fn touch(&mut self, now_unix: i64) {
        self.updated_at_unix = now_unix;
        self.last_activity_at_unix = now_unix;
        self.revision += 1;
    }
}
