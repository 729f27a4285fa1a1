//! Bot policy trait definition.

use std::fmt;

use crate::domain::cards::{Card, Suit};
use crate::domain::snapshot::{HandView, PublicState};
use crate::domain::state::Bid;
use crate::error::AppError;

/// Errors that can occur during bot decision-making.
#[derive(Debug)]
pub enum AiError {
    /// The policy was asked to decide with no legal options available.
    InvalidMove(String),
    /// The policy encountered an internal error.
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::InvalidMove(msg) => write!(f, "bot invalid move: {msg}"),
            AiError::Internal(msg) => write!(f, "bot internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("bot error: {err}"))
    }
}

/// A seat-local decision policy for a bot-controlled player.
///
/// Implementations receive the same private `HandView` a human client would
/// see for that seat, plus the public table state, and must choose among the
/// legal options already computed there. `BotDriver` calls these only when
/// the corresponding legal set is non-empty.
pub trait BotPolicy: Send + Sync {
    /// Choose a bid (or pass). `view.legal_bids` gives the legal value bids;
    /// passing is always additionally legal while bidding is open.
    fn choose_bid(&self, view: &HandView, public: &PublicState) -> Result<Bid, AiError>;

    /// Choose a card to play from `view.legal_plays`.
    fn choose_play(&self, view: &HandView, public: &PublicState) -> Result<Card, AiError>;

    /// Choose the trump suit after winning the bid.
    fn choose_trump(&self, view: &HandView, public: &PublicState) -> Result<Suit, AiError>;
}
