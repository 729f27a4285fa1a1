//! The engine's error taxonomy.
//!
//! `EngineError` is what every `GameEngine` mutation returns on rejection. It
//! carries no I/O concerns; the dispatcher layer is responsible for turning
//! one of these into an `action_failed` message or, for infrastructure
//! failures elsewhere in the stack, into an `AppError`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    WrongState,
    NotYourTurn,
    NotBidWinner,
    InvalidValue,
    MustFollowSuit,
    CardNotInHand,
    AlreadyActed,
    DuplicateAction,
    SessionFull,
    SessionNotFound,
    BidTooLow,
    TrumpAlreadyRevealed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::WrongState => "WRONG_STATE",
            ErrorKind::NotYourTurn => "NOT_YOUR_TURN",
            ErrorKind::NotBidWinner => "NOT_BID_WINNER",
            ErrorKind::InvalidValue => "INVALID_VALUE",
            ErrorKind::MustFollowSuit => "MUST_FOLLOW_SUIT",
            ErrorKind::CardNotInHand => "CARD_NOT_IN_HAND",
            ErrorKind::AlreadyActed => "ALREADY_ACTED",
            ErrorKind::DuplicateAction => "DUPLICATE_ACTION",
            ErrorKind::SessionFull => "SESSION_FULL",
            ErrorKind::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorKind::BidTooLow => "BID_TOO_LOW",
            ErrorKind::TrumpAlreadyRevealed => "TRUMP_ALREADY_REVEALED",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind}: {message}")]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EngineError {
            kind,
            message: message.into(),
        }
    }

    pub fn wrong_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongState, message)
    }

    pub fn not_your_turn() -> Self {
        Self::new(ErrorKind::NotYourTurn, "it is not this seat's turn")
    }

    pub fn not_bid_winner() -> Self {
        Self::new(ErrorKind::NotBidWinner, "only the bid winner may choose trump")
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    pub fn must_follow_suit() -> Self {
        Self::new(ErrorKind::MustFollowSuit, "must follow the lead suit")
    }

    pub fn card_not_in_hand() -> Self {
        Self::new(ErrorKind::CardNotInHand, "card is not in this seat's hand")
    }

    pub fn already_acted() -> Self {
        Self::new(ErrorKind::AlreadyActed, "this seat has already acted this round")
    }

    pub fn duplicate_action(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateAction, message)
    }

    pub fn session_full() -> Self {
        Self::new(ErrorKind::SessionFull, "session has no free seats")
    }

    pub fn session_not_found() -> Self {
        Self::new(ErrorKind::SessionNotFound, "session does not exist")
    }

    pub fn bid_too_low(min: u8) -> Self {
        Self::new(ErrorKind::BidTooLow, format!("bid must exceed the current highest and be at least {min}"))
    }

    pub fn trump_already_revealed() -> Self {
        Self::new(ErrorKind::TrumpAlreadyRevealed, "trump has already been revealed")
    }
}
