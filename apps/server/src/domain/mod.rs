//! Domain layer: pure game logic types and helpers.
//!
//! Everything here operates on plain data (`Session`, `Card`, ...) with no
//! I/O and no knowledge of actix, sea-orm, or the wire protocol. `GameEngine`
//! is the only caller of the mutation functions (`bidding`, `tricks`,
//! `scoring`); `snapshot` is the only caller-facing read path.

pub mod bidding;
pub mod cards;
pub mod dealing;
pub mod errors;
pub mod rules;
pub mod scoring;
pub mod short_code;
pub mod snapshot;
pub mod state;
pub mod tricks;

pub use cards::{hand_has_suit, parse_card_id, Card, Rank, Suit};
pub use dealing::{deal_round, derive_round_seed};
pub use errors::{EngineError, ErrorKind};
pub use rules::Mode;
pub use snapshot::{public_state, HandView, PublicState};
pub use state::{Bid, HiddenTrumpMode, PlayerInfo, Session, SessionPhase};
