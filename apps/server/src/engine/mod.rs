//! The `GameEngine`: the sole owner of one `Session`'s mutation lock.

mod game_engine;

pub use game_engine::{GameEngine, PlayerSlot};
