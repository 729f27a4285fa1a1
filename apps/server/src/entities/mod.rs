pub mod games;
pub mod players;
pub mod round_history;
pub mod snapshots;

pub use games::Entity as Games;
pub use games::Model as Game;
pub use players::Entity as Players;
pub use players::Model as Player;
pub use round_history::Entity as RoundHistory;
pub use round_history::Model as RoundHistoryRecord;
pub use snapshots::Entity as Snapshots;
pub use snapshots::Model as Snapshot;
