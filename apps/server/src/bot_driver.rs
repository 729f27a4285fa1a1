//! `BotDriver`: per-session cooperative loop that acts on behalf of bot
//! seats after every accepted mutation.
//!
//! `notify` is cheap to call from the dispatcher after every command: it
//! spawns a task only if one isn't already running for that session, so a
//! burst of human moves never starts more than one bot loop per session.
//! The loop itself has no retry logic — a rejected bot action just ends the
//! loop; the next `notify` (from the next accepted human or bot move) will
//! re-evaluate from the current snapshot.

use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use uuid::Uuid;

use crate::ai::{self, BotConfig};
use crate::config::settings::BotTiming;
use crate::domain::state::{Bid, SessionPhase};
use crate::engine::GameEngine;
use crate::persistence::{self, Repository};
use crate::registry::SessionRegistry;
use crate::ws::hub::BroadcastHub;

/// Set of session ids whose bot loop must never run again, shared between
/// `BotDriver` and `SessionRegistry` so `delete` can cancel a loop without
/// either side holding an `Arc` back to the other.
#[derive(Clone, Default)]
pub struct BotCancellations(Arc<DashMap<Uuid, ()>>);

impl BotCancellations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self, session_id: Uuid) {
        self.0.insert(session_id, ());
    }

    pub fn is_cancelled(&self, session_id: Uuid) -> bool {
        self.0.contains_key(&session_id)
    }
}

pub struct BotDriver {
    registry: Arc<SessionRegistry>,
    hub: Arc<BroadcastHub>,
    repo: Arc<dyn Repository>,
    timing: BotTiming,
    running: Arc<DashMap<Uuid, ()>>,
    cancellations: BotCancellations,
}

impl BotDriver {
    pub fn new(
        registry: Arc<SessionRegistry>,
        hub: Arc<BroadcastHub>,
        repo: Arc<dyn Repository>,
        timing: BotTiming,
        cancellations: BotCancellations,
    ) -> Self {
        BotDriver {
            registry,
            hub,
            repo,
            timing,
            running: Arc::new(DashMap::new()),
            cancellations,
        }
    }

    /// Ensures a bot loop is running for `session_id`. A no-op if one
    /// already is, or if the session has been cancelled (deleted).
    pub fn notify(&self, session_id: Uuid) {
        if self.cancellations.is_cancelled(session_id) {
            return;
        }
        if self.running.insert(session_id, ()).is_some() {
            return;
        }

        let registry = self.registry.clone();
        let hub = self.hub.clone();
        let repo = self.repo.clone();
        let timing = self.timing;
        let running = self.running.clone();
        let cancellations = self.cancellations.clone();

        tokio::spawn(async move {
            run_loop(registry, hub, repo.as_ref(), timing, session_id, &cancellations).await;
            running.remove(&session_id);
        });
    }
}

async fn run_loop(
    registry: Arc<SessionRegistry>,
    hub: Arc<BroadcastHub>,
    repo: &dyn Repository,
    timing: BotTiming,
    session_id: Uuid,
    cancellations: &BotCancellations,
) {
    loop {
        if cancellations.is_cancelled(session_id) {
            return;
        }

        let Ok(Some(engine)) = registry.get_or_load(session_id).await else {
            return;
        };

        let Some(seat) = acting_bot_seat(&engine) else {
            return;
        };

        let delay = {
            let mut rng = rand::rng();
            let min = timing.min_delay.as_millis() as u64;
            let max = timing.max_delay.as_millis().max(min as u128 + 1) as u64;
            rng.random_range(min..=max)
        };
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;

        let policy = match ai::create_policy("random", BotConfig::default()) {
            Some(p) => p,
            None => return,
        };

        let phase = engine.current_actor().0;
        let view = engine.hand_for(seat);
        let public = engine.public_state();

        let outcome = match phase {
            SessionPhase::Bidding => match policy.choose_bid(&view, &public) {
                Ok(bid) => engine.place_bid(seat, bid).map(|_| "place_bid"),
                Err(_) => return,
            },
            SessionPhase::ChooseTrump => match policy.choose_trump(&view, &public) {
                Ok(suit) => engine.choose_trump(seat, suit).map(|_| "choose_trump"),
                Err(_) => return,
            },
            SessionPhase::Play => match policy.choose_play(&view, &public) {
                Ok(card) => engine.play_card(seat, card).map(|_| "play_card"),
                Err(_) => return,
            },
            _ => return,
        };

        match outcome {
            Ok(reason) => {
                let newly_appended = match persistence::persist(repo, session_id, &engine.snapshot_session(), reason).await {
                    Ok(n) => n,
                    Err(_) => return,
                };
                engine.mark_rounds_appended(newly_appended);
                hub.broadcast(session_id, &engine);
            }
            Err(_) => {
                hub.broadcast(session_id, &engine);
                return;
            }
        }
    }
}

/// The seat whose bot should act next, or `None` if it's a human's turn or
/// the session is in a phase with no single actor.
fn acting_bot_seat(engine: &GameEngine) -> Option<usize> {
    let (phase, turn, bid_winner) = engine.current_actor();
    let seat = match phase {
        SessionPhase::Bidding | SessionPhase::Play => turn,
        SessionPhase::ChooseTrump => bid_winner?,
        _ => return None,
    };
    let slot = engine.player_at(seat)?;
    slot.is_bot.then_some(seat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::Mode;
    use crate::domain::state::{HiddenTrumpMode, PlayerInfo};
    use crate::persistence::memory::InMemoryRepository;

    fn fresh_registry() -> (Arc<SessionRegistry>, Arc<BroadcastHub>, Arc<dyn Repository>) {
        let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
        let hub = Arc::new(BroadcastHub::new());
        let registry = Arc::new(SessionRegistry::new(repo.clone(), hub.clone(), BotCancellations::new()));
        (registry, hub, repo)
    }

    #[tokio::test]
    async fn acting_bot_seat_is_none_when_lobby() {
        let (registry, _hub, _repo) = fresh_registry();
        let engine = registry.create(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 1).await.unwrap();
        assert!(acting_bot_seat(&engine).is_none());
    }

    #[tokio::test]
    async fn acting_bot_seat_finds_the_bidding_bot() {
        let (registry, _hub, _repo) = fresh_registry();
        let engine = registry.create(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 1).await.unwrap();
        engine
            .add_player(PlayerInfo { player_id: "human".into(), display_name: "H".into(), seat: 0, is_bot: false })
            .unwrap();
        engine.start_round(true).unwrap();
        let seat = acting_bot_seat(&engine);
        assert!(seat.is_some());
    }
}
