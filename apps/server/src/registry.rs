//! `SessionRegistry`: process-wide `id → GameEngine` map.
//!
//! Exactly one `GameEngine` instance exists per live session; concurrent
//! callers resolving or loading the same id are serialized by the registry
//! mutex just long enough to agree on that instance; all further mutation
//! contention is the engine's own lock, not this one.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::bot_driver::BotCancellations;
use crate::domain::rules::Mode;
use crate::domain::state::HiddenTrumpMode;
use crate::engine::GameEngine;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::persistence::Repository;
use crate::ws::hub::BroadcastHub;

pub struct SessionRegistry {
    repo: Arc<dyn Repository>,
    live: Mutex<std::collections::HashMap<Uuid, Arc<GameEngine>>>,
    hub: Arc<BroadcastHub>,
    bot_cancellations: BotCancellations,
}

impl SessionRegistry {
    pub fn new(repo: Arc<dyn Repository>, hub: Arc<BroadcastHub>, bot_cancellations: BotCancellations) -> Self {
        SessionRegistry {
            repo,
            live: Mutex::new(std::collections::HashMap::new()),
            hub,
            bot_cancellations,
        }
    }

    /// Creates a brand-new session, inserts it live, and persists its
    /// initial (lobby) state.
    pub async fn create(&self, mode: Mode, hidden_trump_mode: HiddenTrumpMode, base_seed: u64) -> Result<Arc<GameEngine>, AppError> {
        let engine = Arc::new(GameEngine::start_new(mode, hidden_trump_mode, base_seed));
        let id = engine.id();
        crate::persistence::persist(self.repo.as_ref(), id, &engine.snapshot_session(), "create").await?;
        self.live.lock().insert(id, engine.clone());
        Ok(engine)
    }

    /// Resolves a UUID or short code to a session id, checking live sessions
    /// before falling back to the repository. Never creates anything.
    pub async fn resolve(&self, identifier: &str) -> Result<Option<Uuid>, AppError> {
        if let Ok(id) = Uuid::parse_str(identifier) {
            if self.live.lock().contains_key(&id) {
                return Ok(Some(id));
            }
            if self.repo.load_latest(id).await?.is_some() {
                return Ok(Some(id));
            }
        }
        self.repo.resolve_short_code(identifier).await
    }

    /// Returns the live engine for `id`, loading it from the repository and
    /// inserting it if it isn't already live. Exactly one load happens even
    /// under concurrent callers, because the whole check-and-load runs under
    /// the registry lock.
    pub async fn get_or_load(&self, id: Uuid) -> Result<Option<Arc<GameEngine>>, AppError> {
        {
            let live = self.live.lock();
            if let Some(engine) = live.get(&id) {
                return Ok(Some(engine.clone()));
            }
        }

        let Some((_, session)) = self.repo.load_latest(id).await? else {
            return Ok(None);
        };
        let engine = Arc::new(GameEngine::new(session));

        let mut live = self.live.lock();
        // Another caller may have raced us to the load; keep whichever
        // instance is already registered so every caller shares one engine.
        let entry = live.entry(id).or_insert(engine);
        Ok(Some(entry.clone()))
    }

    /// Cancels the bot driver for `id`, closes its broadcast hub subscriber
    /// set, and removes it from the live map. The repository row is left
    /// intact; deleting it is an admin-only operation, not part of this path.
    pub fn delete(&self, id: Uuid) {
        self.bot_cancellations.cancel(id);
        self.hub.close_session(id);
        self.live.lock().remove(&id);
    }

    pub fn session_not_found() -> AppError {
        AppError::not_found(ErrorCode::SessionNotFound, "session does not exist")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::memory::InMemoryRepository;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(BroadcastHub::new()),
            BotCancellations::new(),
        )
    }

    #[tokio::test]
    async fn create_then_resolve_by_uuid_and_short_code() {
        let reg = registry();
        let engine = reg.create(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 1).await.unwrap();
        let id = engine.id();
        let code = engine.short_code();

        assert_eq!(reg.resolve(&id.to_string()).await.unwrap(), Some(id));
        assert_eq!(reg.resolve(&code).await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn get_or_load_returns_the_same_live_instance() {
        let reg = registry();
        let engine = reg.create(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 1).await.unwrap();
        let id = engine.id();

        let loaded = reg.get_or_load(id).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&engine, &loaded));
    }

    #[tokio::test]
    async fn get_or_load_on_unknown_id_returns_none() {
        let reg = registry();
        assert!(reg.get_or_load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_from_live_set() {
        let reg = registry();
        let engine = reg.create(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 1).await.unwrap();
        let id = engine.id();
        reg.delete(id);
        // Still resolvable via the repository, just no longer "live" without a reload.
        let reloaded = reg.get_or_load(id).await.unwrap();
        assert!(reloaded.is_some());
    }

    #[tokio::test]
    async fn delete_cancels_bot_driver_and_closes_hub() {
        let hub = Arc::new(BroadcastHub::new());
        let cancellations = BotCancellations::new();
        let reg = SessionRegistry::new(Arc::new(InMemoryRepository::new()), hub.clone(), cancellations.clone());

        let engine = reg.create(Mode::Twenty8, HiddenTrumpMode::OnFirstNonfollow, 1).await.unwrap();
        let id = engine.id();
        assert!(!cancellations.is_cancelled(id));

        reg.delete(id);
        assert!(cancellations.is_cancelled(id));
    }
}
