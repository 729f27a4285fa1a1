use std::sync::Arc;

use crate::bot_driver::{BotCancellations, BotDriver};
use crate::persistence::Repository;
use crate::registry::SessionRegistry;
use crate::ws::hub::BroadcastHub;

/// Shared application state, handed to every route and websocket actor.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub hub: Arc<BroadcastHub>,
    pub repo: Arc<dyn Repository>,
    pub bot_driver: Arc<BotDriver>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, bot_timing: crate::config::settings::BotTiming) -> Self {
        let hub = Arc::new(BroadcastHub::new());
        let bot_cancellations = BotCancellations::new();
        let registry = Arc::new(SessionRegistry::new(repo.clone(), hub.clone(), bot_cancellations.clone()));
        let bot_driver = Arc::new(BotDriver::new(registry.clone(), hub.clone(), repo.clone(), bot_timing, bot_cancellations));
        AppState {
            registry,
            hub,
            repo,
            bot_driver,
        }
    }
}
