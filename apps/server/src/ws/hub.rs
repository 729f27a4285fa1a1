//! `BroadcastHub`: per-session fan-out of state snapshots to subscribers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::snapshot::HandView;
use crate::engine::GameEngine;
use crate::ws::protocol::ServerMsg;

/// Delivered to a subscriber's websocket actor whenever its session's
/// snapshot changes. The actor is responsible for serializing and writing
/// it to the socket.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Push(pub Arc<ServerMsg>);

struct Subscriber {
    recipient: Recipient<Push>,
    seat: Option<usize>,
    player_id: Option<String>,
    last_sent_revision: u64,
}

#[derive(Default)]
struct SessionSubscribers {
    next_id: AtomicU64,
    subscribers: DashMap<u64, Subscriber>,
}

/// Process-wide map of session id to its subscriber set.
#[derive(Default)]
pub struct BroadcastHub {
    sessions: DashMap<Uuid, Arc<SessionSubscribers>>,
}

/// A subscriber's handle into the hub, used to identify or unsubscribe it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId {
    pub session_id: Uuid,
    pub local_id: u64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: Uuid, recipient: Recipient<Push>) -> SubscriberId {
        let entry = self.sessions.entry(session_id).or_default().clone();
        let local_id = entry.next_id.fetch_add(1, Ordering::Relaxed);
        entry.subscribers.insert(
            local_id,
            Subscriber {
                recipient,
                seat: None,
                player_id: None,
                last_sent_revision: 0,
            },
        );
        SubscriberId { session_id, local_id }
    }

    /// Binds (or rebinds) a subscriber to a seat, after validating
    /// `player_id` against the seat's `PlayerInfo`. A connection may call
    /// this again later to rebind after restoring a session.
    pub fn identify(&self, id: SubscriberId, engine: &GameEngine, seat: usize, player_id: String) -> bool {
        let public = engine.public_state();
        let Some(Some(info)) = public.players.get(seat) else {
            return false;
        };
        if info.player_id != player_id {
            return false;
        }
        let Some(session) = self.sessions.get(&id.session_id) else {
            return false;
        };
        let Some(mut sub) = session.subscribers.get_mut(&id.local_id) else {
            return false;
        };
        sub.seat = Some(seat);
        sub.player_id = Some(player_id);
        true
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        if let Some(session) = self.sessions.get(&id.session_id) {
            session.subscribers.remove(&id.local_id);
        }
    }

    /// Drops every subscriber for `session_id` in one step. Called when a
    /// session is deleted; subsequent `broadcast`/`send_to` calls for that
    /// id are no-ops since there's no subscriber set left to find.
    pub fn close_session(&self, session_id: Uuid) {
        self.sessions.remove(&session_id);
    }

    /// Builds the engine's current public snapshot once, tailors it with
    /// each subscriber's own hand, and pushes it to every subscriber whose
    /// last-sent revision is behind. Dead subscribers (send failed) are
    /// dropped; they never delay the others.
    pub fn broadcast(&self, session_id: Uuid, engine: &GameEngine) {
        let Some(session) = self.sessions.get(&session_id) else {
            return;
        };
        let public = engine.public_state();
        let revision = public.revision;

        let mut dead = Vec::new();
        for mut entry in session.subscribers.iter_mut() {
            if entry.last_sent_revision >= revision {
                continue;
            }
            let owner_hand: Option<HandView> = entry.seat.map(|seat| engine.hand_for(seat));
            let msg = Arc::new(ServerMsg::StateSnapshot {
                state: Box::new(public.clone()),
                owner_hand,
            });
            if entry.recipient.do_send(Push(msg)).is_err() {
                dead.push(*entry.key());
            } else {
                entry.last_sent_revision = revision;
            }
        }
        for id in dead {
            session.subscribers.remove(&id);
        }
    }

    /// Sends the current snapshot to one subscriber only, regardless of
    /// whether its last-sent revision is already current. Used for
    /// `request_state`.
    pub fn send_to(&self, id: SubscriberId, engine: &GameEngine) {
        let Some(session) = self.sessions.get(&id.session_id) else {
            return;
        };
        let Some(mut sub) = session.subscribers.get_mut(&id.local_id) else {
            return;
        };
        let public = engine.public_state();
        let owner_hand = sub.seat.map(|seat| engine.hand_for(seat));
        let msg = Arc::new(ServerMsg::StateSnapshot {
            state: Box::new(public.clone()),
            owner_hand,
        });
        if sub.recipient.do_send(Push(msg)).is_ok() {
            sub.last_sent_revision = public.revision;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_hub_has_no_sessions() {
        let hub = BroadcastHub::new();
        assert!(hub.sessions.is_empty());
    }

    #[test]
    fn close_session_drops_its_subscriber_set() {
        let hub = BroadcastHub::new();
        let id = Uuid::new_v4();
        hub.sessions.entry(id).or_default();
        assert!(hub.sessions.contains_key(&id));
        hub.close_session(id);
        assert!(!hub.sessions.contains_key(&id));
    }
}
