//! Persistence contract between the engine and durable storage.
//!
//! The engine never talks to a database directly; it hands a serialized
//! `Session` to whatever implements [`Repository`] after each accepted
//! mutation. Two implementations are provided: [`memory::InMemoryRepository`]
//! for tests and local development, and [`sea_orm_repo::SeaOrmRepository`]
//! for production.

pub mod memory;
pub mod sea_orm_repo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::state::{RoundRecord, Session};
use crate::error::AppError;

/// Row-level metadata tracked alongside the serialized `Session` blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub short_code: String,
    pub state_phase: String,
}

/// One entry from `list_snapshots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub created_at_unix: i64,
    pub state_phase: String,
    pub reason: String,
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn save_session(
        &self,
        id: Uuid,
        metadata: SessionMetadata,
        session: &Session,
        reason: &str,
    ) -> Result<(), AppError>;

    async fn append_round(&self, id: Uuid, round_index: u32, round: &RoundRecord) -> Result<(), AppError>;

    async fn load_latest(&self, id: Uuid) -> Result<Option<(SessionMetadata, Session)>, AppError>;

    async fn resolve_short_code(&self, short_code: &str) -> Result<Option<Uuid>, AppError>;

    async fn list_snapshots(&self, id: Uuid) -> Result<Vec<SnapshotMeta>, AppError>;
}

/// Persists `session` and appends any round history not yet durable,
/// per the at-most-once guarantee tracked by `Session::rounds_appended`.
///
/// Returns how many new rounds were appended, so the caller can advance
/// the engine's `rounds_appended` counter without the repository needing
/// to know about engine internals.
pub async fn persist(
    repo: &dyn Repository,
    id: Uuid,
    session: &Session,
    reason: &str,
) -> Result<usize, AppError> {
    let metadata = SessionMetadata {
        short_code: session.short_code.clone(),
        state_phase: format!("{:?}", session.phase),
    };
    repo.save_session(id, metadata, session, reason).await?;

    let pending = &session.rounds_history[session.rounds_appended..];
    for (offset, round) in pending.iter().enumerate() {
        let round_index = (session.rounds_appended + offset) as u32;
        repo.append_round(id, round_index, round).await?;
    }
    Ok(pending.len())
}
