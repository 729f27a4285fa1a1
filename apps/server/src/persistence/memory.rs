//! In-process repository backed by a `DashMap`. Used for tests and local
//! development without a Postgres instance.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Repository, SessionMetadata, SnapshotMeta};
use crate::domain::state::{RoundRecord, Session};
use crate::error::AppError;

struct StoredGame {
    metadata: SessionMetadata,
    session: Session,
    snapshots: Vec<SnapshotMeta>,
    rounds: Vec<RoundRecord>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    games: DashMap<Uuid, StoredGame>,
    short_codes: DashMap<String, Uuid>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn save_session(
        &self,
        id: Uuid,
        metadata: SessionMetadata,
        session: &Session,
        reason: &str,
    ) -> Result<(), AppError> {
        self.short_codes.insert(metadata.short_code.clone(), id);
        let snap = SnapshotMeta {
            created_at_unix: session.updated_at_unix,
            state_phase: metadata.state_phase.clone(),
            reason: reason.to_string(),
        };
        match self.games.get_mut(&id) {
            Some(mut entry) => {
                entry.metadata = metadata;
                entry.session = session.clone();
                entry.snapshots.push(snap);
            }
            None => {
                self.games.insert(
                    id,
                    StoredGame {
                        metadata,
                        session: session.clone(),
                        snapshots: vec![snap],
                        rounds: Vec::new(),
                    },
                );
            }
        }
        Ok(())
    }

    async fn append_round(&self, id: Uuid, round_index: u32, round: &RoundRecord) -> Result<(), AppError> {
        let mut entry = self
            .games
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(crate::errors::ErrorCode::SessionNotFound, "no such session"))?;
        if entry.rounds.iter().any(|r| r.round_number == round.round_number) {
            return Ok(());
        }
        debug_assert_eq!(round_index as usize, entry.rounds.len());
        entry.rounds.push(round.clone());
        Ok(())
    }

    async fn load_latest(&self, id: Uuid) -> Result<Option<(SessionMetadata, Session)>, AppError> {
        Ok(self.games.get(&id).map(|e| (e.metadata.clone(), e.session.clone())))
    }

    async fn resolve_short_code(&self, short_code: &str) -> Result<Option<Uuid>, AppError> {
        Ok(self.short_codes.get(short_code).map(|id| *id))
    }

    async fn list_snapshots(&self, id: Uuid) -> Result<Vec<SnapshotMeta>, AppError> {
        Ok(self
            .games
            .get(&id)
            .map(|e| e.snapshots.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::Mode;
    use crate::domain::state::HiddenTrumpMode;

    fn sample_session() -> Session {
        Session::new(
            Uuid::new_v4(),
            "quiet-otter-03".into(),
            Mode::Twenty8,
            HiddenTrumpMode::OnFirstNonfollow,
            1,
            1_700_000_000,
        )
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemoryRepository::new();
        let session = sample_session();
        let metadata = SessionMetadata {
            short_code: session.short_code.clone(),
            state_phase: "LOBBY".into(),
        };
        repo.save_session(session.id, metadata, &session, "create").await.unwrap();

        let (_, loaded) = repo.load_latest(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, session.id);
    }

    #[tokio::test]
    async fn resolve_short_code_finds_the_session() {
        let repo = InMemoryRepository::new();
        let session = sample_session();
        let metadata = SessionMetadata {
            short_code: session.short_code.clone(),
            state_phase: "LOBBY".into(),
        };
        repo.save_session(session.id, metadata, &session, "create").await.unwrap();

        let resolved = repo.resolve_short_code(&session.short_code).await.unwrap();
        assert_eq!(resolved, Some(session.id));
    }

    #[tokio::test]
    async fn append_round_is_idempotent_by_round_number() {
        let repo = InMemoryRepository::new();
        let session = sample_session();
        let metadata = SessionMetadata {
            short_code: session.short_code.clone(),
            state_phase: "PLAY".into(),
        };
        repo.save_session(session.id, metadata, &session, "create").await.unwrap();

        let round = RoundRecord {
            round_number: 0,
            dealer: 0,
            bid_winner: 1,
            bid_value: 16,
            trump: crate::domain::cards::Suit::Hearts,
            captured_tricks: Vec::new(),
            points_by_seat: vec![0; 4],
            team_scores: (0, 0),
            bid_made: false,
        };
        repo.append_round(session.id, 0, &round).await.unwrap();
        repo.append_round(session.id, 0, &round).await.unwrap();
        assert_eq!(repo.games.get(&session.id).unwrap().rounds.len(), 1);
    }
}
