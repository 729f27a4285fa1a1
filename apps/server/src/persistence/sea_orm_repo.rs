//! Postgres-backed repository via sea-orm.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Repository, SessionMetadata, SnapshotMeta};
use crate::domain::state::{RoundRecord, Session};
use crate::entities::{games, players, round_history, snapshots};
use crate::error::AppError;

pub struct SeaOrmRepository {
    db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[async_trait]
impl Repository for SeaOrmRepository {
    async fn save_session(
        &self,
        id: Uuid,
        metadata: SessionMetadata,
        session: &Session,
        reason: &str,
    ) -> Result<(), AppError> {
        let existing = games::Entity::find_by_id(id).one(&self.db).await?;
        let updated_at = OffsetDateTime::from_unix_timestamp(session.updated_at_unix)
            .unwrap_or_else(|_| now());
        let last_activity_at = OffsetDateTime::from_unix_timestamp(session.last_activity_at_unix)
            .unwrap_or_else(|_| now());

        let model = games::ActiveModel {
            id: Set(id),
            short_code: Set(metadata.short_code.clone()),
            mode: Set(session.mode.as_str().to_string()),
            seats: Set(session.seats as i16),
            min_bid: Set(session.min_bid as i16),
            hidden_trump_mode: Set(format!("{:?}", session.hidden_trump_mode)),
            state: Set(phase_to_enum(session.phase)),
            created_at: Set(existing
                .as_ref()
                .map(|g| g.created_at)
                .unwrap_or_else(now)),
            updated_at: Set(updated_at),
            last_activity_at: Set(last_activity_at),
        };

        match existing {
            Some(_) => {
                model.update(&self.db).await?;
            }
            None => {
                model.insert(&self.db).await?;
            }
        }

        for info in session.players.iter().flatten() {
            upsert_player(&self.db, id, info).await?;
        }

        let blob = serde_json::to_value(session)
            .map_err(|e| AppError::internal(format!("failed to serialize session: {e}")))?;
        let snapshot = snapshots::ActiveModel {
            id: sea_orm::NotSet,
            session_id: Set(id),
            created_at: Set(now()),
            state_phase: Set(metadata.state_phase),
            reason: Set(reason.to_string()),
            blob: Set(blob),
        };
        snapshot.insert(&self.db).await?;
        Ok(())
    }

    async fn append_round(&self, id: Uuid, round_index: u32, round: &RoundRecord) -> Result<(), AppError> {
        let already = round_history::Entity::find()
            .filter(round_history::Column::SessionId.eq(id))
            .filter(round_history::Column::RoundNumber.eq(round_index as i32))
            .one(&self.db)
            .await?;
        if already.is_some() {
            return Ok(());
        }

        let payload = serde_json::to_value(round)
            .map_err(|e| AppError::internal(format!("failed to serialize round: {e}")))?;
        let model = round_history::ActiveModel {
            id: sea_orm::NotSet,
            session_id: Set(id),
            round_number: Set(round_index as i32),
            dealer: Set(round.dealer as i16),
            bid_winner: Set(round.bid_winner as i16),
            bid_value: Set(round.bid_value as i16),
            trump: Set(round.trump.to_string()),
            payload: Set(payload),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn load_latest(&self, id: Uuid) -> Result<Option<(SessionMetadata, Session)>, AppError> {
        let Some(latest) = snapshots::Entity::find()
            .filter(snapshots::Column::SessionId.eq(id))
            .order_by_desc(snapshots::Column::CreatedAt)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let session: Session = serde_json::from_value(latest.blob)
            .map_err(|e| AppError::internal(format!("failed to deserialize session: {e}")))?;
        let metadata = SessionMetadata {
            short_code: session.short_code.clone(),
            state_phase: latest.state_phase,
        };
        Ok(Some((metadata, session)))
    }

    async fn resolve_short_code(&self, short_code: &str) -> Result<Option<Uuid>, AppError> {
        let game = games::Entity::find()
            .filter(games::Column::ShortCode.eq(short_code))
            .one(&self.db)
            .await?;
        Ok(game.map(|g| g.id))
    }

    async fn list_snapshots(&self, id: Uuid) -> Result<Vec<SnapshotMeta>, AppError> {
        let rows = snapshots::Entity::find()
            .filter(snapshots::Column::SessionId.eq(id))
            .order_by_asc(snapshots::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| SnapshotMeta {
                created_at_unix: r.created_at.unix_timestamp(),
                state_phase: r.state_phase,
                reason: r.reason,
            })
            .collect())
    }
}

fn phase_to_enum(phase: crate::domain::state::SessionPhase) -> games::GameState {
    use crate::domain::state::SessionPhase::*;
    match phase {
        Lobby => games::GameState::Lobby,
        Dealing => games::GameState::Lobby,
        Bidding => games::GameState::Bidding,
        ChooseTrump => games::GameState::ChooseTrump,
        Play => games::GameState::Play,
        Scoring => games::GameState::Scoring,
        RoundEnd => games::GameState::RoundEnd,
    }
}

async fn upsert_player(
    db: &DatabaseConnection,
    session_id: Uuid,
    info: &crate::domain::state::PlayerInfo,
) -> Result<(), AppError> {
    let existing = players::Entity::find()
        .filter(players::Column::SessionId.eq(session_id))
        .filter(players::Column::Seat.eq(info.seat as i16))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let mut active: players::ActiveModel = row.into();
            active.player_id = Set(info.player_id.clone());
            active.name = Set(info.display_name.clone());
            active.is_bot = Set(info.is_bot);
            active.update(db).await?;
        }
        None => {
            let active = players::ActiveModel {
                id: sea_orm::NotSet,
                session_id: Set(session_id),
                player_id: Set(info.player_id.clone()),
                name: Set(info.display_name.clone()),
                seat: Set(info.seat as i16),
                is_bot: Set(info.is_bot),
                joined_at: Set(now()),
            };
            active.insert(db).await?;
        }
    }
    Ok(())
}
