use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "game_state")]
pub enum GameState {
    #[sea_orm(string_value = "LOBBY")]
    Lobby,
    #[sea_orm(string_value = "BIDDING")]
    Bidding,
    #[sea_orm(string_value = "CHOOSE_TRUMP")]
    ChooseTrump,
    #[sea_orm(string_value = "PLAY")]
    Play,
    #[sea_orm(string_value = "SCORING")]
    Scoring,
    #[sea_orm(string_value = "ROUND_END")]
    RoundEnd,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "short_code", unique)]
    pub short_code: String,
    pub mode: String,
    pub seats: i16,
    #[sea_orm(column_name = "min_bid")]
    pub min_bid: i16,
    #[sea_orm(column_name = "hidden_trump_mode")]
    pub hidden_trump_mode: String,
    pub state: GameState,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "last_activity_at")]
    pub last_activity_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::players::Entity")]
    Players,
    #[sea_orm(has_many = "super::snapshots::Entity")]
    Snapshots,
    #[sea_orm(has_many = "super::round_history::Entity")]
    RoundHistory,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl Related<super::snapshots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snapshots.def()
    }
}

impl Related<super::round_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoundHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
