use sea_orm::Statement;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----

#[derive(Iden)]
enum Games {
    Table,
    Id,
    ShortCode,
    Mode,
    Seats,
    MinBid,
    HiddenTrumpMode,
    State,
    CreatedAt,
    UpdatedAt,
    LastActivityAt,
}

#[derive(Iden)]
enum GameStateEnum {
    #[iden = "game_state"]
    Type,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    SessionId,
    PlayerId,
    Name,
    Seat,
    IsBot,
    JoinedAt,
}

#[derive(Iden)]
enum Snapshots {
    Table,
    Id,
    SessionId,
    CreatedAt,
    StatePhase,
    Reason,
    Blob,
}

#[derive(Iden)]
enum RoundHistory {
    Table,
    Id,
    SessionId,
    RoundNumber,
    Dealer,
    BidWinner,
    BidValue,
    Trump,
    Payload,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the game_state enum (PostgreSQL only; SQLite stores it as TEXT)
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                async fn enum_exists(
                    manager: &SchemaManager<'_>,
                    enum_name: &str,
                ) -> Result<bool, DbErr> {
                    let result = manager
                        .get_connection()
                        .query_one(Statement::from_string(
                            sea_orm::DatabaseBackend::Postgres,
                            format!("SELECT 1 FROM pg_type WHERE typname = '{}'", enum_name),
                        ))
                        .await?;
                    Ok(result.is_some())
                }

                if !enum_exists(manager, "game_state").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(GameStateEnum::Type)
                                .values([
                                    "LOBBY",
                                    "BIDDING",
                                    "CHOOSE_TRUMP",
                                    "PLAY",
                                    "SCORING",
                                    "ROUND_END",
                                ])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            sea_orm::DatabaseBackend::Sqlite => {}
            _ => return Err(DbErr::Custom("Unsupported database backend".into())),
        }

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::ShortCode).string().not_null())
                    .col(ColumnDef::new(Games::Mode).string().not_null())
                    .col(ColumnDef::new(Games::Seats).small_integer().not_null())
                    .col(ColumnDef::new(Games::MinBid).small_integer().not_null())
                    .col(
                        ColumnDef::new(Games::HiddenTrumpMode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::State)
                            .custom(GameStateEnum::Type)
                            .not_null()
                            .default("LOBBY"),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::LastActivityAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_games_short_code")
                    .table(Games::Table)
                    .col(Games::ShortCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_state")
                    .table(Games::Table)
                    .col(Games::State)
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::SessionId).uuid().not_null())
                    .col(ColumnDef::new(Players::PlayerId).string().not_null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(ColumnDef::new(Players::Seat).small_integer().not_null())
                    .col(
                        ColumnDef::new(Players::IsBot)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Players::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_session_id")
                            .from(Players::Table, Players::SessionId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_players_session_id")
                    .table(Players::Table)
                    .col(Players::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_session_seat")
                    .table(Players::Table)
                    .col(Players::SessionId)
                    .col(Players::Seat)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // snapshots
        manager
            .create_table(
                Table::create()
                    .table(Snapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Snapshots::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Snapshots::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Snapshots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Snapshots::StatePhase).string().not_null())
                    .col(ColumnDef::new(Snapshots::Reason).string().not_null())
                    .col(ColumnDef::new(Snapshots::Blob).json_binary().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_snapshots_session_id")
                            .from(Snapshots::Table, Snapshots::SessionId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_snapshots_session_id")
                    .table(Snapshots::Table)
                    .col(Snapshots::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_snapshots_session_created")
                    .table(Snapshots::Table)
                    .col(Snapshots::SessionId)
                    .col(Snapshots::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // round_history
        manager
            .create_table(
                Table::create()
                    .table(RoundHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoundHistory::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(RoundHistory::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(RoundHistory::RoundNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundHistory::Dealer)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundHistory::BidWinner)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundHistory::BidValue)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoundHistory::Trump).string().not_null())
                    .col(
                        ColumnDef::new(RoundHistory::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_history_session_id")
                            .from(RoundHistory::Table, RoundHistory::SessionId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_round_history_session_id")
                    .table(RoundHistory::Table)
                    .col(RoundHistory::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_round_history_session_round")
                    .table(RoundHistory::Table)
                    .col(RoundHistory::SessionId)
                    .col(RoundHistory::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table

        manager
            .drop_index(
                Index::drop()
                    .name("ux_round_history_session_round")
                    .table(RoundHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_round_history_session_id")
                    .table(RoundHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(RoundHistory::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_snapshots_session_created")
                    .table(Snapshots::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_snapshots_session_id")
                    .table(Snapshots::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Snapshots::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_players_session_seat")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_players_session_id")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_games_state")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_games_short_code")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;

        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                manager
                    .drop_type(
                        PgType::drop()
                            .name(GameStateEnum::Type)
                            .if_exists()
                            .to_owned(),
                    )
                    .await?;
            }
            sea_orm::DatabaseBackend::Sqlite => {}
            _ => return Err(DbErr::Custom("Unsupported database backend".into())),
        }

        Ok(())
    }
}
