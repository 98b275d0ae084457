use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Login,
    PasswordHash,
    GamesPlayed,
    GamesWon,
    Points,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    Title,
    Gamemode,
    HostId,
    MaxPlayers,
    CurrentPlayers,
    TotalRounds,
    CurrentRound,
    IsPrivate,
    RoomPassword,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GamePlayers {
    Table,
    Id,
    GameId,
    UserId,
    PlayerOrder,
    IsHost,
    IsReady,
    Score,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
    GameId,
    RoundNo,
    CreatedAt,
}

#[derive(Iden)]
enum Moves {
    Table,
    Id,
    RoundId,
    UserId,
    MoveType,
    MoveData,
    MoveOrder,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Login).string_len(50).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::GamesPlayed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::GamesWon)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::Points).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // unique index on users.login
        manager
            .create_index(
                Index::create()
                    .name("ux_users_login")
                    .table(Users::Table)
                    .col(Users::Login)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // games (rooms). Status is stored as TEXT so the schema works on both
        // Postgres and SQLite; valid values are enforced by the entity enum.
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::Title).string().not_null())
                    .col(ColumnDef::new(Games::Gamemode).string_len(32).not_null())
                    .col(ColumnDef::new(Games::HostId).big_integer().not_null())
                    .col(ColumnDef::new(Games::MaxPlayers).integer().not_null())
                    .col(
                        ColumnDef::new(Games::CurrentPlayers)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Games::TotalRounds).integer().not_null())
                    .col(
                        ColumnDef::new(Games::CurrentRound)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Games::RoomPassword).string().null())
                    .col(ColumnDef::new(Games::Status).string_len(16).not_null())
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
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_host_id")
                            .from(Games::Table, Games::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_status")
                    .table(Games::Table)
                    .col(Games::Status)
                    .to_owned(),
            )
            .await?;

        // game_players
        manager
            .create_table(
                Table::create()
                    .table(GamePlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamePlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GamePlayers::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GamePlayers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(GamePlayers::PlayerOrder).integer().not_null())
                    .col(
                        ColumnDef::new(GamePlayers::IsHost)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::IsReady)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_game_id")
                            .from(GamePlayers::Table, GamePlayers::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_user_id")
                            .from(GamePlayers::Table, GamePlayers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one membership row per (game, user)
        manager
            .create_index(
                Index::create()
                    .name("ux_game_players_game_user")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // rounds
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rounds::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Rounds::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Rounds::RoundNo).integer().not_null())
                    .col(
                        ColumnDef::new(Rounds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rounds_game_id")
                            .from(Rounds::Table, Rounds::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_rounds_game_round_no")
                    .table(Rounds::Table)
                    .col(Rounds::GameId)
                    .col(Rounds::RoundNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // moves
        manager
            .create_table(
                Table::create()
                    .table(Moves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Moves::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Moves::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Moves::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Moves::MoveType).string_len(16).not_null())
                    .col(ColumnDef::new(Moves::MoveData).text().not_null())
                    .col(ColumnDef::new(Moves::MoveOrder).integer().not_null())
                    .col(
                        ColumnDef::new(Moves::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moves_round_id")
                            .from(Moves::Table, Moves::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moves_user_id")
                            .from(Moves::Table, Moves::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_moves_round_id")
                    .table(Moves::Table)
                    .col(Moves::RoundId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Moves::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(GamePlayers::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
