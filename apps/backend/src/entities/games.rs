use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Room lifecycle status. Transitions only move forward:
/// `Waiting -> Playing -> Finished`.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "playing")]
    Playing,
    #[sea_orm(string_value = "finished")]
    Finished,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub gamemode: String,
    #[sea_orm(column_name = "host_id")]
    pub host_id: i64,
    #[sea_orm(column_name = "max_players")]
    pub max_players: i32,
    #[sea_orm(column_name = "current_players")]
    pub current_players: i32,
    #[sea_orm(column_name = "total_rounds")]
    pub total_rounds: i32,
    #[sea_orm(column_name = "current_round")]
    pub current_round: i32,
    #[sea_orm(column_name = "is_private")]
    pub is_private: bool,
    /// Plain room passphrase for private rooms; not an account credential.
    #[sea_orm(column_name = "room_password")]
    #[serde(skip_serializing)]
    pub room_password: Option<String>,
    pub status: RoomStatus,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HostId",
        to = "super::users::Column::Id"
    )]
    Host,
    #[sea_orm(has_many = "super::game_players::Entity")]
    GamePlayers,
    #[sea_orm(has_many = "super::rounds::Entity")]
    Rounds,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::game_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamePlayers.def()
    }
}

impl Related<super::rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rounds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
