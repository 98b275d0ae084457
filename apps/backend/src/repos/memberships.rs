//! Membership repository functions (one row per player per room).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::entities::{game_players, users};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Membership domain model
#[derive(Debug, Clone, PartialEq)]
pub struct GameMembership {
    pub id: i64,
    pub game_id: i64,
    pub user_id: i64,
    pub player_order: i32,
    pub is_host: bool,
    pub is_ready: bool,
    pub score: i32,
}

impl From<game_players::Model> for GameMembership {
    fn from(model: game_players::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            user_id: model.user_id,
            player_order: model.player_order,
            is_host: model.is_host,
            is_ready: model.is_ready,
            score: model.score,
        }
    }
}

/// A member as shown in the room-detail endpoint, with profile data joined in.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub user_id: i64,
    pub login: Option<String>,
    pub player_order: i32,
    pub is_host: bool,
    pub is_ready: bool,
    pub score: i32,
    pub points: Option<i32>,
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<GameMembership>, DomainError> {
    let row = game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::UserId.eq(user_id))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(row.map(GameMembership::from))
}

/// Members with their user profile joined in, in seating order.
pub async fn find_players_with_profiles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<PlayerView>, DomainError> {
    let rows = game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .find_also_related(users::Entity)
        .order_by_asc(game_players::Column::PlayerOrder)
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(rows
        .into_iter()
        .map(|(member, user)| {
            let (login, points) = match user {
                Some(u) => (Some(u.login), Some(u.points)),
                None => (None, None),
            };
            PlayerView {
                user_id: member.user_id,
                login,
                player_order: member.player_order,
                is_host: member.is_host,
                is_ready: member.is_ready,
                score: member.score,
                points,
            }
        })
        .collect())
}

pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    player_order: i32,
    is_host: bool,
) -> Result<GameMembership, DomainError> {
    let now = OffsetDateTime::now_utc();
    let row = game_players::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        user_id: Set(user_id),
        player_order: Set(player_order),
        is_host: Set(is_host),
        is_ready: Set(false),
        score: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;
    Ok(GameMembership::from(row))
}

/// Flip the ready flag on a membership row, returning the new value.
pub async fn toggle_ready<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership: &GameMembership,
) -> Result<GameMembership, DomainError> {
    let active = game_players::ActiveModel {
        id: Set(membership.id),
        is_ready: Set(!membership.is_ready),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    let updated = active.update(conn).await.map_err(map_db_err)?;
    Ok(GameMembership::from(updated))
}

/// Number of members who have not flagged ready yet.
pub async fn count_not_ready<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    use sea_orm::PaginatorTrait;

    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::IsReady.eq(false))
        .count(conn)
        .await
        .map_err(map_db_err)
}
