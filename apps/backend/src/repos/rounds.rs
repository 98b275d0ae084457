//! Round repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::{moves, rounds};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round_no: i32,
) -> Result<rounds::Model, DomainError> {
    rounds::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        round_no: Set(round_no),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)
}

pub async fn find_by_game_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round_no: i32,
) -> Result<Option<rounds::Model>, DomainError> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(rounds::Column::RoundNo.eq(round_no))
        .one(conn)
        .await
        .map_err(map_db_err)
}

/// All rounds of a room with their moves, both in play order.
pub async fn find_all_with_moves<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<(rounds::Model, Vec<moves::Model>)>, DomainError> {
    rounds::Entity::find()
        .filter(rounds::Column::GameId.eq(game_id))
        .order_by_asc(rounds::Column::RoundNo)
        .find_with_related(moves::Entity)
        .order_by_asc(moves::Column::MoveOrder)
        .all(conn)
        .await
        .map_err(map_db_err)
}
