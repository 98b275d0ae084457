//! Move (submission) repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::moves::{self, MoveType};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub async fn create_move<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    user_id: i64,
    move_type: MoveType,
    move_data: String,
    move_order: i32,
) -> Result<moves::Model, DomainError> {
    moves::ActiveModel {
        id: NotSet,
        round_id: Set(round_id),
        user_id: Set(user_id),
        move_type: Set(move_type),
        move_data: Set(move_data),
        move_order: Set(move_order),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)
}

/// How many moves the round already holds; the next move gets this + 1.
pub async fn count_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<u64, DomainError> {
    moves::Entity::find()
        .filter(moves::Column::RoundId.eq(round_id))
        .count(conn)
        .await
        .map_err(map_db_err)
}
