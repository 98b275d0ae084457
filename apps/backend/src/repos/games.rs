//! Room repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::entities::games::{self, RoomStatus};
use crate::entities::users;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// Room listings are capped, newest first.
const LIST_LIMIT: u64 = 20;

/// Fields needed to insert a room row.
#[derive(Debug, Clone)]
pub struct RoomCreate {
    pub title: String,
    pub gamemode: String,
    pub host_id: i64,
    pub max_players: i32,
    pub total_rounds: i32,
    pub is_private: bool,
    pub room_password: Option<String>,
}

/// A room as shown in list endpoints, with the host's login joined in.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub id: i64,
    pub title: String,
    pub gamemode: String,
    pub max_players: i32,
    pub current_players: i32,
    pub total_rounds: i32,
    pub current_round: i32,
    pub is_private: bool,
    pub status: RoomStatus,
    pub host_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl RoomSummary {
    fn from_joined(room: games::Model, host: Option<users::Model>) -> Self {
        Self {
            id: room.id,
            title: room.title,
            gamemode: room.gamemode,
            max_players: room.max_players,
            current_players: room.current_players,
            total_rounds: room.total_rounds,
            current_round: room.current_round,
            is_private: room.is_private,
            status: room.status,
            host_name: host.map(|u| u.login),
            created_at: room.created_at,
        }
    }
}

/// Per-host room counts by status.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct HostRoomStats {
    pub total_games: u64,
    pub completed_games: u64,
    pub waiting_games: u64,
    pub active_games: u64,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<games::Model>, DomainError> {
    games::Entity::find_by_id(room_id)
        .one(conn)
        .await
        .map_err(map_db_err)
}

/// Find room by id or fail with a domain NotFound.
pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<games::Model, DomainError> {
    find_by_id(conn, room_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Room, format!("Room {room_id} not found"))
    })
}

/// Fetch a room and hold its row lock until the transaction ends
/// (SELECT ... FOR UPDATE).
///
/// Every lifecycle writer (join, ready, start, moves) goes through here, so
/// check-then-write sequences on the same room serialize under Postgres
/// instead of racing on a stale read. SQLite has no row locks; there the
/// clause is a no-op and the single writer provides the same ordering.
pub async fn require_room_locked<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<games::Model, DomainError> {
    games::Entity::find_by_id(room_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("Room {room_id} not found"))
        })
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomCreate,
) -> Result<games::Model, DomainError> {
    let now = OffsetDateTime::now_utc();
    games::ActiveModel {
        id: NotSet,
        title: Set(dto.title),
        gamemode: Set(dto.gamemode),
        host_id: Set(dto.host_id),
        max_players: Set(dto.max_players),
        current_players: Set(1),
        total_rounds: Set(dto.total_rounds),
        current_round: Set(0),
        is_private: Set(dto.is_private),
        room_password: Set(dto.room_password),
        status: Set(RoomStatus::Waiting),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)
}

/// Rooms a player could browse: waiting or already playing, newest first.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<RoomSummary>, DomainError> {
    let rows = games::Entity::find()
        .filter(games::Column::Status.is_in([RoomStatus::Waiting, RoomStatus::Playing]))
        .find_also_related(users::Entity)
        .order_by_desc(games::Column::CreatedAt)
        .limit(LIST_LIMIT)
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(rows
        .into_iter()
        .map(|(room, host)| RoomSummary::from_joined(room, host))
        .collect())
}

/// Finished rooms, newest first.
pub async fn list_finished<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<RoomSummary>, DomainError> {
    let rows = games::Entity::find()
        .filter(games::Column::Status.eq(RoomStatus::Finished))
        .find_also_related(users::Entity)
        .order_by_desc(games::Column::CreatedAt)
        .limit(LIST_LIMIT)
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(rows
        .into_iter()
        .map(|(room, host)| RoomSummary::from_joined(room, host))
        .collect())
}

/// Count the rooms a host created, grouped by lifecycle status.
pub async fn host_room_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    host_id: i64,
) -> Result<HostRoomStats, DomainError> {
    let rooms = games::Entity::find()
        .filter(games::Column::HostId.eq(host_id))
        .all(conn)
        .await
        .map_err(map_db_err)?;

    let mut stats = HostRoomStats {
        total_games: rooms.len() as u64,
        ..Default::default()
    };
    for room in rooms {
        match room.status {
            RoomStatus::Waiting => stats.waiting_games += 1,
            RoomStatus::Playing => stats.active_games += 1,
            RoomStatus::Finished => stats.completed_games += 1,
        }
    }
    Ok(stats)
}

/// Bump the member counter after a successful join.
pub async fn increment_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room: games::Model,
) -> Result<games::Model, DomainError> {
    let current = room.current_players;
    let mut active: games::ActiveModel = room.into();
    active.current_players = Set(current + 1);
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await.map_err(map_db_err)
}

/// Transition a waiting room to `playing` and open round 1.
pub async fn set_playing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room: games::Model,
) -> Result<games::Model, DomainError> {
    let mut active: games::ActiveModel = room.into();
    active.status = Set(RoomStatus::Playing);
    active.current_round = Set(1);
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await.map_err(map_db_err)
}
