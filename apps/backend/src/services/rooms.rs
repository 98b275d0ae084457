//! Room lifecycle service.
//!
//! All mutating operations run inside the caller's transaction (`with_txn`)
//! and take the room's row lock up front (`require_room_locked`). Concurrent
//! lifecycle calls on the same room therefore execute one at a time, each
//! seeing the previous one's writes. A transaction alone is not enough: under
//! READ COMMITTED two concurrent joins would both read the old player counter
//! and both insert. The lock is what keeps `current_players <= max_players`
//! and makes start's readiness check final.

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::entities::games::{self, RoomStatus};
use crate::entities::moves::MoveType;
use crate::entities::{moves, rounds};
use crate::error::AppError;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, NotFoundKind, ValidationKind,
};
use crate::repos::games::{self as games_repo, HostRoomStats, RoomCreate, RoomSummary};
use crate::repos::memberships::{self, GameMembership, PlayerView};
use crate::repos::moves as moves_repo;
use crate::repos::rounds as rounds_repo;

const DEFAULT_TITLE: &str = "Game room";
const DEFAULT_GAMEMODE: &str = "classic";
const DEFAULT_MAX_PLAYERS: i32 = 8;
const DEFAULT_TOTAL_ROUNDS: i32 = 3;

/// Room settings as supplied by the host; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct RoomSettings {
    pub title: Option<String>,
    pub gamemode: Option<String>,
    pub max_players: Option<i32>,
    pub total_rounds: Option<i32>,
    pub is_private: Option<bool>,
    pub password: Option<String>,
}

/// Room detail: the room row plus its players in seating order.
#[derive(Debug)]
pub struct RoomDetail {
    pub room: games::Model,
    pub players: Vec<PlayerView>,
}

/// Create a room in `waiting` state with the host seated first.
pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    host_id: i64,
    settings: RoomSettings,
) -> Result<games::Model, AppError> {
    let max_players = settings.max_players.unwrap_or(DEFAULT_MAX_PLAYERS);
    let total_rounds = settings.total_rounds.unwrap_or(DEFAULT_TOTAL_ROUNDS);
    if max_players < 2 {
        return Err(AppError::invalid(
            "INVALID_MAX_PLAYERS",
            "A room needs at least 2 seats",
        ));
    }
    if total_rounds < 1 {
        return Err(AppError::invalid(
            "INVALID_TOTAL_ROUNDS",
            "A game needs at least 1 round",
        ));
    }

    let is_private = settings.is_private.unwrap_or(false);
    if is_private && settings.password.as_deref().unwrap_or("").is_empty() {
        return Err(AppError::invalid(
            "MISSING_ROOM_PASSWORD",
            "Private rooms need a password",
        ));
    }

    let room = games_repo::create_room(
        conn,
        RoomCreate {
            title: settings
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            gamemode: settings
                .gamemode
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GAMEMODE.to_string()),
            host_id,
            max_players,
            total_rounds,
            is_private,
            room_password: if is_private { settings.password } else { None },
        },
    )
    .await?;

    memberships::create_membership(conn, room.id, host_id, 1, true).await?;

    info!(room_id = room.id, host_id, "room created");
    Ok(room)
}

/// Join a waiting room.
///
/// Fails with NotFound for a missing or non-waiting room, Forbidden on a
/// private-room password mismatch, AlreadyJoined for a duplicate member and
/// RoomFull at capacity. Holds the room row lock from the capacity check
/// through the seat insert and counter bump, so two racing joins cannot both
/// claim the last seat.
pub async fn join_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
    password: Option<&str>,
) -> Result<GameMembership, AppError> {
    let room = games_repo::require_room_locked(conn, room_id).await?;

    // A started or finished game is indistinguishable from a missing room
    if room.status != RoomStatus::Waiting {
        return Err(DomainError::not_found(
            NotFoundKind::Room,
            "Room not found or the game has already started",
        )
        .into());
    }

    if room.is_private {
        let supplied = password.unwrap_or("");
        if supplied.is_empty() || room.room_password.as_deref() != Some(supplied) {
            return Err(DomainError::forbidden(
                ForbiddenKind::WrongRoomPassword,
                "Wrong room password",
            )
            .into());
        }
    }

    if memberships::find_membership(conn, room_id, user_id)
        .await?
        .is_some()
    {
        return Err(
            DomainError::conflict(ConflictKind::AlreadyJoined, "Already in this room").into(),
        );
    }

    if room.current_players >= room.max_players {
        return Err(DomainError::validation(ValidationKind::RoomFull, "Room is full").into());
    }

    let player_order = room.current_players + 1;
    let membership =
        memberships::create_membership(conn, room_id, user_id, player_order, false).await?;
    games_repo::increment_players(conn, room).await?;

    info!(room_id, user_id, player_order, "player joined room");
    Ok(membership)
}

/// Flip the caller's ready flag. Toggling twice restores the original state.
pub async fn toggle_ready<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
) -> Result<bool, AppError> {
    // Lock the room so a flip cannot slip between start's readiness check
    // and its status write
    games_repo::require_room_locked(conn, room_id).await?;

    let membership = memberships::find_membership(conn, room_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Membership, "Player not found in room")
        })?;

    let updated = memberships::toggle_ready(conn, &membership).await?;
    debug!(room_id, user_id, ready = updated.is_ready, "ready toggled");
    Ok(updated.is_ready)
}

/// Start the game: host-only, requires every member ready.
///
/// On success the room moves to `playing`, the round counter goes to 1 and
/// the round-1 row is created, all in the caller's transaction. The room row
/// lock keeps joins and ready flips out until the transition commits; on any
/// failure the room stays `waiting`.
pub async fn start_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
) -> Result<games::Model, AppError> {
    let room = games_repo::require_room_locked(conn, room_id).await?;

    if room.status != RoomStatus::Waiting {
        return Err(DomainError::validation(
            ValidationKind::StatusMismatch,
            "The game has already started",
        )
        .into());
    }

    let membership = memberships::find_membership(conn, room_id, user_id).await?;
    if !membership.is_some_and(|m| m.is_host) {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotHost,
            "Only the host can start the game",
        )
        .into());
    }

    let not_ready = memberships::count_not_ready(conn, room_id).await?;
    if not_ready > 0 {
        return Err(DomainError::validation(
            ValidationKind::NotAllReady,
            format!("Not all players are ready ({not_ready} pending)"),
        )
        .into());
    }

    let room = games_repo::set_playing(conn, room).await?;
    rounds_repo::create_round(conn, room_id, 1).await?;

    info!(room_id, host_id = user_id, "game started");
    Ok(room)
}

/// Record a submission (word, drawing or guess) for the current round.
/// The caller must be a member and the room must be `playing`.
pub async fn submit_move<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
    move_type: MoveType,
    move_data: String,
) -> Result<moves::Model, AppError> {
    if move_data.is_empty() {
        return Err(AppError::invalid("EMPTY_MOVE", "Move data cannot be empty"));
    }

    let room = games_repo::require_room_locked(conn, room_id).await?;
    if room.status != RoomStatus::Playing {
        return Err(DomainError::validation(
            ValidationKind::StatusMismatch,
            "The game is not in progress",
        )
        .into());
    }

    memberships::find_membership(conn, room_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Membership, "Player not found in room")
        })?;

    let round = rounds_repo::find_by_game_and_round(conn, room_id, room.current_round)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Round, "Current round not found"))?;

    let move_order = moves_repo::count_by_round(conn, round.id).await? as i32 + 1;
    let created =
        moves_repo::create_move(conn, round.id, user_id, move_type, move_data, move_order).await?;

    debug!(room_id, user_id, round_id = round.id, move_order, "move recorded");
    Ok(created)
}

/// Room plus players, or 404.
pub async fn room_detail<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<RoomDetail, AppError> {
    let room = games_repo::require_room(conn, room_id).await?;
    let players = memberships::find_players_with_profiles(conn, room_id).await?;
    Ok(RoomDetail { room, players })
}

/// Rounds of a room with their moves.
pub async fn room_rounds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<(rounds::Model, Vec<moves::Model>)>, AppError> {
    games_repo::require_room(conn, room_id).await?;
    Ok(rounds_repo::find_all_with_moves(conn, room_id).await?)
}

pub async fn active_rooms<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<RoomSummary>, AppError> {
    Ok(games_repo::list_active(conn).await?)
}

pub async fn finished_rooms<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<RoomSummary>, AppError> {
    Ok(games_repo::list_finished(conn).await?)
}

pub async fn host_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    host_id: i64,
) -> Result<HostRoomStats, AppError> {
    Ok(games_repo::host_room_stats(conn, host_id).await?)
}
