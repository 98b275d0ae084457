//! User repository functions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Public user profile: everything except the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub games_played: i32,
    pub games_won: i32,
    pub points: i32,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            login: model.login,
            games_played: model.games_played,
            games_won: model.games_won,
            points: model.points,
        }
    }
}

/// Partial stats update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsUpdate {
    pub games_played: Option<i32>,
    pub games_won: Option<i32>,
    pub points: Option<i32>,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

/// Full row including the password hash; only the login flow needs this.
pub async fn find_by_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    login: &str,
) -> Result<Option<users::Model>, DomainError> {
    users::Entity::find()
        .filter(users::Column::Login.eq(login))
        .one(conn)
        .await
        .map_err(map_db_err)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    login: &str,
    password_hash: &str,
) -> Result<User, DomainError> {
    let now = OffsetDateTime::now_utc();
    let user = users::ActiveModel {
        id: NotSet,
        login: Set(login.to_string()),
        password_hash: Set(password_hash.to_string()),
        games_played: Set(0),
        games_won: Set(0),
        points: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;
    Ok(User::from(user))
}

/// Apply a partial stats update, returning the updated profile.
/// Returns None if the user row no longer exists.
pub async fn update_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    update: StatsUpdate,
) -> Result<Option<User>, DomainError> {
    let Some(user) = users::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(map_db_err)?
    else {
        return Ok(None);
    };

    let mut active: users::ActiveModel = user.into();
    if let Some(games_played) = update.games_played {
        active.games_played = Set(games_played);
    }
    if let Some(games_won) = update.games_won {
        active.games_won = Set(games_won);
    }
    if let Some(points) = update.points {
        active.points = Set(points);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    let updated = active.update(conn).await.map_err(map_db_err)?;
    Ok(Some(User::from(updated)))
}

/// Leaderboard: users by points, highest first.
pub async fn top_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<User>, DomainError> {
    let players = users::Entity::find()
        .order_by_desc(users::Column::Points)
        .limit(limit)
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(players.into_iter().map(User::from).collect())
}
