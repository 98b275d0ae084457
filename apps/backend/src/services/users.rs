//! Account service: registration, login, profile, stats.

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::repos::users::{self, StatsUpdate, User};

const LOGIN_MIN: usize = 3;
const LOGIN_MAX: usize = 50;
const PASSWORD_MIN: usize = 6;

/// Default leaderboard size.
pub const TOP_PLAYERS_LIMIT: u64 = 10;

fn validate_registration(login: &str, password: &str) -> Result<(), AppError> {
    if login.is_empty() || password.is_empty() {
        return Err(AppError::invalid(
            "MISSING_CREDENTIALS",
            "Login and password are required",
        ));
    }
    let login_len = login.chars().count();
    if !(LOGIN_MIN..=LOGIN_MAX).contains(&login_len) {
        return Err(AppError::invalid(
            "INVALID_LOGIN",
            format!("Login must be between {LOGIN_MIN} and {LOGIN_MAX} characters"),
        ));
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(AppError::invalid(
            "INVALID_PASSWORD",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        ));
    }
    Ok(())
}

/// Create a new account.
///
/// Duplicate logins fail with a conflict and leave the existing record
/// untouched; the unique index backs up the pre-check.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    login: &str,
    password: &str,
) -> Result<User, AppError> {
    validate_registration(login, password)?;

    if users::find_by_login(conn, login).await?.is_some() {
        return Err(AppError::conflict("LOGIN_TAKEN", "User already exists"));
    }

    let password_hash = hash_password(password)?;
    let user = users::create_user(conn, login, &password_hash).await?;

    info!(user_id = user.id, "user registered");
    Ok(user)
}

/// Check credentials and return the account.
///
/// Unknown login and wrong password are indistinguishable to the caller.
pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    login: &str,
    password: &str,
) -> Result<User, AppError> {
    if login.is_empty() || password.is_empty() {
        return Err(AppError::invalid(
            "MISSING_CREDENTIALS",
            "Login and password are required",
        ));
    }

    let Some(user) = users::find_by_login(conn, login).await? else {
        debug!("login attempt for unknown account");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &user.password_hash)? {
        debug!(user_id = user.id, "login attempt with wrong password");
        return Err(AppError::invalid_credentials());
    }

    Ok(User::from(user))
}

/// Fetch the caller's profile.
pub async fn get_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<User, AppError> {
    let user = users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))?;
    Ok(user)
}

/// Partial stats update for the caller; absent fields keep current values.
pub async fn update_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    update: StatsUpdate,
) -> Result<User, AppError> {
    let user = users::update_stats(conn, user_id, update)
        .await?
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))?;
    debug!(user_id, "stats updated");
    Ok(user)
}

/// Leaderboard: top accounts by points.
pub async fn top_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<User>, AppError> {
    Ok(users::top_players(conn, limit).await?)
}
