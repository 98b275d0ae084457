//! SeaORM -> DomainError translation helpers.
//!
//! Repos convert `sea_orm::DbErr` into `DomainError` here, and higher layers
//! then map `DomainError` to `AppError` via `From`.

use tracing::warn;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column"
/// error messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    error_msg
        .split_once("UNIQUE constraint failed: ")
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(|s| s.trim_end_matches(','))
}

/// Map a unique-constraint hit to the conflict kind it represents.
fn unique_violation_kind(error_msg: &str) -> ConflictKind {
    // SQLite reports table.column, Postgres reports the index name
    if let Some(table_column) = extract_sqlite_table_column(error_msg) {
        return match table_column {
            "users.login" => ConflictKind::UniqueLogin,
            "game_players.game_id" => ConflictKind::AlreadyJoined,
            other => ConflictKind::Other(other.to_string()),
        };
    }
    if error_msg.contains("ux_users_login") {
        return ConflictKind::UniqueLogin;
    }
    if error_msg.contains("ux_game_players_game_user") {
        return ConflictKind::AlreadyJoined;
    }
    ConflictKind::Other("unique violation".to_string())
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, "database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, "unique constraint violation");
        let kind = unique_violation_kind(&error_msg);
        let detail = match &kind {
            ConflictKind::UniqueLogin => "User already exists",
            ConflictKind::AlreadyJoined => "Already in this room",
            _ => "Conflicting record already exists",
        };
        return DomainError::conflict(kind, detail);
    }

    // Anything else is an operational failure we don't want to surface
    DomainError::infra(InfraErrorKind::Other(error_msg), "Database error")
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::map_db_err;
    use crate::errors::domain::{ConflictKind, DomainError};

    #[test]
    fn sqlite_unique_login_maps_to_unique_login_conflict() {
        let err = DbErr::Custom(
            "error returned from database: (code: 2067) UNIQUE constraint failed: users.login"
                .to_string(),
        );
        match map_db_err(err) {
            DomainError::Conflict(ConflictKind::UniqueLogin, _) => {}
            other => panic!("expected UniqueLogin conflict, got {other:?}"),
        }
    }

    #[test]
    fn postgres_unique_index_maps_to_unique_login_conflict() {
        let err = DbErr::Custom(
            "duplicate key value violates unique constraint \"ux_users_login\"".to_string(),
        );
        match map_db_err(err) {
            DomainError::Conflict(ConflictKind::UniqueLogin, _) => {}
            other => panic!("expected UniqueLogin conflict, got {other:?}"),
        }
    }

    #[test]
    fn membership_unique_index_maps_to_already_joined() {
        let err = DbErr::Custom(
            "duplicate key value violates unique constraint \"ux_game_players_game_user\""
                .to_string(),
        );
        match map_db_err(err) {
            DomainError::Conflict(ConflictKind::AlreadyJoined, _) => {}
            other => panic!("expected AlreadyJoined conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_errors_map_to_infra() {
        let err = DbErr::Custom("syntax error".to_string());
        match map_db_err(err) {
            DomainError::Infra(_, detail) => assert_eq!(detail, "Database error"),
            other => panic!("expected Infra, got {other:?}"),
        }
    }
}
