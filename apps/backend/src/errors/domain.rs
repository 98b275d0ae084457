//! Domain-level error type used across services and repos.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::AppError;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    DbUnavailable,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Room,
    Membership,
    Round,
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueLogin,
    AlreadyJoined,
    Other(String),
}

/// Domain-level validation rule violations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    RoomFull,
    NotAllReady,
    StatusMismatch,
    Other(String),
}

/// Domain-level authorization failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForbiddenKind {
    NotHost,
    WrongRoomPassword,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Caller lacks the authority for the operation
    Forbidden(ForbiddenKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Forbidden(kind, d) => write!(f, "forbidden {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::RoomFull => "ROOM_FULL",
                    ValidationKind::NotAllReady => "NOT_ALL_READY",
                    ValidationKind::StatusMismatch => "ROOM_STATUS_MISMATCH",
                    _ => "VALIDATION",
                };
                AppError::bad_request(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::UniqueLogin => "LOGIN_TAKEN",
                    // Duplicate joins answer 400 like the other join failures
                    ConflictKind::AlreadyJoined => {
                        return AppError::bad_request("ALREADY_JOINED", detail)
                    }
                    _ => "CONFLICT",
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::User => "USER_NOT_FOUND",
                    NotFoundKind::Room => "ROOM_NOT_FOUND",
                    NotFoundKind::Membership => "PLAYER_NOT_IN_ROOM",
                    NotFoundKind::Round => "ROUND_NOT_FOUND",
                };
                AppError::not_found(code, detail)
            }
            DomainError::Forbidden(kind, detail) => {
                let code = match kind {
                    ForbiddenKind::NotHost => "NOT_HOST",
                    ForbiddenKind::WrongRoomPassword => "WRONG_ROOM_PASSWORD",
                };
                AppError::forbidden(code, detail)
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DbUnavailable => AppError::db_unavailable(detail),
                _ => AppError::internal(detail),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::{ConflictKind, DomainError, ForbiddenKind, NotFoundKind, ValidationKind};
    use crate::error::AppError;

    #[test]
    fn room_full_maps_to_400() {
        let app: AppError =
            DomainError::validation(ValidationKind::RoomFull, "Room is full").into();
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn already_joined_maps_to_400_not_409() {
        let app: AppError =
            DomainError::conflict(ConflictKind::AlreadyJoined, "Already in this room").into();
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unique_login_maps_to_409() {
        let app: AppError =
            DomainError::conflict(ConflictKind::UniqueLogin, "User already exists").into();
        assert_eq!(app.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn room_not_found_maps_to_404() {
        let app: AppError = DomainError::not_found(NotFoundKind::Room, "Room not found").into();
        assert_eq!(app.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_host_maps_to_403() {
        let app: AppError =
            DomainError::forbidden(ForbiddenKind::NotHost, "Only the host can start").into();
        assert_eq!(app.status(), StatusCode::FORBIDDEN);
    }
}
