use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::trace_ctx;

/// JSON body rendered for every error response.
///
/// `error` is the human-readable message clients display; `code` is a stable
/// machine-readable identifier.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: &'static str, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("UnauthorizedInvalidJwt")]
    UnauthorizedInvalidJwt,
    #[error("UnauthorizedExpiredJwt")]
    UnauthorizedExpiredJwt,
    #[error("Forbidden: {detail}")]
    Forbidden { code: &'static str, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Stable machine-readable code for the error variant.
    fn code(&self) -> String {
        match self {
            AppError::Validation { code, .. } => code.to_string(),
            AppError::BadRequest { code, .. } => code.to_string(),
            AppError::NotFound { code, .. } => code.to_string(),
            AppError::Conflict { code, .. } => code.to_string(),
            AppError::InvalidCredentials => "INVALID_CREDENTIALS".to_string(),
            AppError::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER".to_string(),
            AppError::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT".to_string(),
            AppError::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT".to_string(),
            AppError::Forbidden { code, .. } => code.to_string(),
            AppError::Db { .. } => "DB_ERROR".to_string(),
            AppError::DbUnavailable { .. } => "DB_UNAVAILABLE".to_string(),
            AppError::Internal { .. } => "INTERNAL".to_string(),
            AppError::Config { .. } => "CONFIG_ERROR".to_string(),
        }
    }

    /// Human-readable detail for the response body.
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::InvalidCredentials => "Invalid login or password".to_string(),
            AppError::UnauthorizedMissingBearer => "Missing or malformed Bearer token".to_string(),
            AppError::UnauthorizedInvalidJwt => "Invalid token".to_string(),
            AppError::UnauthorizedExpiredJwt => "Token expired".to_string(),
            AppError::Forbidden { detail, .. } => detail.clone(),
            // Never leak database internals to clients
            AppError::Db { .. } | AppError::DbUnavailable { .. } => "Server error".to_string(),
            AppError::Internal { .. } => "Server error".to_string(),
            AppError::Config { .. } => "Server configuration error".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Db { .. }
            | AppError::DbUnavailable { .. }
            | AppError::Internal { .. }
            | AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: &'static str, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::UnauthorizedInvalidJwt
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::UnauthorizedExpiredJwt
    }

    pub fn forbidden(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable(detail: impl Into<String>) -> Self {
        Self::DbUnavailable {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(trace_id = %trace_id, error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.detail(),
            code: self.code(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .json(body)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::AppError;

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(
            AppError::invalid("X", "x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("X", "x").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::conflict("X", "x").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::invalid_credentials().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::unauthorized_expired_jwt().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("X", "x").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::db("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn db_errors_do_not_leak_detail() {
        let err = AppError::db("connection string with secrets");
        // Body detail is generic; the real detail only goes to logs
        assert_eq!(err.detail(), "Server error");
    }
}
