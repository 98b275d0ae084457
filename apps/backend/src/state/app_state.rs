use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::error::AppError;

/// Application state containing shared resources.
///
/// Owns the database handle for the whole process: opened once by the
/// state builder at startup, dropped (and its pool closed) on shutdown.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent only in handler unit tests)
    db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
}

impl AppState {
    /// Create a new AppState with the given database connection and security config
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    /// Create a new AppState without a database connection (for testing)
    pub fn without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    pub fn db_opt(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// Get the database connection or fail with a config error
    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::config("Database connection not available"))
    }
}
