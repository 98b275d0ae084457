use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect to the database for the given profile.
/// This function does NOT run any migrations.
pub async fn connect_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile)?;

    let mut opts = ConnectOptions::new(database_url);
    if *profile == DbProfile::Test {
        // In-memory SQLite: every pooled connection would get its own empty
        // database, so the test profile is pinned to a single connection.
        opts.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opts).await?;
    Ok(conn)
}

/// Single entrypoint used at startup and in tests: connect, then bring the
/// schema up to date.
pub async fn bootstrap_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;
    migration::Migrator::up(&conn, None)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;
    Ok(conn)
}
