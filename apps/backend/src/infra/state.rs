use crate::config::db::DbProfile;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_profile: Option<DbProfile>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db_profile: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        if let Some(profile) = self.db_profile {
            // single entrypoint: connect + migrate
            let conn = bootstrap_db(&profile).await?;
            Ok(AppState::new(conn, self.security_config))
        } else {
            Ok(AppState::without_db(self.security_config))
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::build_state;

    #[tokio::test]
    async fn build_succeeds_without_db_option() {
        let state = build_state().build().await.unwrap();
        assert!(state.db_opt().is_none());
    }

    #[tokio::test]
    async fn build_with_test_profile_runs_migrations() {
        use sea_orm::{ConnectionTrait, Statement};

        let state = build_state()
            .with_db(crate::config::db::DbProfile::Test)
            .build()
            .await
            .unwrap();
        let db = state.require_db().unwrap();

        // All five tables exist after bootstrap
        for table in ["users", "games", "game_players", "rounds", "moves"] {
            let stmt = Statement::from_string(
                db.get_database_backend(),
                format!("SELECT COUNT(*) AS n FROM {table}"),
            );
            assert!(db.query_one(stmt).await.is_ok(), "table {table} missing");
        }
    }
}
