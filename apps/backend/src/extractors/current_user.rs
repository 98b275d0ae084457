use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::Serialize;

use crate::auth::jwt::verify_access_token;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The authenticated caller, resolved from the bearer token.
///
/// Verifies the JWT against the configured secret and then confirms the
/// account still exists. A valid token for a deleted account is rejected.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub login: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let token = AuthToken::from_request(req, payload);
        let req = req.clone();

        Box::pin(async move {
            let token = token.await?;

            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let claims = verify_access_token(&token.token, &state.security)?;
            let user_id = claims.user_id()?;

            // Honor an injected transaction so tests see their own writes
            let user = if let Some(shared) = SharedTxn::from_req(&req) {
                users::find_by_id(shared.transaction(), user_id).await?
            } else {
                users::find_by_id(state.require_db()?, user_id).await?
            };

            // Token is valid but the account is gone
            let user = user.ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))?;

            Ok(CurrentUser {
                id: user.id,
                login: user.login,
            })
        })
    }
}
