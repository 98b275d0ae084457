//! Public user routes.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Serialize;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::repos::users::User;
use crate::services::users as users_service;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct TopPlayersResponse {
    pub players: Vec<User>,
}

/// GET /api/user/top
async fn top_players(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let players = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            users_service::top_players(txn, users_service::TOP_PLAYERS_LIMIT).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TopPlayersResponse { players }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/top").route(web::get().to(top_players)));
}
