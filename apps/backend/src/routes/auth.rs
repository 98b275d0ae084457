//! Account routes: register, login, profile, stats.

use std::time::SystemTime;

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::mint_access_token;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::users::{StatsUpdate, User};
use crate::services::users as users_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub games_played: Option<i32>,
    pub games_won: Option<i32>,
    pub points: Option<i32>,
}

/// POST /api/auth/register
async fn register(
    http_req: HttpRequest,
    req: web::Json<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = req.into_inner();

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { users_service::register(txn, &body.login, &body.password).await })
    })
    .await?;

    let token = mint_access_token(user.id, &user.login, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Created().json(AuthResponse { user, token }))
}

/// POST /api/auth/login
async fn login(
    http_req: HttpRequest,
    req: web::Json<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = req.into_inner();

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { users_service::login(txn, &body.login, &body.password).await })
    })
    .await?;

    let token = mint_access_token(user.id, &user.login, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Ok().json(AuthResponse { user, token }))
}

/// GET /api/auth/me
async fn me(
    http_req: HttpRequest,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id;

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { users_service::get_user(txn, user_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse { user }))
}

/// PUT /api/auth/stats
async fn update_stats(
    http_req: HttpRequest,
    current_user: CurrentUser,
    req: web::Json<StatsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id;
    let update = StatsUpdate {
        games_played: req.games_played,
        games_won: req.games_won,
        points: req.points,
    };

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { users_service::update_stats(txn, user_id, update).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse { user }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)));
    cfg.service(web::resource("/login").route(web::post().to(login)));
    cfg.service(web::resource("/me").route(web::get().to(me)));
    cfg.service(web::resource("/stats").route(web::put().to(update_stats)));
}
