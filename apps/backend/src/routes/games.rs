//! Room lifecycle routes.
//!
//! Every mutating handler wraps its service call in `with_txn`, so the
//! lifecycle preconditions and their writes commit or roll back together.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::entities::moves::MoveType;
use crate::entities::{games, moves, rounds};
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::games::{HostRoomStats, RoomSummary};
use crate::repos::memberships::PlayerView;
use crate::services::rooms::{self, RoomSettings};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct CreateRoomRequest {
    pub title: Option<String>,
    pub gamemode: Option<String>,
    pub max_players: Option<i32>,
    pub total_rounds: Option<i32>,
    pub is_private: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub game: games::Model,
}

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummary>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub games: Vec<RoomSummary>,
}

#[derive(Debug, Serialize)]
pub struct HostStatsResponse {
    pub stats: HostRoomStats,
}

#[derive(Debug, Serialize)]
pub struct RoomDetailResponse {
    pub room: games::Model,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Deserialize, Default)]
pub struct JoinRequest {
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub success: bool,
    pub ready: bool,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub move_type: MoveType,
    #[serde(default)]
    pub move_data: String,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub created: moves::Model,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round_no: i32,
    pub moves: Vec<moves::Model>,
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub rounds: Vec<RoundView>,
}

impl RoundView {
    fn from_joined(round: rounds::Model, moves: Vec<moves::Model>) -> Self {
        Self {
            round_no: round.round_no,
            moves,
        }
    }
}

/// POST /api/game/create
async fn create_room(
    http_req: HttpRequest,
    current_user: CurrentUser,
    req: web::Json<CreateRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let host_id = current_user.id;
    let body = req.into_inner();
    let settings = RoomSettings {
        title: body.title,
        gamemode: body.gamemode,
        max_players: body.max_players,
        total_rounds: body.total_rounds,
        is_private: body.is_private,
        password: body.password,
    };

    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::create_room(txn, host_id, settings).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(RoomResponse { game }))
}

/// GET /api/game/active-rooms
async fn active_rooms(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let rooms = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::active_rooms(txn).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RoomListResponse { rooms }))
}

/// GET /api/game/history
async fn history(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let games = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::finished_rooms(txn).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(HistoryResponse { games }))
}

/// GET /api/game/stats
async fn host_stats(
    http_req: HttpRequest,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let host_id = current_user.id;

    let stats = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::host_stats(txn, host_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(HostStatsResponse { stats }))
}

/// GET /api/game/{room_id}
async fn room_detail(
    http_req: HttpRequest,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();

    let detail = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::room_detail(txn, room_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RoomDetailResponse {
        room: detail.room,
        players: detail.players,
    }))
}

/// POST /api/game/{room_id}/join
async fn join_room(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    req: web::Json<JoinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let user_id = current_user.id;
    let password = req.into_inner().password;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::join_room(txn, room_id, user_id, password.as_deref()).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

/// POST /api/game/{room_id}/ready
async fn toggle_ready(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let user_id = current_user.id;

    let ready = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::toggle_ready(txn, room_id, user_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ReadyResponse {
        success: true,
        ready,
    }))
}

/// POST /api/game/{room_id}/start
async fn start_room(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let user_id = current_user.id;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::start_room(txn, room_id, user_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

/// POST /api/game/{room_id}/moves
async fn submit_move(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    req: web::Json<MoveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let user_id = current_user.id;
    let body = req.into_inner();

    let created = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            rooms::submit_move(txn, room_id, user_id, body.move_type, body.move_data).await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(MoveResponse { created }))
}

/// GET /api/game/{room_id}/rounds
async fn room_rounds(
    http_req: HttpRequest,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();

    let rounds = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { rooms::room_rounds(txn, room_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RoundsResponse {
        rounds: rounds
            .into_iter()
            .map(|(round, moves)| RoundView::from_joined(round, moves))
            .collect(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Literal segments first so "create" is never parsed as a room id
    cfg.service(web::resource("/create").route(web::post().to(create_room)));
    cfg.service(web::resource("/active-rooms").route(web::get().to(active_rooms)));
    cfg.service(web::resource("/history").route(web::get().to(history)));
    cfg.service(web::resource("/stats").route(web::get().to(host_stats)));
    cfg.service(web::resource("/{room_id}").route(web::get().to(room_detail)));
    cfg.service(web::resource("/{room_id}/join").route(web::post().to(join_room)));
    cfg.service(web::resource("/{room_id}/ready").route(web::post().to(toggle_ready)));
    cfg.service(web::resource("/{room_id}/start").route(web::post().to(start_room)));
    cfg.service(web::resource("/{room_id}/moves").route(web::post().to(submit_move)));
    cfg.service(web::resource("/{room_id}/rounds").route(web::get().to(room_rounds)));
}
