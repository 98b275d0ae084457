use actix_web::web;

pub mod auth;
pub mod games;
pub mod health;
pub mod users;

/// Register the whole route tree.
///
/// Both `main.rs` and the test app builder go through here so tests
/// exercise the exact production paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api/game").configure(games::configure_routes));
    cfg.service(web::scope("/api/user").configure(users::configure_routes));
}
