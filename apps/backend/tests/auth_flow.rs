mod support;

use actix_web::test;
use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend_test_support::unique_helpers::unique_login;
use serde_json::json;
use support::auth::{bearer, register};
use support::create_test_app;

async fn test_state() -> AppState {
    build_state()
        .with_db(DbProfile::Test)
        .build()
        .await
        .expect("test state should build")
}

#[actix_web::test]
async fn register_returns_user_and_token() {
    let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
    let state = build_state()
        .with_db(DbProfile::Test)
        .with_security(security.clone())
        .build()
        .await
        .unwrap();
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let login = unique_login("painter");
    let account = register(&app, &login, "secret123").await;

    assert_eq!(account.login, login);

    // The token is a valid JWT for the new account
    let claims = backend::verify_access_token(&account.token, &security).unwrap();
    assert_eq!(claims.login, login);
    assert_eq!(claims.user_id().unwrap(), account.id);
}

#[actix_web::test]
async fn duplicate_register_conflicts() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let login = unique_login("dup");
    register(&app, &login, "secret123").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "login": login, "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "LOGIN_TAKEN");
    assert_eq!(body["error"], "User already exists");
}

#[actix_web::test]
async fn register_validates_credentials() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    // Too-short login
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "login": "ab", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Too-short password
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "login": unique_login("short"), "password": "12345" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Missing fields
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn login_roundtrip() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let login = unique_login("returning");
    let account = register(&app, &login, "secret123").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": login, "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"].as_i64().unwrap(), account.id);
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn login_failures_are_uniform_401() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let login = unique_login("careful");
    register(&app, &login, "secret123").await;

    // Wrong password
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": login, "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    // Unknown login gets the identical answer
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": unique_login("ghost"), "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn me_requires_and_honors_bearer_token() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let login = unique_login("profile");
    let account = register(&app, &login, "secret123").await;

    // With token
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&account))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["login"], login.as_str());
    assert_eq!(body["user"]["games_played"], 0);

    // Without token
    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // Garbage token
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_web::test]
async fn stats_update_is_partial() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let account = register(&app, &unique_login("grinder"), "secret123").await;

    // Set one field
    let req = test::TestRequest::put()
        .uri("/api/auth/stats")
        .insert_header(bearer(&account))
        .set_json(json!({ "games_played": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["games_played"], 5);
    assert_eq!(body["user"]["games_won"], 0);
    assert_eq!(body["user"]["points"], 0);

    // A later update leaves untouched fields alone
    let req = test::TestRequest::put()
        .uri("/api/auth/stats")
        .insert_header(bearer(&account))
        .set_json(json!({ "points": 42 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["games_played"], 5);
    assert_eq!(body["user"]["points"], 42);
}

#[actix_web::test]
async fn top_players_orders_by_points() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let low = register(&app, &unique_login("low"), "secret123").await;
    let high = register(&app, &unique_login("high"), "secret123").await;

    for (account, points) in [(&low, 10), (&high, 99)] {
        let req = test::TestRequest::put()
            .uri("/api/auth/stats")
            .insert_header(bearer(account))
            .set_json(json!({ "points": points }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    let req = test::TestRequest::get().uri("/api/user/top").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;

    let players = body["players"].as_array().unwrap();
    assert_eq!(players[0]["id"].as_i64().unwrap(), high.id);
    assert_eq!(players[0]["points"], 99);
    assert_eq!(players[1]["id"].as_i64().unwrap(), low.id);
}

#[actix_web::test]
async fn health_endpoint_is_open() {
    let state = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await.unwrap();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}
