//! Shared auth helpers for integration tests.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use serde_json::json;

/// A registered account as returned by the register endpoint.
pub struct TestAccount {
    pub id: i64,
    pub login: String,
    pub token: String,
}

/// Register a fresh account through the HTTP surface and return its token.
pub async fn register<S>(app: &S, login: &str, password: &str) -> TestAccount
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "login": login, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");

    let body: serde_json::Value = test::read_body_json(resp).await;
    TestAccount {
        id: body["user"]["id"].as_i64().expect("user id in response"),
        login: login.to_string(),
        token: body["token"].as_str().expect("token in response").to_string(),
    }
}

/// Authorization header tuple for an account's bearer token.
pub fn bearer(account: &TestAccount) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", account.token))
}
