mod support;

use std::sync::Arc;

use actix_web::test::TestRequest;
use actix_web::HttpMessage;
use backend::config::db::DbProfile;
use backend::db::txn::{with_txn, SharedTxn};
use backend::error::AppError;
use backend::infra::state::build_state;
use backend::repos::users;
use backend::state::app_state::AppState;
use backend_test_support::unique_helpers::unique_login;

async fn test_state() -> AppState {
    build_state()
        .with_db(DbProfile::Test)
        .build()
        .await
        .expect("test state should build")
}

#[actix_web::test]
async fn commits_on_ok() {
    let state = test_state().await;
    let login = unique_login("committed");

    let created_login = login.clone();
    with_txn(None, &state, |txn| {
        Box::pin(async move {
            users::create_user(txn, &created_login, "hash")
                .await
                .map_err(AppError::from)
        })
    })
    .await
    .unwrap();

    let db = state.require_db().unwrap();
    let found = users::find_by_login(db, &login).await.unwrap();
    assert!(found.is_some(), "committed row should be visible");
}

#[actix_web::test]
async fn rolls_back_on_err() {
    let state = test_state().await;
    let login = unique_login("discarded");

    let created_login = login.clone();
    let result: Result<(), AppError> = with_txn(None, &state, |txn| {
        Box::pin(async move {
            users::create_user(txn, &created_login, "hash")
                .await
                .map_err(AppError::from)?;
            Err(AppError::internal("forced failure"))
        })
    })
    .await;
    assert!(result.is_err());

    let db = state.require_db().unwrap();
    let found = users::find_by_login(db, &login).await.unwrap();
    assert!(found.is_none(), "rolled-back row should be gone");
}

#[actix_web::test]
async fn reuses_injected_shared_transaction() {
    let state = test_state().await;
    let login = unique_login("injected");

    let db = state.require_db().unwrap();
    let txn = {
        use sea_orm::TransactionTrait;
        db.begin().await.unwrap()
    };
    let shared = SharedTxn(Arc::new(txn));

    let req = TestRequest::default().to_http_request();
    req.extensions_mut().insert(shared.clone());

    let created_login = login.clone();
    with_txn(Some(&req), &state, |txn| {
        Box::pin(async move {
            users::create_user(txn, &created_login, "hash")
                .await
                .map_err(AppError::from)
        })
    })
    .await
    .unwrap();

    // Visible inside the shared transaction
    let found = users::find_by_login(shared.transaction(), &login)
        .await
        .unwrap();
    assert!(found.is_some());

    // with_txn must not have committed the injected transaction
    drop(req);
    let txn = Arc::try_unwrap(shared.0).expect("no other transaction handles");
    txn.rollback().await.unwrap();

    let found = users::find_by_login(db, &login).await.unwrap();
    assert!(found.is_none(), "rollback should discard the write");
}
