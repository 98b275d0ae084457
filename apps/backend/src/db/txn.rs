use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// A shared transaction wrapper that can be injected into request extensions.
///
/// Integration tests use this to run a whole request against one transaction
/// that is rolled back afterwards, keeping the test database clean.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    /// Get a reference to the underlying database transaction
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Extract a shared transaction from request extensions, if present
    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }
}

/// Execute a function within a database transaction.
///
/// 1) If a SharedTxn is in request extensions → use it (no commit/rollback here)
/// 2) Otherwise → begin a transaction, run the closure, commit on Ok,
///    roll back on Err.
///
/// Every mutating room operation goes through here, so check-then-act
/// sequences (capacity check + insert on join, ready check + status update
/// on start) are atomic instead of racing across separate statements.
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'c> FnOnce(
        &'c DatabaseTransaction,
    )
        -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<R, AppError>> + 'c>>,
{
    // Pull any SharedTxn out of extensions *before* awaiting to avoid holding
    // a RefCell borrow across an await point.
    let shared_txn: Option<SharedTxn> = req.and_then(SharedTxn::from_req);

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let db = state.require_db()?;
    let txn = db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve the original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
