//! Task-local trace context for web requests.
//!
//! Holds the current request's trace id so the error renderer and log
//! statements can reach it without threading it through every signature.
//! Part of the web boundary; service code should not import this.

use std::cell::RefCell;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Get the trace id for the current task.
/// Returns "unknown" outside of a request context.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run a future within a trace context scope.
/// Used by the request-trace middleware.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}

#[cfg(test)]
mod tests {
    use super::{trace_id, with_trace_id};

    #[tokio::test]
    async fn unknown_outside_context() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn scoped_inside_context() {
        let id = "trace-abc".to_string();
        with_trace_id(id.clone(), async {
            assert_eq!(trace_id(), id);
        })
        .await;
        assert_eq!(trace_id(), "unknown");
    }
}
