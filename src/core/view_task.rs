// src/core/view_task.rs
//! Requests scoped to a view: when the view goes away its requests are cancelled
//! and their results dropped.

use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Handle that lets another task tear the view down
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Await `fut` unless the scope is cancelled first; `None` means the result was discarded
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("View request cancelled before completion");
                None
            }
            output = fut => Some(output),
        }
    }

    /// Same as [`run`](Self::run) on a spawned task
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.child_token();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = fut => Some(output),
            }
        })
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_completes() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_cancelled_scope_discards_result() {
        let scope = ViewScope::new();
        scope.cancel();
        assert_eq!(scope.run(async { 7 }).await, None);
    }

    #[tokio::test]
    async fn test_drop_cancels_spawned_request() {
        let scope = ViewScope::new();
        let handle = scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late"
        });
        drop(scope);
        assert_eq!(handle.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cancel_from_other_task() {
        let scope = ViewScope::new();
        let token = scope.token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });
        let result = scope
            .run(tokio::time::sleep(Duration::from_secs(30)))
            .await;
        assert!(result.is_none());
        assert!(scope.is_cancelled());
    }
}
