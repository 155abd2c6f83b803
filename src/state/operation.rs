//! Status tracking for a single asynchronous operation

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::task::{poll_task, PollResult};

/// Lifecycle of one operation instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

/// Why a finished operation produced no value
#[derive(Error, Debug)]
pub enum TaskFailure<E> {
    #[error("{0}")]
    Failed(E),

    #[error("Task panicked: {0}")]
    Panicked(String),
}

/// At most one running task plus the status of the latest run.
///
/// `start` refuses while a run is pending, so a completion can only ever
/// belong to the run that is currently shown.
pub struct Operation<T, E> {
    task: Option<JoinHandle<Result<T, E>>>,
    status: OperationStatus,
}

impl<T, E> Default for Operation<T, E> {
    fn default() -> Self {
        Self {
            task: None,
            status: OperationStatus::Idle,
        }
    }
}

impl<T, E> Operation<T, E>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Spawn `future` unless a run is already pending. Returns whether it started.
    pub fn start<F>(&mut self, future: F) -> bool
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        if self.is_pending() {
            return false;
        }
        self.task = Some(tokio::spawn(future));
        self.status = OperationStatus::Pending;
        true
    }

    /// Take the result if the run finished. Pending status is cleared on every outcome.
    pub fn poll(&mut self) -> Option<Result<T, TaskFailure<E>>> {
        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(value))) => {
                self.status = OperationStatus::Succeeded;
                Some(Ok(value))
            }
            PollResult::Complete(Ok(Err(e))) => {
                self.status = OperationStatus::Failed(e.to_string());
                Some(Err(TaskFailure::Failed(e)))
            }
            PollResult::Complete(Err(e)) => {
                let msg = e.to_string();
                self.status = OperationStatus::Failed(msg.clone());
                Some(Err(TaskFailure::Panicked(msg)))
            }
            PollResult::Pending | PollResult::NoTask => None,
        }
    }
}

/// Poll `op` until it completes. Test helper for flows driven by tokio tasks.
#[cfg(test)]
pub(crate) async fn settle<T, E>(op: &mut Operation<T, E>) -> Option<Result<T, TaskFailure<E>>>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    for _ in 0..10_000 {
        if let Some(result) = op.poll() {
            return Some(result);
        }
        if !op.is_pending() {
            return None;
        }
        tokio::task::yield_now().await;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_clears_pending() {
        let mut op: Operation<u8, String> = Operation::default();
        assert_eq!(op.status(), &OperationStatus::Idle);

        assert!(op.start(async { Ok(3) }));
        assert_eq!(op.status(), &OperationStatus::Pending);

        let result = settle(&mut op).await.unwrap();
        assert_eq!(result.unwrap(), 3);
        assert!(!op.is_pending());
        assert_eq!(op.status(), &OperationStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_failure_clears_pending() {
        let mut op: Operation<(), String> = Operation::default();
        op.start(async { Err("offline".to_string()) });

        let result = settle(&mut op).await.unwrap();
        assert!(matches!(result, Err(TaskFailure::Failed(ref e)) if e == "offline"));
        assert!(!op.is_pending());
        assert_eq!(op.status(), &OperationStatus::Failed("offline".to_string()));
    }

    #[tokio::test]
    async fn test_refuses_second_start_while_pending() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut op: Operation<(), String> = Operation::default();

        assert!(op.start(async move {
            let _ = rx.await;
            Ok(())
        }));
        assert!(!op.start(async { Err("second".to_string()) }));

        tx.send(()).unwrap();
        assert!(settle(&mut op).await.unwrap().is_ok());
        assert!(op.start(async { Ok(()) }));
    }
}
