//! Polling of tokio tasks from the UI thread.
//!
//! The egui frame loop cannot await. Work is spawned with `tokio::spawn` and
//! the handle is checked once per frame instead.

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// Result of polling a task slot
pub enum PollResult<T> {
    /// Slot is empty
    NoTask,
    /// Task is still running; the slot keeps the handle
    Pending,
    /// Task finished and the slot was emptied. `Err` means it panicked or was aborted.
    Complete(Result<T, JoinError>),
}

/// Poll an optional task handle, taking it out of the slot once finished.
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    let Some(handle) = task.as_mut() else {
        return PollResult::NoTask;
    };

    if !handle.is_finished() {
        return PollResult::Pending;
    }

    // Polling through `&mut` keeps the handle in place if it is not ready after all
    match handle.now_or_never() {
        Some(result) => {
            *task = None;
            PollResult::Complete(result)
        }
        None => {
            tracing::warn!("Task reported finished but had no output yet");
            PollResult::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_poll_empty_slot() {
        let mut slot: Option<JoinHandle<u32>> = None;
        assert!(matches!(poll_task(&mut slot), PollResult::NoTask));
    }

    #[tokio::test]
    async fn test_poll_takes_finished_handle() {
        let mut slot = Some(tokio::spawn(async { 7u32 }));
        let mut result = None;
        for _ in 0..1000 {
            match poll_task(&mut slot) {
                PollResult::Complete(r) => {
                    result = Some(r);
                    break;
                }
                PollResult::Pending => tokio::task::yield_now().await,
                PollResult::NoTask => break,
            }
        }
        assert_eq!(result.unwrap().unwrap(), 7);
        assert!(slot.is_none());
    }

    #[tokio::test]
    async fn test_poll_reports_panic() {
        let should_panic = true;
        let mut slot = Some(tokio::spawn(async move {
            if should_panic {
                panic!("boom");
            }
        }));
        loop {
            match poll_task(&mut slot) {
                PollResult::Complete(r) => {
                    assert!(r.unwrap_err().is_panic());
                    break;
                }
                PollResult::Pending => tokio::task::yield_now().await,
                PollResult::NoTask => panic!("slot emptied without result"),
            }
        }
    }
}
