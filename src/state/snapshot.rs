//! Backend snapshots the panel renders from.
//!
//! Site status and media list are owned by the backend. They are re-read on
//! an interval and after every change the panel requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::task::JoinHandle;

use crate::media::{MediaError, MediaItem, MediaSource};
use crate::site_status::{SiteStatus, SiteStatusError, SiteStatusService};
use crate::state::StateEvent;
use crate::task::{poll_task, PollResult};

/// Result of one combined fetch
pub struct SnapshotFetch {
    pub status: Result<SiteStatus, SiteStatusError>,
    pub media: Result<Vec<MediaItem>, MediaError>,
}

/// Latest known backend state
#[derive(Default)]
pub struct SnapshotState {
    /// None until the first successful fetch
    pub site_status: Option<SiteStatus>,
    pub media: Vec<MediaItem>,
    /// Error of the last fetch, if any part failed
    pub error: Option<String>,
    task: Option<JoinHandle<SnapshotFetch>>,
    last_refresh: Option<Instant>,
}

impl SnapshotState {
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    /// Whether the periodic refresh is due
    pub fn is_due(&self, interval: Duration) -> bool {
        match self.last_refresh {
            None => true,
            Some(at) => at.elapsed() >= interval,
        }
    }

    /// Start a fetch. A fetch still in flight is aborted so its older data
    /// cannot overwrite the newer one.
    pub fn refresh(&mut self, status: Arc<dyn SiteStatusService>, media: Arc<dyn MediaSource>) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Superseded running snapshot refresh");
        }

        self.last_refresh = Some(Instant::now());
        self.task = Some(tokio::spawn(async move {
            let (status, media) = tokio::join!(status.fetch_status(), media.list_media());
            SnapshotFetch { status, media }
        }));
    }

    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(fetch)) => {
                let mut errors = Vec::new();

                match fetch.status {
                    Ok(status) => self.site_status = Some(status),
                    Err(e) => {
                        tracing::warn!("Failed to fetch site status: {}", e);
                        errors.push(format!("Status: {}", e));
                    }
                }
                match fetch.media {
                    Ok(media) => {
                        tracing::debug!("Fetched {} media items", media.len());
                        self.media = media;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to fetch media: {}", e);
                        errors.push(format!("Medien: {}", e));
                    }
                }

                if errors.is_empty() {
                    self.error = None;
                } else {
                    let msg = errors.join("; ");
                    events.push(StateEvent::StatusMessage(format!("Verbindungsfehler: {}", msg)));
                    self.error = Some(msg);
                }
            }
            PollResult::Complete(Err(e)) => {
                if !e.is_cancelled() {
                    tracing::error!("Snapshot task panicked: {}", e);
                    self.error = Some(e.to_string());
                }
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::sample_set;
    use async_trait::async_trait;

    struct FixedMedia(Result<Vec<MediaItem>, MediaError>);

    #[async_trait]
    impl MediaSource for FixedMedia {
        async fn list_media(&self) -> Result<Vec<MediaItem>, MediaError> {
            self.0.clone()
        }
    }

    async fn drive(state: &mut SnapshotState, ctx: &egui::Context) -> Vec<StateEvent> {
        for _ in 0..10_000 {
            let events = state.poll(ctx);
            if !state.is_loading() {
                return events;
            }
            tokio::task::yield_now().await;
        }
        Vec::new()
    }

    #[tokio::test]
    async fn test_refresh_fills_snapshot() {
        let ctx = egui::Context::default();
        let mut state = SnapshotState::default();
        assert!(state.is_due(Duration::from_secs(15)));

        let status = Arc::new(crate::site_status::InMemorySiteStatus::new(SiteStatus::default()));
        state.refresh(status, Arc::new(FixedMedia(Ok(sample_set(2, 0, 1)))));
        assert!(!state.is_due(Duration::from_secs(15)));

        drive(&mut state, &ctx).await;
        assert!(state.site_status.is_some());
        assert_eq!(state.media.len(), 3);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_media_failure_keeps_previous_list() {
        let ctx = egui::Context::default();
        let mut state = SnapshotState {
            media: sample_set(1, 0, 0),
            ..Default::default()
        };

        let status = Arc::new(crate::site_status::InMemorySiteStatus::new(SiteStatus::default()));
        let media = Arc::new(FixedMedia(Err(MediaError::Request("timeout".into()))));
        state.refresh(status, media);

        let events = drive(&mut state, &ctx).await;
        assert_eq!(state.media.len(), 1);
        assert!(state.site_status.is_some());
        assert!(state.error.as_deref().unwrap().contains("timeout"));
        assert!(matches!(events.first(), Some(StateEvent::StatusMessage(_))));
    }
}
