//! Media archive download state

use std::sync::Arc;

use eframe::egui;
use tokio::sync::watch;

use crate::dialog::Dialog;
use crate::download::{
    DownloadError, DownloadPhase, DownloadProgress, DownloadSummary, MediaDownloader,
};
use crate::media::MediaItem;
use crate::state::operation::{Operation, OperationStatus, TaskFailure};
use crate::state::StateEvent;

/// Final phase shown for a failed run; a kept archive is not a failure
fn failure_phase(error: &DownloadError) -> DownloadPhase {
    if error.is_partial() {
        DownloadPhase::PartiallyComplete
    } else {
        DownloadPhase::Failed
    }
}

/// Download-related state
#[derive(Default)]
pub struct DownloadState {
    op: Operation<DownloadSummary, DownloadError>,
    /// Channel receiver for archive progress
    progress_rx: Option<watch::Receiver<DownloadProgress>>,
    /// Latest progress
    pub progress: DownloadProgress,
    /// Archive written by the last run, including partial runs
    pub last_archive: Option<std::path::PathBuf>,
}

impl DownloadState {
    pub fn is_downloading(&self) -> bool {
        self.op.is_pending()
    }

    pub fn status(&self) -> &OperationStatus {
        self.op.status()
    }

    /// Start archiving the full item set
    pub fn start(
        &mut self,
        downloader: Arc<dyn MediaDownloader>,
        items: Vec<MediaItem>,
    ) -> Option<StateEvent> {
        if self.op.is_pending() {
            return None;
        }

        let (progress_tx, progress_rx) = watch::channel(DownloadProgress::default());
        let count = items.len();

        self.op
            .start(async move { downloader.download_all(items, progress_tx).await });
        self.progress_rx = Some(progress_rx);
        self.progress = DownloadProgress::default();

        tracing::info!("Starting media download of {} items", count);
        Some(StateEvent::StatusMessage(format!(
            "Download von {} Dateien gestartet",
            count
        )))
    }

    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        if let Some(rx) = &mut self.progress_rx {
            if rx.has_changed().unwrap_or(false) {
                self.progress = rx.borrow_and_update().clone();
                events.push(StateEvent::StatusMessage(
                    self.progress.phase.description().to_string(),
                ));
            }
        }

        match self.op.poll() {
            Some(Ok(summary)) => {
                self.progress_rx = None;
                self.progress.phase = DownloadPhase::Complete;
                self.last_archive = Some(summary.archive_path.clone());
                events.push(StateEvent::StatusMessage(format!(
                    "ZIP gespeichert: {}",
                    summary.archive_path.display()
                )));
                events.push(StateEvent::ShowDialog(Dialog::download_succeeded(&summary)));
            }
            Some(Err(failure)) => {
                self.progress_rx = None;
                let error = match failure {
                    TaskFailure::Failed(e) => e,
                    TaskFailure::Panicked(msg) => DownloadError::Fatal(msg),
                };
                self.progress.phase = failure_phase(&error);
                tracing::error!("Download error: {}", error);
                if let DownloadError::PartialFailure { archive_path, .. } = &error {
                    self.last_archive = Some(archive_path.clone());
                }
                events.push(StateEvent::StatusMessage(error.to_string()));
                events.push(StateEvent::ShowDialog(Dialog::download_failed(&error)));
            }
            None if self.op.is_pending() => ctx.request_repaint(),
            None => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_partial_failure_is_not_shown_as_failed() {
        let partial = DownloadError::PartialFailure {
            succeeded: 4,
            failed: 1,
            archive_path: PathBuf::from("Hochzeit_Medien.zip"),
        };
        let phase = failure_phase(&partial);
        assert_eq!(phase, DownloadPhase::PartiallyComplete);
        assert_eq!(phase.description(), "Download teilweise erfolgreich");

        let progress = DownloadProgress {
            phase,
            items_processed: 4,
            total_items: 5,
            current_item: String::new(),
        };
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_fatal_error_is_failed() {
        let phase = failure_phase(&DownloadError::Fatal("Netzwerkfehler".into()));
        assert_eq!(phase, DownloadPhase::Failed);
        assert_eq!(phase.description(), "Download fehlgeschlagen");
    }
}
