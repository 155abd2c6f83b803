//! Public access (lock/unlock) state

use std::sync::Arc;

use eframe::egui;

use crate::dialog::Dialog;
use crate::site_status::{SiteStatusError, SiteStatusService};
use crate::state::operation::{Operation, OperationStatus, TaskFailure};
use crate::state::StateEvent;

/// State of the site lock/unlock call
#[derive(Default)]
pub struct SiteState {
    op: Operation<(), SiteStatusError>,
    /// Value requested by the running or last call
    target: Option<bool>,
}

impl SiteState {
    pub fn is_busy(&self) -> bool {
        self.op.is_pending()
    }

    pub fn status(&self) -> &OperationStatus {
        self.op.status()
    }

    /// Ask the backend to set public access. `under_construction = true` locks the site.
    pub fn start(
        &mut self,
        service: Arc<dyn SiteStatusService>,
        under_construction: bool,
        actor: &str,
    ) -> Option<StateEvent> {
        let actor = actor.to_string();
        let started = self.op.start(async move {
            service.update_site_status(under_construction, &actor).await
        });
        if !started {
            tracing::debug!("Site status update already running");
            return None;
        }

        self.target = Some(under_construction);
        tracing::info!(
            "Requesting site status change: under_construction={}",
            under_construction
        );
        Some(StateEvent::StatusMessage(if under_construction {
            "Website wird gesperrt...".to_string()
        } else {
            "Website wird freigeschaltet...".to_string()
        }))
    }

    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();
        let target = self.target.unwrap_or(true);

        match self.op.poll() {
            Some(Ok(())) => {
                tracing::info!("Site status updated: under_construction={}", target);
                events.push(StateEvent::ShowDialog(Dialog::site_status_updated(target)));
                events.push(StateEvent::StatusMessage(
                    Dialog::site_status_updated(target).title().to_string(),
                ));
                events.push(StateEvent::RefreshSnapshot);
            }
            Some(Err(failure)) => {
                let msg = match failure {
                    TaskFailure::Failed(e) => e.to_string(),
                    TaskFailure::Panicked(msg) => msg,
                };
                tracing::error!("Site status update failed: {}", msg);
                events.push(StateEvent::ShowDialog(Dialog::site_status_failed(target, &msg)));
                events.push(StateEvent::StatusMessage(format!("Fehler: {}", msg)));
                events.push(StateEvent::RefreshSnapshot);
            }
            None if self.op.is_pending() => ctx.request_repaint(),
            None => {}
        }

        events
    }
}
