//! Feature switch state (gallery, music wishlist, stories)

use std::sync::Arc;

use eframe::egui;

use crate::dialog::Dialog;
use crate::site_status::{Feature, FeatureToggles, SiteStatusError, SiteStatusService};
use crate::state::operation::{Operation, OperationStatus};
use crate::state::StateEvent;

/// One operation per feature, so each switch reports its own outcome.
/// Only one of them runs at a time since every request carries all three flags.
#[derive(Default)]
pub struct FeatureState {
    gallery: Operation<(), SiteStatusError>,
    music_wishlist: Operation<(), SiteStatusError>,
    stories: Operation<(), SiteStatusError>,
}

impl FeatureState {
    fn op(&self, feature: Feature) -> &Operation<(), SiteStatusError> {
        match feature {
            Feature::Gallery => &self.gallery,
            Feature::MusicWishlist => &self.music_wishlist,
            Feature::Stories => &self.stories,
        }
    }

    fn op_mut(&mut self, feature: Feature) -> &mut Operation<(), SiteStatusError> {
        match feature {
            Feature::Gallery => &mut self.gallery,
            Feature::MusicWishlist => &mut self.music_wishlist,
            Feature::Stories => &mut self.stories,
        }
    }

    pub fn is_busy(&self, feature: Feature) -> bool {
        self.op(feature).is_pending()
    }

    /// True while any switch is being updated
    pub fn any_busy(&self) -> bool {
        Feature::all().iter().any(|f| self.is_busy(*f))
    }

    pub fn status(&self, feature: Feature) -> &OperationStatus {
        self.op(feature).status()
    }

    /// Send `toggles` for a click on `feature`; refused while any switch is updating
    pub fn start(
        &mut self,
        service: Arc<dyn SiteStatusService>,
        feature: Feature,
        toggles: FeatureToggles,
        actor: &str,
    ) -> bool {
        if self.any_busy() {
            tracing::debug!("Feature {:?} ignored, another update is in flight", feature);
            return false;
        }
        let actor = actor.to_string();
        let started = self.op_mut(feature).start(async move {
            service.update_feature_toggles(toggles, &actor).await
        });
        if started {
            tracing::info!(
                "Updating feature {:?}: gallery={} music_wishlist={} stories={}",
                feature,
                toggles.gallery,
                toggles.music_wishlist,
                toggles.stories
            );
        }
        started
    }

    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        for feature in Feature::all().iter().copied() {
            let op = self.op_mut(feature);
            match op.poll() {
                Some(Ok(())) => {
                    tracing::info!("Feature {:?} updated", feature);
                    events.push(StateEvent::RefreshSnapshot);
                }
                Some(Err(e)) => {
                    tracing::error!("Feature {:?} update failed: {}", feature, e);
                    events.push(StateEvent::ShowDialog(Dialog::feature_failed(feature)));
                    events.push(StateEvent::RefreshSnapshot);
                }
                None if op.is_pending() => ctx.request_repaint(),
                None => {}
            }
        }

        events
    }
}
