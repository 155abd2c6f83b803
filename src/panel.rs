//! Admin panel controller.
//!
//! Holds the panel's local state and implements every button of the panel
//! without touching egui widgets, so flows can be driven from tests. The
//! renderer in `ui::admin_panel` only reads this state and forwards clicks.
//!
//! Site status and media are passed in as read-only snapshots. The panel
//! never edits them; it asks the backend for changes and requests a refresh.

use std::sync::Arc;

use eframe::egui;

use crate::app_data::PhotoService;
use crate::dialog::{ConfirmAction, Dialog, DialogQueue, DialogResult};
use crate::download::MediaDownloader;
use crate::media::{MediaCounts, MediaItem};
use crate::site_status::{Feature, FeatureToggles, SiteStatus, SiteStatusService};
use crate::state::{DownloadState, FeatureState, SiteState, StateEvent};

/// Overlay windows that can be opened from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    PhotoServices,
    Showcase,
    UserManagement,
    MusicAdmin,
}

/// Visibility flags of the overlays; each is independent of the others
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    pub photo_services: bool,
    pub showcase: bool,
    pub user_management: bool,
    pub music_admin: bool,
}

impl Overlays {
    pub fn is_open(&self, overlay: Overlay) -> bool {
        *self.flag(overlay)
    }

    pub fn flag_mut(&mut self, overlay: Overlay) -> &mut bool {
        match overlay {
            Overlay::PhotoServices => &mut self.photo_services,
            Overlay::Showcase => &mut self.showcase,
            Overlay::UserManagement => &mut self.user_management,
            Overlay::MusicAdmin => &mut self.music_admin,
        }
    }

    fn flag(&self, overlay: Overlay) -> &bool {
        match overlay {
            Overlay::PhotoServices => &self.photo_services,
            Overlay::Showcase => &self.showcase,
            Overlay::UserManagement => &self.user_management,
            Overlay::MusicAdmin => &self.music_admin,
        }
    }
}

/// Collaborators the panel dispatches to
#[derive(Clone)]
pub struct PanelServices {
    pub site: Arc<dyn SiteStatusService>,
    pub downloader: Arc<dyn MediaDownloader>,
}

pub struct AdminPanel {
    services: PanelServices,
    /// Name recorded as `updatedBy` on every change
    actor: String,
    is_admin: bool,
    pub site: SiteState,
    pub features: FeatureState,
    pub download: DownloadState,
    pub dialogs: DialogQueue,
    pub overlays: Overlays,
}

impl AdminPanel {
    pub fn new(services: PanelServices, actor: impl Into<String>, is_admin: bool) -> Self {
        Self {
            services,
            actor: actor.into(),
            is_admin,
            site: SiteState::default(),
            features: FeatureState::default(),
            download: DownloadState::default(),
            dialogs: DialogQueue::default(),
            overlays: Overlays::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Replace the archive writer, e.g. after the target folder changed
    pub fn set_downloader(&mut self, downloader: Arc<dyn MediaDownloader>) {
        self.services.downloader = downloader;
    }

    /// Flip admin mode and return the new value
    pub fn toggle_admin(&mut self) -> bool {
        self.is_admin = !self.is_admin;
        tracing::info!("Admin mode {}", if self.is_admin { "on" } else { "off" });
        self.is_admin
    }

    /// Click on the site status card: ask for confirmation first
    pub fn request_site_status_toggle(&mut self, status: Option<&SiteStatus>) {
        let Some(status) = status else {
            return;
        };
        self.dialogs
            .push(Dialog::confirm_site_status(status.is_under_construction));
    }

    /// Click on a feature card: send all three flags with the clicked one negated
    pub fn toggle_feature(&mut self, feature: Feature, status: Option<&SiteStatus>) {
        let Some(status) = status else {
            return;
        };
        let toggles = FeatureToggles::from(status).with_toggled(feature);
        self.features
            .start(self.services.site.clone(), feature, toggles, &self.actor);
    }

    /// Click on the ZIP download card
    pub fn request_download(&mut self, media: &[MediaItem]) {
        let counts = MediaCounts::from_items(media);
        if counts.downloadable() == 0 {
            self.dialogs.push(Dialog::nothing_to_download());
            return;
        }
        self.dialogs.push(Dialog::confirm_download(counts));
    }

    /// Close the current dialog and run its action if it was confirmed
    pub fn resolve_dialog(&mut self, result: DialogResult, media: &[MediaItem]) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match self.dialogs.resolve(result) {
            Some(ConfirmAction::SetUnderConstruction(under_construction)) => {
                events.extend(self.site.start(
                    self.services.site.clone(),
                    under_construction,
                    &self.actor,
                ));
            }
            Some(ConfirmAction::StartDownload) => {
                // Notes are part of the archive, so the full set is passed on
                events.extend(
                    self.download
                        .start(self.services.downloader.clone(), media.to_vec()),
                );
            }
            None => {}
        }

        events
    }

    pub fn open_overlay(&mut self, overlay: Overlay) {
        *self.overlays.flag_mut(overlay) = true;
    }

    pub fn close_overlay(&mut self, overlay: Overlay) {
        *self.overlays.flag_mut(overlay) = false;
    }

    /// Open the post-wedding recap page of the web app in the browser
    pub fn open_post_wedding_recap(&mut self, base_url: &str, recap_path: &str) {
        let url = join_url(base_url, recap_path);
        self.open_external(&url);
    }

    pub fn open_service(&mut self, service: &PhotoService) {
        self.open_external(&service.url);
    }

    /// Open a URL or folder with the system handler
    pub fn open_external(&mut self, target: &str) {
        tracing::info!("Opening {}", target);
        if let Err(e) = open::that(target) {
            tracing::warn!("Failed to open {}: {}", target, e);
            self.dialogs.push(Dialog::browser_failed(target, &e.to_string()));
        }
    }

    pub fn is_site_busy(&self) -> bool {
        self.site.is_busy()
    }

    pub fn is_feature_busy(&self, feature: Feature) -> bool {
        self.features.is_busy(feature)
    }

    pub fn is_downloading(&self) -> bool {
        self.download.is_downloading()
    }

    /// Collect finished operations. Dialogs are queued here; the remaining
    /// events are returned to the owner.
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = self.site.poll(ctx);
        events.extend(self.features.poll(ctx));
        events.extend(self.download.poll(ctx));

        let mut remaining = Vec::with_capacity(events.len());
        for event in events {
            match event {
                StateEvent::ShowDialog(dialog) => self.dialogs.push(dialog),
                other => remaining.push(other),
            }
        }
        remaining
    }
}

/// Join a base URL and an absolute path without doubling the slash
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Severity;
    use crate::download::{DownloadError, DownloadProgress, DownloadSummary};
    use crate::media::sample_set;
    use crate::site_status::{InMemorySiteStatus, RecordedCall};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tokio::sync::watch;

    /// What the scripted downloader answers
    #[derive(Clone)]
    enum Script {
        Succeed,
        Partial,
        Fatal(String),
    }

    struct ScriptedDownloader {
        script: Script,
        calls: Mutex<Vec<Vec<MediaItem>>>,
    }

    impl ScriptedDownloader {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<MediaItem>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaDownloader for ScriptedDownloader {
        async fn download_all(
            &self,
            items: Vec<MediaItem>,
            _progress_tx: watch::Sender<DownloadProgress>,
        ) -> Result<DownloadSummary, DownloadError> {
            let counts = MediaCounts::from_items(&items);
            self.calls.lock().unwrap().push(items);
            match &self.script {
                Script::Succeed => Ok(DownloadSummary {
                    archive_path: PathBuf::from("/tmp/Hochzeit_Medien.zip"),
                    images: counts.images,
                    videos: counts.videos,
                    notes: counts.notes,
                    bytes: 1024,
                }),
                Script::Partial => Err(DownloadError::PartialFailure {
                    succeeded: 3,
                    failed: 1,
                    archive_path: PathBuf::from("/tmp/Hochzeit_Medien.zip"),
                }),
                Script::Fatal(msg) => Err(DownloadError::Fatal(msg.clone())),
            }
        }
    }

    struct Harness {
        panel: AdminPanel,
        store: InMemorySiteStatus,
        downloader: Arc<ScriptedDownloader>,
        ctx: egui::Context,
    }

    impl Harness {
        fn new(store: InMemorySiteStatus, script: Script) -> Self {
            let downloader = ScriptedDownloader::new(script);
            let services = PanelServices {
                site: Arc::new(store.clone()),
                downloader: downloader.clone(),
            };
            Self {
                panel: AdminPanel::new(services, "Admin", true),
                store,
                downloader,
                ctx: egui::Context::default(),
            }
        }

        fn busy(&self) -> bool {
            self.panel.is_site_busy() || self.panel.features.any_busy() || self.panel.is_downloading()
        }

        /// Poll until no operation is pending
        async fn settle(&mut self) -> Vec<StateEvent> {
            let mut events = Vec::new();
            for _ in 0..10_000 {
                events.extend(self.panel.poll(&self.ctx));
                if !self.busy() {
                    return events;
                }
                tokio::task::yield_now().await;
            }
            panic!("operations did not finish");
        }

        fn current_alert(&self) -> (Severity, String) {
            match self.panel.dialogs.current() {
                Some(Dialog::Alert { severity, body, .. }) => (*severity, body.clone()),
                other => panic!("expected alert, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_toggle_admin_flips() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Succeed);
        assert!(h.panel.is_admin());
        assert!(!h.panel.toggle_admin());
        assert!(h.panel.toggle_admin());
    }

    #[tokio::test]
    async fn test_unlock_passes_negation_and_actor() {
        let status = SiteStatus::default();
        let mut h = Harness::new(InMemorySiteStatus::new(status.clone()), Script::Succeed);

        h.panel.request_site_status_toggle(Some(&status));
        assert!(h.panel.dialogs.is_open());
        h.panel.resolve_dialog(DialogResult::Confirmed, &[]);
        assert!(h.panel.is_site_busy());

        let events = h.settle().await;
        assert!(!h.panel.is_site_busy());
        assert_eq!(
            h.store.calls(),
            vec![RecordedCall::SiteStatus {
                under_construction: false,
                actor: "Admin".to_string()
            }]
        );
        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Success);
        assert!(body.contains("freigeschaltet"));
        assert!(events.iter().any(|e| matches!(e, StateEvent::RefreshSnapshot)));
    }

    #[tokio::test]
    async fn test_lock_when_open() {
        let status = SiteStatus {
            is_under_construction: false,
            ..Default::default()
        };
        let mut h = Harness::new(InMemorySiteStatus::new(status.clone()), Script::Succeed);

        h.panel.request_site_status_toggle(Some(&status));
        h.panel.resolve_dialog(DialogResult::Confirmed, &[]);
        h.settle().await;

        assert!(matches!(
            h.store.calls().as_slice(),
            [RecordedCall::SiteStatus { under_construction: true, .. }]
        ));
    }

    #[tokio::test]
    async fn test_cancelled_site_toggle_changes_nothing() {
        let status = SiteStatus::default();
        let mut h = Harness::new(InMemorySiteStatus::new(status.clone()), Script::Succeed);

        h.panel.request_site_status_toggle(Some(&status));
        let events = h.panel.resolve_dialog(DialogResult::Cancelled, &[]);

        assert!(events.is_empty());
        assert!(!h.panel.is_site_busy());
        assert!(!h.panel.dialogs.is_open());
        assert!(h.store.calls().is_empty());
    }

    #[test]
    fn test_site_toggle_without_status_is_noop() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Succeed);
        h.panel.request_site_status_toggle(None);
        h.panel.toggle_feature(Feature::Gallery, None);
        assert!(!h.panel.dialogs.is_open());
        assert!(!h.panel.features.any_busy());
    }

    #[tokio::test]
    async fn test_site_failure_shows_raw_error() {
        let status = SiteStatus::default();
        let store = InMemorySiteStatus::new(status.clone()).with_failure("permission denied");
        let mut h = Harness::new(store, Script::Succeed);

        h.panel.request_site_status_toggle(Some(&status));
        h.panel.resolve_dialog(DialogResult::Confirmed, &[]);
        h.settle().await;

        assert!(!h.panel.is_site_busy());
        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Error);
        assert!(body.contains("freischalten"));
        assert!(body.contains("permission denied"));
    }

    #[tokio::test]
    async fn test_feature_toggle_negates_only_clicked_flag() {
        let status = SiteStatus {
            gallery_enabled: true,
            music_wishlist_enabled: false,
            stories_enabled: true,
            ..Default::default()
        };
        let mut h = Harness::new(InMemorySiteStatus::new(status.clone()), Script::Succeed);

        h.panel.toggle_feature(Feature::Stories, Some(&status));
        assert!(h.panel.is_feature_busy(Feature::Stories));
        assert!(!h.panel.is_feature_busy(Feature::Gallery));
        h.settle().await;

        assert!(!h.panel.features.any_busy());
        assert_eq!(
            h.store.calls(),
            vec![RecordedCall::FeatureToggles {
                toggles: FeatureToggles {
                    gallery: true,
                    music_wishlist: false,
                    stories: false
                },
                actor: "Admin".to_string()
            }]
        );
        // Success is shown by the next snapshot, not by an alert
        assert!(!h.panel.dialogs.is_open());
    }

    #[tokio::test]
    async fn test_second_feature_waits_for_first_update() {
        let status = SiteStatus {
            gallery_enabled: true,
            music_wishlist_enabled: true,
            stories_enabled: true,
            ..Default::default()
        };
        let mut h = Harness::new(InMemorySiteStatus::new(status.clone()), Script::Succeed);

        h.panel.toggle_feature(Feature::Gallery, Some(&status));
        h.panel.toggle_feature(Feature::MusicWishlist, Some(&status));
        assert!(h.panel.is_feature_busy(Feature::Gallery));
        assert!(!h.panel.is_feature_busy(Feature::MusicWishlist));
        h.settle().await;

        assert_eq!(
            h.store.calls(),
            vec![RecordedCall::FeatureToggles {
                toggles: FeatureToggles {
                    gallery: false,
                    music_wishlist: true,
                    stories: true
                },
                actor: "Admin".to_string()
            }]
        );

        // The next click starts from the refreshed record
        let refreshed = h.store.fetch_status().await.unwrap();
        assert!(!refreshed.gallery_enabled);
        h.panel.toggle_feature(Feature::MusicWishlist, Some(&refreshed));
        h.settle().await;

        let stored = h.store.fetch_status().await.unwrap();
        assert!(!stored.gallery_enabled);
        assert!(!stored.music_wishlist_enabled);
        assert!(stored.stories_enabled);
        assert_eq!(h.store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_feature_failure_alerts_and_clears() {
        let status = SiteStatus::default();
        let store = InMemorySiteStatus::new(status.clone()).with_failure("offline");
        let mut h = Harness::new(store, Script::Succeed);

        h.panel.toggle_feature(Feature::MusicWishlist, Some(&status));
        h.settle().await;

        assert!(!h.panel.is_feature_busy(Feature::MusicWishlist));
        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Error);
        assert_eq!(body, "Fehler beim Aktualisieren der Musikwünsche-Einstellung");
    }

    #[tokio::test]
    async fn test_download_without_files_short_circuits() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Succeed);
        let media = sample_set(0, 0, 3);

        h.panel.request_download(&media);
        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Info);
        assert_eq!(body, "Keine Medien zum Herunterladen vorhanden.");

        h.panel.resolve_dialog(DialogResult::Dismissed, &media);
        assert!(!h.panel.is_downloading());
        h.settle().await;
        assert!(h.downloader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_download_passes_full_set_once() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Succeed);
        let media = sample_set(3, 1, 2);

        h.panel.request_download(&media);
        match h.panel.dialogs.current() {
            Some(Dialog::Confirm { body, .. }) => {
                assert!(body.contains("3 Bilder"));
                assert!(body.contains("1 Videos"));
                assert!(body.contains("2 Notizen"));
            }
            other => panic!("expected confirmation, got {:?}", other),
        }

        h.panel.resolve_dialog(DialogResult::Confirmed, &media);
        assert!(h.panel.is_downloading());
        h.settle().await;

        assert!(!h.panel.is_downloading());
        let calls = h.downloader.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], media);

        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Success);
        assert!(body.contains("3 Bilder"));
        assert!(body.contains("2 Notizen"));
    }

    #[tokio::test]
    async fn test_cancelled_download_never_dispatches() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Succeed);
        let media = sample_set(1, 0, 0);

        h.panel.request_download(&media);
        h.panel.resolve_dialog(DialogResult::Cancelled, &media);
        h.settle().await;
        assert!(h.downloader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_partial_download_shows_warning() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Partial);
        let media = sample_set(4, 0, 0);

        h.panel.request_download(&media);
        h.panel.resolve_dialog(DialogResult::Confirmed, &media);
        h.settle().await;

        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Warning);
        assert!(body.contains("teilweise erfolgreich"));
        assert!(h.panel.download.last_archive.is_some());
    }

    #[tokio::test]
    async fn test_fatal_download_shows_failure() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Fatal("disk full".into()));
        let media = sample_set(1, 1, 0);

        h.panel.request_download(&media);
        h.panel.resolve_dialog(DialogResult::Confirmed, &media);
        h.settle().await;

        assert!(!h.panel.is_downloading());
        let (severity, body) = h.current_alert();
        assert_eq!(severity, Severity::Error);
        assert!(body.contains("disk full"));
    }

    #[test]
    fn test_overlays_are_independent() {
        let mut h = Harness::new(InMemorySiteStatus::default(), Script::Succeed);
        h.panel.open_overlay(Overlay::PhotoServices);
        h.panel.open_overlay(Overlay::MusicAdmin);
        assert!(h.panel.overlays.is_open(Overlay::PhotoServices));
        assert!(h.panel.overlays.is_open(Overlay::MusicAdmin));
        assert!(!h.panel.overlays.is_open(Overlay::Showcase));

        h.panel.close_overlay(Overlay::PhotoServices);
        assert!(!h.panel.overlays.is_open(Overlay::PhotoServices));
        assert!(h.panel.overlays.is_open(Overlay::MusicAdmin));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://hochzeit.example/", "/admin/post-wedding-recap"),
            "https://hochzeit.example/admin/post-wedding-recap"
        );
        assert_eq!(join_url("http://x", "a"), "http://x/a");
        assert_eq!(join_url("http://x", "https://y/z"), "https://y/z");
    }
}
