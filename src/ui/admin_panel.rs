//! Admin panel UI rendering

use eframe::egui::{self, RichText};

use crate::app::AdminApp;
use crate::app_data::admin_paths;
use crate::download::DownloadPhase;
use crate::media::{download_button_label, file_count_label};
use crate::panel::Overlay;
use crate::site_status::{Feature, FeatureToggles};
use crate::state::OperationStatus;
use crate::ui::components::{render_section_frame, ActionCard};
use crate::ui::theme::Theme;

/// Clicks collected while rendering, applied afterwards
enum PanelAction {
    OpenRecap,
    Open(Overlay),
    ToggleFeature(Feature),
    ToggleSiteStatus,
    Download,
    OpenArchiveFolder,
    ChooseDownloadDir,
}

fn feature_icon(feature: Feature) -> &'static str {
    match feature {
        Feature::Gallery => "🖼",
        Feature::MusicWishlist => "🎶",
        Feature::Stories => "📖",
    }
}

/// Render the admin panel. Only called in admin mode.
pub fn render_admin_panel(app: &mut AdminApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let mut actions = Vec::new();

    render_section_frame(ui, &theme, "Admin-Panel", |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);
            render_page_cards(ui, &theme, &mut actions);
            render_toggle_cards(app, ui, &theme, &mut actions);
            render_tool_cards(app, ui, &theme, &mut actions);
        });

        render_download_status(app, ui, &theme, &mut actions);
    });

    for action in actions {
        apply(app, action);
    }
}

fn render_page_cards(ui: &mut egui::Ui, theme: &Theme, actions: &mut Vec<PanelAction>) {
    if ActionCard::new("🎬", "Wedding Recap", "Rückblick öffnen", theme.accent)
        .tooltip("Post-Wedding Recap im Browser öffnen")
        .show(ui, theme)
        .clicked()
    {
        actions.push(PanelAction::OpenRecap);
    }

    let pages = [
        ("👥", "User Management", "Benutzer verwalten", Overlay::UserManagement),
        ("🎵", "Spotify Admin", "Musik verwalten", Overlay::MusicAdmin),
        ("✨", "Showcase", "Präsentation", Overlay::Showcase),
    ];
    for (icon, title, caption, overlay) in pages {
        if ActionCard::new(icon, title, caption, theme.accent)
            .show(ui, theme)
            .clicked()
        {
            actions.push(PanelAction::Open(overlay));
        }
    }
}

fn render_toggle_cards(
    app: &AdminApp,
    ui: &mut egui::Ui,
    theme: &Theme,
    actions: &mut Vec<PanelAction>,
) {
    let status = app.snapshot.site_status.as_ref();

    for &feature in Feature::all() {
        let enabled = status.map(|s| FeatureToggles::from(s).get(feature));
        let caption = match enabled {
            Some(true) => "Aktiviert",
            Some(false) => "Deaktiviert",
            None => "Unbekannt",
        };
        let accent = if enabled == Some(true) {
            theme.success
        } else {
            theme.text_muted
        };

        let tooltip = last_error_tooltip(app.panel.features.status(feature))
            .unwrap_or_else(|| feature_tooltip(feature, enabled));

        // All three flags travel in one request, so one update at a time
        if ActionCard::new(feature_icon(feature), feature.label(), caption, accent)
            .enabled(status.is_some() && !app.panel.features.any_busy())
            .busy(app.panel.is_feature_busy(feature))
            .highlighted(enabled == Some(true))
            .tooltip(&tooltip)
            .show(ui, theme)
            .clicked()
        {
            actions.push(PanelAction::ToggleFeature(feature));
        }
    }

    let (icon, caption, accent) = match status {
        Some(s) if s.is_under_construction => ("🔒", s.access_word(), theme.warning),
        Some(s) => ("🌐", s.access_word(), theme.success),
        None => ("❔", "Unbekannt", theme.text_muted),
    };
    let tooltip = last_error_tooltip(app.panel.site.status())
        .unwrap_or_else(|| "Website sperren oder freischalten".to_string());
    if ActionCard::new(icon, "Website Status", caption, accent)
        .enabled(status.is_some())
        .busy(app.panel.is_site_busy())
        .highlighted(status.is_some())
        .tooltip(&tooltip)
        .show(ui, theme)
        .clicked()
    {
        actions.push(PanelAction::ToggleSiteStatus);
    }
}

fn feature_tooltip(feature: Feature, enabled: Option<bool>) -> String {
    match enabled {
        Some(true) => format!("{} deaktivieren", feature.german_name()),
        Some(false) => format!("{} aktivieren", feature.german_name()),
        None => format!("{} umschalten", feature.german_name()),
    }
}

fn last_error_tooltip(status: &OperationStatus) -> Option<String> {
    match status {
        OperationStatus::Failed(msg) => Some(format!("Letzter Fehler: {}", msg)),
        _ => None,
    }
}

fn render_tool_cards(
    app: &AdminApp,
    ui: &mut egui::Ui,
    theme: &Theme,
    actions: &mut Vec<PanelAction>,
) {
    if ActionCard::new("📚", "Fotobuch Services", "Deutsche Anbieter", theme.accent)
        .tooltip("Deutsche Fotobuch-Services")
        .show(ui, theme)
        .clicked()
    {
        actions.push(PanelAction::Open(Overlay::PhotoServices));
    }

    let media = &app.snapshot.media;
    let tooltip = download_button_label(media);
    let caption = file_count_label(media);
    let downloading = app.panel.is_downloading();

    if ActionCard::new("📦", "ZIP Download", &caption, theme.accent)
        .enabled(!media.is_empty())
        .busy(downloading)
        .tooltip(&tooltip)
        .show(ui, theme)
        .clicked()
    {
        actions.push(PanelAction::Download);
    }
}

fn render_download_status(
    app: &AdminApp,
    ui: &mut egui::Ui,
    theme: &Theme,
    actions: &mut Vec<PanelAction>,
) {
    let progress = &app.panel.download.progress;

    if let (OperationStatus::Failed(msg), DownloadPhase::Failed) =
        (app.panel.download.status(), progress.phase)
    {
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("Letzter Download fehlgeschlagen: {}", msg))
                .size(11.0)
                .color(theme.error),
        );
    }

    if progress.phase != DownloadPhase::Idle {
        ui.add_space(12.0);
        egui::Frame::new()
            .fill(theme.bg_light.gamma_multiply(0.5))
            .corner_radius(6.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                let color = match progress.phase {
                    DownloadPhase::Complete => theme.success,
                    DownloadPhase::PartiallyComplete => theme.warning,
                    DownloadPhase::Failed => theme.error,
                    _ => theme.accent,
                };
                ui.label(RichText::new(progress.phase.description()).color(color).strong());

                if matches!(
                    progress.phase,
                    DownloadPhase::Fetching | DownloadPhase::Compressing
                ) {
                    ui.add(
                        egui::ProgressBar::new(progress.fraction())
                            .show_percentage()
                            .desired_height(8.0),
                    );
                    if !progress.current_item.is_empty() {
                        ui.label(
                            RichText::new(&progress.current_item)
                                .size(11.0)
                                .color(theme.text_muted),
                        );
                    }
                }

                if let Some(path) = &app.panel.download.last_archive {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(path.display().to_string())
                                .size(11.0)
                                .color(theme.text_secondary),
                        );
                        if ui.small_button("Ordner öffnen").clicked() {
                            actions.push(PanelAction::OpenArchiveFolder);
                        }
                    });
                }
            });
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Zielordner:").color(theme.text_muted));
        ui.label(RichText::new(app.download_dir_display()).color(theme.text_primary));
        let enabled = !app.panel.is_downloading();
        if ui
            .add_enabled(enabled, egui::Button::new("Ändern..."))
            .clicked()
        {
            actions.push(PanelAction::ChooseDownloadDir);
        }
    });
}

fn apply(app: &mut AdminApp, action: PanelAction) {
    match action {
        PanelAction::OpenRecap => {
            let base_url = app.config.backend.base_url.clone();
            app.panel
                .open_post_wedding_recap(&base_url, &admin_paths().post_wedding_recap);
        }
        PanelAction::Open(overlay) => app.panel.open_overlay(overlay),
        PanelAction::ToggleFeature(feature) => {
            app.panel
                .toggle_feature(feature, app.snapshot.site_status.as_ref());
        }
        PanelAction::ToggleSiteStatus => {
            app.panel
                .request_site_status_toggle(app.snapshot.site_status.as_ref());
        }
        PanelAction::Download => app.panel.request_download(&app.snapshot.media),
        PanelAction::OpenArchiveFolder => {
            let folder = app
                .panel
                .download
                .last_archive
                .as_ref()
                .and_then(|p| p.parent())
                .map(|p| p.display().to_string());
            if let Some(folder) = folder {
                app.panel.open_external(&folder);
            }
        }
        PanelAction::ChooseDownloadDir => app.browse_for_download_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_tooltip_names_next_action() {
        assert_eq!(
            feature_tooltip(Feature::Gallery, Some(true)),
            "Galerie deaktivieren"
        );
        assert_eq!(
            feature_tooltip(Feature::MusicWishlist, Some(false)),
            "Musikwünsche aktivieren"
        );
        assert_eq!(feature_tooltip(Feature::Stories, None), "Stories umschalten");
    }

    #[test]
    fn test_last_error_tooltip() {
        assert_eq!(last_error_tooltip(&OperationStatus::Idle), None);
        assert_eq!(
            last_error_tooltip(&OperationStatus::Failed("503".into())).as_deref(),
            Some("Letzter Fehler: 503")
        );
    }
}
