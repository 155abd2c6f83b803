//! Windows for the sub-panels managed in the web app

use eframe::egui::{self, RichText};

use crate::app::AdminApp;
use crate::app_data::admin_paths;
use crate::panel::{join_url, Overlay};

struct WebPanel {
    overlay: Overlay,
    title: &'static str,
    description: &'static str,
    path: &'static str,
}

fn web_panels() -> [WebPanel; 3] {
    let paths = admin_paths();
    [
        WebPanel {
            overlay: Overlay::Showcase,
            title: "✨ Showcase",
            description: "Präsentation der schönsten Momente für Gäste und Brautpaar.",
            path: &paths.showcase,
        },
        WebPanel {
            overlay: Overlay::UserManagement,
            title: "👥 User Management",
            description: "Gäste und Admin-Zugänge verwalten.",
            path: &paths.user_management,
        },
        WebPanel {
            overlay: Overlay::MusicAdmin,
            title: "🎵 Spotify Admin",
            description: "Musikwünsche prüfen und die Spotify-Playlist verwalten.",
            path: &paths.music_admin,
        },
    ]
}

/// Render every open sub-panel window. Each closes independently.
pub fn render_web_overlays(app: &mut AdminApp, ctx: &egui::Context) {
    let theme = app.ui.current_theme.clone();
    let base_url = app.config.backend.base_url.clone();

    for panel in web_panels() {
        if !app.panel.overlays.is_open(panel.overlay) {
            continue;
        }

        let url = join_url(&base_url, panel.path);
        let mut open = true;
        let mut close_clicked = false;
        let mut open_clicked = false;

        egui::Window::new(panel.title)
            .id(egui::Id::new(("web_overlay", panel.path)))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.label(RichText::new(panel.description).color(theme.text_secondary));
                ui.add_space(8.0);
                ui.label(RichText::new(&url).size(11.0).color(theme.text_muted));
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Im Browser öffnen").clicked() {
                        open_clicked = true;
                    }
                    if ui.button("Schließen").clicked() {
                        close_clicked = true;
                    }
                });
            });

        if open_clicked {
            app.panel.open_external(&url);
        }
        if !open || close_clicked {
            app.panel.close_overlay(panel.overlay);
        }
    }
}
