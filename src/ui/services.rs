//! Photo-book services overlay

use eframe::egui::{self, RichText, Stroke};
use egui_commonmark::CommonMarkViewer;

use crate::app::AdminApp;
use crate::app_data::PhotoService;
use crate::media::MediaCounts;
use crate::panel::Overlay;
use crate::ui::components::render_stat;
use crate::ui::theme::Theme;

/// Render the photo-book catalog window when open
pub fn render_photo_services(app: &mut AdminApp, ctx: &egui::Context) {
    if !app.panel.overlays.is_open(Overlay::PhotoServices) {
        return;
    }

    let theme = app.ui.current_theme.clone();
    let counts = MediaCounts::from_items(&app.snapshot.media);
    let mut open = true;
    let mut close_clicked = false;
    let mut visit: Option<PhotoService> = None;

    egui::Window::new(RichText::new(&app.catalog.title).strong())
        .id(egui::Id::new("photo_services_window"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size([640.0, 560.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(&app.catalog.subtitle).color(theme.text_secondary));
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Frame::new()
                    .fill(theme.accent.gamma_multiply(0.08))
                    .stroke(Stroke::new(1.0, theme.accent.gamma_multiply(0.3)))
                    .corner_radius(6.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        CommonMarkViewer::new().show(
                            ui,
                            &mut app.ui.markdown_cache,
                            &app.catalog.instructions,
                        );
                    });

                ui.add_space(10.0);
                render_content_stats(ui, &theme, counts);
                ui.add_space(10.0);

                for service in &app.catalog.services {
                    if render_service_card(ui, &theme, service) {
                        visit = Some(service.clone());
                    }
                    ui.add_space(8.0);
                }

                if !app.catalog.tip.is_empty() {
                    ui.label(
                        RichText::new(format!("💡 Tipp: {}", app.catalog.tip))
                            .size(12.0)
                            .color(theme.text_muted),
                    );
                }

                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("Schließen").clicked() {
                        close_clicked = true;
                    }
                });
            });
        });

    if let Some(service) = visit {
        app.panel.open_service(&service);
    }
    if !open || close_clicked {
        app.panel.close_overlay(Overlay::PhotoServices);
    }
}

fn render_content_stats(ui: &mut egui::Ui, theme: &Theme, counts: MediaCounts) {
    egui::Frame::new()
        .fill(theme.bg_light.gamma_multiply(0.5))
        .corner_radius(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new("📊 Verfügbare Inhalte:")
                    .strong()
                    .color(theme.text_primary),
            );
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                render_stat(ui, theme, counts.images, "Bilder", theme.success);
                render_stat(ui, theme, counts.videos, "Videos", theme.accent_hover);
                render_stat(ui, theme, counts.notes, "Nachrichten", theme.accent);
            });
        });
}

/// Returns true when "Service besuchen" was clicked
fn render_service_card(ui: &mut egui::Ui, theme: &Theme, service: &PhotoService) -> bool {
    let mut clicked = false;

    egui::Frame::new()
        .fill(theme.bg_medium)
        .stroke(Stroke::new(1.0, theme.border))
        .corner_radius(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(RichText::new(&service.flag).size(18.0));
                ui.label(
                    RichText::new(&service.name)
                        .size(15.0)
                        .strong()
                        .color(theme.text_primary),
                );
                if service.free {
                    ui.label(
                        RichText::new(" Kostenlos ")
                            .size(11.0)
                            .color(theme.bg_darkest)
                            .background_color(theme.success),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(&service.price).strong().color(theme.accent));
                });
            });

            ui.label(RichText::new(&service.description).color(theme.text_secondary));

            if !service.features.is_empty() {
                ui.add_space(4.0);
                for feature in &service.features {
                    ui.label(
                        RichText::new(format!("✓ {}", feature))
                            .size(12.0)
                            .color(theme.text_muted),
                    );
                }
            }

            ui.add_space(6.0);
            if ui
                .button("Service besuchen")
                .on_hover_text(&service.url)
                .clicked()
            {
                clicked = true;
            }
        });

    clicked
}
