//! Shared UI components for the admin console

use eframe::egui::{self, Color32, RichText, Stroke, Vec2};

use crate::app::AdminApp;
use crate::ui::theme::Theme;

const CARD_SIZE: Vec2 = Vec2::new(190.0, 64.0);

/// A clickable tile of the admin panel
pub struct ActionCard<'a> {
    pub icon: &'a str,
    pub title: &'a str,
    pub caption: &'a str,
    pub accent: Color32,
    pub enabled: bool,
    /// Show a spinner on the card
    pub busy: bool,
    /// Tint the card with its accent
    pub highlighted: bool,
    pub tooltip: Option<&'a str>,
}

impl<'a> ActionCard<'a> {
    pub fn new(icon: &'a str, title: &'a str, caption: &'a str, accent: Color32) -> Self {
        Self {
            icon,
            title,
            caption,
            accent,
            enabled: true,
            busy: false,
            highlighted: false,
            tooltip: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn show(self, ui: &mut egui::Ui, theme: &Theme) -> egui::Response {
        let fill = if self.highlighted {
            self.accent.gamma_multiply(0.25)
        } else {
            theme.bg_light
        };

        let text = RichText::new(format!("{}  {}\n{}", self.icon, self.title, self.caption))
            .color(theme.text_primary);

        let button = egui::Button::new(text)
            .fill(fill)
            .stroke(Stroke::new(1.0, self.accent.gamma_multiply(0.6)))
            .corner_radius(8.0)
            .min_size(CARD_SIZE);

        let response = ui.add_enabled(self.enabled && !self.busy, button);

        if self.busy {
            let center = response.rect.right_center() - Vec2::new(18.0, 0.0);
            egui::Spinner::new()
                .color(self.accent)
                .paint_at(ui, egui::Rect::from_center_size(center, Vec2::splat(14.0)));
        }

        match self.tooltip {
            Some(tooltip) => response.on_hover_text(tooltip),
            None => response,
        }
    }
}

/// Render a titled section frame
pub fn render_section_frame<R>(
    ui: &mut egui::Ui,
    theme: &Theme,
    title: &str,
    content: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(8.0)
        .inner_margin(16.0)
        .stroke(Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(ui)
        })
        .inner
}

/// Large number with a caption below, used for media counts
pub fn render_stat(ui: &mut egui::Ui, theme: &Theme, value: usize, label: &str, color: Color32) {
    ui.vertical(|ui| {
        ui.set_min_width(90.0);
        ui.label(RichText::new(value.to_string()).size(24.0).strong().color(color));
        ui.label(RichText::new(label).size(11.0).color(theme.text_muted));
    });
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut AdminApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = app.ui.current_theme.clone();
    let mut close = false;

    egui::Window::new("Über WeddingPix Admin")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 220.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("WeddingPix Admin")
                        .size(24.0)
                        .strong()
                        .color(theme.accent),
                );
                ui.add_space(4.0);
                ui.label(
                    RichText::new("Verwaltung der Hochzeitsgalerie")
                        .size(14.0)
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );
                ui.label(RichText::new(&app.backend_label).color(theme.text_muted));

                ui.add_space(12.0);
                ui.label(
                    RichText::new("Built with Rust + egui")
                        .size(11.0)
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                if ui.button("Schließen").clicked() {
                    close = true;
                }
                ui.add_space(8.0);
            });
        });

    if close {
        app.ui.show_about_dialog = false;
    }
}
