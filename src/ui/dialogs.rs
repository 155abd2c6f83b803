//! Modal dialog rendering for the head of the dialog queue

use eframe::egui::{self, RichText};

use crate::dialog::{Dialog, DialogResult, Severity};
use crate::ui::theme::Theme;

fn severity_color(theme: &Theme, severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Info => theme.accent,
        Severity::Success => theme.success,
        Severity::Warning => theme.warning,
        Severity::Error => theme.error,
    }
}

/// Render the current dialog, returning the user's answer once given.
///
/// Escape cancels a confirmation and dismisses an alert.
pub fn render_dialog(
    ctx: &egui::Context,
    theme: &Theme,
    dialog: Option<&Dialog>,
) -> Option<DialogResult> {
    let dialog = dialog?;
    let mut result = None;

    // Dim everything behind the dialog
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("dialog_backdrop"))
        .order(egui::Order::Middle)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(140));
            ui.allocate_rect(screen, egui::Sense::click());
        });

    let accent = match dialog {
        Dialog::Confirm { .. } => theme.accent,
        Dialog::Alert { severity, .. } => severity_color(theme, *severity),
    };

    egui::Window::new(RichText::new(dialog.title()).color(accent).strong())
        .id(egui::Id::new("dialog_window"))
        .order(egui::Order::Foreground)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(380.0)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(RichText::new(dialog.body()).color(theme.text_primary));
            ui.add_space(12.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                match dialog {
                    Dialog::Confirm { confirm_label, .. } => {
                        let confirm = egui::Button::new(
                            RichText::new(confirm_label).color(egui::Color32::WHITE),
                        )
                        .fill(theme.accent);
                        if ui.add(confirm).clicked() {
                            result = Some(DialogResult::Confirmed);
                        }
                        if ui.button("Abbrechen").clicked() {
                            result = Some(DialogResult::Cancelled);
                        }
                    }
                    Dialog::Alert { .. } => {
                        if ui.button("OK").clicked() {
                            result = Some(DialogResult::Dismissed);
                        }
                    }
                }
            });
        });

    if result.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = Some(match dialog {
            Dialog::Confirm { .. } => DialogResult::Cancelled,
            Dialog::Alert { .. } => DialogResult::Dismissed,
        });
    }

    result
}
