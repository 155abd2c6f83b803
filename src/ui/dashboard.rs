//! Dashboard body: site state and recent uploads

use eframe::egui::{self, RichText};

use crate::app::AdminApp;
use crate::media::{MediaCounts, MediaItem, MediaKind};
use crate::site_status::{Feature, FeatureToggles};
use crate::ui::components::{render_section_frame, render_stat};
use crate::ui::theme::Theme;

const RECENT_UPLOADS: usize = 8;

pub fn render_dashboard(app: &mut AdminApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    if let Some(error) = &app.snapshot.error {
        ui.colored_label(theme.error, format!("⚠ Verbindungsfehler: {}", error));
        ui.add_space(8.0);
    }

    render_section_frame(ui, &theme, "Website", |ui| match &app.snapshot.site_status {
        Some(status) => {
            ui.horizontal(|ui| {
                for &feature in Feature::all() {
                    let enabled = FeatureToggles::from(status).get(feature);
                    let (mark, color) = if enabled {
                        ("●", theme.success)
                    } else {
                        ("○", theme.text_muted)
                    };
                    ui.label(RichText::new(format!("{} {}", mark, feature.label())).color(color));
                    ui.add_space(12.0);
                }
            });
            if let Some(at) = status.last_updated {
                let by = status.updated_by.as_deref().unwrap_or("unbekannt");
                ui.label(
                    RichText::new(format!(
                        "Zuletzt geändert {} von {}",
                        at.with_timezone(&chrono::Local).format("%d.%m.%Y %H:%M"),
                        by
                    ))
                    .size(11.0)
                    .color(theme.text_muted),
                );
            }
        }
        None if app.snapshot.is_loading() => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Status wird geladen...");
            });
        }
        None => {
            ui.label(RichText::new("Status unbekannt").color(theme.text_muted));
        }
    });

    ui.add_space(12.0);

    render_section_frame(ui, &theme, "Medien", |ui| {
        let counts = MediaCounts::from_items(&app.snapshot.media);
        ui.horizontal(|ui| {
            render_stat(ui, &theme, counts.images, "Bilder", theme.success);
            render_stat(ui, &theme, counts.videos, "Videos", theme.accent_hover);
            render_stat(ui, &theme, counts.notes, "Notizen", theme.accent);
        });

        if app.snapshot.media.is_empty() {
            return;
        }

        ui.add_space(10.0);
        ui.label(RichText::new("Neueste Uploads").color(theme.text_secondary).strong());
        ui.add_space(4.0);
        for item in recent_uploads(&app.snapshot.media, RECENT_UPLOADS) {
            render_upload_row(ui, &theme, item);
        }
    });
}

fn render_upload_row(ui: &mut egui::Ui, theme: &Theme, item: &MediaItem) {
    let icon = match item.kind {
        MediaKind::Image => "🖼",
        MediaKind::Video => "🎞",
        MediaKind::Note => "✉",
    };
    let title = match (&item.kind, &item.note_text) {
        (MediaKind::Note, Some(text)) => shorten(text, 60),
        _ => item.name.clone(),
    };

    ui.horizontal(|ui| {
        ui.label(icon);
        ui.label(RichText::new(title).color(theme.text_primary));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(at) = item.uploaded_at {
                ui.label(
                    RichText::new(at.with_timezone(&chrono::Local).format("%d.%m. %H:%M").to_string())
                        .size(11.0)
                        .color(theme.text_muted),
                );
            }
            if let Some(by) = &item.uploaded_by {
                ui.label(RichText::new(by).size(11.0).color(theme.text_secondary));
            }
        });
    });
}

/// Newest items first; items without a timestamp go last
fn recent_uploads(items: &[MediaItem], limit: usize) -> Vec<&MediaItem> {
    let mut sorted: Vec<&MediaItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    sorted.truncate(limit);
    sorted
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::sample_set;
    use chrono::{Duration, Utc};

    #[test]
    fn test_recent_uploads_newest_first() {
        let now = Utc::now();
        let mut items = sample_set(3, 0, 0);
        items[0].uploaded_at = Some(now - Duration::hours(3));
        items[1].uploaded_at = None;
        items[2].uploaded_at = Some(now);

        let recent = recent_uploads(&items, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "img2");
        assert_eq!(recent[1].id, "img0");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("Alles Gute", 20), "Alles Gute");
        assert_eq!(shorten("Herzlichen Glückwunsch", 10), "Herzlichen…");
    }
}
