use std::sync::Arc;

use eframe::egui::{self, RichText};

use crate::app_data::ServiceCatalog;
use crate::backend::Services;
use crate::config::Config;
use crate::dialog::DialogResult;
use crate::download::{MediaFetcher, ZipDownloader};
use crate::panel::{AdminPanel, PanelServices};
use crate::site_status::status_label;
use crate::state::{SnapshotState, StateEvent, UiState};
use crate::ui::theme::ThemePreset;

/// Main application state
pub struct AdminApp {
    /// Application configuration
    pub config: Config,
    /// Status message for the status bar
    pub status_message: String,
    /// Shown in the About dialog
    pub backend_label: String,

    services: Services,
    downloader: Arc<ZipDownloader<Arc<dyn MediaFetcher>>>,

    /// Latest backend snapshot
    pub snapshot: SnapshotState,
    /// Admin panel controller
    pub panel: AdminPanel,
    /// Photo-book services shown in the catalog overlay
    pub catalog: ServiceCatalog,
    /// UI state
    pub ui: UiState,
}

impl AdminApp {
    /// Create a new application instance
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        services: Services,
    ) -> anyhow::Result<Self> {
        let downloader = Arc::new(services.downloader(&config.downloads)?);
        let panel = AdminPanel::new(
            PanelServices {
                site: services.site.clone(),
                downloader: downloader.clone(),
            },
            config.console.actor.clone(),
            config.console.start_in_admin_mode,
        );

        let catalog_path = config.catalog.path.as_ref().map(std::path::PathBuf::from);
        let catalog = ServiceCatalog::load_or_builtin(catalog_path.as_deref());

        let mut app = Self {
            status_message: "Bereit".to_string(),
            backend_label: services.label.clone(),
            ui: UiState::new(ThemePreset::from_dark_flag(config.console.dark_theme)),
            config,
            services,
            downloader,
            snapshot: SnapshotState::default(),
            panel,
            catalog,
        };

        app.refresh_snapshot();
        Ok(app)
    }

    /// Re-read site status and media
    pub fn refresh_snapshot(&mut self) {
        self.snapshot
            .refresh(self.services.site.clone(), self.services.media.clone());
    }

    pub fn download_dir_display(&self) -> String {
        self.downloader.output_dir().display().to_string()
    }

    /// Open directory picker and update the archive directory
    pub fn browse_for_download_dir(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Zielordner für ZIP-Downloads wählen")
            .set_directory(self.downloader.output_dir())
            .pick_folder()
        else {
            return;
        };

        self.config.downloads.directory = Some(path.to_string_lossy().to_string());
        match self.services.downloader(&self.config.downloads) {
            Ok(downloader) => {
                self.downloader = Arc::new(downloader);
                self.panel.set_downloader(self.downloader.clone());
                self.status_message = format!("Zielordner: {}", path.display());
            }
            Err(e) => {
                tracing::error!("Failed to set download directory: {}", e);
                self.status_message = format!("Fehler: {}", e);
            }
        }
        self.save_config();
    }

    /// Save configuration to disk
    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    fn toggle_dark_mode(&mut self) {
        self.ui.toggle_dark_mode();
        self.config.console.dark_theme = self.ui.is_dark();
        self.save_config();
    }

    fn toggle_admin(&mut self) {
        let is_admin = self.panel.toggle_admin();
        self.status_message = if is_admin {
            "Admin-Modus aktiv".to_string()
        } else {
            "Admin-Modus beendet".to_string()
        };
    }

    fn resolve_dialog(&mut self, result: DialogResult) {
        let events = self.panel.resolve_dialog(result, &self.snapshot.media);
        self.handle_events(events);
    }

    fn handle_events(&mut self, events: Vec<StateEvent>) {
        let mut refresh = false;
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.status_message = msg,
                StateEvent::ShowDialog(dialog) => self.panel.dialogs.push(dialog),
                StateEvent::RefreshSnapshot => refresh = true,
            }
        }
        if refresh {
            self.refresh_snapshot();
        }
    }

    fn poll_tasks(&mut self, ctx: &egui::Context) {
        let mut events = self.snapshot.poll(ctx);
        events.extend(self.panel.poll(ctx));
        self.handle_events(events);

        let interval = self.config.backend.refresh_interval();
        if !self.snapshot.is_loading() && self.snapshot.is_due(interval) {
            tracing::debug!("Periodic snapshot refresh");
            self.refresh_snapshot();
        }
        ctx.request_repaint_after(interval);
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let theme = self.ui.current_theme.clone();
        let mut toggle_admin = false;
        let mut toggle_theme = false;
        let mut refresh = false;
        let mut show_about = false;

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme.bg_darkest)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("💍 WeddingPix Admin")
                            .size(18.0)
                            .strong()
                            .color(theme.accent),
                    );
                    ui.add_space(16.0);

                    let status = self.snapshot.site_status.as_ref();
                    let color = match status {
                        Some(s) if s.is_under_construction => theme.warning,
                        Some(_) => theme.success,
                        None => theme.text_muted,
                    };
                    ui.label(RichText::new(status_label(status)).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let admin_label = if self.panel.is_admin() {
                            "Admin-Modus verlassen"
                        } else {
                            "Admin-Modus"
                        };
                        if ui.button(admin_label).clicked() {
                            toggle_admin = true;
                        }

                        let theme_icon = if self.ui.is_dark() { "☀" } else { "🌙" };
                        if ui
                            .button(theme_icon)
                            .on_hover_text(format!(
                                "Design: {}",
                                self.ui.preset.name()
                            ))
                            .clicked()
                        {
                            toggle_theme = true;
                        }

                        if self.snapshot.is_loading() {
                            ui.spinner();
                        } else if ui.button("↻").on_hover_text("Aktualisieren").clicked() {
                            refresh = true;
                        }

                        if ui.button("ℹ").on_hover_text("Über").clicked() {
                            show_about = true;
                        }
                    });
                });
            });

        if toggle_admin {
            self.toggle_admin();
        }
        if toggle_theme {
            self.toggle_dark_mode();
        }
        if refresh {
            self.refresh_snapshot();
        }
        if show_about {
            self.ui.show_about_dialog = true;
        }
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        let theme = &self.ui.current_theme;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&self.status_message).color(theme.text_secondary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("{} · {}", self.panel.actor(), self.backend_label))
                            .size(11.0)
                            .color(theme.text_muted),
                    );
                });
            });
        });
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        self.poll_tasks(ctx);

        self.render_top_bar(ctx);
        self.render_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.panel.is_admin() {
                    crate::ui::render_admin_panel(self, ui);
                    ui.add_space(12.0);
                }
                crate::ui::render_dashboard(self, ui);
            });
        });

        crate::ui::render_photo_services(self, ctx);
        crate::ui::render_web_overlays(self, ctx);
        crate::ui::render_about_dialog(self, ctx);

        let result = crate::ui::render_dialog(
            ctx,
            &self.ui.current_theme,
            self.panel.dialogs.current(),
        );
        if let Some(result) = result {
            self.resolve_dialog(result);
        }
    }
}
