//! UI-related application state

use egui_commonmark::CommonMarkCache;

use crate::ui::theme::{Theme, ThemePreset};

/// UI-related state
pub struct UiState {
    /// Cache for markdown rendering
    pub markdown_cache: CommonMarkCache,
    /// Current theme preset
    pub preset: ThemePreset,
    /// Colors of the current preset
    pub current_theme: Theme,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
}

impl UiState {
    pub fn new(preset: ThemePreset) -> Self {
        Self {
            markdown_cache: CommonMarkCache::default(),
            preset,
            current_theme: preset.theme(),
            theme_dirty: true, // Apply theme on first frame
            show_about_dialog: false,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.preset == ThemePreset::Dark
    }

    /// Switch between the dark and light preset
    pub fn toggle_dark_mode(&mut self) {
        self.preset = if self.is_dark() {
            ThemePreset::Light
        } else {
            ThemePreset::Dark
        };
        self.current_theme = self.preset.theme();
        self.theme_dirty = true;
    }
}
