use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Dark,
    Light,
}

impl ThemePreset {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            ThemePreset::Dark
        } else {
            ThemePreset::Light
        }
    }

    /// Get display name for the preset
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "Dunkel",
            ThemePreset::Light => "Hell",
        }
    }

    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Dark => Theme::dark(),
            ThemePreset::Light => Theme::light(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    pub is_dark: bool,

    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    // UI element colors
    pub border: Color32,
    pub selection: Color32,
}

impl Theme {
    /// Night reception: deep plum with rose-gold accents
    pub fn dark() -> Self {
        Self {
            is_dark: true,

            bg_darkest: Color32::from_rgb(18, 14, 20),
            bg_dark: Color32::from_rgb(26, 21, 29),
            bg_medium: Color32::from_rgb(38, 31, 42),
            bg_light: Color32::from_rgb(56, 46, 61),

            text_primary: Color32::from_rgb(250, 246, 248),
            text_secondary: Color32::from_rgb(214, 200, 208),
            text_muted: Color32::from_rgb(150, 136, 146),

            accent: Color32::from_rgb(236, 72, 153),        // Pink-500
            accent_hover: Color32::from_rgb(244, 114, 182), // Pink-400
            accent_muted: Color32::from_rgb(190, 24, 93),   // Pink-700

            success: Color32::from_rgb(74, 222, 128),  // Green-400
            warning: Color32::from_rgb(251, 191, 36),  // Amber-400
            error: Color32::from_rgb(248, 113, 113),   // Red-400

            border: Color32::from_rgb(78, 64, 84),
            selection: Color32::from_rgb(236, 72, 153).gamma_multiply(0.3),
        }
    }

    /// Daylight ceremony: ivory with rose accents
    pub fn light() -> Self {
        Self {
            is_dark: false,

            bg_darkest: Color32::from_rgb(255, 255, 255),
            bg_dark: Color32::from_rgb(253, 250, 248),
            bg_medium: Color32::from_rgb(246, 239, 236),
            bg_light: Color32::from_rgb(236, 226, 222),

            text_primary: Color32::from_rgb(31, 24, 28),
            text_secondary: Color32::from_rgb(82, 70, 76),
            text_muted: Color32::from_rgb(128, 116, 122),

            accent: Color32::from_rgb(219, 39, 119),        // Pink-600
            accent_hover: Color32::from_rgb(236, 72, 153),  // Pink-500
            accent_muted: Color32::from_rgb(249, 168, 212), // Pink-300

            success: Color32::from_rgb(22, 163, 74),  // Green-600
            warning: Color32::from_rgb(217, 119, 6),  // Amber-600
            error: Color32::from_rgb(220, 38, 38),    // Red-600

            border: Color32::from_rgb(222, 208, 204),
            selection: Color32::from_rgb(219, 39, 119).gamma_multiply(0.25),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        // Window and panel backgrounds
        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        // Widget backgrounds
        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_medium;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.hyperlink_color = self.accent;
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_flag() {
        assert_eq!(ThemePreset::from_dark_flag(true), ThemePreset::Dark);
        assert_eq!(ThemePreset::from_dark_flag(false), ThemePreset::Light);
        assert!(ThemePreset::Dark.theme().is_dark);
        assert!(!ThemePreset::Light.theme().is_dark);
    }
}
