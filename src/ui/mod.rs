//! UI modules for the admin console
//!
//! Rendering only. Every click is forwarded to the panel controller or the
//! app, which own all state.

mod admin_panel;
mod components;
mod dashboard;
mod dialogs;
mod overlays;
mod services;
pub mod theme;

pub use admin_panel::render_admin_panel;
pub use components::render_about_dialog;
pub use dashboard::render_dashboard;
pub use dialogs::render_dialog;
pub use overlays::render_web_overlays;
pub use services::render_photo_services;
