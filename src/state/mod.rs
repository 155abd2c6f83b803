//! Application state modules
//!
//! Grouped state structs owned by the admin panel and the app. Each struct
//! owns its async tasks and exposes a poll method that reports results as
//! [`StateEvent`]s instead of mutating its owner.

mod download;
mod features;
pub mod operation;
mod site;
mod snapshot;
mod ui;

pub use download::DownloadState;
pub use features::FeatureState;
pub use operation::OperationStatus;
pub use site::SiteState;
pub use snapshot::SnapshotState;
pub use ui::UiState;

use crate::dialog::Dialog;

/// Events that state poll methods can return.
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status bar message
    StatusMessage(String),

    /// Queue a dialog for the user
    ShowDialog(Dialog),

    /// Re-read site status and media from the backend
    RefreshSnapshot,
}
