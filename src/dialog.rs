//! Modal dialogs as explicit state.
//!
//! Confirmations and alerts are queued and rendered one at a time. The UI
//! reports how a dialog was closed with a [`DialogResult`]; a confirmed
//! confirmation hands its [`ConfirmAction`] back to the caller to execute.

use std::collections::VecDeque;

use crate::download::{DownloadError, DownloadSummary};
use crate::media::MediaCounts;
use crate::site_status::Feature;

/// Work to run once a confirmation is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Set public access to locked (`true`) or open (`false`)
    SetUnderConstruction(bool),
    /// Build the media archive
    StartDownload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm {
        action: ConfirmAction,
        title: String,
        body: String,
        confirm_label: String,
    },
    Alert {
        severity: Severity,
        title: String,
        body: String,
    },
}

/// How the user closed a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Confirmed,
    Cancelled,
    /// Alert acknowledged
    Dismissed,
}

impl Dialog {
    pub fn title(&self) -> &str {
        match self {
            Dialog::Confirm { title, .. } | Dialog::Alert { title, .. } => title,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Dialog::Confirm { body, .. } | Dialog::Alert { body, .. } => body,
        }
    }

    fn alert(severity: Severity, title: &str, body: impl Into<String>) -> Self {
        Dialog::Alert {
            severity,
            title: title.to_string(),
            body: body.into(),
        }
    }

    /// Ask before locking or unlocking public access
    pub fn confirm_site_status(currently_under_construction: bool) -> Self {
        let (title, body, confirm_label) = if currently_under_construction {
            (
                "Website freischalten",
                "🌐 Website für alle Besucher freischalten?\n\nAlle Besucher können dann sofort auf die Galerie zugreifen.",
                "Freischalten",
            )
        } else {
            (
                "Website sperren",
                "🔒 Website für alle Besucher sperren?\n\nAlle Besucher sehen dann die Under Construction Seite.",
                "Sperren",
            )
        };

        Dialog::Confirm {
            action: ConfirmAction::SetUnderConstruction(!currently_under_construction),
            title: title.to_string(),
            body: body.to_string(),
            confirm_label: confirm_label.to_string(),
        }
    }

    /// Site status change went through
    pub fn site_status_updated(under_construction: bool) -> Self {
        if under_construction {
            Self::alert(
                Severity::Success,
                "Website gesperrt",
                "🔒 Website wurde erfolgreich gesperrt!\n\n⏳ Alle Besucher sehen jetzt die Under Construction Seite.",
            )
        } else {
            Self::alert(
                Severity::Success,
                "Website freigeschaltet",
                "✅ Website wurde erfolgreich freigeschaltet!\n\n🌐 Alle Besucher können jetzt auf die Galerie zugreifen.",
            )
        }
    }

    /// Site status change failed; includes the raw error
    pub fn site_status_failed(under_construction: bool, error: &str) -> Self {
        let verb = if under_construction {
            "sperren"
        } else {
            "freischalten"
        };
        Self::alert(
            Severity::Error,
            "Fehler",
            format!("❌ Fehler beim {} der Website:\n{}", verb, error),
        )
    }

    pub fn feature_failed(feature: Feature) -> Self {
        Self::alert(
            Severity::Error,
            "Fehler",
            format!(
                "Fehler beim Aktualisieren der {}-Einstellung",
                feature.german_name()
            ),
        )
    }

    pub fn nothing_to_download() -> Self {
        Self::alert(
            Severity::Info,
            "ZIP Download",
            "Keine Medien zum Herunterladen vorhanden.",
        )
    }

    /// Preview of what the archive will contain
    pub fn confirm_download(counts: MediaCounts) -> Self {
        let body = format!(
            "Was wird heruntergeladen:\n\
             • {} Bilder\n\
             • {} Videos\n\
             • {} Notizen (als Textdatei)\n\n\
             💡 Tipp: Verwende die heruntergeladenen Bilder für deutsche Fotobuch-Services \
             wie CEWE, dm oder Pixum für beste Qualität!",
            counts.images, counts.videos, counts.notes
        );
        Dialog::Confirm {
            action: ConfirmAction::StartDownload,
            title: "Medien herunterladen".to_string(),
            body,
            confirm_label: "Download starten".to_string(),
        }
    }

    pub fn download_succeeded(summary: &DownloadSummary) -> Self {
        Self::alert(
            Severity::Success,
            "Download erfolgreich",
            format!(
                "✅ Download erfolgreich!\n\n📊 Heruntergeladen:\n- {} Bilder\n- {} Videos\n- {} Notizen\n\n📁 {}\n\n💡 Verwende die Bilder für professionelle Fotobuch-Services!",
                summary.images,
                summary.videos,
                summary.notes,
                summary.archive_path.display()
            ),
        )
    }

    /// Partial success gets a softened warning, anything else a failure alert
    pub fn download_failed(error: &DownloadError) -> Self {
        if error.is_partial() {
            Self::alert(
                Severity::Warning,
                "Download teilweise erfolgreich",
                format!(
                    "⚠️ {}\n\n💡 Die ZIP-Datei enthält alle verfügbaren Dateien und Fehlerberichte.",
                    error
                ),
            )
        } else {
            Self::alert(
                Severity::Error,
                "Download-Fehler",
                format!(
                    "❌ Download-Fehler:\n{}\n\n🔧 Versuche es erneut.",
                    error
                ),
            )
        }
    }

    pub fn browser_failed(url: &str, error: &str) -> Self {
        Self::alert(
            Severity::Error,
            "Browser",
            format!("Konnte {} nicht öffnen:\n{}", url, error),
        )
    }
}

/// FIFO of pending dialogs; only the head is shown
#[derive(Debug, Default)]
pub struct DialogQueue {
    queue: VecDeque<Dialog>,
}

impl DialogQueue {
    pub fn push(&mut self, dialog: Dialog) {
        tracing::debug!("Queued dialog: {}", dialog.title());
        self.queue.push_back(dialog);
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.queue.front()
    }

    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Close the head dialog.
    ///
    /// Returns the action only when a confirmation was confirmed.
    pub fn resolve(&mut self, result: DialogResult) -> Option<ConfirmAction> {
        let dialog = self.queue.pop_front()?;
        match (dialog, result) {
            (Dialog::Confirm { action, .. }, DialogResult::Confirmed) => Some(action),
            _ => None,
        }
    }
}
