//! Uploaded media items and the labels derived from them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while listing or fetching media
#[derive(Error, Debug, Clone)]
pub enum MediaError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server responded with {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Media item {0} has no URL")]
    MissingUrl(String),
}

/// Kind of an uploaded item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Note,
}

/// A guest upload as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub note_text: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl MediaItem {
    /// Whether the item ends up as a file in the archive
    pub fn is_downloadable(&self) -> bool {
        self.kind != MediaKind::Note
    }
}

/// Per-kind counts of a media set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaCounts {
    pub images: usize,
    pub videos: usize,
    pub notes: usize,
}

impl MediaCounts {
    pub fn from_items(items: &[MediaItem]) -> Self {
        items.iter().fold(Self::default(), |mut counts, item| {
            match item.kind {
                MediaKind::Image => counts.images += 1,
                MediaKind::Video => counts.videos += 1,
                MediaKind::Note => counts.notes += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.images + self.videos + self.notes
    }

    /// Items that are not notes
    pub fn downloadable(&self) -> usize {
        self.images + self.videos
    }
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count > 1 {
        format!("{} {}", count, plural)
    } else {
        format!("{} {}", count, singular)
    }
}

/// Caption of the ZIP download button, e.g. "3 Bilder, 1 Video als ZIP".
///
/// Lists only non-zero categories; an empty set yields "Keine Medien".
pub fn download_button_label(items: &[MediaItem]) -> String {
    if items.is_empty() {
        return "Keine Medien".to_string();
    }

    let counts = MediaCounts::from_items(items);
    let mut parts = Vec::new();
    if counts.images > 0 {
        parts.push(pluralize(counts.images, "Bild", "Bilder"));
    }
    if counts.videos > 0 {
        parts.push(pluralize(counts.videos, "Video", "Videos"));
    }
    if counts.notes > 0 {
        parts.push(pluralize(counts.notes, "Notiz", "Notizen"));
    }

    format!("{} als ZIP", parts.join(", "))
}

/// Short file count shown under the download button
pub fn file_count_label(items: &[MediaItem]) -> String {
    match items.len() {
        0 => "Keine Medien".to_string(),
        n => pluralize(n, "Datei", "Dateien"),
    }
}

/// Backend that lists the uploaded media
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn list_media(&self) -> Result<Vec<MediaItem>, MediaError>;
}

#[cfg(test)]
pub(crate) fn item(id: &str, kind: MediaKind) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        kind,
        name: format!("{}.bin", id),
        url: Some(format!("https://cdn.example.org/{}", id)),
        note_text: None,
        uploaded_by: None,
        uploaded_at: None,
    }
}

#[cfg(test)]
pub(crate) fn sample_set(images: usize, videos: usize, notes: usize) -> Vec<MediaItem> {
    let mut items = Vec::new();
    for i in 0..images {
        items.push(item(&format!("img{}", i), MediaKind::Image));
    }
    for i in 0..videos {
        items.push(item(&format!("vid{}", i), MediaKind::Video));
    }
    for i in 0..notes {
        let mut note = item(&format!("note{}", i), MediaKind::Note);
        note.url = None;
        note.note_text = Some(format!("Alles Gute #{}", i));
        items.push(note);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_label_mixed() {
        let items = sample_set(3, 1, 2);
        assert_eq!(download_button_label(&items), "3 Bilder, 1 Video, 2 Notizen als ZIP");
    }

    #[test]
    fn test_download_label_skips_zero_counts() {
        assert_eq!(download_button_label(&sample_set(1, 0, 0)), "1 Bild als ZIP");
        assert_eq!(download_button_label(&sample_set(0, 2, 0)), "2 Videos als ZIP");
        assert_eq!(download_button_label(&sample_set(0, 0, 1)), "1 Notiz als ZIP");
        assert_eq!(download_button_label(&sample_set(2, 0, 1)), "2 Bilder, 1 Notiz als ZIP");
    }

    #[test]
    fn test_download_label_empty() {
        assert_eq!(download_button_label(&[]), "Keine Medien");
    }

    #[test]
    fn test_file_count_label() {
        assert_eq!(file_count_label(&[]), "Keine Medien");
        assert_eq!(file_count_label(&sample_set(1, 0, 0)), "1 Datei");
        assert_eq!(file_count_label(&sample_set(2, 1, 1)), "4 Dateien");
    }

    #[test]
    fn test_counts() {
        let counts = MediaCounts::from_items(&sample_set(3, 1, 2));
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.downloadable(), 4);
        assert_eq!(MediaCounts::from_items(&sample_set(0, 0, 5)).downloadable(), 0);
    }

    #[test]
    fn test_media_item_json() {
        let json = r#"[
            {"id":"a","type":"image","name":"kuss.jpg","url":"/uploads/kuss.jpg","uploadedBy":"Tante Erna"},
            {"id":"b","type":"note","noteText":"Herzlichen Glückwunsch!"}
        ]"#;
        let items: Vec<MediaItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].kind, MediaKind::Image);
        assert_eq!(items[0].uploaded_by.as_deref(), Some("Tante Erna"));
        assert_eq!(items[1].kind, MediaKind::Note);
        assert!(!items[1].is_downloadable());
        assert_eq!(items[1].name, "");
    }
}
