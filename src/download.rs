//! Bulk download of all uploaded media into a single ZIP archive.
//!
//! The archive is built in two phases:
//! - Fetching: every image and video is fetched into a staging directory
//! - Compressing: staged files, a notes file and an optional error report are
//!   zipped on a blocking thread
//!
//! Items that fail to fetch do not abort the run. They are listed in
//! `Fehlerbericht.txt` inside the archive and reported as a partial failure.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use thiserror::Error;
use tokio::sync::watch;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::media::{MediaCounts, MediaError, MediaItem, MediaKind};

/// Name of the notes file inside the archive
const NOTES_FILE: &str = "Notizen.txt";

/// Name of the error report inside the archive
const ERROR_REPORT_FILE: &str = "Fehlerbericht.txt";

/// Errors of a bulk download
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Keine Medien zum Herunterladen vorhanden")]
    Empty,

    /// Some items could not be fetched; the archive was still written.
    #[error("Download teilweise erfolgreich: {succeeded} von {} Dateien heruntergeladen, {failed} fehlgeschlagen", .succeeded + .failed)]
    PartialFailure {
        succeeded: usize,
        failed: usize,
        archive_path: PathBuf,
    },

    #[error("Download fehlgeschlagen: {0}")]
    Fatal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Task cancelled")]
    Cancelled,
}

impl DownloadError {
    /// Whether an archive was produced despite the error
    pub fn is_partial(&self) -> bool {
        matches!(self, DownloadError::PartialFailure { .. })
    }
}

/// Current phase of a bulk download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Fetching,
    Compressing,
    Complete,
    /// Archive kept, but some items could not be fetched
    PartiallyComplete,
    Failed,
}

impl DownloadPhase {
    pub fn description(&self) -> &'static str {
        match self {
            DownloadPhase::Idle => "Bereit",
            DownloadPhase::Fetching => "Medien werden geladen...",
            DownloadPhase::Compressing => "ZIP wird erstellt...",
            DownloadPhase::Complete => "Download abgeschlossen",
            DownloadPhase::PartiallyComplete => "Download teilweise erfolgreich",
            DownloadPhase::Failed => "Download fehlgeschlagen",
        }
    }
}

/// Progress reported over the watch channel
#[derive(Debug, Clone, Default)]
pub struct DownloadProgress {
    pub phase: DownloadPhase,
    pub items_processed: usize,
    pub total_items: usize,
    pub current_item: String,
}

impl DownloadProgress {
    pub fn fraction(&self) -> f32 {
        match self.phase {
            DownloadPhase::Fetching | DownloadPhase::Compressing => {
                if self.total_items == 0 {
                    0.0
                } else {
                    self.items_processed as f32 / self.total_items as f32
                }
            }
            DownloadPhase::Complete | DownloadPhase::PartiallyComplete => 1.0,
            _ => 0.0,
        }
    }
}

/// Outcome of a fully successful download
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub archive_path: PathBuf,
    pub images: usize,
    pub videos: usize,
    pub notes: usize,
    pub bytes: u64,
}

/// Fetches the raw bytes of a single media item
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, item: &MediaItem) -> Result<Vec<u8>, MediaError>;
}

#[async_trait]
impl<T: MediaFetcher + ?Sized> MediaFetcher for Arc<T> {
    async fn fetch(&self, item: &MediaItem) -> Result<Vec<u8>, MediaError> {
        (**self).fetch(item).await
    }
}

/// Produces an archive of the given media set
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download the full item set. Notes are included as text, not skipped.
    async fn download_all(
        &self,
        items: Vec<MediaItem>,
        progress_tx: watch::Sender<DownloadProgress>,
    ) -> Result<DownloadSummary, DownloadError>;
}

/// A fetched item waiting to be zipped
struct StagedFile {
    staged_path: PathBuf,
    entry_name: String,
}

/// Writes archives into `output_dir` using `F` to fetch item bytes
pub struct ZipDownloader<F> {
    fetcher: F,
    output_dir: PathBuf,
    compression_level: u8,
}

impl<F: MediaFetcher> ZipDownloader<F> {
    pub fn new(fetcher: F, output_dir: impl Into<PathBuf>, compression_level: u8) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
            compression_level,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl<F: MediaFetcher> MediaDownloader for ZipDownloader<F> {
    async fn download_all(
        &self,
        items: Vec<MediaItem>,
        progress_tx: watch::Sender<DownloadProgress>,
    ) -> Result<DownloadSummary, DownloadError> {
        let counts = MediaCounts::from_items(&items);
        if counts.total() == 0 {
            return Err(DownloadError::Empty);
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let staging = tempfile::tempdir()?;

        let downloadable: Vec<&MediaItem> = items.iter().filter(|i| i.is_downloadable()).collect();
        let total_items = downloadable.len();

        let _ = progress_tx.send(DownloadProgress {
            phase: DownloadPhase::Fetching,
            total_items,
            ..Default::default()
        });

        let mut staged = Vec::with_capacity(total_items);
        let mut failures: Vec<(String, String)> = Vec::new();

        for (i, item) in downloadable.iter().enumerate() {
            let entry_name = archive_entry_name(i + 1, item);
            let _ = progress_tx.send(DownloadProgress {
                phase: DownloadPhase::Fetching,
                items_processed: i,
                total_items,
                current_item: entry_name.clone(),
            });

            match self.fetcher.fetch(item).await {
                Ok(bytes) => {
                    let staged_path = staging.path().join(format!("{:05}", i));
                    tokio::fs::write(&staged_path, &bytes).await?;
                    staged.push(StagedFile {
                        staged_path,
                        entry_name,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch media item {}: {}", item.id, e);
                    failures.push((entry_name, e.to_string()));
                }
            }
        }

        if total_items > 0 && staged.is_empty() {
            let _ = progress_tx.send(DownloadProgress {
                phase: DownloadPhase::Failed,
                total_items,
                ..Default::default()
            });
            let first = failures
                .first()
                .map(|(_, e)| e.clone())
                .unwrap_or_default();
            return Err(DownloadError::Fatal(format!(
                "Keine der {} Dateien konnte geladen werden ({})",
                total_items, first
            )));
        }

        let notes = notes_document(&items);
        let report = (!failures.is_empty()).then(|| error_report(&failures));
        let output_dir = self.output_dir.clone();
        let compression_level = self.compression_level;
        let succeeded = staged.len();
        let failed = failures.len();

        let archive_path = tokio::task::spawn_blocking(move || {
            let path = write_archive(
                &output_dir,
                &staged,
                notes.as_deref(),
                report.as_deref(),
                compression_level,
                &progress_tx,
            );
            // Staged files live until the archive is written
            drop(staging);
            path
        })
        .await
        .map_err(|_| DownloadError::Cancelled)??;

        if failed > 0 {
            return Err(DownloadError::PartialFailure {
                succeeded,
                failed,
                archive_path,
            });
        }

        let bytes = std::fs::metadata(&archive_path)?.len();
        tracing::info!(
            "Media archive written to {:?} ({} images, {} videos, {} notes)",
            archive_path,
            counts.images,
            counts.videos,
            counts.notes
        );

        Ok(DownloadSummary {
            archive_path,
            images: counts.images,
            videos: counts.videos,
            notes: counts.notes,
            bytes,
        })
    }
}

/// Archive file name for the current local time
pub fn archive_file_name() -> String {
    format!("Hochzeit_Medien_{}.zip", Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

/// `name` for the first attempt, then `stem_2.zip`, `stem_3.zip` and so on
fn numbered_file_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, attempt + 1, ext),
        None => format!("{}_{}", name, attempt + 1),
    }
}

/// Move the finished archive into place without replacing an existing file
fn persist_unique(
    mut temp: tempfile::NamedTempFile,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf, DownloadError> {
    const MAX_ATTEMPTS: u32 = 100;

    for attempt in 0..MAX_ATTEMPTS {
        let path = output_dir.join(numbered_file_name(name, attempt));
        match temp.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => temp = e.file,
            Err(e) => return Err(DownloadError::Io(e.error)),
        }
    }

    Err(DownloadError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no free archive name for {}", name),
    )))
}

/// Path of an item inside the archive, e.g. `Bilder/001_kuss.jpg`
fn archive_entry_name(index: usize, item: &MediaItem) -> String {
    let (folder, fallback_ext) = match item.kind {
        MediaKind::Image => ("Bilder", "jpg"),
        MediaKind::Video => ("Videos", "mp4"),
        MediaKind::Note => ("Notizen", "txt"),
    };

    let base = if item.name.trim().is_empty() {
        item.id.clone()
    } else {
        item.name.clone()
    };
    let mut name = sanitize_file_name(&base);
    if Path::new(&name).extension().is_none() {
        name = format!("{}.{}", name, fallback_ext);
    }

    format!("{}/{:03}_{}", folder, index, name)
}

/// Replace characters that are not safe in archive entry names
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "datei".to_string()
    } else {
        trimmed.to_string()
    }
}

/// All notes as one text document, or None when there are no notes
fn notes_document(items: &[MediaItem]) -> Option<String> {
    let notes: Vec<&MediaItem> = items.iter().filter(|i| i.kind == MediaKind::Note).collect();
    if notes.is_empty() {
        return None;
    }

    let mut doc = String::from("Notizen der Gäste\n=================\n\n");
    for note in notes {
        let author = note.uploaded_by.as_deref().unwrap_or("Unbekannt");
        match note.uploaded_at {
            Some(at) => doc.push_str(&format!(
                "{} ({})\n",
                author,
                at.with_timezone(&Local).format("%d.%m.%Y %H:%M")
            )),
            None => doc.push_str(&format!("{}\n", author)),
        }
        doc.push_str(note.note_text.as_deref().unwrap_or(""));
        doc.push_str("\n\n");
    }
    Some(doc)
}

fn error_report(failures: &[(String, String)]) -> String {
    let mut report = format!(
        "Fehlerbericht\n=============\n\n{} Datei(en) konnten nicht heruntergeladen werden:\n\n",
        failures.len()
    );
    for (entry, error) in failures {
        report.push_str(&format!("- {}: {}\n", entry, error));
    }
    report
}

/// Synchronous archive creation (runs in spawn_blocking)
fn write_archive(
    output_dir: &Path,
    staged: &[StagedFile],
    notes: Option<&str>,
    report: Option<&str>,
    compression_level: u8,
    progress_tx: &watch::Sender<DownloadProgress>,
) -> Result<PathBuf, DownloadError> {
    let total_items = staged.len();
    let _ = progress_tx.send(DownloadProgress {
        phase: DownloadPhase::Compressing,
        total_items,
        ..Default::default()
    });

    let temp = tempfile::NamedTempFile::new_in(output_dir)?;
    let mut zip = ZipWriter::new(temp.reopen()?);

    let compression = if compression_level == 0 {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    };
    let options = SimpleFileOptions::default()
        .compression_method(compression)
        .compression_level((compression_level > 0).then(|| compression_level.min(9) as i64));

    for (i, file) in staged.iter().enumerate() {
        let _ = progress_tx.send(DownloadProgress {
            phase: DownloadPhase::Compressing,
            items_processed: i,
            total_items,
            current_item: file.entry_name.clone(),
        });

        let mut content = Vec::new();
        File::open(&file.staged_path)?.read_to_end(&mut content)?;
        zip.start_file(file.entry_name.as_str(), options)?;
        zip.write_all(&content)?;
    }

    if let Some(notes) = notes {
        zip.start_file(NOTES_FILE, options)?;
        zip.write_all(notes.as_bytes())?;
    }
    if let Some(report) = report {
        zip.start_file(ERROR_REPORT_FILE, options)?;
        zip.write_all(report.as_bytes())?;
    }

    zip.finish()?;

    let archive_path = persist_unique(temp, output_dir, &archive_file_name())?;

    let _ = progress_tx.send(DownloadProgress {
        phase: DownloadPhase::Complete,
        items_processed: total_items,
        total_items,
        current_item: String::new(),
    });

    Ok(archive_path)
}

/// Default directory for archives: the user's download folder
pub fn default_download_dir() -> anyhow::Result<PathBuf> {
    let dirs = directories::UserDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine user directories"))?;

    match dirs.download_dir() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(dirs.home_dir().to_path_buf()),
    }
}
