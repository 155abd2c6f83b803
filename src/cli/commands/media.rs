//! Media listing and ZIP download commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tokio::sync::watch;

use crate::cli::output::{confirm, format_size, print_formatted, print_success, print_warning};
use crate::cli::{CliContext, OutputFormat};
use crate::dialog::Dialog;
use crate::download::{DownloadPhase, DownloadProgress, MediaDownloader, ZipDownloader};
use crate::media::{download_button_label, MediaCounts, MediaItem, MediaKind};

#[derive(Subcommand, Debug)]
pub enum MediaCommands {
    /// List uploaded images, videos and notes
    List,

    /// Download all media as one ZIP archive
    Download {
        /// Target directory (defaults to the configured download directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct MediaListResult {
    counts: MediaCounts,
    items: Vec<MediaItem>,
}

#[derive(Serialize)]
struct DownloadResult {
    archive_path: String,
    images: usize,
    videos: usize,
    notes: usize,
    bytes: u64,
}

pub async fn run(command: MediaCommands, cli: &CliContext) -> Result<()> {
    match command {
        MediaCommands::List => list(cli).await,
        MediaCommands::Download { out, yes } => download(cli, out, yes).await,
    }
}

fn kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "Bild",
        MediaKind::Video => "Video",
        MediaKind::Note => "Notiz",
    }
}

async fn list(cli: &CliContext) -> Result<()> {
    let (_, services) = cli.connect()?;
    let items = services.media.list_media().await?;

    let result = MediaListResult {
        counts: MediaCounts::from_items(&items),
        items,
    };

    print_formatted(&result, cli.format, |r| {
        let mut lines = vec![format!(
            "{} Bilder, {} Videos, {} Notizen",
            r.counts.images, r.counts.videos, r.counts.notes
        )];
        for item in &r.items {
            let name = match (&item.kind, &item.note_text) {
                (MediaKind::Note, Some(text)) => text.clone(),
                _ => item.name.clone(),
            };
            lines.push(format!(
                "  {:<6} {:<32} {}",
                kind_label(item.kind),
                name,
                item.uploaded_by.as_deref().unwrap_or("")
            ));
        }
        lines.join("\n")
    });

    Ok(())
}

async fn download(cli: &CliContext, out: Option<PathBuf>, yes: bool) -> Result<()> {
    let (config, services) = cli.connect()?;
    let items = services.media.list_media().await?;
    let counts = MediaCounts::from_items(&items);

    if counts.downloadable() == 0 {
        print_success(Dialog::nothing_to_download().body(), cli.quiet);
        return Ok(());
    }

    let question = Dialog::confirm_download(counts);
    if !confirm(question.body(), yes)? {
        print_success("Abgebrochen.", cli.quiet);
        return Ok(());
    }

    let downloader = match out {
        Some(dir) => ZipDownloader::new(
            services.fetcher.clone(),
            dir,
            config.downloads.compression_level,
        ),
        None => services.downloader(&config.downloads)?,
    };

    tracing::info!(
        "CLI: downloading {} into {}",
        download_button_label(&items),
        downloader.output_dir().display()
    );

    let (progress_tx, mut progress_rx) = watch::channel(DownloadProgress::default());
    let quiet = cli.quiet;
    let reporter = tokio::spawn(async move {
        let mut last_phase = DownloadPhase::Idle;
        while progress_rx.changed().await.is_ok() {
            let progress = progress_rx.borrow_and_update().clone();
            if quiet {
                continue;
            }
            if progress.phase != last_phase {
                eprintln!("{}", progress.phase.description());
                last_phase = progress.phase;
            }
            if progress.phase == DownloadPhase::Fetching && !progress.current_item.is_empty() {
                eprintln!(
                    "  [{}/{}] {}",
                    progress.items_processed, progress.total_items, progress.current_item
                );
            }
        }
    });

    let result = downloader.download_all(items, progress_tx).await;
    // Sender dropped with the download, so the reporter ends on its own
    let _ = reporter.await;

    match result {
        Ok(summary) => {
            let result = DownloadResult {
                archive_path: summary.archive_path.to_string_lossy().to_string(),
                images: summary.images,
                videos: summary.videos,
                notes: summary.notes,
                bytes: summary.bytes,
            };
            if cli.quiet && cli.format == OutputFormat::Text {
                return Ok(());
            }
            print_formatted(&result, cli.format, |r| {
                format!(
                    "{}\n({})",
                    Dialog::download_succeeded(&summary).body(),
                    format_size(r.bytes)
                )
            });
            Ok(())
        }
        Err(e) if e.is_partial() => {
            print_warning(&e.to_string());
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", Dialog::download_failed(&e).body()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(kind_label(MediaKind::Image), "Bild");
        assert_eq!(kind_label(MediaKind::Note), "Notiz");
    }
}
