use crate::error::ExportError;
use crate::platform::{Album, Asset, FileSystem, MediaLibrary, PermissionService};
use crate::position::{iso_timestamp, HistoryEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Album the export is published into
pub const EXPORT_ALBUM: &str = "Download";

const SEPARATOR: &str = "------------------------------";

/// Outcome of a successful export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub asset: Asset,
    pub album: Album,
    pub album_created: bool,
    pub entries: usize,
}

fn optional(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

/// One text block for the entry at zero-based `index`
pub fn render_entry(index: usize, entry: &HistoryEntry) -> String {
    let reading = &entry.reading;
    let mut block = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(block, "Location #{} ({}):", index + 1, entry.iso_timestamp());
    let _ = writeln!(block, "Latitude: {}", reading.latitude);
    let _ = writeln!(block, "Longitude: {}", reading.longitude);
    let _ = writeln!(block, "Altitude: {}", optional(reading.altitude));
    let _ = writeln!(block, "Accuracy: {} meters", reading.accuracy);
    let _ = writeln!(block, "Speed: {}", optional(reading.speed));
    let _ = writeln!(block, "Heading: {}", optional(reading.heading));
    block.push_str(SEPARATOR);
    block.push('\n');
    block
}

/// Full export document, blocks in history order separated by a blank line
pub fn render_history(entries: &[HistoryEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| render_entry(index, entry))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `geolocation_<timestamp>.txt` with colons swapped for hyphens
pub fn export_filename(now: &DateTime<Utc>) -> String {
    format!("geolocation_{}.txt", iso_timestamp(now).replace(':', "-"))
}

/// Write the history to a text file and publish it into the `Download` album.
///
/// Every step runs at most once; the first failure aborts the rest and any file
/// already written stays in the document directory.
pub async fn export_history(
    entries: &[HistoryEntry],
    permissions: &dyn PermissionService,
    files: &dyn FileSystem,
    media: &dyn MediaLibrary,
) -> Result<ExportReceipt, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    if !permissions.request_media_library().await.granted {
        log::warn!("[export] media library permission denied");
        return Err(ExportError::PermissionDenied);
    }

    let text = render_history(entries);
    let path = files
        .document_directory()
        .join(export_filename(&Utc::now()));

    files.write_text_file(&path, &text).await.map_err(|e| {
        log::error!("[export] error saving location data: {}", e);
        ExportError::from(e)
    })?;

    match publish(&path, media).await {
        Ok((asset, album, album_created)) => {
            log::info!(
                "[export] saved {} locations to {} (album {})",
                entries.len(),
                path.display(),
                album.title
            );
            Ok(ExportReceipt {
                path,
                asset,
                album,
                album_created,
                entries: entries.len(),
            })
        }
        Err(e) => {
            log::error!("[export] error saving location data: {}", e);
            log::warn!(
                "[export] {} was written but not published; leaving it in place",
                path.display()
            );
            Err(e)
        }
    }
}

async fn publish(
    path: &std::path::Path,
    media: &dyn MediaLibrary,
) -> Result<(Asset, Album, bool), ExportError> {
    let asset = media.create_asset(path).await?;

    match media.get_album(EXPORT_ALBUM).await? {
        None => {
            let album = media.create_album(EXPORT_ALBUM, &asset).await?;
            Ok((asset, album, true))
        }
        Some(album) => {
            media
                .add_assets_to_album(std::slice::from_ref(&asset), &album)
                .await?;
            Ok((asset, album, false))
        }
    }
}
