//! Export of the current result list: clipboard summary and screenshot.
//!
//! Clipboard and image capture sit behind [`ClipboardSink`] and
//! [`RegionCapture`]; the terminal implementations live in
//! `runtime::native::export`.

use crate::model::VehicleRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Number of vehicles included in the clipboard summary.
pub const CLIPBOARD_LIMIT: usize = 5;
pub const CLIPBOARD_SEPARATOR: &str = " | ";
pub const SCREENSHOT_FILE_NAME: &str = "screenshot.png";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    NothingToExport,
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Destination for exported text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// The on-screen results region handed to a [`RegionCapture`].
#[derive(Debug, Clone, Copy)]
pub struct ResultsRegion<'a> {
    pub records: &'a [VehicleRecord],
    /// Width of the grid in terminal cells, so the capture uses the same column count.
    pub width: u16,
}

/// Rasterizes a results region into an encoded image.
pub trait RegionCapture {
    fn capture_region(&mut self, region: &ResultsRegion<'_>) -> Result<Vec<u8>, ExportError>;
}

/// The first [`CLIPBOARD_LIMIT`] display names, sanitized and joined with `" | "`.
pub fn clipboard_text(records: &[VehicleRecord]) -> String {
    records
        .iter()
        .take(CLIPBOARD_LIMIT)
        .map(VehicleRecord::display_name)
        .collect::<Vec<_>>()
        .join(CLIPBOARD_SEPARATOR)
}

/// Writes the clipboard summary of `records` to `sink` and returns it.
pub fn copy_results(
    records: &[VehicleRecord],
    sink: &mut dyn ClipboardSink,
) -> Result<String, ExportError> {
    let text = clipboard_text(records);
    sink.write_text(&text)?;
    info!(count = records.len().min(CLIPBOARD_LIMIT), "copied vehicle names");
    Ok(text)
}

/// Captures `region` and saves it as `screenshot.png` inside `out_dir`.
pub fn export_screenshot(
    region: &ResultsRegion<'_>,
    capture: &mut dyn RegionCapture,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    if region.records.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let bytes = capture.capture_region(region)?;
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(SCREENSHOT_FILE_NAME);
    fs::write(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "screenshot saved");
    Ok(path)
}
