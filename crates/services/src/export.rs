//! Presentation export: outline in, `.pptx` file on disk out.

use crate::deck::SlideDeck;
use crate::pptx::write_pptx;
use shared::outline::Outline;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot use {0:?} as a file name")]
    InvalidFileName(String),

    #[error("failed to write presentation: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to package presentation: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// `{title}.pptx`, refusing names that would escape the target directory
pub fn file_name_for(title: &str) -> Result<String, ExportError> {
    let trimmed = title.trim();
    let bad_char = trimmed
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control());
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || bad_char {
        return Err(ExportError::InvalidFileName(title.to_string()));
    }
    Ok(format!("{}.pptx", trimmed))
}

/// Write the outline as a slide deck into `dir`, returning the file path
pub fn export_outline(outline: &Outline, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name_for(&outline.title)?);
    let deck = SlideDeck::from_outline(outline);
    let bytes = write_pptx(&deck)?;
    std::fs::write(&path, bytes)?;
    info!(slides = deck.slides.len(), "exported presentation to {}", path.display());
    Ok(path)
}
