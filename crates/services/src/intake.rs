//! File intake for grounded questions.
//!
//! Files above [`MAX_ATTACHMENT_BYTES`] are refused before any content is read.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use shared::agent_api::{FileAttachment, MAX_ATTACHMENT_BYTES};
use shared::strings;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("file is {size} bytes, over the 10 MiB limit")]
    TooLarge { size: u64 },

    #[error("could not read file: {0}")]
    Read(#[from] std::io::Error),
}

impl IntakeError {
    /// Localized text for the surface's file error field
    pub fn user_message(&self) -> &'static str {
        match self {
            IntakeError::TooLarge { .. } => strings::FILE_TOO_LARGE,
            IntakeError::Read(_) => strings::FILE_READ_FAILED,
        }
    }
}

/// Encode raw bytes as an attachment, enforcing the size limit
pub fn attachment_from_bytes(
    name: impl Into<String>,
    mime_type: impl Into<String>,
    bytes: &[u8],
) -> Result<FileAttachment, IntakeError> {
    let size = bytes.len() as u64;
    if size > MAX_ATTACHMENT_BYTES {
        return Err(IntakeError::TooLarge { size });
    }
    Ok(FileAttachment {
        name: name.into(),
        mime_type: mime_type.into(),
        data: STANDARD.encode(bytes),
    })
}

/// Read a file from disk; the MIME type is guessed from its extension
pub async fn read_attachment(path: &Path) -> Result<FileAttachment, IntakeError> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_ATTACHMENT_BYTES {
        return Err(IntakeError::TooLarge { size });
    }

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    attachment_from_bytes(name, mime.essence_str(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_bytes_are_base64_encoded() {
        let file = attachment_from_bytes("a.txt", "text/plain", b"salam").unwrap();
        assert_eq!(file.data, "c2FsYW0=");
        assert_eq!(file.mime_type, "text/plain");
    }

    #[test]
    fn test_limit_is_inclusive() {
        let exact = vec![0u8; MAX_ATTACHMENT_BYTES as usize];
        assert!(attachment_from_bytes("exact.bin", "application/octet-stream", &exact).is_ok());

        let over = vec![0u8; MAX_ATTACHMENT_BYTES as usize + 1];
        let err = attachment_from_bytes("over.bin", "application/octet-stream", &over).unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge { size } if size == MAX_ATTACHMENT_BYTES + 1));
        assert_eq!(err.user_message(), strings::FILE_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_read_attachment_from_disk() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("notes.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let file = read_attachment(&path).await.unwrap();
        assert_eq!(file.name, "notes.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(STANDARD.decode(&file.data).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_oversized_file_is_refused() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("big.bin");
        let f = fs::File::create(&path).unwrap();
        f.set_len(MAX_ATTACHMENT_BYTES + 1).unwrap();

        let err = read_attachment(&path).await.unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let tmp = tempdir().unwrap();
        let err = read_attachment(&tmp.path().join("nope.txt")).await.unwrap_err();
        assert!(matches!(err, IntakeError::Read(_)));
        assert_eq!(err.user_message(), strings::FILE_READ_FAILED);
    }
}
