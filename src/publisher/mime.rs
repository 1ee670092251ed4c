//! Content-based MIME detection for release uploads.

use super::error::{Error, ErrorExt, Result};
use std::path::Path;

/// MIME type of the file at `path`, detected from its contents.
///
/// Known binary signatures win; otherwise non-empty UTF-8 is `text/plain`.
/// Anything else is [`Error::MimeUndetectable`].
pub async fn detect(path: &Path) -> Result<&'static str> {
    let bytes = tokio::fs::read(path).await.fs_context("reading", path)?;
    detect_bytes(&bytes).ok_or_else(|| Error::MimeUndetectable {
        path: path.to_path_buf(),
    })
}

/// MIME type of an in-memory buffer, if recognizable.
pub fn detect_bytes(bytes: &[u8]) -> Option<&'static str> {
    if let Some(kind) = infer::get(bytes) {
        return Some(kind.mime_type());
    }
    if !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() {
        return Some("text/plain");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_is_detected_by_magic() {
        let bytes = b"PK\x03\x04\x14\x00\x00\x00\x08\x00";
        assert_eq!(detect_bytes(bytes), Some("application/zip"));
    }

    #[test]
    fn utf8_falls_back_to_text() {
        assert_eq!(detect_bytes(b"Foo 1.0\n"), Some("text/plain"));
    }

    #[test]
    fn empty_and_unknown_binary_are_undetectable() {
        assert_eq!(detect_bytes(b""), None);
        assert_eq!(detect_bytes(&[0x13, 0x37, 0x81, 0x9c, 0xfe]), None);
    }

    #[tokio::test]
    async fn detect_reports_path_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blob");
        std::fs::write(&path, [0x13u8, 0x81, 0x9c]).unwrap();
        match detect(&path).await.unwrap_err() {
            Error::MimeUndetectable { path: p } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
