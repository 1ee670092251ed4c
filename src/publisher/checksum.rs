//! Artifact checksum calculation.
//!
//! SHA-256 digests for uploaded artifacts. Kexts are bundles, so a directory
//! is hashed as a tree: every regular file's relative path and contents, in
//! sorted path order.

use super::error::{Error, ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

const CHUNK: usize = 8192;

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("hashing", path)?;

    if metadata.is_file() {
        file_sha256(path).await
    } else if metadata.is_dir() {
        directory_sha256(path).await
    } else {
        Err(Error::NotAFile(path.to_path_buf()))
    }
}

async fn file_sha256(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    feed(&mut hasher, path).await?;
    Ok(hex::encode(hasher.finalize()))
}

async fn directory_sha256(dir: &Path) -> Result<String> {
    let mut entries: Vec<_> = walkdir::WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    entries.sort();

    let mut hasher = Sha256::new();
    for path in entries {
        if let Ok(rel_path) = path.strip_prefix(dir) {
            hasher.update(rel_path.to_string_lossy().as_bytes());
        }
        feed(&mut hasher, &path).await?;
    }

    Ok(hex::encode(hasher.finalize()))
}

async fn feed(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; CHUNK];
    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hashing", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_digest_matches_known_value() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("abc.txt");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            sha256(&path).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn directory_digest_is_stable_and_content_sensitive() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = tmp.path().join("Foo.kext");
        std::fs::create_dir_all(bundle.join("Contents/MacOS")).unwrap();
        std::fs::write(bundle.join("Contents/Info.plist"), b"<plist/>").unwrap();
        std::fs::write(bundle.join("Contents/MacOS/Foo"), b"bin").unwrap();

        let first = sha256(&bundle).await.unwrap();
        assert_eq!(first, sha256(&bundle).await.unwrap());
        assert_eq!(first.len(), 64);

        std::fs::write(bundle.join("Contents/MacOS/Foo"), b"bin2").unwrap();
        assert_ne!(first, sha256(&bundle).await.unwrap());
    }

    #[tokio::test]
    async fn missing_path_is_fs_error() {
        let err = sha256(Path::new("/nonexistent/Foo.kext")).await.unwrap_err();
        assert!(matches!(err, Error::Fs { .. }));
    }
}
