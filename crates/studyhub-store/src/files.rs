//! Filesystem-backed file store for uploaded resources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use studyhub_core::error::CoreError;
use studyhub_core::traits::{allowed_file, FileStore};

/// Stores uploaded files under `root/<subfolder>/<filename>`.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The path a stored file lives at.
    pub fn path_for(&self, subfolder: &str, filename: &str) -> PathBuf {
        self.root.join(subfolder).join(filename)
    }
}

/// Reduce an uploaded filename to a safe basename: path components are
/// stripped, and anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, subfolder: &str, filename: &str, bytes: &[u8]) -> Result<(), CoreError> {
        if filename.trim().is_empty() {
            return Err(CoreError::Validation("no file selected".into()));
        }
        if !allowed_file(filename) {
            return Err(CoreError::InvalidExtension(filename.to_string()));
        }
        let filename = sanitize_filename(filename);
        let folder = self.root.join(subfolder);
        std::fs::create_dir_all(&folder)
            .map_err(|e| CoreError::Validation(format!("failed to create {}: {e}", folder.display())))?;
        let path = folder.join(&filename);
        std::fs::write(&path, bytes)
            .map_err(|e| CoreError::Validation(format!("failed to write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "stored uploaded file");
        Ok(())
    }

    async fn delete(&self, subfolder: &str, filename: &str) {
        let path = self.path_for(subfolder, &sanitize_filename(filename));
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "file already missing at delete time");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to delete file");
            }
        }
    }
}

/// Expose the root for callers that need to serve downloads.
impl AsRef<Path> for LocalFileStore {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(sanitize_filename("C:\\temp\\a b?.pdf"), "a_b_.pdf");
    }

    #[tokio::test]
    async fn save_writes_under_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        store.save("notes", "trees.pdf", b"content").await.unwrap();
        let written = std::fs::read(dir.path().join("notes").join("trees.pdf")).unwrap();
        assert_eq!(written, b"content");
    }

    #[tokio::test]
    async fn save_rejects_disallowed_extension_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        let err = store.save("notes", "payload.exe", b"x").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidExtension(_)));
        assert!(!dir.path().join("notes").exists());
    }

    #[tokio::test]
    async fn save_rejects_empty_filename() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        assert!(store.save("notes", "  ", b"x").await.is_err());
    }

    #[tokio::test]
    async fn delete_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        store.save("papers", "p.pdf", b"x").await.unwrap();
        store.delete("papers", "p.pdf").await;
        assert!(!dir.path().join("papers").join("p.pdf").exists());
        // deleting again must not panic or error
        store.delete("papers", "p.pdf").await;
    }
}
