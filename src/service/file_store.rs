use crate::service::error::ServiceError;
use sha2::{Digest, Sha256};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::warn;
use uuid::Uuid;

/// Bytes received from a multipart form, before they are persisted.
#[derive(Debug, Clone)]
pub(crate) struct IncomingFile {
    pub(crate) original_filename: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredFile {
    pub(crate) file_ref: String,
    pub(crate) byte_size: i64,
    pub(crate) sha256: String,
}

/// Flat directory of blobs addressed by random names.
#[derive(Clone)]
pub(crate) struct FileStore {
    root: Arc<PathBuf>,
}

impl FileStore {
    pub(crate) fn new(root: Arc<PathBuf>) -> Self {
        Self { root }
    }

    pub(crate) async fn store(&self, bytes: &[u8]) -> Result<StoredFile, ServiceError> {
        let file_ref = Uuid::new_v4().simple().to_string();
        let target_path = self.root.join(&file_ref);

        tokio::fs::write(&target_path, bytes)
            .await
            .map_err(|error| {
                ServiceError::internal(format!("failed to persist uploaded file: {error}"))
            })?;

        let byte_size = i64::try_from(bytes.len())
            .map_err(|_| ServiceError::validation("uploaded file is too large"))?;

        Ok(StoredFile {
            file_ref,
            byte_size,
            sha256: format!("{:x}", Sha256::digest(bytes)),
        })
    }

    pub(crate) async fn read(&self, file_ref: &str) -> Result<Vec<u8>, ServiceError> {
        let path = self.resolve(file_ref)?;
        tokio::fs::read(&path).await.map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                ServiceError::not_found("stored file is missing")
            } else {
                ServiceError::internal(format!("failed to read stored file: {error}"))
            }
        })
    }

    /// Best effort; a missing blob is not an error.
    pub(crate) async fn remove(&self, file_ref: &str) {
        let Ok(path) = self.resolve(file_ref) else {
            return;
        };
        if let Err(error) = tokio::fs::remove_file(&path).await
            && error.kind() != io::ErrorKind::NotFound
        {
            warn!(file_ref, error = %error, "Failed to remove stored file");
        }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn resolve(&self, file_ref: &str) -> Result<PathBuf, ServiceError> {
        let is_plain_name = !file_ref.is_empty()
            && file_ref
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-');
        if !is_plain_name {
            return Err(ServiceError::internal(format!(
                "refusing to resolve file reference `{file_ref}`"
            )));
        }
        Ok(self.root.join(Path::new(file_ref)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_storage_dir;

    #[tokio::test]
    async fn stores_reads_and_removes_blob() {
        let store = FileStore::new(temp_storage_dir());

        let stored = store.store(b"lecture notes").await.unwrap();
        assert_eq!(stored.byte_size, 13);
        assert_eq!(stored.sha256.len(), 64);
        assert_eq!(store.read(&stored.file_ref).await.unwrap(), b"lecture notes");

        store.remove(&stored.file_ref).await;
        assert!(!store.root().join(&stored.file_ref).exists());
        // removing twice stays quiet
        store.remove(&stored.file_ref).await;
    }

    #[tokio::test]
    async fn path_like_references_are_rejected() {
        let store = FileStore::new(temp_storage_dir());
        assert!(store.read("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn missing_blob_reads_as_not_found() {
        let store = FileStore::new(temp_storage_dir());
        let error = store.read("deadbeef").await.unwrap_err();
        assert_eq!(
            error.kind(),
            crate::service::error::ServiceErrorKind::NotFound
        );
    }
}
