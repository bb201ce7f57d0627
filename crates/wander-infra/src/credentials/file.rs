use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use wander_core::ports::CredentialStore;
use wander_core::{CredentialError, CurrentUser};

/// Credentials persisted as a JSON document on disk.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<CurrentUser>, CredentialError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CredentialError::Io(e.to_string())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CredentialError::Corrupt(e.to_string()))
    }

    async fn save(&self, user: &CurrentUser) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CredentialError::Io(e.to_string()))?;
        }
        let json =
            serde_json::to_vec_pretty(user).map_err(|e| CredentialError::Corrupt(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| CredentialError::Io(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "Credentials saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/credentials.json"));
        assert_eq!(store.load().await.unwrap(), None);

        let user = CurrentUser::new("sarah", "tok-1").with_id("42");
        store.save(&user).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(user));

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        let store = FileCredentialStore::new(path);
        assert!(matches!(store.load().await, Err(CredentialError::Corrupt(_))));
    }
}
