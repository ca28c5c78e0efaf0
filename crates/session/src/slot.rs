//! Device-scoped slot holding the authenticated user between launches.
//!
//! The stored user is restored verbatim: credentials are not re-checked and
//! there is no expiry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cliqa_core::user::User;

use crate::error::SessionError;

pub struct FileSessionSlot {
    path: PathBuf,
}

impl FileSessionSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored user, if any. A slot that no longer parses is discarded.
    pub async fn restore(&self) -> Result<Option<User>, SessionError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable session slot");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn store(&self, user: &User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| SessionError::Slot(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// Remove the slot. Clearing an empty slot is not an error.
    pub async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use cliqa_core::user::default_admin;

    use super::*;

    #[tokio::test]
    async fn store_restore_clear() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSessionSlot::new(dir.path().join("session.json"));

        assert_eq!(slot.restore().await.unwrap(), None);

        let admin = default_admin();
        slot.store(&admin).await.unwrap();
        assert_eq!(slot.restore().await.unwrap(), Some(admin));

        slot.clear().await.unwrap();
        assert_eq!(slot.restore().await.unwrap(), None);
        slot.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_slot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let slot = FileSessionSlot::new(&path);
        assert_eq!(slot.restore().await.unwrap(), None);
        assert!(!path.exists());
    }
}
