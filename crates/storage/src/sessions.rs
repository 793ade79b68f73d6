//! Saved editing sessions as one JSON file per record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reel_timeline::{BoxFuture, CollaboratorError, SavedSession, SessionStore};

use crate::fs::{atomic_write_async, list_files};
use crate::{Error, Result, StorageRuntime};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub profile_id: String,
    pub name: String,
    pub session: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn summary(&self) -> SavedSession {
        SavedSession {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FsSessionStore {
    dir: PathBuf,
}

impl FsSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_runtime(runtime: &dyn StorageRuntime) -> Result<Self> {
        Ok(Self::new(runtime.sessions_base()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids are uuids, which also keeps them from naming paths outside `dir`.
    fn path_of(&self, id: &str) -> Result<PathBuf> {
        let id = uuid::Uuid::parse_str(id).map_err(|_| Error::NotFound(id.to_string()))?;
        Ok(self.dir.join(format!("{id}.json")))
    }

    async fn write(&self, record: &SessionRecord) -> Result<()> {
        let content = serde_json::to_string_pretty(record)?;
        atomic_write_async(&self.path_of(&record.id)?, content).await?;
        Ok(())
    }

    pub async fn create(
        &self,
        profile_id: &str,
        name: &str,
        session: serde_json::Value,
    ) -> Result<SessionRecord> {
        let record = SessionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            name: name.to_string(),
            session,
            updated_at: Utc::now(),
        };
        self.write(&record).await?;
        tracing::info!(id = %record.id, profile_id = %profile_id, "session_created");
        Ok(record)
    }

    pub async fn read(&self, id: &str) -> Result<SessionRecord> {
        let path = self.path_of(id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace name and blob of an existing record.
    pub async fn overwrite(&self, id: &str, name: &str, session: serde_json::Value) -> Result<SessionRecord> {
        let mut record = self.read(id).await?;
        record.name = name.to_string();
        record.session = session;
        record.updated_at = Utc::now();
        self.write(&record).await?;
        tracing::info!(id = %id, "session_updated");
        Ok(record)
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        let path = self.path_of(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records of one profile, most recently updated first. Unreadable files
    /// are skipped with a warning.
    pub async fn list_profile(&self, profile_id: &str) -> Result<Vec<SessionRecord>> {
        let mut records = Vec::new();
        for name in list_files(&self.dir).await? {
            let Some(id) = name.strip_suffix(".json") else {
                continue;
            };
            match self.read(id).await {
                Ok(record) if record.profile_id == profile_id => records.push(record),
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(file = %name, error = %error, "session_record_unreadable");
                }
            }
        }
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}

impl SessionStore for FsSessionStore {
    fn save<'a>(
        &'a self,
        profile_id: &'a str,
        name: &'a str,
        blob: &'a serde_json::Value,
    ) -> BoxFuture<'a, std::result::Result<SavedSession, CollaboratorError>> {
        Box::pin(async move {
            let record = self.create(profile_id, name, blob.clone()).await?;
            Ok(record.summary())
        })
    }

    fn load<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, std::result::Result<serde_json::Value, CollaboratorError>> {
        Box::pin(async move { Ok(self.read(id).await?.session) })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        name: &'a str,
        blob: &'a serde_json::Value,
    ) -> BoxFuture<'a, std::result::Result<(), CollaboratorError>> {
        Box::pin(async move {
            self.overwrite(id, name, blob.clone()).await?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, std::result::Result<(), CollaboratorError>> {
        Box::pin(async move { Ok(self.remove(id).await?) })
    }

    fn list<'a>(
        &'a self,
        profile_id: &'a str,
    ) -> BoxFuture<'a, std::result::Result<Vec<SavedSession>, CollaboratorError>> {
        Box::pin(async move {
            let records = self.list_profile(profile_id).await?;
            Ok(records.iter().map(SessionRecord::summary).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_then_read() {
        let temp = tempdir().unwrap();
        let store = FsSessionStore::new(temp.path());

        let record = store
            .create("profile-1", "draft", json!({ "name": "draft" }))
            .await
            .unwrap();
        let loaded = store.read(&record.id).await.unwrap();

        assert_eq!(loaded, record);
        assert!(temp.path().join(format!("{}.json", record.id)).exists());
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_not_found() {
        let temp = tempdir().unwrap();
        let store = FsSessionStore::new(temp.path());

        let missing = uuid::Uuid::new_v4().to_string();
        assert!(matches!(store.read(&missing).await, Err(Error::NotFound(_))));
        assert!(matches!(store.read("../etc/passwd").await, Err(Error::NotFound(_))));
        assert!(matches!(store.remove(&missing).await, Err(Error::NotFound(_))));
        assert!(matches!(
            store.overwrite(&missing, "x", json!({})).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn overwrite_replaces_name_and_blob() {
        let temp = tempdir().unwrap();
        let store = FsSessionStore::new(temp.path());
        let record = store.create("p", "v1", json!({ "frames": [] })).await.unwrap();

        store
            .overwrite(&record.id, "v2", json!({ "frames": [1] }))
            .await
            .unwrap();

        let loaded = store.read(&record.id).await.unwrap();
        assert_eq!(loaded.name, "v2");
        assert_eq!(loaded.session, json!({ "frames": [1] }));
        assert_eq!(loaded.profile_id, "p");
        assert!(loaded.updated_at >= record.updated_at);
    }

    #[tokio::test]
    async fn list_filters_by_profile_and_skips_junk() {
        let temp = tempdir().unwrap();
        let store = FsSessionStore::new(temp.path());
        let mine = store.create("me", "mine", json!({})).await.unwrap();
        store.create("you", "yours", json!({})).await.unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignore").unwrap();
        std::fs::write(
            temp.path().join(format!("{}.json", uuid::Uuid::new_v4())),
            "{ not json",
        )
        .unwrap();

        let listed = SessionStore::list(&store, "me").await.unwrap();
        assert_eq!(listed, vec![mine.summary()]);

        store.remove(&mine.id).await.unwrap();
        assert!(store.list_profile("me").await.unwrap().is_empty());
    }
}
