//! Session data and its persistence

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::storage::KeyValueStorage;
use crate::users::UserProfile;

/// Session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The token sent in the `token` header
    pub token: String,

    /// Profile of the signed-in user
    pub user: UserProfile,
}

/// Persists the session as a single JSON entry in a key-value store
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SessionStore {
    /// Create a new SessionStore writing under `key`
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
        }
    }

    /// Persist a session, replacing any previous one
    pub async fn save(&self, session: &Session) -> Result<(), Error> {
        let json = serde_json::to_string(session)?;
        self.storage.set_item(&self.key, &json).await?;
        debug!(user_id = session.user.id, "session persisted");
        Ok(())
    }

    /// Read the persisted session
    ///
    /// `Ok(None)` means nothing is stored. A stored value that does not parse
    /// yields [`Error::CorruptSession`].
    pub async fn load(&self) -> Result<Option<Session>, Error> {
        match self.storage.get_item(&self.key).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(Error::CorruptSession),
            None => Ok(None),
        }
    }

    /// Delete the persisted session
    pub async fn remove(&self) -> Result<(), Error> {
        self.storage.remove_item(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> Session {
        Session {
            token: "T".to_string(),
            user: UserProfile {
                id: 1,
                name: "A".to_string(),
                email: Some("a@b.com".to_string()),
                phone: None,
                address: None,
                neighborhood: None,
                national_id: None,
                active: Some(true),
            },
        }
    }

    #[tokio::test]
    async fn save_load_remove() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()), "session");
        assert!(store.load().await.unwrap().is_none());

        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session()));

        store.remove().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unparseable_value_is_reported_as_corrupt() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("session", "{\"token\":").await.unwrap();

        let store = SessionStore::new(storage, "session");
        assert!(matches!(store.load().await, Err(Error::CorruptSession(_))));
    }

    #[tokio::test]
    async fn stored_layout_is_token_and_user() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone(), "session");
        store.save(&session()).await.unwrap();

        let raw = storage.get_item("session").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "T");
        assert_eq!(value["user"]["nome"], "A");
    }
}
