//! Per-operator session snapshots: one JSON file per user.
//!
//! Generic over the snapshot type so the store knows nothing about
//! dialog internals. Reads populate an in-memory cache; every save
//! rewrites the user's file.

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

pub struct SessionStore<T> {
    dir: PathBuf,
    cache: RwLock<HashMap<String, T>>,
    _marker: PhantomData<T>,
}

impl<T> SessionStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open (and create) the session directory under the data dir.
    pub fn open(data_dir: &Path) -> Result<SessionStore<T>> {
        let dir = data_dir.join("sessions");
        fs::create_dir_all(&dir).map_err(StorageError::io(&dir))?;
        Ok(SessionStore {
            dir,
            cache: RwLock::new(HashMap::new()),
            _marker: PhantomData,
        })
    }

    fn path(&self, user: &str) -> PathBuf {
        // User ids come from the CLI; keep filenames tame.
        let safe: String = user
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    /// Load a user's snapshot, from cache or disk.
    pub fn load(&self, user: &str) -> Result<Option<T>> {
        if let Some(snapshot) = self.cache.read().get(user) {
            return Ok(Some(snapshot.clone()));
        }
        let path = self.path(user);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(StorageError::io(&path))?;
        let snapshot: T = serde_json::from_str(&text).map_err(StorageError::serde(&path))?;
        self.cache
            .write()
            .insert(user.to_string(), snapshot.clone());
        Ok(Some(snapshot))
    }

    /// Save a user's snapshot to cache and disk.
    pub fn save(&self, user: &str, snapshot: &T) -> Result<()> {
        let path = self.path(user);
        let text =
            serde_json::to_string_pretty(snapshot).map_err(StorageError::serde(&path))?;
        fs::write(&path, text).map_err(StorageError::io(&path))?;
        self.cache
            .write()
            .insert(user.to_string(), snapshot.clone());
        tracing::debug!(target: "cnc::storage", user, path = %path.display(), "session saved");
        Ok(())
    }

    /// Drop a user's snapshot from cache and disk.
    pub fn reset(&self, user: &str) -> Result<()> {
        self.cache.write().remove(user);
        let path = self.path(user);
        if path.exists() {
            fs::remove_file(&path).map_err(StorageError::io(&path))?;
        }
        Ok(())
    }
}
