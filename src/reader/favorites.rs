//! Saved articles, persisted through an opaque key-value slot.
//!
//! The whole favorites list lives as one JSON array under
//! [`FAVORITES_KEY`] and is read and rewritten wholesale on every
//! operation. The slot itself is provided by a [`KeyValueStore`]:
//! [`FileStore`] for the terminal reader, [`MemoryStore`] for tests.
//!
//! # Invariants
//!
//! - At most one favorite per article URL
//! - List order is insertion order

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Article, Favorite};

/// Slot name the favorites list is stored under.
pub const FAVORITES_KEY: &str = "news_reader_favorites";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Favorites storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Stored favorites are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string-valued durable slot store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each slot as `{dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the directory backing the store.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "Opened favorites store");
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // written beside the target and renamed into place
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

pub struct FavoritesStore<K> {
    store: K,
}

impl<K: KeyValueStore> FavoritesStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// All saved favorites, oldest first.
    pub fn list(&self) -> Result<Vec<Favorite>, StoreError> {
        match self.store.get(FAVORITES_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write(&mut self, favorites: &[Favorite]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, &raw)
    }

    /// Append `article` unless its URL is already saved. Returns whether it was added.
    pub fn save(&mut self, article: &Article) -> Result<bool, StoreError> {
        let mut favorites = self.list()?;
        if favorites.iter().any(|fav| fav.url == article.url) {
            return Ok(false);
        }

        favorites.push(Favorite {
            url: article.url.clone(),
            article: article.clone(),
            saved_at: Utc::now().timestamp_millis(),
        });
        self.write(&favorites)?;
        debug!(url = %article.url, "Saved favorite");
        Ok(true)
    }

    /// Delete the favorite for `url`. Returns whether one existed.
    pub fn remove(&mut self, url: &str) -> Result<bool, StoreError> {
        let mut favorites = self.list()?;
        let before = favorites.len();
        favorites.retain(|fav| fav.url != url);
        self.write(&favorites)?;
        Ok(favorites.len() != before)
    }

    pub fn is_favorited(&self, url: &str) -> Result<bool, StoreError> {
        Ok(self.list()?.iter().any(|fav| fav.url == url))
    }

    /// Save or remove `article`. Returns whether it is saved afterwards.
    pub fn toggle(&mut self, article: &Article) -> Result<bool, StoreError> {
        if self.is_favorited(&article.url)? {
            self.remove(&article.url)?;
            Ok(false)
        } else {
            self.save(article)?;
            Ok(true)
        }
    }
}
