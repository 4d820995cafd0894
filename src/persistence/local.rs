//! Device-local high score stores

use std::cell::Cell;
use std::rc::Rc;

use super::{LocalStore, Result};

/// In-memory store for headless runs and tests; clones share the value
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u64) -> Self {
        let store = Self::new();
        store.value.set(Some(score));
        store
    }

    /// Currently stored value
    pub fn value(&self) -> Option<u64> {
        self.value.get()
    }
}

impl LocalStore for MemoryStore {
    fn read(&self) -> Result<Option<u64>> {
        Ok(self.value.get())
    }

    fn write(&self, score: u64) -> Result<()> {
        self.value.set(Some(score));
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::path::{Path, PathBuf};

    use super::super::{LocalStore, PersistError, Result};
    use crate::highscores::{HighScoreRecord, parse_score};

    /// JSON file `{ "highScore": n }`, replaced atomically on write
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<data dir>/aerobot/highscore.json`, if the platform has a data dir
        pub fn default_location() -> Option<Self> {
            dirs::data_dir().map(|dir| Self::new(dir.join("aerobot").join("highscore.json")))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl LocalStore for FileStore {
        fn read(&self) -> Result<Option<u64>> {
            let text = match std::fs::read_to_string(&self.path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            if let Ok(record) = serde_json::from_str::<HighScoreRecord>(&text) {
                return Ok(Some(record.score()));
            }
            // Older saves held a bare number
            parse_score(&text)
                .map(Some)
                .ok_or(PersistError::Malformed(text))
        }

        fn write(&self, score: u64) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string(&HighScoreRecord::new(score))?;
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, json)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_file_reads_as_none() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::new(dir.path().join("nope.json"));
            assert!(matches!(store.read(), Ok(None)));
        }

        #[test]
        fn test_write_then_read() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::new(dir.path().join("nested").join("highscore.json"));
            store.write(4321).unwrap();
            assert_eq!(store.read().unwrap(), Some(4321));

            let raw = std::fs::read_to_string(store.path()).unwrap();
            assert!(raw.contains("highScore"));
        }

        #[test]
        fn test_bare_number_and_garbage() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("highscore.json");
            let store = FileStore::new(&path);

            std::fs::write(&path, "512\n").unwrap();
            assert_eq!(store.read().unwrap(), Some(512));

            std::fs::write(&path, "not a score").unwrap();
            assert!(matches!(store.read(), Err(PersistError::Malformed(_))));
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::super::{LocalStore, PersistError, Result};
    use crate::highscores::parse_score;

    /// LocalStorage entry holding the best score as plain text
    #[derive(Debug, Clone)]
    pub struct WebStorageStore {
        key: String,
    }

    impl Default for WebStorageStore {
        fn default() -> Self {
            Self::new(Self::STORAGE_KEY)
        }
    }

    impl WebStorageStore {
        const STORAGE_KEY: &'static str = "aerobot_highscore";

        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| PersistError::Unavailable("LocalStorage is not available".into()))
        }
    }

    impl LocalStore for WebStorageStore {
        fn read(&self) -> Result<Option<u64>> {
            let storage = Self::storage()?;
            let item = storage
                .get_item(&self.key)
                .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?;
            match item {
                None => Ok(None),
                Some(text) => parse_score(&text)
                    .map(Some)
                    .ok_or(PersistError::Malformed(text)),
            }
        }

        fn write(&self, score: u64) -> Result<()> {
            Self::storage()?
                .set_item(&self.key, &score.to_string())
                .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_value() {
        let store = MemoryStore::new();
        let view = store.clone();
        assert_eq!(store.read().unwrap(), None);
        store.write(9).unwrap();
        assert_eq!(view.value(), Some(9));
    }
}
