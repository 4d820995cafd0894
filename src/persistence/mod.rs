//! Best-effort high score persistence
//!
//! Precedence:
//! - `save` writes the local store first, then hands the value to the remote
//!   store, which syncs in the background and swallows failures
//! - `load` prefers the remote value, never returns less than the durable
//!   local value, and degrades to 0 when nothing can be read
//!
//! Nothing here returns an error to the game; failures are logged.

pub mod local;
pub mod remote;

use thiserror::Error;

pub use local::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use local::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::WebStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub use remote::HttpRemote;
#[cfg(target_arch = "wasm32")]
pub use remote::WebRemote;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed high score: {0:?}")]
    Malformed(String),

    #[error("remote returned HTTP {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("remote fetch has not completed yet")]
    Pending,
}

pub type Result<T> = std::result::Result<T, PersistError>;

/// Durable storage on this device
pub trait LocalStore {
    /// Stored best, `None` if nothing was ever written
    fn read(&self) -> Result<Option<u64>>;
    fn write(&self, score: u64) -> Result<()>;
}

/// Shared leaderboard somewhere else
pub trait RemoteStore {
    /// Remote best score
    fn fetch(&self) -> Result<u64>;
    /// Start a background sync of `score`; must return immediately
    fn submit(&self, score: u64);
    /// Wait for background submissions to settle
    fn flush(&self) {}
}

/// What the lifecycle needs from persistence
pub trait HighScoreStore {
    /// Best known score; never fails
    fn load(&self) -> u64;
    /// Persist a new best; never fails, never blocks on the network
    fn save(&self, score: u64);
    /// Called once at shutdown; may block until pending syncs finish
    fn flush(&self) {}
}

/// Local store plus optional remote sync
pub struct HighScoreService {
    local: Box<dyn LocalStore>,
    remote: Option<Box<dyn RemoteStore>>,
}

impl HighScoreService {
    pub fn new(local: Box<dyn LocalStore>) -> Self {
        Self {
            local,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: Box<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    fn read_local(&self) -> u64 {
        match self.local.read() {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                log::warn!("Local high score unreadable, treating as 0: {}", e);
                0
            }
        }
    }
}

impl HighScoreStore for HighScoreService {
    fn load(&self) -> u64 {
        let local = self.read_local();

        let Some(remote) = &self.remote else {
            log::info!("High score loaded from local storage: {}", local);
            return local;
        };

        match remote.fetch() {
            Ok(value) => {
                log::info!("High score loaded: remote {}, local {}", value, local);
                value.max(local)
            }
            Err(PersistError::Pending) => local,
            Err(e) => {
                log::warn!("Remote high score unavailable, using local {}: {}", local, e);
                local
            }
        }
    }

    fn save(&self, score: u64) {
        match self.local.write(score) {
            Ok(()) => log::info!("High score {} saved locally", score),
            Err(e) => log::warn!("Failed to save high score {} locally: {}", score, e),
        }
        if let Some(remote) = &self.remote {
            remote.submit(score);
        }
    }

    fn flush(&self) {
        if let Some(remote) = &self.remote {
            remote.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Remote that answers with a fixed result and records submissions
    #[derive(Clone)]
    struct FakeRemote {
        answer: Option<u64>,
        submitted: Rc<RefCell<Vec<u64>>>,
    }

    impl RemoteStore for FakeRemote {
        fn fetch(&self) -> Result<u64> {
            self.answer
                .ok_or_else(|| PersistError::Transport("connection refused".into()))
        }

        fn submit(&self, score: u64) {
            self.submitted.borrow_mut().push(score);
        }
    }

    /// Local store whose every operation fails
    struct BrokenLocal;

    impl LocalStore for BrokenLocal {
        fn read(&self) -> Result<Option<u64>> {
            Err(PersistError::Malformed("###".into()))
        }

        fn write(&self, _score: u64) -> Result<()> {
            Err(PersistError::Unavailable("quota exceeded".into()))
        }
    }

    fn remote(answer: Option<u64>) -> FakeRemote {
        FakeRemote {
            answer,
            submitted: Rc::new(RefCell::new(Vec::new())),
        }
    }

    #[test]
    fn test_load_local_only() {
        let local = MemoryStore::with_value(250);
        let service = HighScoreService::new(Box::new(local));
        assert_eq!(service.load(), 250);
    }

    #[test]
    fn test_load_prefers_remote_but_never_below_local() {
        let service = HighScoreService::new(Box::new(MemoryStore::with_value(250)))
            .with_remote(Box::new(remote(Some(900))));
        assert_eq!(service.load(), 900);

        let service = HighScoreService::new(Box::new(MemoryStore::with_value(250)))
            .with_remote(Box::new(remote(Some(0))));
        assert_eq!(service.load(), 250);
    }

    #[test]
    fn test_load_falls_back_to_local_on_remote_failure() {
        let service = HighScoreService::new(Box::new(MemoryStore::with_value(40)))
            .with_remote(Box::new(remote(None)));
        assert_eq!(service.load(), 40);
    }

    #[test]
    fn test_load_total_failure_is_zero() {
        let service = HighScoreService::new(Box::new(BrokenLocal)).with_remote(Box::new(remote(None)));
        assert_eq!(service.load(), 0);

        let service = HighScoreService::new(Box::new(MemoryStore::new()));
        assert_eq!(service.load(), 0);
    }

    #[test]
    fn test_save_writes_local_then_remote() {
        let local = MemoryStore::new();
        let fake = remote(None);
        let service =
            HighScoreService::new(Box::new(local.clone())).with_remote(Box::new(fake.clone()));

        service.save(321);

        assert_eq!(local.value(), Some(321));
        assert_eq!(*fake.submitted.borrow(), vec![321]);
    }

    #[test]
    fn test_save_survives_local_failure() {
        let fake = remote(Some(5));
        let service = HighScoreService::new(Box::new(BrokenLocal)).with_remote(Box::new(fake.clone()));
        service.save(10);
        assert_eq!(*fake.submitted.borrow(), vec![10]);
    }
}
