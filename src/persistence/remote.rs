//! Remote leaderboard endpoint
//!
//! `GET <url>` answers `{ "highScore": n }`; `POST <url>` takes `{ "score": n }`.

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpRemote;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use std::sync::Mutex;
    use std::thread::JoinHandle;
    use std::time::Duration;

    use super::super::{PersistError, RemoteStore, Result};
    use crate::highscores::{HighScoreRecord, ScoreSubmission};

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
    const URL_ENV: &str = "AEROBOT_REMOTE_URL";

    /// Blocking HTTP client; submissions run on their own thread
    #[derive(Debug)]
    pub struct HttpRemote {
        url: String,
        client: reqwest::blocking::Client,
        pending: Mutex<Vec<JoinHandle<()>>>,
    }

    impl HttpRemote {
        pub fn new(url: impl Into<String>) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(|e| PersistError::Transport(e.to_string()))?;
            Ok(Self {
                url: url.into(),
                client,
                pending: Mutex::new(Vec::new()),
            })
        }

        /// Endpoint from `AEROBOT_REMOTE_URL`, if set and non-empty
        pub fn from_env() -> Option<Self> {
            let url = std::env::var(URL_ENV).ok()?;
            let url = url.trim();
            if url.is_empty() {
                return None;
            }
            match Self::new(url) {
                Ok(remote) => Some(remote),
                Err(e) => {
                    log::warn!("Remote high scores disabled: {}", e);
                    None
                }
            }
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    impl RemoteStore for HttpRemote {
        fn fetch(&self) -> Result<u64> {
            let response = self
                .client
                .get(&self.url)
                .send()
                .map_err(|e| PersistError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(PersistError::Status(status.as_u16()));
            }
            let record: HighScoreRecord = response
                .json()
                .map_err(|e| PersistError::Transport(e.to_string()))?;
            Ok(record.score())
        }

        fn submit(&self, score: u64) {
            let client = self.client.clone();
            let url = self.url.clone();
            let handle = std::thread::spawn(move || {
                let result = client.post(&url).json(&ScoreSubmission { score }).send();
                match result {
                    Ok(response) if response.status().is_success() => {
                        log::info!("High score {} synced to {}", score, url);
                    }
                    Ok(response) => {
                        log::warn!("High score sync rejected: HTTP {}", response.status());
                    }
                    Err(e) => log::warn!("High score sync failed: {}", e),
                }
            });

            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }

        fn flush(&self) {
            let handles = std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()));
            for handle in handles {
                if handle.join().is_err() {
                    log::warn!("High score sync thread panicked");
                }
            }
        }
    }

}

#[cfg(target_arch = "wasm32")]
pub use web::WebRemote;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::super::{PersistError, RemoteStore, Result};
    use crate::highscores::{HighScoreRecord, ScoreSubmission};

    fn js_err(e: JsValue) -> PersistError {
        PersistError::Transport(format!("{:?}", e))
    }

    fn window() -> Result<web_sys::Window> {
        web_sys::window().ok_or_else(|| PersistError::Unavailable("no window".into()))
    }

    /// Browser fetch client.
    ///
    /// The browser cannot block, so `fetch` only reports what a previous
    /// [`WebRemote::prefetch`] brought back, or [`PersistError::Pending`].
    #[derive(Debug, Clone)]
    pub struct WebRemote {
        url: String,
        cache: Rc<Cell<Option<u64>>>,
    }

    impl WebRemote {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                cache: Rc::new(Cell::new(None)),
            }
        }

        /// Start the GET; `on_done` runs once it settles
        pub fn prefetch(&self, on_done: impl FnOnce(Result<u64>) + 'static) {
            let url = self.url.clone();
            let cache = Rc::clone(&self.cache);
            wasm_bindgen_futures::spawn_local(async move {
                let result = get_high_score(&url).await;
                if let Ok(score) = result {
                    cache.set(Some(score));
                }
                on_done(result);
            });
        }
    }

    impl RemoteStore for WebRemote {
        fn fetch(&self) -> Result<u64> {
            self.cache.get().ok_or(PersistError::Pending)
        }

        fn submit(&self, score: u64) {
            let url = self.url.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match post_score(&url, score).await {
                    Ok(()) => log::info!("High score {} synced", score),
                    Err(e) => log::warn!("High score sync failed: {}", e),
                }
            });
        }
    }

    async fn get_high_score(url: &str) -> Result<u64> {
        let value = JsFuture::from(window()?.fetch_with_str(url))
            .await
            .map_err(js_err)?;
        let response: Response = value.dyn_into().map_err(js_err)?;
        if !response.ok() {
            return Err(PersistError::Status(response.status()));
        }
        let body = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let text = body
            .as_string()
            .ok_or_else(|| PersistError::Malformed("non-text response body".into()))?;
        let record: HighScoreRecord = serde_json::from_str(&text)?;
        Ok(record.score())
    }

    async fn post_score(url: &str, score: u64) -> Result<()> {
        let body = serde_json::to_string(&ScoreSubmission { score })?;
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::NoCors);
        init.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
        JsFuture::from(window()?.fetch_with_request(&request))
            .await
            .map_err(js_err)?;
        Ok(())
    }
}
