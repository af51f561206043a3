use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

const USER_AGENT: &str = concat!("museum-ledger/", env!("CARGO_PKG_VERSION"));

/// Keeps successive requests at least `min_interval` apart.
struct Pacer {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl Pacer {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    fn wait(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }

        *last = Some(Instant::now());
    }
}

/// Blocking JSON client used by one museum adapter.
pub struct HttpClient {
    museum: &'static str,
    inner: reqwest::blocking::Client,
    pacer: Pacer,
}

impl HttpClient {
    pub fn new(museum: &'static str, timeout: Duration, min_interval: Duration) -> LedgerResult<Self> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::SourceUnavailable {
                museum,
                detail: format!("client setup failed: {e}"),
            })?;

        Ok(Self {
            museum,
            inner,
            pacer: Pacer::new(min_interval),
        })
    }

    pub fn museum(&self) -> &'static str {
        self.museum
    }

    /// GETs `url` with `query` and decodes the JSON body.
    /// Transport errors, non-2xx statuses and undecodable bodies all map to `SourceUnavailable`.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> LedgerResult<T> {
        self.pacer.wait();
        debug!(museum = self.museum, url, "GET");

        let unavailable = |e: reqwest::Error| LedgerError::SourceUnavailable {
            museum: self.museum,
            detail: e.to_string(),
        };

        self.inner
            .get(url)
            .query(query)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(unavailable)?
            .json::<T>()
            .map_err(unavailable)
    }
}
