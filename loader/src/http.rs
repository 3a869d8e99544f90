//! HTTP-backed script host using `ureq`.
//!
//! Requests are queued on injection and fetched one at a time when the
//! loader asks for the next event, so the loader sees the same cooperative
//! model a browser's event loop gives it.

use std::collections::VecDeque;
use std::time::Duration;

use log::debug;

use crate::host::{FetchError, HostEvent, RequestId, ScriptHost};
use crate::resource::ResourceUrl;

/// Fetches resources from a data server over HTTP(S).
pub struct HttpHost {
    base_url: String,
    agent: ureq::Agent,
    queue: VecDeque<(RequestId, String)>,
}

impl HttpHost {
    /// Create a host for `base_url` with a per-request `timeout`.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            agent: ureq::Agent::new_with_config(config),
            queue: VecDeque::new(),
        }
    }

    /// Join a resource URL onto the configured origin.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use battledata_loader::category::Category;
    /// use battledata_loader::http::HttpHost;
    /// use battledata_loader::resource::ResourceUrl;
    ///
    /// let host = HttpHost::new("https://data.example/", Duration::from_secs(5));
    /// let url = ResourceUrl::for_category(Category::Items, Some("es"), "js", 3);
    /// assert_eq!(host.absolute_url(&url), "https://data.example/data/es/items.js?3");
    /// ```
    #[must_use]
    pub fn absolute_url(&self, url: &ResourceUrl) -> String {
        format!("{}{url}", self.base_url)
    }

    /// Number of injected requests not yet fetched.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}

impl ScriptHost for HttpHost {
    fn inject(&mut self, request: RequestId, url: &ResourceUrl) {
        let absolute = self.absolute_url(url);
        debug!(target: "loader::http", "queued {request} {absolute}");
        self.queue.push_back((request, absolute));
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        let (request, url) = self.queue.pop_front()?;
        debug!(target: "loader::http", "fetching {request} {url}");
        Some(HostEvent {
            request,
            outcome: self.fetch(&url),
        })
    }
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
