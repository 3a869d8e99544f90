//! The script host seam.
//!
//! A host accepts injection requests and later reports, one event at a
//! time, whether each resource loaded or errored. Injection never completes
//! synchronously; outcomes only arrive through [`ScriptHost::next_event`],
//! which keeps the loader single-threaded and free of re-entrant calls.

use std::fmt;

use crate::resource::ResourceUrl;

/// Identifies one injection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw request number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw request number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors a host reports when a resource fails to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request failed in transport or returned an error status.
    #[error("request failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The resource does not exist (HTTP 404).
    #[error("resource not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },
}

/// The settled outcome of one injection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    /// The request this event settles.
    pub request: RequestId,
    /// The script body on load, or why it errored.
    pub outcome: Result<String, FetchError>,
}

impl HostEvent {
    /// A load event carrying `body`.
    #[must_use]
    pub fn loaded(request: RequestId, body: impl Into<String>) -> Self {
        Self {
            request,
            outcome: Ok(body.into()),
        }
    }

    /// An error event.
    #[must_use]
    pub const fn errored(request: RequestId, error: FetchError) -> Self {
        Self {
            request,
            outcome: Err(error),
        }
    }
}

/// Environment that injects script resources by URL.
pub trait ScriptHost {
    /// Begin loading `url`. The outcome is reported later for `request`.
    fn inject(&mut self, request: RequestId, url: &ResourceUrl);

    /// Return the next settled request, or `None` when nothing more will
    /// settle without further injections.
    fn next_event(&mut self) -> Option<HostEvent>;
}

impl<T: ScriptHost + ?Sized> ScriptHost for &mut T {
    fn inject(&mut self, request: RequestId, url: &ResourceUrl) {
        (**self).inject(request, url);
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        (**self).next_event()
    }
}
