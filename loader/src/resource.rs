//! Resource paths, cache-busting tokens, and loaded payloads.
//!
//! Default-language files live directly under `/data/`; every other
//! language has its own subdirectory. Every request carries a query token
//! so the host never serves a stale cached copy.

use std::fmt;
use std::sync::Arc;

use crate::category::Category;

/// Root of the data tree on the data server.
pub const DATA_ROOT: &str = "/data";

/// File stem of the seasonal text overlay.
pub const OVERLAY_STEM: &str = "text-afd";

/// A request path plus its cache-busting token.
///
/// # Examples
///
/// ```
/// use battledata_loader::category::Category;
/// use battledata_loader::resource::ResourceUrl;
///
/// let url = ResourceUrl::for_category(Category::Moves, Some("es"), "js", 42);
/// assert_eq!(url.path(), "/data/es/moves.js");
/// assert_eq!(url.to_string(), "/data/es/moves.js?42");
///
/// let root = ResourceUrl::for_category(Category::Moves, None, "js", 43);
/// assert_eq!(root.path(), "/data/moves.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUrl {
    path: String,
    token: u64,
}

impl ResourceUrl {
    /// Path for `category`, under `language` when one is given.
    ///
    /// Pass `None` for the default language, whose files sit at the root.
    #[must_use]
    pub fn for_category(
        category: Category,
        language: Option<&str>,
        extension: &str,
        token: u64,
    ) -> Self {
        let path = match language {
            Some(language) => format!("{DATA_ROOT}/{language}/{}.{extension}", category.name()),
            None => format!("{DATA_ROOT}/{}.{extension}", category.name()),
        };
        Self { path, token }
    }

    /// Path of the seasonal text overlay.
    #[must_use]
    pub fn overlay(extension: &str, token: u64) -> Self {
        Self {
            path: format!("{DATA_ROOT}/{OVERLAY_STEM}.{extension}"),
            token,
        }
    }

    /// The path without the query token.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The cache-busting token.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.path, self.token)
    }
}

/// Issues cache-busting tokens.
///
/// Tokens follow the wall clock in milliseconds but never repeat: when the
/// clock has not moved since the last request, the previous token plus one
/// is used instead.
#[derive(Debug, Clone, Default)]
pub struct CacheBuster {
    last: Option<u64>,
}

impl CacheBuster {
    /// Return a token strictly greater than any issued before.
    pub fn next_token(&mut self, now_millis: u64) -> u64 {
        let token = match self.last {
            Some(last) if now_millis <= last => last.saturating_add(1),
            _ => now_millis,
        };
        self.last = Some(token);
        token
    }
}

/// A successfully loaded script resource.
///
/// The body is opaque to the loader; it is shared so reports stay cheap to
/// clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    url: ResourceUrl,
    body: Arc<str>,
}

impl Resource {
    /// Wrap a body fetched from `url`.
    #[must_use]
    pub fn new(url: ResourceUrl, body: impl Into<Arc<str>>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    /// Where the body was fetched from.
    #[must_use]
    pub fn url(&self) -> &ResourceUrl {
        &self.url
    }

    /// The script text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
