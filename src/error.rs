//! Typed failure taxonomy raised by the fetch, cache and parser layers.
//!
//! Every variant is surfaced to the caller immediately; nothing is retried or
//! swallowed inside the core except the best-effort site-status scrape in
//! [`crate::fetch`]. The boundary layer owns the mapping from these variants
//! to transport-level statuses and payloads, so each variant carries enough
//! context (URL, field name, offending value) to render a precise message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaError {
    /// The upstream returned a non-2xx transport status.
    #[error("unexpected status {code} fetching {url}")]
    StatusCode { url: String, code: u16 },

    /// The upstream served its "System Error" page in place of content.
    #[error("upstream system error page at {url}")]
    SystemError { url: String },

    /// The page is only available to registered users. This is a login
    /// failure, not a missing page.
    #[error("content at {url} requires a logged-in account")]
    LoginWall { url: String },

    /// The account that owns the requested page has voluntarily disabled
    /// access to it.
    #[error("account owning {url} has been voluntarily disabled")]
    AccountDisabled { url: String },

    /// The page rendered in a layout variant this parser has no extraction
    /// routine for.
    #[error("page style at {url} is not supported")]
    UnsupportedStyle { url: String },

    /// More than one of {page, next, prev} was supplied, or a mode of paging
    /// the listing does not support.
    #[error("invalid offset parameters: {message}")]
    OffsetCombination { message: String },

    /// A search parameter fell outside its allowed set.
    #[error("invalid value {value:?} for search parameter {field}; allowed: {allowed}")]
    SearchParam {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    /// The supplied login cookie did not match either accepted encoding.
    /// Permanent input error; never retried.
    #[error("login cookie must contain an 'a' and a 'b' token")]
    CookieFormat,

    /// A write action was submitted without a required form field.
    #[error("missing required field {field}")]
    MissingFormField { field: &'static str },

    /// An operation that needs a login cookie was invoked without one, or the
    /// supplied cookie no longer identifies a logged-in session.
    #[error("this operation requires a login cookie")]
    LoginRequired,

    /// The cache backend refused an entry for exceeding its size limit.
    #[error("cache entry for {key} exceeds the backend size limit")]
    CacheTooLarge { key: String },

    /// Any other cache backend failure.
    #[error("cache backend error: {message}")]
    CacheBackend { message: String },

    /// Transport-level failure before a status code was available.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A cached record failed to round-trip through JSON.
    #[error("cache serialization failed")]
    Json(#[from] serde_json::Error),
}

impl FaError {
    /// Whether the failure indicates a problem with the caller's credentials
    /// rather than with the requested content.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::LoginWall { .. } | Self::LoginRequired | Self::CookieFormat
        )
    }
}
