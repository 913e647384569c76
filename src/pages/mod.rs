//! The per-page-type parser family.
//!
//! Each page type implements [`Page`]: a request path, a cache key, an
//! optional extra cookie fragment, a login-required flag, and one extraction
//! routine per layout style. The shared [`get_result`] orchestration owns the
//! login gate, the identity-scoped cache key, the fetch, style detection, and
//! dispatch — parsers only translate DOM into typed records.

pub mod comments;
pub mod gallery;
pub mod home;
pub mod journal;
pub mod journals;
mod listing;
pub mod new_submissions;
pub mod notes;
pub mod notifications;
pub mod search;
pub mod shouts;
pub mod submission;
pub mod user;
pub mod watchlist;

pub use comments::{CommentsPage, CommentsSource};
pub use gallery::{GalleryFolder, GalleryOffset, GalleryPage};
pub use home::HomePage;
pub use journal::JournalPage;
pub use journals::JournalsPage;
pub use new_submissions::NewSubmissionsPage;
pub use notes::{NoteFolder, NotePage, NotesPage};
pub use notifications::NotificationsPage;
pub use search::{SearchPage, SearchParams};
pub use shouts::ShoutsPage;
pub use submission::SubmissionPage;
pub use user::UserPage;
pub use watchlist::{WatchListDirection, WatchListPage};

use scraper::Html;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::AuthContext;
use crate::cache::TtlClass;
use crate::client::FaClient;
use crate::error::FaError;
use crate::style::{self, Style};

/// One page type's parsing strategy.
pub trait Page: Send + Sync {
    /// The typed record this page produces.
    type Output: Serialize + DeserializeOwned + Send;

    /// Site-relative request path.
    fn path(&self) -> String;

    /// Cache key encoding the page type and all its parameters. The SFW flag
    /// and login-cookie namespace are appended by [`get_result`].
    fn cache_key(&self) -> String;

    /// Extra cookie fragment sent alongside the login cookie.
    fn extra_cookie(&self) -> Option<String> {
        None
    }

    /// Whether this page is meaningless without a login cookie.
    fn login_required(&self) -> bool {
        false
    }

    fn ttl_class(&self) -> TtlClass {
        TtlClass::Short
    }

    /// Parameter validation run before any cache or network activity.
    fn validate(&self) -> Result<(), FaError> {
        Ok(())
    }

    /// Extraction routine dispatch. `Ok(None)` means this parser has no
    /// routine for the detected style.
    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError>;
}

/// Full cache key for a page's typed record under one identity.
///
/// Single source of the key format: reads go through it in [`get_result`],
/// and write actions use it to invalidate the entries they make stale.
#[must_use]
pub fn result_cache_key<P: Page>(page: &P, auth: &AuthContext) -> String {
    format!(
        "{}{}:sfw={}",
        auth.cache_namespace(),
        page.cache_key(),
        u8::from(auth.sfw)
    )
}

/// Resolve a page request to its typed record, through the cache.
///
/// Order of operations matters and is part of the contract:
/// 1. the login gate and parameter validation run before any cache lookup or
///    network activity;
/// 2. the cache key is namespaced by the login cookie when one is present and
///    always carries the SFW flag, so identities and content filters never
///    share entries;
/// 3. on a cache miss, fetch → detect style → dispatch; an extraction routine
///    returning nothing raises the unsupported-style error.
pub async fn get_result<P: Page>(
    client: &FaClient,
    page: &P,
    auth: &AuthContext,
) -> Result<P::Output, FaError> {
    if page.login_required() && !auth.is_logged_in() {
        return Err(FaError::LoginRequired);
    }
    page.validate()?;

    let key = result_cache_key(page, auth);
    let path = page.path();
    let extra_cookie = page.extra_cookie();
    let url = client.fetcher.url_for(&path, auth);

    client
        .cache
        .get_or_set_json(&key, page.ttl_class(), || async move {
            let html = client
                .fetcher
                .fetch(&client.cache, &path, auth, extra_cookie.as_deref())
                .await?;
            let doc = Html::parse_document(&html);
            let style = style::detect(&doc);
            match page.extract(style, &doc)? {
                Some(output) => Ok(output),
                None => Err(FaError::UnsupportedStyle { url }),
            }
        })
        .await
}
