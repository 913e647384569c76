//! Write actions against the upstream site.
//!
//! Both actions require a login cookie and invalidate the cache entries they
//! make stale, so the next read reflects the change instead of serving the
//! pre-action record.

use crate::auth::AuthContext;
use crate::client::FaClient;
use crate::error::FaError;
use crate::models::{Journal, Submission};
use crate::pages::{self, JournalPage, SubmissionPage};

/// Flip the viewer's favorite state on a submission and return the refreshed
/// detail record.
///
/// The one-time toggle key is read from the cached detail page, so the flip
/// targets the state the viewer last saw. After the toggle, both the typed
/// record and the raw HTML under it are dropped before the re-read.
pub async fn toggle_favorite(
    client: &FaClient,
    submission_id: &str,
    auth: &AuthContext,
) -> Result<Submission, FaError> {
    if !auth.is_logged_in() {
        return Err(FaError::LoginRequired);
    }

    let page = SubmissionPage {
        id: submission_id.to_string(),
    };
    let before = pages::get_result(client, &page, auth).await?;
    let (Some(faved), Some(key)) = (before.fav_status, before.fav_key.as_deref()) else {
        // No fav controls on the page means the cookie no longer identifies
        // a session.
        return Err(FaError::LoginRequired);
    };

    let action = if faved { "unfav" } else { "fav" };
    let toggle_path = format!("/{action}/{submission_id}/?key={key}");
    client.fetcher.fetch_fresh(&toggle_path, auth).await?;

    invalidate_page(client, &page, auth).await?;
    pages::get_result(client, &page, auth).await
}

/// Post a new journal and return its parsed record.
///
/// Upstream redirects to the new journal after a successful post; its id is
/// taken from the response's canonical journal link.
pub async fn post_journal(
    client: &FaClient,
    title: &str,
    description: &str,
    auth: &AuthContext,
) -> Result<Journal, FaError> {
    if !auth.is_logged_in() {
        return Err(FaError::LoginRequired);
    }
    if title.trim().is_empty() {
        return Err(FaError::MissingFormField { field: "title" });
    }
    if description.trim().is_empty() {
        return Err(FaError::MissingFormField {
            field: "description",
        });
    }

    let body = client
        .fetcher
        .post_form(
            "/controls/journal/",
            auth,
            &[
                ("do", "update"),
                ("subject", title),
                ("message", description),
            ],
        )
        .await?;

    let journal_id = journal_id_from_response(&body).ok_or_else(|| FaError::SystemError {
        url: client.fetcher.url_for("/controls/journal/", auth),
    })?;

    let page = JournalPage { id: journal_id };
    pages::get_result(client, &page, auth).await
}

/// Drop a page's typed record and the raw HTML it was parsed from.
async fn invalidate_page<P: pages::Page>(
    client: &FaClient,
    page: &P,
    auth: &AuthContext,
) -> Result<(), FaError> {
    client
        .cache
        .delete(&pages::result_cache_key(page, auth))
        .await?;

    let url = client.fetcher.url_for(&page.path(), auth);
    let raw_key = client
        .fetcher
        .raw_cache_key(&url, auth, page.extra_cookie().as_deref());
    client.cache.delete(&raw_key).await
}

/// Pull the new journal's id out of the post-redirect page.
fn journal_id_from_response(body: &str) -> Option<String> {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static JOURNAL_LINK: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"/journal/(\d+)/").expect("Invalid regex"));

    JOURNAL_LINK
        .captures(body)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_actions_require_login() {
        let client = FaClient::with_defaults(crate::config::Config::for_testing());
        let anon = AuthContext::anonymous(false);

        assert!(matches!(
            toggle_favorite(&client, "12345", &anon).await,
            Err(FaError::LoginRequired)
        ));
        assert!(matches!(
            post_journal(&client, "Title", "Body", &anon).await,
            Err(FaError::LoginRequired)
        ));
    }

    #[tokio::test]
    async fn test_post_journal_validates_fields() {
        let client = FaClient::with_defaults(crate::config::Config::for_testing());
        let auth = AuthContext::from_cookie_string(
            "a=0b2d9916-7f0c-42d2-b8ed-bbc28c1d62f4; b=cb8fbe67-3514-4d86-9b4d-8a2f8c59e2bf",
            false,
        )
        .unwrap();

        assert!(matches!(
            post_journal(&client, "  ", "Body", &auth).await,
            Err(FaError::MissingFormField { field: "title" })
        ));
        assert!(matches!(
            post_journal(&client, "Title", "", &auth).await,
            Err(FaError::MissingFormField {
                field: "description"
            })
        ));
    }

    #[test]
    fn test_journal_id_from_response() {
        let body = r#"<html><body><a href="/journal/9002/">View your journal</a></body></html>"#;
        assert_eq!(journal_id_from_response(body).as_deref(), Some("9002"));
        assert_eq!(journal_id_from_response("<html></html>"), None);
    }
}
