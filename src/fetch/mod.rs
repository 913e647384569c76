//! Authenticated page fetching against the upstream site.
//!
//! One GET per call, with the login cookie and any extra cookie fragment
//! assembled into the `Cookie` header. Responses are cached at the raw-HTML
//! layer keyed by (url, cookie, extra cookie); upstream failure pages are
//! detected inside the cache producer so they are never stored. As a side
//! effect of every successful fetch, the site-wide online-users footer is
//! scraped and stored under a fixed status key — best effort only, its
//! failure never propagates.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{COOKIE, USER_AGENT};
use scraper::Html;

use crate::auth::AuthContext;
use crate::cache::{Cache, TtlClass};
use crate::config::Config;
use crate::doc::{first, sel, text_of};
use crate::error::FaError;
use crate::metrics::MetricsSink;
use crate::models::SiteStatus;

/// `<title>` of the upstream's generic failure page.
const SYSTEM_ERROR_TITLE: &str = "System Error";
/// Body marker for pages behind the registration wall.
const LOGIN_WALL_MARKER: &str = "only available to registered users";
/// Body marker for accounts whose owners disabled access.
const ACCOUNT_DISABLED_MARKER: &str = "voluntarily disabled access to their account";

/// Cache key for the opportunistically scraped [`SiteStatus`].
pub const STATUS_KEY: &str = "status";

static ONLINE_STATS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ([\d,]+)\s+users?\s+online \s+\S+\s+
        ([\d,]+)\s+guests?,\s+
        ([\d,]+)\s+registered\s+and\s+
        ([\d,]+)\s+other",
    )
    .expect("Invalid regex")
});

static SERVER_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Server Time:\s*([^<\n]+)").expect("Invalid regex"));

/// Performs authenticated page fetches with raw-HTML caching.
pub struct Fetcher {
    client: reqwest::Client,
    metrics: Arc<dyn MetricsSink>,
    base_url: String,
    sfw_base_url: String,
    user_agent: String,
}

impl Fetcher {
    #[must_use]
    pub fn new(config: &Config, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            client: reqwest::Client::new(),
            metrics,
            base_url: config.base_url.clone(),
            sfw_base_url: config.sfw_base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Absolute URL for a site path, honoring the SFW host selection.
    #[must_use]
    pub fn url_for(&self, path: &str, auth: &AuthContext) -> String {
        let base = if auth.sfw {
            &self.sfw_base_url
        } else {
            &self.base_url
        };
        format!("{base}{path}")
    }

    /// Cache key of the raw HTML stored for one (url, identity, extra
    /// cookie) combination. Shared by [`Self::fetch`] and the write actions
    /// that invalidate stale pages.
    #[must_use]
    pub fn raw_cache_key(&self, url: &str, auth: &AuthContext, extra_cookie: Option<&str>) -> String {
        format!(
            "url:{url}:{}:{}",
            auth.cookie().unwrap_or(""),
            extra_cookie.unwrap_or("")
        )
    }

    /// Fetch one page as HTML.
    ///
    /// On a raw-cache hit no request is sent. Failure pages raise their typed
    /// error and are never cached.
    pub async fn fetch(
        &self,
        cache: &Cache,
        path: &str,
        auth: &AuthContext,
        extra_cookie: Option<&str>,
    ) -> Result<String, FaError> {
        let url = self.url_for(path, auth);
        let cookie_header = assemble_cookie(auth, extra_cookie);
        let raw_key = self.raw_cache_key(&url, auth, extra_cookie);

        let html = cache
            .get_or_set(&raw_key, TtlClass::Short, || {
                self.fetch_uncached(&url, cookie_header.as_deref())
            })
            .await?;

        if let Some(status) = scrape_site_status(&html) {
            // Best effort: a malformed footer or a full cache must not fail
            // the fetch that triggered the scrape.
            if let Err(e) = cache
                .get_or_set_json(STATUS_KEY, TtlClass::Short, || async { Ok(status) })
                .await
            {
                tracing::debug!("site status scrape not stored: {e}");
            }
        }

        Ok(html)
    }

    /// Fetch one page, bypassing the raw-HTML cache. Used by write actions
    /// whose GETs are not idempotent upstream.
    pub async fn fetch_fresh(&self, path: &str, auth: &AuthContext) -> Result<String, FaError> {
        let url = self.url_for(path, auth);
        let cookie_header = assemble_cookie(auth, None);
        self.fetch_uncached(&url, cookie_header.as_deref()).await
    }

    /// Submit a form POST. Never cached.
    pub async fn post_form(
        &self,
        path: &str,
        auth: &AuthContext,
        form: &[(&str, &str)],
    ) -> Result<String, FaError> {
        let url = self.url_for(path, auth);
        tracing::debug!(url, "posting upstream form");

        let mut request = self
            .client
            .post(&url)
            .header(USER_AGENT, &self.user_agent)
            .form(form);
        if let Some(cookie) = assemble_cookie(auth, None) {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|source| FaError::Http {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        self.metrics.upstream_fetch(&url, status.as_u16());
        if !status.is_success() {
            return Err(FaError::StatusCode {
                url,
                code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FaError::Http {
            url: url.clone(),
            source,
        })?;
        check_failure_page(&url, &body)?;
        Ok(body)
    }

    async fn fetch_uncached(&self, url: &str, cookie: Option<&str>) -> Result<String, FaError> {
        tracing::debug!(url, "fetching upstream page");

        let mut request = self.client.get(url).header(USER_AGENT, &self.user_agent);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|source| FaError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        self.metrics.upstream_fetch(url, status.as_u16());
        if !status.is_success() {
            return Err(FaError::StatusCode {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FaError::Http {
            url: url.to_string(),
            source,
        })?;

        check_failure_page(url, &body)?;
        Ok(body)
    }
}

/// Join the login cookie and any extra fragment into one header value.
fn assemble_cookie(auth: &AuthContext, extra: Option<&str>) -> Option<String> {
    match (auth.cookie(), extra) {
        (Some(cookie), Some(extra)) => Some(format!("{cookie}; {extra}")),
        (Some(cookie), None) => Some(cookie.to_string()),
        (None, Some(extra)) => Some(extra.to_string()),
        (None, None) => None,
    }
}

/// Detect the upstream's site-wide failure pages.
fn check_failure_page(url: &str, body: &str) -> Result<(), FaError> {
    if body.contains(ACCOUNT_DISABLED_MARKER) {
        return Err(FaError::AccountDisabled {
            url: url.to_string(),
        });
    }
    if body.contains(LOGIN_WALL_MARKER) {
        return Err(FaError::LoginWall {
            url: url.to_string(),
        });
    }

    let doc = Html::parse_document(body);
    let title = first(&doc, &sel("title")).map(text_of);
    if title.as_deref() == Some(SYSTEM_ERROR_TITLE) {
        return Err(FaError::SystemError {
            url: url.to_string(),
        });
    }
    Ok(())
}

/// Parse the online-users/server-time footer, if the page carries one.
#[must_use]
pub fn scrape_site_status(html: &str) -> Option<SiteStatus> {
    let caps = ONLINE_STATS.captures(html)?;
    let server_time = SERVER_TIME
        .captures(html)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    Some(SiteStatus {
        online_total: parse_count(&caps[1])?,
        online_guests: parse_count(&caps[2])?,
        online_registered: parse_count(&caps[3])?,
        online_other: parse_count(&caps[4])?,
        server_time,
    })
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}
