//! Page layout detection.
//!
//! The upstream site serves one of two theme families depending on the
//! viewing account's settings; each renders the same data under different
//! markup. The theme is visible in the stylesheet link, so parsers pick their
//! extraction routine from it. A routine missing for the detected style is an
//! [`FaError::UnsupportedStyle`](crate::error::FaError::UnsupportedStyle) at
//! dispatch time — intentionally, since only the classic theme is currently
//! exercised.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static STYLESHEET: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="stylesheet"]"#).expect("Invalid selector"));

/// Closed set of layout variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Classic,
    Beta,
    Unknown,
}

/// Classify a fetched page by its stylesheet path.
#[must_use]
pub fn detect(doc: &Html) -> Style {
    for link in doc.select(&STYLESHEET) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if href.contains("/themes/classic/") {
            return Style::Classic;
        }
        if href.contains("/themes/beta/") {
            return Style::Beta;
        }
    }
    Style::Unknown
}
