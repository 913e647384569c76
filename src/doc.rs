//! Small typed helpers over `scraper` used by every extraction routine.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parse a CSS selector known at compile time.
///
/// # Panics
///
/// Panics on an invalid selector; all call sites pass literals.
#[must_use]
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

/// First element matching `css`, if any.
#[must_use]
pub fn first<'a>(doc: &'a Html, css: &Selector) -> Option<ElementRef<'a>> {
    doc.select(css).next()
}

/// Concatenated, trimmed text content of an element.
#[must_use]
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("").trim().to_string()
}

/// Inner HTML of an element, trimmed. Used for author-authored fragments that
/// are passed through rather than parsed.
#[must_use]
pub fn html_of(element: ElementRef<'_>) -> String {
    element.inner_html().trim().to_string()
}

/// Trimmed attribute value, if present and non-empty.
#[must_use]
pub fn attr_of(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Last path segment of a profile link, e.g. `/user/foxpainter/` → `foxpainter`.
#[must_use]
pub fn handle_from_href(href: &str) -> String {
    href.trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(st|nd|rd|th)").expect("Invalid regex"));

/// Parse the site's human-readable timestamp ("Aug 29th, 2026 01:05 PM") into
/// UTC. The site renders server-local time; we treat it as UTC, matching the
/// `posted`/`posted_at` field pair contract.
#[must_use]
pub fn parse_posted_at(posted: &str) -> Option<DateTime<Utc>> {
    let cleaned = ORDINAL_SUFFIX.replace_all(posted.trim(), "$1");
    NaiveDateTime::parse_from_str(&cleaned, "%b %e, %Y %I:%M %p")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Scan a free-text block for a `Label: value` line.
///
/// Tolerates two layouts: the value inline after the colon, or `Label:` alone
/// on its line with the value on the next non-empty line. These blocks are
/// author-authored HTML fragments, so this is deliberately string scanning
/// rather than markup parsing.
#[must_use]
pub fn scan_label(text: &str, label: &str) -> Option<String> {
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(label) else {
            continue;
        };
        let Some(rest) = rest.trim_start().strip_prefix(':') else {
            continue;
        };
        let inline = rest.trim();
        if !inline.is_empty() {
            return Some(inline.to_string());
        }
        // Label on its own line; value follows.
        for next in lines.by_ref() {
            let next = next.trim();
            if !next.is_empty() {
                return Some(next.to_string());
            }
        }
        return None;
    }
    None
}
