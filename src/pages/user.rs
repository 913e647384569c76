//! User profile pages.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::doc::{attr_of, handle_from_href, html_of, parse_posted_at, scan_label, text_of};
use crate::error::FaError;
use crate::models::{Profile, Submission, UserRef, WatchSummary};
use crate::style::Style;

use super::listing::submission_from_figure;
use super::Page;

static NAME_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div.profile-name a[href^="/user/"]"#).expect("Invalid selector")
});
static AVATAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#profile-header img.avatar").expect("Invalid selector"));
static STATS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.profile-stats").expect("Invalid selector"));
static DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.profile-description").expect("Invalid selector"));
static FEATURED: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.featured-submission figure").expect("Invalid selector"));
static PROFILE_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.profile-id figure").expect("Invalid selector"));
static ARTIST_INFO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.artist-info").expect("Invalid selector"));
static CONTACT_INFO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.contact-info").expect("Invalid selector"));
static WATCHERS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.watchers").expect("Invalid selector"));
static WATCHING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.watching").expect("Invalid selector"));
static COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.count").expect("Invalid selector"));
static USER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/user/"]"#).expect("Invalid selector"));

/// Profile page for one user.
pub struct UserPage {
    pub user: String,
}

impl Page for UserPage {
    type Output = Profile;

    fn path(&self) -> String {
        format!("/user/{}/", self.user)
    }

    fn cache_key(&self) -> String {
        format!("user:{}", self.user)
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(extract_classic(doc))),
            _ => Ok(None),
        }
    }
}

/// Scan every `Key: value` line of a free-text block into a map.
///
/// The blocks are author-authored fragments; line scanning is the accepted
/// approach, not markup parsing.
fn scan_all_labels(text: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || key.len() > 40 || value.is_empty() {
            continue;
        }
        labels.insert(key.to_string(), value.to_string());
    }
    labels
}

fn watch_summary(scope: ElementRef<'_>) -> WatchSummary {
    let count = scope
        .select(&COUNT)
        .next()
        .map(text_of)
        .and_then(|c| c.replace(',', "").parse().ok())
        .unwrap_or(0);
    let recent = scope
        .select(&USER_LINK)
        .map(|a| {
            let profile = attr_of(a, "href").unwrap_or_default();
            UserRef {
                name: text_of(a),
                profile_name: handle_from_href(&profile),
                profile,
            }
        })
        .collect();
    WatchSummary { count, recent }
}

fn pseudo_submission(doc: &Html, selector: &Selector) -> Option<Submission> {
    doc.select(selector).next().map(submission_from_figure)
}

fn extract_classic(doc: &Html) -> Profile {
    let (name, profile) = doc
        .select(&NAME_LINK)
        .next()
        .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
        .unwrap_or_default();
    let avatar = doc
        .select(&AVATAR)
        .next()
        .and_then(|img| attr_of(img, "src"))
        .unwrap_or_default();

    let stats = doc.select(&STATS).next().map(text_of).unwrap_or_default();
    let registered_since = scan_label(&stats, "Registered Since").unwrap_or_default();

    Profile {
        profile_name: handle_from_href(&profile),
        name,
        profile,
        avatar,
        artist_type: scan_label(&stats, "Artist Type").unwrap_or_default(),
        registered_at: parse_posted_at(&registered_since),
        registered_since,
        current_mood: scan_label(&stats, "Current Mood").unwrap_or_default(),
        profile_html: doc.select(&DESCRIPTION).next().map(html_of).unwrap_or_default(),
        featured_submission: pseudo_submission(doc, &FEATURED),
        profile_id: pseudo_submission(doc, &PROFILE_ID),
        artist_information: doc
            .select(&ARTIST_INFO)
            .next()
            .map(|el| scan_all_labels(&text_of(el)))
            .unwrap_or_default(),
        contact_information: doc
            .select(&CONTACT_INFO)
            .next()
            .map(|el| scan_all_labels(&text_of(el)))
            .unwrap_or_default(),
        watchers: doc
            .select(&WATCHERS)
            .next()
            .map(watch_summary)
            .unwrap_or_default(),
        watching: doc
            .select(&WATCHING)
            .next()
            .map(watch_summary)
            .unwrap_or_default(),
    }
}
