//! Journal listings for one user.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::cache::TtlClass;
use crate::doc::{attr_of, html_of, parse_posted_at, text_of};
use crate::error::FaError;
use crate::models::JournalEntry;
use crate::style::Style;

use super::Page;

static ENTRY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-entry").expect("Invalid selector"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a.journal-title[href^="/journal/"]"#).expect("Invalid selector")
});
static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-body").expect("Invalid selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.popup_date").expect("Invalid selector"));

/// Page-numbered journal list for a user.
pub struct JournalsPage {
    pub user: String,
    pub page: u32,
    /// Set for `.rss`-style feed consumers; selects the long TTL class.
    pub for_feed: bool,
}

impl Page for JournalsPage {
    type Output = Vec<JournalEntry>;

    fn path(&self) -> String {
        format!("/journals/{}/{}/", self.user, self.page)
    }

    fn cache_key(&self) -> String {
        format!("journals:{}:{}:feed={}", self.user, self.page, self.for_feed)
    }

    fn ttl_class(&self) -> TtlClass {
        if self.for_feed {
            TtlClass::Long
        } else {
            TtlClass::Short
        }
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(doc.select(&ENTRY).map(entry_from_element).collect())),
            _ => Ok(None),
        }
    }
}

fn entry_from_element(entry: ElementRef<'_>) -> JournalEntry {
    let (id, title, link) = entry
        .select(&TITLE_LINK)
        .next()
        .map(|a| {
            let link = attr_of(a, "href").unwrap_or_default();
            let id = link
                .trim_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or("")
                .to_string();
            (id, text_of(a), link)
        })
        .unwrap_or_default();
    let posted = entry
        .select(&DATE)
        .next()
        .and_then(|span| attr_of(span, "title"))
        .unwrap_or_default();

    JournalEntry {
        id,
        title,
        description: entry.select(&BODY).next().map(html_of).unwrap_or_default(),
        link,
        posted_at: parse_posted_at(&posted),
        posted,
    }
}
