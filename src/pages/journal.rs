//! Single journal pages.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::doc::{attr_of, handle_from_href, html_of, parse_posted_at, text_of};
use crate::error::FaError;
use crate::models::Journal;
use crate::style::Style;

use super::Page;

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-view h2.journal-title").expect("Invalid selector"));
static HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-view div.journal-header").expect("Invalid selector"));
static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-view div.journal-body").expect("Invalid selector"));
static FOOTER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-view div.journal-footer").expect("Invalid selector"));
static AUTHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.journal-author").expect("Invalid selector"));
static AVATAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-view img.avatar").expect("Invalid selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.journal-view span.popup_date").expect("Invalid selector"));

/// One journal by id.
pub struct JournalPage {
    pub id: String,
}

impl Page for JournalPage {
    type Output = Journal;

    fn path(&self) -> String {
        format!("/journal/{}/", self.id)
    }

    fn cache_key(&self) -> String {
        format!("journal:{}", self.id)
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(self.extract_classic(doc))),
            _ => Ok(None),
        }
    }
}

impl JournalPage {
    fn extract_classic(&self, doc: &Html) -> Journal {
        let (name, profile) = doc
            .select(&AUTHOR)
            .next()
            .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
            .unwrap_or_default();
        let posted = doc
            .select(&DATE)
            .next()
            .and_then(|span| attr_of(span, "title"))
            .unwrap_or_default();

        Journal {
            id: self.id.clone(),
            title: doc.select(&TITLE).next().map(text_of).unwrap_or_default(),
            journal_header: doc.select(&HEADER).next().map(html_of),
            journal_body: doc.select(&BODY).next().map(html_of).unwrap_or_default(),
            journal_footer: doc.select(&FOOTER).next().map(html_of),
            profile_name: handle_from_href(&profile),
            name,
            profile,
            avatar: doc
                .select(&AVATAR)
                .next()
                .and_then(|img| attr_of(img, "src"))
                .unwrap_or_default(),
            link: self.path(),
            posted_at: parse_posted_at(&posted),
            posted,
        }
    }
}
