//! Shouts left on a user's profile page.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::doc::{attr_of, handle_from_href, html_of, parse_posted_at, text_of};
use crate::error::FaError;
use crate::models::Shout;
use crate::style::Style;

use super::Page;

static SHOUT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.shout").expect("Invalid selector"));
static USER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/user/"]"#).expect("Invalid selector"));
static AVATAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.avatar").expect("Invalid selector"));
static TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.shout-text").expect("Invalid selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.popup_date").expect("Invalid selector"));

/// The shout column of a user's profile page.
pub struct ShoutsPage {
    pub user: String,
}

impl Page for ShoutsPage {
    type Output = Vec<Shout>;

    fn path(&self) -> String {
        format!("/user/{}/", self.user)
    }

    fn cache_key(&self) -> String {
        format!("shouts:{}", self.user)
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(doc.select(&SHOUT).map(shout_from_element).collect())),
            _ => Ok(None),
        }
    }
}

fn shout_from_element(shout: ElementRef<'_>) -> Shout {
    let id = attr_of(shout, "id")
        .and_then(|id| id.strip_prefix("shout-").map(ToString::to_string))
        .unwrap_or_default();
    let (name, profile) = shout
        .select(&USER_LINK)
        .next()
        .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
        .unwrap_or_default();
    let posted = shout
        .select(&DATE)
        .next()
        .and_then(|span| attr_of(span, "title"))
        .unwrap_or_default();

    Shout {
        id,
        profile_name: handle_from_href(&profile),
        name,
        profile,
        avatar: shout
            .select(&AVATAR)
            .next()
            .and_then(|img| attr_of(img, "src"))
            .unwrap_or_default(),
        posted_at: parse_posted_at(&posted),
        posted,
        text: shout.select(&TEXT).next().map(html_of).unwrap_or_default(),
    }
}
