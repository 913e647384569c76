//! The site front page: four recent-submission sections.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::FaError;
use crate::models::Home;
use crate::style::Style;

use super::listing::submissions_in;
use super::Page;

static ARTWORK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#frontpage-artwork").expect("Invalid selector"));
static WRITING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#frontpage-writing").expect("Invalid selector"));
static MUSIC: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#frontpage-music").expect("Invalid selector"));
static CRAFTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#frontpage-crafts").expect("Invalid selector"));

pub struct HomePage;

impl Page for HomePage {
    type Output = Home;

    fn path(&self) -> String {
        "/".to_string()
    }

    fn cache_key(&self) -> String {
        "home".to_string()
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(Home {
                artwork: submissions_in(doc, &ARTWORK),
                writing: submissions_in(doc, &WRITING),
                music: submissions_in(doc, &MUSIC),
                crafts: submissions_in(doc, &CRAFTS),
            })),
            _ => Ok(None),
        }
    }
}
