//! The new-submissions inbox for a logged-in account.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::FaError;
use crate::models::NewSubmissions;
use crate::style::Style;

use super::listing::submissions_in;
use super::notifications::current_user;
use super::Page;

static SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#messages-submissions").expect("Invalid selector"));

/// The inbox of submissions from watched accounts.
///
/// Pagination is a cursor, not a page number: `from` is the highest
/// submission id to show, taken from the last row of the previous page.
pub struct NewSubmissionsPage {
    pub from: Option<u64>,
}

impl Page for NewSubmissionsPage {
    type Output = NewSubmissions;

    fn path(&self) -> String {
        match self.from {
            Some(from) => format!("/msg/submissions/new~{from}@72/"),
            None => "/msg/submissions/new@72/".to_string(),
        }
    }

    fn cache_key(&self) -> String {
        match self.from {
            Some(from) => format!("new_submissions:{from}"),
            None => "new_submissions:latest".to_string(),
        }
    }

    fn login_required(&self) -> bool {
        true
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(NewSubmissions {
                current_user: current_user(doc)?,
                new_submissions: submissions_in(doc, &SECTION),
            })),
            _ => Ok(None),
        }
    }
}
