//! Watch lists: who a user watches, and who watches them.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::doc::text_of;
use crate::error::FaError;
use crate::style::Style;

use super::Page;

static WATCH_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div.watch-list a[href^="/user/"]"#).expect("Invalid selector")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchListDirection {
    /// Accounts this user watches.
    Watching,
    /// Accounts watching this user.
    WatchedBy,
}

impl WatchListDirection {
    fn path_segment(self) -> &'static str {
        match self {
            Self::Watching => "by",
            Self::WatchedBy => "to",
        }
    }
}

/// Page-numbered name list.
pub struct WatchListPage {
    pub user: String,
    pub direction: WatchListDirection,
    pub page: u32,
}

impl Page for WatchListPage {
    type Output = Vec<String>;

    fn path(&self) -> String {
        format!(
            "/watchlist/{}/{}/{}/",
            self.direction.path_segment(),
            self.user,
            self.page
        )
    }

    fn cache_key(&self) -> String {
        format!(
            "watchlist:{}:{}:{}",
            self.direction.path_segment(),
            self.user,
            self.page
        )
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(doc.select(&WATCH_LINK).map(text_of).collect())),
            _ => Ok(None),
        }
    }
}
