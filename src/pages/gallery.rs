//! Gallery, scraps and favorites listings for one user.
//!
//! Gallery and scraps page by number. Favorites lost page-numbered access
//! upstream and page instead by favorite-id cursor: `next` walks older
//! entries from a previous page's last id, `prev` walks back. Supplying an
//! offset mode the folder doesn't support is a typed error raised before any
//! fetch.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::cache::TtlClass;
use crate::error::FaError;
use crate::models::Submission;
use crate::style::Style;

use super::listing::submissions_in;
use super::Page;

static GALLERY_SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section.gallery").expect("Invalid selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryFolder {
    Gallery,
    Scraps,
    Favorites,
}

impl GalleryFolder {
    fn as_str(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Scraps => "scraps",
            Self::Favorites => "favorites",
        }
    }
}

/// At most one of the three fields may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryOffset {
    /// 1-based page number (gallery and scraps only).
    pub page: Option<u32>,
    /// Favorite-id cursor: entries older than this id (favorites only).
    pub next: Option<String>,
    /// Favorite-id cursor: entries newer than this id (favorites only).
    pub prev: Option<String>,
}

impl GalleryOffset {
    fn supplied(&self) -> usize {
        usize::from(self.page.is_some())
            + usize::from(self.next.is_some())
            + usize::from(self.prev.is_some())
    }
}

pub struct GalleryPage {
    pub user: String,
    pub folder: GalleryFolder,
    pub offset: GalleryOffset,
    /// Set for `.rss`-style feed consumers; selects the long TTL class.
    pub for_feed: bool,
}

impl Page for GalleryPage {
    type Output = Vec<Submission>;

    fn path(&self) -> String {
        let user = &self.user;
        match self.folder {
            GalleryFolder::Gallery | GalleryFolder::Scraps => {
                let page = self.offset.page.unwrap_or(1);
                format!("/{}/{user}/{page}/", self.folder.as_str())
            }
            GalleryFolder::Favorites => match (&self.offset.next, &self.offset.prev) {
                (Some(next), _) => format!("/favorites/{user}/{next}/next/"),
                (_, Some(prev)) => format!("/favorites/{user}/{prev}/prev/"),
                _ => format!("/favorites/{user}/"),
            },
        }
    }

    // The feed flag selects the TTL class, so it must scope the entry too:
    // a feed read must never pin staleness onto ordinary readers.
    fn cache_key(&self) -> String {
        format!(
            "gallery:{}:{}:p={}:n={}:v={}:feed={}",
            self.folder.as_str(),
            self.user,
            self.offset.page.map(|p| p.to_string()).unwrap_or_default(),
            self.offset.next.clone().unwrap_or_default(),
            self.offset.prev.clone().unwrap_or_default(),
            self.for_feed,
        )
    }

    fn ttl_class(&self) -> TtlClass {
        if self.for_feed {
            TtlClass::Long
        } else {
            TtlClass::Short
        }
    }

    fn validate(&self) -> Result<(), FaError> {
        if self.offset.supplied() > 1 {
            return Err(FaError::OffsetCombination {
                message: "at most one of page, next and prev may be supplied".to_string(),
            });
        }
        match self.folder {
            GalleryFolder::Favorites => {
                if self.offset.page.is_some() {
                    return Err(FaError::OffsetCombination {
                        message: "favorites no longer supports page-numbered offsets; use next or prev"
                            .to_string(),
                    });
                }
            }
            GalleryFolder::Gallery | GalleryFolder::Scraps => {
                if self.offset.next.is_some() || self.offset.prev.is_some() {
                    return Err(FaError::OffsetCombination {
                        message: "next and prev cursors apply only to favorites".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(submissions_in(doc, &GALLERY_SECTION))),
            _ => Ok(None),
        }
    }
}
