//! The notifications page for a logged-in account.
//!
//! Six categories on one page. The upstream keeps counting notifications
//! whose origin record has been deleted; those rows render without links.
//! They are surfaced as placeholder records only when the caller opts in —
//! otherwise they are dropped from the lists (but still reflected in the
//! per-category counts, which come from the raw rows).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::doc::{attr_of, handle_from_href, parse_posted_at, text_of};
use crate::error::FaError;
use crate::models::{
    CommentNotification, FavoriteNotification, JournalNotification, NotificationBundle,
    NotificationCounts, ShoutNotification, UserRef, WatchNotification,
};
use crate::style::Style;

use super::Page;

static CURRENT_USER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a#my-username").expect("Invalid selector"));
static ROW_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse("input[type=checkbox]").expect("Invalid selector"));
static USER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/user/"]"#).expect("Invalid selector"));
static VIEW_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/view/"]"#).expect("Invalid selector"));
static JOURNAL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/journal/"]"#).expect("Invalid selector"));
static AVATAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.avatar").expect("Invalid selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.popup_date").expect("Invalid selector"));

static WATCHES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#messages-watches li").expect("Invalid selector"));
static SUBMISSION_COMMENTS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("section#messages-submission-comments li").expect("Invalid selector")
});
static JOURNAL_COMMENTS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("section#messages-journal-comments li").expect("Invalid selector")
});
static SHOUTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#messages-shouts li").expect("Invalid selector"));
static FAVORITES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#messages-favorites li").expect("Invalid selector"));
static JOURNALS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#messages-journals li").expect("Invalid selector"));

const DELETED_WATCH: &str = "The watcher has since removed their watch or their account";
const DELETED_SUBMISSION_COMMENT: &str =
    "The comment or the submission it was left on has been removed";
const DELETED_JOURNAL_COMMENT: &str =
    "The comment or the journal it was left on has been removed";
const DELETED_SHOUT: &str = "The shout has been removed from your page";
const DELETED_FAVORITE: &str = "The favorite has since been removed by the user";
const DELETED_JOURNAL: &str = "The journal has been removed by its author";

pub struct NotificationsPage {
    /// Emit deleted-but-counted notifications as placeholder records.
    pub include_deleted: bool,
}

impl Page for NotificationsPage {
    type Output = NotificationBundle;

    fn path(&self) -> String {
        "/msg/others/".to_string()
    }

    fn cache_key(&self) -> String {
        format!("notifications:deleted={}", self.include_deleted)
    }

    fn login_required(&self) -> bool {
        true
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => self.extract_classic(doc).map(Some),
            _ => Ok(None),
        }
    }
}

/// Resolve the logged-in identity from the fixed profile-link marker.
///
/// The marker is absent when the cookie no longer identifies a session, so
/// this doubles as a cookie-validity check.
pub(crate) fn current_user(doc: &Html) -> Result<UserRef, FaError> {
    let link = doc
        .select(&CURRENT_USER)
        .next()
        .ok_or(FaError::LoginRequired)?;
    let profile = attr_of(link, "href").unwrap_or_default();
    Ok(UserRef {
        name: text_of(link),
        profile_name: handle_from_href(&profile),
        profile,
    })
}

struct Row<'a> {
    element: ElementRef<'a>,
    id: String,
    deleted: bool,
}

fn rows<'a>(doc: &'a Html, section: &Selector) -> Vec<Row<'a>> {
    doc.select(section)
        .map(|li| Row {
            id: li
                .select(&ROW_ID)
                .next()
                .and_then(|input| attr_of(input, "value"))
                .unwrap_or_default(),
            deleted: li
                .value()
                .attr("class")
                .is_some_and(|c| c.split_whitespace().any(|cl| cl == "deleted")),
            element: li,
        })
        .collect()
}

fn author_of(row: ElementRef<'_>) -> (String, String) {
    row.select(&USER_LINK)
        .next()
        .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
        .unwrap_or_default()
}

fn posted_of(row: ElementRef<'_>) -> String {
    row.select(&DATE)
        .next()
        .and_then(|span| attr_of(span, "title"))
        .unwrap_or_default()
}

fn target_of(row: ElementRef<'_>, link: &Selector) -> (String, String) {
    row.select(link)
        .next()
        .map(|a| {
            let href = attr_of(a, "href").unwrap_or_default();
            let id = href
                .trim_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or("")
                .to_string();
            (id, text_of(a))
        })
        .unwrap_or_default()
}

impl NotificationsPage {
    fn extract_classic(&self, doc: &Html) -> Result<NotificationBundle, FaError> {
        let current_user = current_user(doc)?;

        let watch_rows = rows(doc, &WATCHES);
        let submission_comment_rows = rows(doc, &SUBMISSION_COMMENTS);
        let journal_comment_rows = rows(doc, &JOURNAL_COMMENTS);
        let shout_rows = rows(doc, &SHOUTS);
        let favorite_rows = rows(doc, &FAVORITES);
        let journal_rows = rows(doc, &JOURNALS);

        let counts = NotificationCounts {
            watches: watch_rows.len() as u32,
            submission_comments: submission_comment_rows.len() as u32,
            journal_comments: journal_comment_rows.len() as u32,
            shouts: shout_rows.len() as u32,
            favorites: favorite_rows.len() as u32,
            journals: journal_rows.len() as u32,
        };

        let include = self.include_deleted;

        let watches = watch_rows
            .into_iter()
            .filter(|r| include || !r.deleted)
            .map(|r| {
                if r.deleted {
                    return WatchNotification {
                        deleted: true,
                        message: DELETED_WATCH.to_string(),
                        ..WatchNotification::default()
                    };
                }
                let (name, profile) = author_of(r.element);
                let posted = posted_of(r.element);
                WatchNotification {
                    watch_id: r.id,
                    profile_name: handle_from_href(&profile),
                    name,
                    profile,
                    avatar: r
                        .element
                        .select(&AVATAR)
                        .next()
                        .and_then(|img| attr_of(img, "src"))
                        .unwrap_or_default(),
                    posted_at: parse_posted_at(&posted),
                    posted,
                    deleted: false,
                    message: String::new(),
                }
            })
            .collect();

        let submission_comments = comment_list(
            submission_comment_rows,
            include,
            &VIEW_LINK,
            DELETED_SUBMISSION_COMMENT,
        );
        let journal_comments = comment_list(
            journal_comment_rows,
            include,
            &JOURNAL_LINK,
            DELETED_JOURNAL_COMMENT,
        );

        let shouts = shout_rows
            .into_iter()
            .filter(|r| include || !r.deleted)
            .map(|r| {
                if r.deleted {
                    return ShoutNotification {
                        deleted: true,
                        message: DELETED_SHOUT.to_string(),
                        ..ShoutNotification::default()
                    };
                }
                let (name, profile) = author_of(r.element);
                let posted = posted_of(r.element);
                ShoutNotification {
                    shout_id: r.id,
                    profile_name: handle_from_href(&profile),
                    name,
                    profile,
                    posted_at: parse_posted_at(&posted),
                    posted,
                    deleted: false,
                    message: String::new(),
                }
            })
            .collect();

        let favorites = favorite_rows
            .into_iter()
            .filter(|r| include || !r.deleted)
            .map(|r| {
                if r.deleted {
                    return FavoriteNotification {
                        deleted: true,
                        message: DELETED_FAVORITE.to_string(),
                        ..FavoriteNotification::default()
                    };
                }
                let (name, profile) = author_of(r.element);
                let (submission_id, title) = target_of(r.element, &VIEW_LINK);
                let posted = posted_of(r.element);
                FavoriteNotification {
                    fav_id: r.id,
                    profile_name: handle_from_href(&profile),
                    name,
                    profile,
                    submission_id,
                    title,
                    posted_at: parse_posted_at(&posted),
                    posted,
                    deleted: false,
                    message: String::new(),
                }
            })
            .collect();

        let journals = journal_rows
            .into_iter()
            .filter(|r| include || !r.deleted)
            .map(|r| {
                if r.deleted {
                    return JournalNotification {
                        deleted: true,
                        message: DELETED_JOURNAL.to_string(),
                        ..JournalNotification::default()
                    };
                }
                let (name, profile) = author_of(r.element);
                let (journal_id, title) = target_of(r.element, &JOURNAL_LINK);
                let posted = posted_of(r.element);
                JournalNotification {
                    journal_id,
                    title,
                    profile_name: handle_from_href(&profile),
                    name,
                    profile,
                    posted_at: parse_posted_at(&posted),
                    posted,
                    deleted: false,
                    message: String::new(),
                }
            })
            .collect();

        Ok(NotificationBundle {
            current_user,
            counts,
            watches,
            submission_comments,
            journal_comments,
            shouts,
            favorites,
            journals,
        })
    }
}

fn comment_list(
    rows: Vec<Row<'_>>,
    include_deleted: bool,
    target_link: &Selector,
    deleted_message: &str,
) -> Vec<CommentNotification> {
    rows.into_iter()
        .filter(|r| include_deleted || !r.deleted)
        .map(|r| {
            if r.deleted {
                return CommentNotification {
                    deleted: true,
                    message: deleted_message.to_string(),
                    ..CommentNotification::default()
                };
            }
            let (name, profile) = author_of(r.element);
            let (target_id, title) = target_of(r.element, target_link);
            let posted = posted_of(r.element);
            CommentNotification {
                comment_id: r.id,
                profile_name: handle_from_href(&profile),
                name,
                profile,
                target_id,
                title,
                posted_at: parse_posted_at(&posted),
                posted,
                deleted: false,
                message: String::new(),
            }
        })
        .collect()
}
