//! Comment threads for submissions and journals.
//!
//! The upstream renders a thread as a flat list of comment tables whose
//! `width` attribute encodes indentation: narrower tables sit deeper in the
//! thread. Reconstruction walks the list once with a stack of `(id, width)`
//! pairs, annotating each comment with its parent id and nesting depth.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::cache::TtlClass;
use crate::doc::{attr_of, handle_from_href, html_of, parse_posted_at, text_of};
use crate::error::FaError;
use crate::models::Comment;
use crate::style::Style;

use super::Page;

static COMMENT_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.container-comment").expect("Invalid selector"));
static USERNAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.comment-username").expect("Invalid selector"));
static AVATAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.comment-avatar").expect("Invalid selector"));
static TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.comment-text").expect("Invalid selector"));
static HIDDEN_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.comment-deleted").expect("Invalid selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.popup_date").expect("Invalid selector"));

/// What the thread hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentsSource {
    Submission(String),
    Journal(String),
}

/// Comment thread for one submission or journal.
pub struct CommentsPage {
    pub source: CommentsSource,
    /// Emit hidden/deleted comments as placeholder records. When false they
    /// are dropped from the output but still occupy their position in the
    /// nesting computation.
    pub include_hidden: bool,
}

impl Page for CommentsPage {
    type Output = Vec<Comment>;

    fn path(&self) -> String {
        match &self.source {
            CommentsSource::Submission(id) => format!("/view/{id}/"),
            CommentsSource::Journal(id) => format!("/journal/{id}/"),
        }
    }

    fn cache_key(&self) -> String {
        let (kind, id) = match &self.source {
            CommentsSource::Submission(id) => ("submission", id),
            CommentsSource::Journal(id) => ("journal", id),
        };
        format!("comments:{kind}:{id}:hidden={}", self.include_hidden)
    }

    fn ttl_class(&self) -> TtlClass {
        TtlClass::Short
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(extract_classic(doc, self.include_hidden))),
            _ => Ok(None),
        }
    }
}

struct RawComment {
    comment: Comment,
    width: u32,
    hidden: bool,
}

fn parse_width(table: ElementRef<'_>) -> u32 {
    attr_of(table, "width")
        .and_then(|w| w.trim_end_matches('%').parse().ok())
        .unwrap_or(100)
}

fn parse_comment_table(table: ElementRef<'_>) -> RawComment {
    let width = parse_width(table);
    let id = attr_of(table, "id")
        .and_then(|id| id.strip_prefix("cid:").map(ToString::to_string));

    let Some(id) = id else {
        // Hidden or deleted: no id, no author, placeholder text only.
        let text = table
            .select(&HIDDEN_TEXT)
            .next()
            .map(text_of)
            .unwrap_or_else(|| "Comment hidden by its owner".to_string());
        return RawComment {
            comment: Comment {
                text,
                is_deleted: true,
                ..Comment::default()
            },
            width,
            hidden: true,
        };
    };

    let (name, profile) = table
        .select(&USERNAME)
        .next()
        .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
        .unwrap_or_default();
    let avatar = table
        .select(&AVATAR)
        .next()
        .and_then(|img| attr_of(img, "src"))
        .unwrap_or_default();
    let text = table.select(&TEXT).next().map(html_of).unwrap_or_default();
    let posted = table
        .select(&DATE)
        .next()
        .and_then(|span| attr_of(span, "title"))
        .unwrap_or_default();

    RawComment {
        comment: Comment {
            id,
            name,
            profile_name: handle_from_href(&profile),
            profile,
            avatar,
            text,
            posted_at: parse_posted_at(&posted),
            posted,
            ..Comment::default()
        },
        width,
        hidden: false,
    }
}

/// Annotate a flat width-coded sequence with `(reply_to, reply_level)`.
///
/// For each entry the stack is popped while its top has width less than or
/// equal to the current width — a comment cannot be a reply to something at
/// an equal-or-shallower level. The resulting stack depth is the nesting
/// level and the surviving top is the parent. Every entry is pushed
/// afterwards, hidden ones included: replies to a hidden comment must still
/// land in the right place.
fn thread_positions(entries: &[(String, u32)]) -> Vec<(String, u32)> {
    let mut stack: Vec<(String, u32)> = Vec::new();
    let mut positions = Vec::with_capacity(entries.len());

    for (id, width) in entries {
        while stack.last().is_some_and(|(_, top)| top <= width) {
            stack.pop();
        }
        let reply_level = stack.len() as u32;
        let reply_to = stack.last().map(|(id, _)| id.clone()).unwrap_or_default();
        positions.push((reply_to, reply_level));
        stack.push((id.clone(), *width));
    }

    positions
}

fn extract_classic(doc: &Html, include_hidden: bool) -> Vec<Comment> {
    let raw: Vec<RawComment> = doc.select(&COMMENT_TABLE).map(parse_comment_table).collect();

    let entries: Vec<(String, u32)> = raw
        .iter()
        .map(|r| (r.comment.id.clone(), r.width))
        .collect();
    let positions = thread_positions(&entries);

    raw.into_iter()
        .zip(positions)
        .filter(|(r, _)| include_hidden || !r.hidden)
        .map(|(r, (reply_to, reply_level))| Comment {
            reply_to,
            reply_level,
            ..r.comment
        })
        .collect()
}
