//! Notes (private messages): folder listings and single opened notes.
//!
//! Folder selection is not part of the URL; the upstream reads it from a
//! `folder=` cookie sent alongside the login cookie. A single note's body
//! carries the quoted ancestor chain inline, separated by dash rules; the
//! parser splits that chain back out into structured records.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::doc::{attr_of, handle_from_href, parse_posted_at, text_of};
use crate::error::FaError;
use crate::models::{Note, NoteThread, PrecedingNote};
use crate::style::Style;

use super::Page;

static ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table#notes tr.note").expect("Invalid selector"));
static NOTE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/viewmessage/"]"#).expect("Invalid selector"));
static USER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/user/"]"#).expect("Invalid selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.popup_date").expect("Invalid selector"));

static VIEW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.note-view").expect("Invalid selector"));
static SUBJECT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.note-subject").expect("Invalid selector"));
static TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.note-text").expect("Invalid selector"));

/// Dash rule separating a note's own text from each quoted ancestor.
static DASH_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{5,}").expect("Invalid regex"));
/// Ancestor header at the top of a quoted segment.
static WROTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*(\S+)\s+wrote:\s*(.*)$").expect("Invalid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFolder {
    Inbox,
    Outbox,
    Unread,
    Archive,
    Trash,
    HighPriority,
    MediumPriority,
    LowPriority,
}

impl NoteFolder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Outbox => "outbox",
            Self::Unread => "unread",
            Self::Archive => "archive",
            Self::Trash => "trash",
            Self::HighPriority => "high",
            Self::MediumPriority => "medium",
            Self::LowPriority => "low",
        }
    }
}

/// One page of a note folder.
pub struct NotesPage {
    pub folder: NoteFolder,
    pub page: u32,
}

impl Page for NotesPage {
    type Output = Vec<Note>;

    fn path(&self) -> String {
        format!("/msg/pms/{}/", self.page)
    }

    fn cache_key(&self) -> String {
        format!("notes:{}:{}", self.folder.as_str(), self.page)
    }

    fn extra_cookie(&self) -> Option<String> {
        Some(format!("folder={}", self.folder.as_str()))
    }

    fn login_required(&self) -> bool {
        true
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => {
                let outbound = self.folder == NoteFolder::Outbox;
                Ok(Some(
                    doc.select(&ROW)
                        .map(|row| note_from_row(row, !outbound))
                        .collect(),
                ))
            }
            _ => Ok(None),
        }
    }
}

fn note_from_row(row: ElementRef<'_>, is_inbound: bool) -> Note {
    let (note_id, subject, link) = row
        .select(&NOTE_LINK)
        .next()
        .map(|a| {
            let link = attr_of(a, "href").unwrap_or_default();
            let id = link
                .trim_matches('/')
                .rsplit('/')
                .next()
                .and_then(|id| id.parse().ok())
                .unwrap_or(0);
            (id, text_of(a), link)
        })
        .unwrap_or_default();
    let (name, profile) = row
        .select(&USER_LINK)
        .next()
        .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
        .unwrap_or_default();
    let posted = row
        .select(&DATE)
        .next()
        .and_then(|span| attr_of(span, "title"))
        .unwrap_or_default();

    Note {
        note_id,
        subject,
        is_inbound,
        is_read: !row
            .value()
            .attr("class")
            .is_some_and(|c| c.split_whitespace().any(|cl| cl == "unread")),
        profile_name: handle_from_href(&profile),
        name,
        profile,
        posted_at: parse_posted_at(&posted),
        posted,
        link,
    }
}

/// A single opened note.
pub struct NotePage {
    pub note_id: u64,
}

impl Page for NotePage {
    type Output = NoteThread;

    fn path(&self) -> String {
        format!("/viewmessage/{}/", self.note_id)
    }

    fn cache_key(&self) -> String {
        format!("note:{}", self.note_id)
    }

    fn login_required(&self) -> bool {
        true
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(doc.select(&VIEW).next().map(|view| self.thread_from(view))),
            _ => Ok(None),
        }
    }
}

impl NotePage {
    fn thread_from(&self, view: ElementRef<'_>) -> NoteThread {
        let (name, profile) = view
            .select(&USER_LINK)
            .next()
            .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
            .unwrap_or_default();
        let posted = view
            .select(&DATE)
            .next()
            .and_then(|span| attr_of(span, "title"))
            .unwrap_or_default();
        let body = view.select(&TEXT).next().map(text_of).unwrap_or_default();
        let (description, preceding_notes) = split_quoted_chain(&body);

        NoteThread {
            note_id: self.note_id,
            subject: view
                .select(&SUBJECT)
                .next()
                .map(text_of)
                .unwrap_or_default(),
            is_inbound: view
                .value()
                .attr("class")
                .is_some_and(|c| c.split_whitespace().any(|cl| cl == "inbound")),
            profile_name: handle_from_href(&profile),
            name,
            profile,
            posted_at: parse_posted_at(&posted),
            posted,
            description,
            preceding_notes,
        }
    }
}

/// Split a note body into its own text and the quoted ancestors below it.
///
/// Ancestors keep the order they render in: nearest first. A segment without
/// a recognizable `X wrote:` header is folded into the previous ancestor's
/// text unchanged rather than dropped.
fn split_quoted_chain(body: &str) -> (String, Vec<PrecedingNote>) {
    let mut segments = DASH_RULE.split(body);
    let description = segments.next().unwrap_or_default().trim().to_string();

    let mut ancestors: Vec<PrecedingNote> = Vec::new();
    for segment in segments {
        if let Some(caps) = WROTE.captures(segment) {
            let name = caps[1].to_string();
            let profile_name = name.replace('_', "").to_lowercase();
            ancestors.push(PrecedingNote {
                profile: format!("/user/{profile_name}/"),
                profile_name,
                name,
                text: caps[2].trim().to_string(),
            });
        } else if let Some(last) = ancestors.last_mut() {
            last.text.push_str("\n-----\n");
            last.text.push_str(segment.trim());
        }
    }
    (description, ancestors)
}
