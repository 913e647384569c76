//! Typed records produced by the parsers.
//!
//! Every record is derived fresh from one fetched page, is immutable after
//! construction, and lives in the cache as JSON until its TTL expires. Fields
//! that the upstream page may legitimately omit are `Option`; fields that are
//! present but may be blank (deleted listing rows, featured/avatar
//! pseudo-submissions) are plain `String`s that can be empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user reference as it appears in links: display name plus profile URL
/// path and handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub name: String,
    pub profile: String,
    pub profile_name: String,
}

/// A submission, as a listing row or a full detail record.
///
/// `id` is the empty string for rows whose detail page has been deleted but
/// whose listing entry survives. Detail-only fields are `None` on listing
/// rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub link: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub rating: Option<String>,
    pub category: Option<String>,
    pub theme: Option<String>,
    pub species: Option<String>,
    pub gender: Option<String>,
    pub favorites: Option<u32>,
    pub comments: Option<u32>,
    pub views: Option<u32>,
    pub resolution: Option<String>,
    pub description: Option<String>,
    pub posted: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    /// Direct link to the original upload.
    pub download: Option<String>,
    /// In-browser full view; equals `download` for images, a rewritten link
    /// for stories/music/poetry, absent for flash.
    pub full: Option<String>,
    pub keywords: Vec<String>,
    /// Present only on authenticated detail reads: whether the viewer has
    /// faved this submission, and the one-time key for toggling.
    pub fav_status: Option<bool>,
    pub fav_key: Option<String>,
}

/// One comment in a reconstructed thread.
///
/// `reply_level` is the nesting depth (0 = top level); `reply_to` is the id
/// of the parent comment. It is empty for top-level comments and for replies
/// whose parent is hidden or deleted, since hidden rows carry no id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub avatar: String,
    pub text: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub reply_to: String,
    pub reply_level: u32,
    pub is_deleted: bool,
}

/// Watcher/watching summary: a total plus a bounded recent sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSummary {
    pub count: u32,
    pub recent: Vec<UserRef>,
}

/// A user profile page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub avatar: String,
    pub artist_type: String,
    pub registered_since: String,
    pub registered_at: Option<DateTime<Utc>>,
    pub current_mood: String,
    /// Author-authored profile HTML, passed through untouched.
    pub profile_html: String,
    /// Pseudo-submission for the featured piece; its title may be blank.
    pub featured_submission: Option<Submission>,
    /// Pseudo-submission for the profile id / avatar artwork.
    pub profile_id: Option<Submission>,
    /// Free-text info block, label-scanned (not parsed as markup).
    pub artist_information: BTreeMap<String, String>,
    /// Free-text contact block, label-scanned likewise.
    pub contact_information: BTreeMap<String, String>,
    pub watchers: WatchSummary,
    pub watching: WatchSummary,
}

/// A journal list row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
}

/// A full journal page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub id: String,
    pub title: String,
    pub journal_header: Option<String>,
    pub journal_body: String,
    pub journal_footer: Option<String>,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub avatar: String,
    pub link: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
}

/// A shout left on a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shout {
    pub id: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub avatar: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub text: String,
}

/// Front-page section listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub artwork: Vec<Submission>,
    pub writing: Vec<Submission>,
    pub music: Vec<Submission>,
    pub crafts: Vec<Submission>,
}

/// Site-wide status scraped opportunistically from page footers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStatus {
    pub online_total: u32,
    pub online_guests: u32,
    pub online_registered: u32,
    pub online_other: u32,
    pub server_time: String,
}

/// Per-category unread counts on the notifications page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCounts {
    pub watches: u32,
    pub submission_comments: u32,
    pub journal_comments: u32,
    pub shouts: u32,
    pub favorites: u32,
    pub journals: u32,
}

/// A new-watcher notification.
///
/// For all notification types: when the origin record has been deleted but is
/// still counted, `deleted` is true, every identifying field is the empty
/// string, and `message` carries a fixed human-readable explanation. Deleted
/// placeholders appear only when the caller opts in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchNotification {
    pub watch_id: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub avatar: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub message: String,
}

/// A comment notification, for either a submission or a journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentNotification {
    pub comment_id: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    /// Submission or journal id, depending on the list this appears in.
    pub target_id: String,
    pub title: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub message: String,
}

/// A shout notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoutNotification {
    pub shout_id: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub message: String,
}

/// A favorite notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoriteNotification {
    pub fav_id: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub submission_id: String,
    pub title: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub message: String,
}

/// A journal notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalNotification {
    pub journal_id: String,
    pub title: String,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub message: String,
}

/// Everything on the notifications page for one account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationBundle {
    pub current_user: UserRef,
    pub counts: NotificationCounts,
    pub watches: Vec<WatchNotification>,
    pub submission_comments: Vec<CommentNotification>,
    pub journal_comments: Vec<CommentNotification>,
    pub shouts: Vec<ShoutNotification>,
    pub favorites: Vec<FavoriteNotification>,
    pub journals: Vec<JournalNotification>,
}

/// A note (private message) folder row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: u64,
    pub subject: String,
    pub is_inbound: bool,
    pub is_read: bool,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub link: String,
}

/// A quoted ancestor inside a note body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedingNote {
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub text: String,
}

/// A single opened note, with its quoted ancestor chain split out of the
/// body. `preceding_notes` is in rendered order: the most recent ancestor
/// first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteThread {
    pub note_id: u64,
    pub subject: String,
    pub is_inbound: bool,
    pub name: String,
    pub profile: String,
    pub profile_name: String,
    pub posted: String,
    pub posted_at: Option<DateTime<Utc>>,
    /// The note's own text with the quoted region removed.
    pub description: String,
    pub preceding_notes: Vec<PrecedingNote>,
}

/// New-submission inbox for a logged-in account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSubmissions {
    pub current_user: UserRef,
    pub new_submissions: Vec<Submission>,
}
