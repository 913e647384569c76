//! Shared extraction for submission listing rows.
//!
//! Gallery pages, the front page, search results and the new-submissions
//! inbox all render submissions as `<figure>` rows with the same anatomy, so
//! one routine serves them all.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::doc::{attr_of, handle_from_href, text_of};
use crate::models::Submission;

static FIGURE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("figure").expect("Invalid selector"));
static THUMB: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Invalid selector"));
static VIEW_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"figcaption a[href^="/view/"]"#).expect("Invalid selector"));
static USER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"figcaption a[href^="/user/"]"#).expect("Invalid selector"));

/// Map a figure's rating class (`r-general`, `r-mature`, `r-adult`) to its
/// display name.
fn rating_from_classes(figure: ElementRef<'_>) -> Option<String> {
    let classes = figure.value().attr("class")?;
    for class in classes.split_whitespace() {
        let rating = match class {
            "r-general" => "General",
            "r-mature" => "Mature",
            "r-adult" => "Adult",
            _ => continue,
        };
        return Some(rating.to_string());
    }
    None
}

/// Extract one listing row.
///
/// A row whose detail page has been deleted keeps its place in the listing
/// but loses the `sid-` anchor; such rows come back with an empty `id`.
#[must_use]
pub fn submission_from_figure(figure: ElementRef<'_>) -> Submission {
    let id = attr_of(figure, "id")
        .and_then(|id| id.strip_prefix("sid-").map(ToString::to_string))
        .unwrap_or_default();

    let thumbnail = figure
        .select(&THUMB)
        .next()
        .and_then(|img| attr_of(img, "src"))
        .unwrap_or_default();

    let (title, link) = figure
        .select(&VIEW_LINK)
        .next()
        .map(|a| {
            let title = attr_of(a, "title").unwrap_or_else(|| text_of(a));
            (title, attr_of(a, "href").unwrap_or_default())
        })
        .unwrap_or_default();

    let (name, profile) = figure
        .select(&USER_LINK)
        .next()
        .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
        .unwrap_or_default();

    Submission {
        id,
        title,
        thumbnail,
        link,
        profile_name: handle_from_href(&profile),
        name,
        profile,
        rating: rating_from_classes(figure),
        ..Submission::default()
    }
}

/// All listing rows under the element matched by `scope`, in page order.
#[must_use]
pub fn submissions_in(doc: &Html, scope: &Selector) -> Vec<Submission> {
    doc.select(scope)
        .next()
        .map(|section| {
            section
                .select(&FIGURE)
                .map(submission_from_figure)
                .collect()
        })
        .unwrap_or_default()
}

/// All listing rows in the whole document.
#[must_use]
pub fn all_submissions(doc: &Html) -> Vec<Submission> {
    doc.select(&FIGURE).map(submission_from_figure).collect()
}
