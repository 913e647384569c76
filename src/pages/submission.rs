//! Submission detail pages.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::doc::{attr_of, handle_from_href, html_of, parse_posted_at, scan_label, text_of};
use crate::error::FaError;
use crate::models::Submission;
use crate::style::Style;

use super::Page;

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.submission-title h2").expect("Invalid selector"));
static ARTIST_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div.submission-artist a[href^="/user/"]"#).expect("Invalid selector")
});
static ARTIST_AVATAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.submission-artist img.avatar").expect("Invalid selector"));
static SUBMISSION_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img#submissionImg").expect("Invalid selector"));
static DOWNLOAD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.download").expect("Invalid selector"));
static FAV_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href^="/fav/"], a[href^="/unfav/"]"#).expect("Invalid selector")
});
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.popup_date").expect("Invalid selector"));
static INFO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.submission-info").expect("Invalid selector"));
static DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.submission-description").expect("Invalid selector"));
static KEYWORDS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#keywords a").expect("Invalid selector"));

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Detail page for one submission.
pub struct SubmissionPage {
    pub id: String,
}

impl Page for SubmissionPage {
    type Output = Submission;

    fn path(&self) -> String {
        format!("/view/{}/", self.id)
    }

    fn cache_key(&self) -> String {
        format!("submission:{}", self.id)
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(self.extract_classic(doc))),
            _ => Ok(None),
        }
    }
}

/// Derive the in-browser full-view link from the download link.
///
/// Images are viewed as downloaded; stories, poetry and music downloads carry
/// a `/download/` path segment that the full view drops; flash has no full
/// view at all.
fn derive_full(download: &str) -> Option<String> {
    let extension = download.rsplit('.').next().unwrap_or("").to_lowercase();
    if extension == "swf" {
        return None;
    }
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Some(download.to_string());
    }
    Some(download.replacen("/download/", "/", 1))
}

fn parse_counter(value: Option<String>) -> Option<u32> {
    value.and_then(|v| v.replace(',', "").parse().ok())
}

impl SubmissionPage {
    fn extract_classic(&self, doc: &Html) -> Submission {
        let title = doc.select(&TITLE).next().map(text_of).unwrap_or_default();
        let (name, profile) = doc
            .select(&ARTIST_LINK)
            .next()
            .map(|a| (text_of(a), attr_of(a, "href").unwrap_or_default()))
            .unwrap_or_default();
        let avatar = doc
            .select(&ARTIST_AVATAR)
            .next()
            .and_then(|img| attr_of(img, "src"));
        let thumbnail = doc
            .select(&SUBMISSION_IMG)
            .next()
            .and_then(|img| attr_of(img, "src"))
            .unwrap_or_default();
        let download = doc
            .select(&DOWNLOAD)
            .next()
            .and_then(|a| attr_of(a, "href"));
        let full = download.as_deref().and_then(derive_full);
        let posted = doc
            .select(&DATE)
            .next()
            .and_then(|span| attr_of(span, "title"))
            .unwrap_or_default();
        let description = doc.select(&DESCRIPTION).next().map(html_of);
        let keywords = doc.select(&KEYWORDS).map(text_of).collect();

        // The info block is author-adjacent free text; label scanning copes
        // with both the inline and the label-on-its-own-line layout.
        let info = doc.select(&INFO).next().map(text_of).unwrap_or_default();

        // Fav controls are only rendered for logged-in viewers.
        let (fav_status, fav_key) = doc
            .select(&FAV_LINK)
            .next()
            .and_then(|a| {
                let href = attr_of(a, "href")?;
                let key = href.split("key=").nth(1).map(ToString::to_string)?;
                Some((Some(href.starts_with("/unfav/")), Some(key)))
            })
            .unwrap_or((None, None));

        Submission {
            id: self.id.clone(),
            title,
            thumbnail,
            link: self.path(),
            profile_name: handle_from_href(&profile),
            name,
            profile,
            rating: scan_label(&info, "Rating"),
            category: scan_label(&info, "Category"),
            theme: scan_label(&info, "Theme"),
            species: scan_label(&info, "Species"),
            gender: scan_label(&info, "Gender"),
            favorites: parse_counter(scan_label(&info, "Favorites")),
            comments: parse_counter(scan_label(&info, "Comments")),
            views: parse_counter(scan_label(&info, "Views")),
            resolution: scan_label(&info, "Resolution"),
            description,
            posted_at: parse_posted_at(&posted),
            posted: Some(posted).filter(|p| !p.is_empty()),
            download,
            full,
            keywords,
            fav_status,
            fav_key,
            ..Submission::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_full() {
        assert_eq!(
            derive_full("//d.furaffinity.net/art/fox/1700000000/1700000000.fox_glade.png")
                .unwrap(),
            "//d.furaffinity.net/art/fox/1700000000/1700000000.fox_glade.png"
        );
        assert_eq!(
            derive_full("//d.furaffinity.net/download/art/fox/stories/1700000000/story.txt")
                .unwrap(),
            "//d.furaffinity.net/art/fox/stories/1700000000/story.txt"
        );
        assert_eq!(
            derive_full("//d.furaffinity.net/art/fox/1700000000/1700000000.fox_game.swf"),
            None
        );
    }

    fn detail_page(extra: &str) -> String {
        format!(
            r#"<html><head><title>Sunset Glade -- Fox Painter</title>
            <link rel="stylesheet" href="/themes/classic/css/common.css"/></head><body>
            <div class="submission-title"><h2>Sunset Glade</h2></div>
            <div class="submission-artist">
              <a href="/user/foxpainter/">Fox Painter</a>
              <img class="avatar" src="//a.furaffinity.net/foxpainter.gif"/>
            </div>
            <img id="submissionImg" src="//t.furaffinity.net/12345@400-1700000000.jpg"/>
            <span class="popup_date" title="Aug 29th, 2026 01:00 PM">a moment ago</span>
            {extra}
            <div class="submission-info">
Category: Artwork (Digital)
Theme: General Furry Art
Species: Fox
Gender: Male
Favorites: 1,103
Comments: 12
Views: 14,400
Resolution: 1280x720
Rating: General
            </div>
            <div class="submission-description">A quiet clearing.</div>
            <div id="keywords"><a href="/search/">fox</a><a href="/search/">forest</a></div>
            </body></html>"#
        )
    }

    #[test]
    fn test_extract_image_detail() {
        let html = detail_page(
            r#"<div class="actions">
              <a class="download" href="//d.furaffinity.net/art/foxpainter/1700000000/glade.png">Download</a>
            </div>"#,
        );
        let doc = Html::parse_document(&html);
        let page = SubmissionPage {
            id: "12345".to_string(),
        };

        let s = page.extract(Style::Classic, &doc).unwrap().unwrap();
        assert_eq!(s.id, "12345");
        assert_eq!(s.title, "Sunset Glade");
        assert_eq!(s.name, "Fox Painter");
        assert_eq!(s.profile_name, "foxpainter");
        assert_eq!(s.category.as_deref(), Some("Artwork (Digital)"));
        assert_eq!(s.species.as_deref(), Some("Fox"));
        assert_eq!(s.favorites, Some(1_103));
        assert_eq!(s.views, Some(14_400));
        assert_eq!(s.resolution.as_deref(), Some("1280x720"));
        assert_eq!(s.rating.as_deref(), Some("General"));
        assert_eq!(s.keywords, vec!["fox", "forest"]);
        assert!(s.posted_at.is_some());

        // Image: full view equals the download link.
        assert_eq!(s.full, s.download);
        // Anonymous view: no fav controls on the page.
        assert_eq!(s.fav_status, None);
        assert_eq!(s.fav_key, None);
    }

    #[test]
    fn test_extract_flash_has_no_full_view() {
        let html = detail_page(
            r#"<div class="actions">
              <a class="download" href="//d.furaffinity.net/art/foxpainter/1700000000/game.swf">Download</a>
            </div>"#,
        );
        let doc = Html::parse_document(&html);
        let page = SubmissionPage {
            id: "12345".to_string(),
        };

        let s = page.extract(Style::Classic, &doc).unwrap().unwrap();
        assert!(s.download.as_deref().unwrap().ends_with(".swf"));
        assert_eq!(s.full, None);
    }

    #[test]
    fn test_extract_fav_metadata_when_authenticated() {
        let html = detail_page(
            r#"<div class="actions">
              <a class="download" href="//d.furaffinity.net/art/foxpainter/1700000000/glade.png">Download</a>
              <a href="/unfav/12345/?key=0a1b2c3d">-Fav</a>
            </div>"#,
        );
        let doc = Html::parse_document(&html);
        let page = SubmissionPage {
            id: "12345".to_string(),
        };

        let s = page.extract(Style::Classic, &doc).unwrap().unwrap();
        assert_eq!(s.fav_status, Some(true));
        assert_eq!(s.fav_key.as_deref(), Some("0a1b2c3d"));
    }

    #[test]
    fn test_label_on_own_line_layout() {
        let html = detail_page("").replace("Species: Fox", "Species:\nFox");
        let doc = Html::parse_document(&html);
        let page = SubmissionPage {
            id: "12345".to_string(),
        };

        let s = page.extract(Style::Classic, &doc).unwrap().unwrap();
        assert_eq!(s.species.as_deref(), Some("Fox"));
    }
}
