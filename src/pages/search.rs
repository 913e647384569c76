//! Keyword search over submissions.
//!
//! Every parameter the upstream form accepts is validated locally before any
//! cache or network activity, so a bad value fails fast instead of caching an
//! upstream error page.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::cache::TtlClass;
use crate::error::FaError;
use crate::models::Submission;
use crate::style::Style;

use super::listing::submissions_in;
use super::Page;

static RESULTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#search-results").expect("Invalid selector"));

const ORDER_BY: &[&str] = &["relevancy", "date", "popularity"];
const ORDER_DIRECTIONS: &[&str] = &["asc", "desc"];
const RANGES: &[&str] = &[
    "1day", "3days", "7days", "30days", "90days", "1year", "3years", "5years", "all",
];
const MODES: &[&str] = &["all", "any", "extended"];
const RATINGS: &[&str] = &["general", "mature", "adult"];
const TYPES: &[&str] = &["art", "flash", "photo", "music", "story", "poetry"];
const PER_PAGE: &[u32] = &[24, 48, 72];

/// Search form parameters. `Default` matches the upstream form defaults.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub q: String,
    pub page: u32,
    pub perpage: u32,
    pub order_by: String,
    pub order_direction: String,
    pub range: String,
    pub mode: String,
    pub ratings: Vec<String>,
    pub types: Vec<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: 1,
            perpage: 72,
            order_by: "date".to_string(),
            order_direction: "desc".to_string(),
            range: "all".to_string(),
            mode: "extended".to_string(),
            ratings: vec!["general".to_string()],
            types: TYPES.iter().map(ToString::to_string).collect(),
        }
    }
}

fn check_one(
    field: &'static str,
    value: &str,
    allowed_values: &[&str],
    allowed: &'static str,
) -> Result<(), FaError> {
    if allowed_values.contains(&value) {
        Ok(())
    } else {
        Err(FaError::SearchParam {
            field,
            value: value.to_string(),
            allowed,
        })
    }
}

impl SearchParams {
    fn check(&self) -> Result<(), FaError> {
        if self.q.trim().is_empty() {
            return Err(FaError::MissingFormField { field: "q" });
        }
        if !PER_PAGE.contains(&self.perpage) {
            return Err(FaError::SearchParam {
                field: "perpage",
                value: self.perpage.to_string(),
                allowed: "24, 48, 72",
            });
        }
        check_one(
            "order_by",
            &self.order_by,
            ORDER_BY,
            "relevancy, date, popularity",
        )?;
        check_one(
            "order_direction",
            &self.order_direction,
            ORDER_DIRECTIONS,
            "asc, desc",
        )?;
        check_one(
            "range",
            &self.range,
            RANGES,
            "1day, 3days, 7days, 30days, 90days, 1year, 3years, 5years, all",
        )?;
        check_one("mode", &self.mode, MODES, "all, any, extended")?;
        for rating in &self.ratings {
            check_one("rating", rating, RATINGS, "general, mature, adult")?;
        }
        for kind in &self.types {
            check_one("type", kind, TYPES, "art, flash, photo, music, story, poetry")?;
        }
        Ok(())
    }

    fn query_string(&self) -> String {
        let mut query = format!(
            "q={}&page={}&perpage={}&order-by={}&order-direction={}&range={}&mode={}",
            urlencoding::encode(&self.q),
            self.page,
            self.perpage,
            self.order_by,
            self.order_direction,
            self.range,
            self.mode
        );
        for rating in &self.ratings {
            query.push_str(&format!("&rating-{rating}=1"));
        }
        for kind in &self.types {
            query.push_str(&format!("&type-{kind}=1"));
        }
        query
    }
}

/// One page of search results.
pub struct SearchPage {
    pub params: SearchParams,
    /// Selects the long TTL class for feed consumers.
    pub for_feed: bool,
}

impl Page for SearchPage {
    type Output = Vec<Submission>;

    fn path(&self) -> String {
        format!("/search/?{}", self.params.query_string())
    }

    fn cache_key(&self) -> String {
        format!("search:{}:feed={}", self.params.query_string(), self.for_feed)
    }

    fn ttl_class(&self) -> TtlClass {
        if self.for_feed {
            TtlClass::Long
        } else {
            TtlClass::Short
        }
    }

    fn validate(&self) -> Result<(), FaError> {
        self.params.check()
    }

    fn extract(&self, style: Style, doc: &Html) -> Result<Option<Self::Output>, FaError> {
        match style {
            Style::Classic => Ok(Some(submissions_in(doc, &RESULTS))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(q: &str) -> SearchParams {
        SearchParams {
            q: q.to_string(),
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_defaults_validate() {
        let page = SearchPage {
            params: params("red fox"),
            for_feed: false,
        };
        assert!(page.validate().is_ok());
        assert!(page.path().starts_with("/search/?q=red%20fox&page=1"));
    }

    #[test]
    fn test_missing_query() {
        let page = SearchPage {
            params: params("  "),
            for_feed: false,
        };
        assert!(matches!(
            page.validate(),
            Err(FaError::MissingFormField { field: "q" })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut bad_perpage = params("fox");
        bad_perpage.perpage = 50;
        assert!(matches!(
            SearchPage { params: bad_perpage, for_feed: false }.validate(),
            Err(FaError::SearchParam { field: "perpage", .. })
        ));

        let mut bad_order = params("fox");
        bad_order.order_by = "views".to_string();
        assert!(matches!(
            SearchPage { params: bad_order, for_feed: false }.validate(),
            Err(FaError::SearchParam { field: "order_by", .. })
        ));

        let mut bad_rating = params("fox");
        bad_rating.ratings = vec!["explicit".to_string()];
        assert!(matches!(
            SearchPage { params: bad_rating, for_feed: false }.validate(),
            Err(FaError::SearchParam { field: "rating", .. })
        ));

        let mut bad_type = params("fox");
        bad_type.types = vec!["sculpture".to_string()];
        assert!(matches!(
            SearchPage { params: bad_type, for_feed: false }.validate(),
            Err(FaError::SearchParam { field: "type", .. })
        ));
    }

    #[test]
    fn test_query_string_carries_filters() {
        let mut p = params("fox");
        p.ratings = vec!["general".to_string(), "mature".to_string()];
        p.types = vec!["art".to_string()];
        let page = SearchPage {
            params: p,
            for_feed: true,
        };

        let path = page.path();
        assert!(path.contains("&rating-general=1"));
        assert!(path.contains("&rating-mature=1"));
        assert!(path.contains("&type-art=1"));
        assert!(!path.contains("&type-music=1"));
        assert_eq!(page.ttl_class(), TtlClass::Long);

        // The feed flag scopes the entry along with the TTL class.
        let plain = SearchPage {
            params: page.params.clone(),
            for_feed: false,
        };
        assert_ne!(plain.cache_key(), page.cache_key());
    }

    #[test]
    fn test_extract_results() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/themes/classic/css/common.css"/></head><body>
            <section id="search-results">
              <figure id="sid-777" class="r-general"><figcaption>
                <p><a href="/view/777/" title="Fox Study">Fox Study</a></p>
                <p><a href="/user/foxpainter/">Fox Painter</a></p></figcaption></figure>
            </section>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let page = SearchPage {
            params: params("fox"),
            for_feed: false,
        };

        let results = page.extract(Style::Classic, &doc).unwrap().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "777");
    }
}
