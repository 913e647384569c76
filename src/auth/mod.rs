//! Login cookie validation and per-request session context.
//!
//! The upstream site identifies a session with two named sub-tokens, `a` and
//! `b`, each a UUID-shaped string. Callers can supply them either as a cookie
//! string (`a=<uuid>; b=<uuid>`, order-independent) or as a basic-auth style
//! pair where the username (`"ab"` or `"ba"`) declares the order of the two
//! colon-joined UUIDs in the password. Both forms normalize to one canonical
//! cookie string, so cache keys derived from them always agree. Any other
//! shape is a permanent [`FaError::CookieFormat`] raised before any network
//! or cache activity.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FaError;

static UUID_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("Invalid regex")
});

/// Per-request session context carried into every cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    cookie: Option<String>,
    /// Suppress mature content by fetching from the SFW host.
    pub sfw: bool,
}

impl AuthContext {
    /// An anonymous context with no login cookie.
    #[must_use]
    pub fn anonymous(sfw: bool) -> Self {
        Self { cookie: None, sfw }
    }

    /// Validate and normalize a raw cookie string.
    ///
    /// Accepts the two tokens in either order, with arbitrary spacing around
    /// the `;` separator.
    pub fn from_cookie_string(raw: &str, sfw: bool) -> Result<Self, FaError> {
        let mut token_a = None;
        let mut token_b = None;

        for part in raw.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (name, value) = part.split_once('=').ok_or(FaError::CookieFormat)?;
            match (name.trim(), value.trim()) {
                ("a", v) if UUID_SHAPE.is_match(v) => token_a = Some(v.to_lowercase()),
                ("b", v) if UUID_SHAPE.is_match(v) => token_b = Some(v.to_lowercase()),
                _ => return Err(FaError::CookieFormat),
            }
        }

        match (token_a, token_b) {
            (Some(a), Some(b)) => Ok(Self {
                cookie: Some(format!("b={b}; a={a}")),
                sfw,
            }),
            _ => Err(FaError::CookieFormat),
        }
    }

    /// Validate a basic-auth style credential pair.
    ///
    /// The username names the token order (`"ab"` or `"ba"`); the password is
    /// the two UUIDs joined by `:` in that order.
    pub fn from_credentials(username: &str, password: &str, sfw: bool) -> Result<Self, FaError> {
        let (first, second) = password.split_once(':').ok_or(FaError::CookieFormat)?;
        let (a, b) = match username {
            "ab" => (first, second),
            "ba" => (second, first),
            _ => return Err(FaError::CookieFormat),
        };
        Self::from_cookie_string(&format!("a={a}; b={b}"), sfw)
    }

    /// The normalized cookie string, absent for anonymous contexts.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Whether a login cookie is present.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.cookie.is_some()
    }

    /// Cache key prefix isolating this identity's entries.
    ///
    /// Anonymous contexts share one unprefixed namespace; every distinct
    /// cookie gets its own.
    #[must_use]
    pub fn cache_namespace(&self) -> String {
        match &self.cookie {
            Some(cookie) => format!("{cookie}:"),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "0b2d9916-7f0c-42d2-b8ed-bbc28c1d62f4";
    const B: &str = "cb8fbe67-3514-4d86-9b4d-8a2f8c59e2bf";

    #[test]
    fn test_cookie_order_independent() {
        let forward = AuthContext::from_cookie_string(&format!("a={A}; b={B}"), false).unwrap();
        let backward = AuthContext::from_cookie_string(&format!("b={B}; a={A}"), false).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward.cookie().unwrap(), format!("b={B}; a={A}"));
    }

    #[test]
    fn test_credentials_round_trip() {
        let direct = AuthContext::from_cookie_string(&format!("a={A}; b={B}"), false).unwrap();
        let ab = AuthContext::from_credentials("ab", &format!("{A}:{B}"), false).unwrap();
        let ba = AuthContext::from_credentials("ba", &format!("{B}:{A}"), false).unwrap();

        assert_eq!(direct, ab);
        assert_eq!(direct, ba);
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        assert!(matches!(
            AuthContext::from_cookie_string("a=not-a-uuid; b=also-bad", false),
            Err(FaError::CookieFormat)
        ));
        assert!(matches!(
            AuthContext::from_cookie_string(&format!("a={A}"), false),
            Err(FaError::CookieFormat)
        ));
        assert!(matches!(
            AuthContext::from_cookie_string(&format!("c={A}; b={B}"), false),
            Err(FaError::CookieFormat)
        ));
        assert!(matches!(
            AuthContext::from_credentials("xy", &format!("{A}:{B}"), false),
            Err(FaError::CookieFormat)
        ));
    }

    #[test]
    fn test_uppercase_normalized() {
        let upper = A.to_uppercase();
        let ctx = AuthContext::from_cookie_string(&format!("a={upper}; b={B}"), false).unwrap();
        assert!(ctx.cookie().unwrap().contains(A));
    }

    #[test]
    fn test_namespace_isolation() {
        let anon = AuthContext::anonymous(false);
        let authed = AuthContext::from_cookie_string(&format!("a={A}; b={B}"), false).unwrap();

        assert_eq!(anon.cache_namespace(), "");
        assert!(authed.cache_namespace().starts_with("b="));
        assert!(authed.cache_namespace().ends_with(':'));
    }
}
