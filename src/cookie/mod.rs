//! Cookie parsing and serialization.
//!
//! Parses `Set-Cookie` header values into [`Cookie`] entries and serializes
//! jar contents back into outgoing `cookie` headers. Only the name/value pair
//! is ever re-sent; directives like `Max-Age` or `Path` are jar-local.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// A single cookie observed on a `Set-Cookie` header.
///
/// The value field is intentionally redacted in Debug output to prevent
/// accidental logging of sensitive session material.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value (sensitive — never log).
    value: String,
    /// Absolute expiry, derived from `Max-Age` (preferred) or `Expires`.
    /// `None` means session-scoped: the cookie never expires by this
    /// crate's own logic.
    pub expires_at: Option<SystemTime>,
    /// Remaining attributes in header order, names lower-cased.
    pub attributes: Vec<(String, String)>,
}

impl Cookie {
    /// Parses a `Set-Cookie` header value.
    ///
    /// Best-effort: malformed input never raises. The first `=` splits
    /// name from value; remaining `;`-separated segments become attributes
    /// with lower-cased, trimmed names. Attribute segments without `=`
    /// (e.g. `Secure`, `HttpOnly`) are kept with an empty value and ignored
    /// for expiry purposes.
    #[must_use]
    pub fn parse(header_value: &str) -> Self {
        Self::parse_at(header_value, SystemTime::now())
    }

    /// Parse with an injected clock so expiry math is testable.
    pub(crate) fn parse_at(header_value: &str, now: SystemTime) -> Self {
        let mut segments = header_value.split(';');
        let pair = segments.next().unwrap_or_default();
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
            None => (pair.trim().to_string(), String::new()),
        };

        let mut attributes = Vec::new();
        for segment in segments {
            let (attr_name, attr_value) = match segment.split_once('=') {
                Some((attr_name, attr_value)) => {
                    (attr_name.trim().to_ascii_lowercase(), attr_value.trim().to_string())
                }
                None => (segment.trim().to_ascii_lowercase(), String::new()),
            };
            if attr_name.is_empty() {
                continue;
            }
            attributes.push((attr_name, attr_value));
        }

        let expires_at = expiry_from_attributes(&attributes, now);

        Self {
            name,
            value,
            expires_at,
            attributes,
        }
    }

    /// Creates a cookie directly (primarily for tests and jar internals).
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: None,
            attributes: Vec::new(),
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive — avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns an attribute value by its lower-cased name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        attribute_value(&self.attributes, name)
    }

    /// Serializes the cookie for an outgoing `cookie` header: `name=value`.
    ///
    /// Attributes are never echoed back to the server.
    #[must_use]
    pub fn header_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Whether the cookie is expired at `now`. Session cookies never are.
    #[must_use]
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Derives the absolute expiry from parsed attributes.
///
/// `max-age` (numeric seconds, relative to `now`) takes precedence over
/// `expires` (an RFC 7231 HTTP-date). Unparseable values fall through to the
/// session-cookie default rather than raising.
fn expiry_from_attributes(
    attributes: &[(String, String)],
    now: SystemTime,
) -> Option<SystemTime> {
    if let Some(raw) = attribute_value(attributes, "max-age")
        && let Ok(seconds) = raw.trim().parse::<i64>()
    {
        let delta = Duration::from_secs(seconds.unsigned_abs());
        return if seconds >= 0 {
            now.checked_add(delta)
        } else {
            now.checked_sub(delta)
        };
    }

    if let Some(raw) = attribute_value(attributes, "expires")
        && let Ok(parsed) = httpdate::parse_http_date(raw)
    {
        return Some(parsed);
    }

    None
}

fn attribute_value<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(attr_name, _)| attr_name == name)
        .map(|(_, value)| value.as_str())
}

/// An ordered collection of cookies for a single origin.
///
/// Names are unique; inserting an existing name overwrites the value in
/// place, keeping the original insertion position. Serialization joins
/// `name=value` pairs in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieCollection {
    cookies: Vec<Cookie>,
}

impl CookieCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cookie, overwriting any existing cookie with the same name.
    pub fn insert(&mut self, cookie: Cookie) {
        if let Some(existing) = self
            .cookies
            .iter_mut()
            .find(|existing| existing.name == cookie.name)
        {
            *existing = cookie;
        } else {
            self.cookies.push(cookie);
        }
    }

    /// Looks up a cookie by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|cookie| cookie.name == name)
    }

    /// Number of cookies in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Whether the collection holds no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterates cookies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    /// Serializes the collection for an outgoing `cookie` header.
    ///
    /// An empty collection yields an empty string, which is itself a valid
    /// header value (clears any default).
    #[must_use]
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(Cookie::header_pair)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Drops cookies whose expiry is at or before `now`.
    #[must_use]
    pub fn retain_valid(mut self, now: SystemTime) -> Self {
        self.cookies.retain(|cookie| !cookie.is_expired_at(now));
        self
    }

    /// The earliest non-null expiry across all cookies, if any.
    #[must_use]
    pub fn earliest_expiry(&self) -> Option<SystemTime> {
        self.cookies
            .iter()
            .filter_map(|cookie| cookie.expires_at)
            .min()
    }
}

impl FromIterator<Cookie> for CookieCollection {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut collection = Self::new();
        for cookie in iter {
            collection.insert(cookie);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> SystemTime {
        SystemTime::now()
    }

    // ---- Parsing ----

    #[test]
    fn test_parse_name_value_only() {
        let cookie = Cookie::parse("sid=abc123");
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.value(), "abc123");
        assert!(cookie.expires_at.is_none(), "no attributes means session cookie");
        assert!(cookie.attributes.is_empty());
    }

    #[test]
    fn test_parse_value_containing_equals() {
        // Only the first '=' splits name from value.
        let cookie = Cookie::parse("token=a=b=c");
        assert_eq!(cookie.name, "token");
        assert_eq!(cookie.value(), "a=b=c");
    }

    #[test]
    fn test_parse_attribute_names_lowercased_and_trimmed() {
        let cookie = Cookie::parse("sid=x; Path=/; HttpOnly;  SameSite = Lax");
        assert_eq!(cookie.attribute("path"), Some("/"));
        assert_eq!(cookie.attribute("httponly"), Some(""));
        assert_eq!(cookie.attribute("samesite"), Some("Lax"));
    }

    #[test]
    fn test_parse_max_age_yields_relative_expiry() {
        let at = now();
        let cookie = Cookie::parse_at("sid=x; Max-Age=3600", at);
        let deadline = cookie.expires_at.expect("max-age must set expiry");
        assert_eq!(deadline, at + Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_expires_yields_absolute_expiry() {
        let cookie = Cookie::parse("sid=x; Expires=Wed, 21 Oct 2065 07:28:00 GMT");
        let deadline = cookie.expires_at.expect("expires must set expiry");
        let expected = httpdate::parse_http_date("Wed, 21 Oct 2065 07:28:00 GMT").unwrap();
        assert_eq!(deadline, expected);
    }

    #[test]
    fn test_parse_max_age_takes_precedence_over_expires() {
        let at = now();
        let cookie =
            Cookie::parse_at("sid=x; Expires=Wed, 21 Oct 2065 07:28:00 GMT; Max-Age=60", at);
        assert_eq!(cookie.expires_at, Some(at + Duration::from_secs(60)));
    }

    #[test]
    fn test_parse_non_numeric_max_age_falls_back_to_expires() {
        let cookie = Cookie::parse("sid=x; Max-Age=soon; Expires=Wed, 21 Oct 2065 07:28:00 GMT");
        let expected = httpdate::parse_http_date("Wed, 21 Oct 2065 07:28:00 GMT").unwrap();
        assert_eq!(cookie.expires_at, Some(expected));
    }

    #[test]
    fn test_parse_negative_max_age_is_already_expired() {
        let at = now();
        let cookie = Cookie::parse_at("sid=x; Max-Age=-1", at);
        assert!(cookie.is_expired_at(at));
    }

    #[test]
    fn test_parse_unparseable_expires_is_session_cookie() {
        let cookie = Cookie::parse("sid=x; Expires=tomorrow-ish");
        assert!(cookie.expires_at.is_none());
    }

    #[test]
    fn test_parse_malformed_input_does_not_raise() {
        let cookie = Cookie::parse("; ; =");
        assert!(cookie.name.is_empty());
        assert!(cookie.expires_at.is_none());
    }

    #[test]
    fn test_session_cookie_never_expires() {
        let cookie = Cookie::parse("sid=x");
        assert!(!cookie.is_expired_at(now() + Duration::from_secs(86400 * 365)));
    }

    // ---- Serialization ----

    #[test]
    fn test_header_pair_drops_attributes() {
        let cookie = Cookie::parse("sid=abc; Path=/; Secure; Max-Age=60");
        assert_eq!(cookie.header_pair(), "sid=abc");
    }

    #[test]
    fn test_debug_redacts_value() {
        let cookie = Cookie::parse("sid=super_secret_token");
        let rendered = format!("{cookie:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super_secret_token"));
    }

    // ---- Collection ----

    #[test]
    fn test_collection_preserves_insertion_order() {
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::new("b", "2"));
        collection.insert(Cookie::new("a", "1"));
        collection.insert(Cookie::new("c", "3"));
        assert_eq!(collection.header_value(), "b=2; a=1; c=3");
    }

    #[test]
    fn test_collection_overwrite_keeps_position() {
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::new("a", "1"));
        collection.insert(Cookie::new("b", "2"));
        collection.insert(Cookie::new("a", "9"));
        assert_eq!(collection.header_value(), "a=9; b=2");
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_empty_collection_serializes_to_empty_string() {
        assert_eq!(CookieCollection::new().header_value(), "");
    }

    #[test]
    fn test_retain_valid_drops_expired_entries() {
        let at = now();
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::parse_at("dead=1; Max-Age=0", at));
        collection.insert(Cookie::parse_at("alive=2; Max-Age=3600", at));
        collection.insert(Cookie::parse_at("session=3", at));

        let valid = collection.retain_valid(at + Duration::from_secs(1));
        assert!(valid.get("dead").is_none());
        assert!(valid.get("alive").is_some());
        assert!(valid.get("session").is_some());
    }

    #[test]
    fn test_earliest_expiry_is_minimum_over_non_null() {
        let at = now();
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::parse_at("a=1; Max-Age=3600", at));
        collection.insert(Cookie::parse_at("b=2; Max-Age=60", at));
        collection.insert(Cookie::parse_at("c=3", at));
        assert_eq!(collection.earliest_expiry(), Some(at + Duration::from_secs(60)));
    }

    #[test]
    fn test_earliest_expiry_none_for_session_only_collection() {
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::new("a", "1"));
        collection.insert(Cookie::new("b", "2"));
        assert!(collection.earliest_expiry().is_none());
    }

    #[test]
    fn test_serde_round_trip_preserves_order_and_expiry() {
        let at = now();
        let mut collection = CookieCollection::new();
        collection.insert(Cookie::parse_at("a=1; Max-Age=120", at));
        collection.insert(Cookie::parse_at("b=2", at));

        let value = serde_json::to_value(&collection).unwrap();
        let restored: CookieCollection = serde_json::from_value(value).unwrap();
        assert_eq!(restored.header_value(), "a=1; b=2");
        assert_eq!(restored.get("a").unwrap().expires_at, collection.get("a").unwrap().expires_at);
    }
}
