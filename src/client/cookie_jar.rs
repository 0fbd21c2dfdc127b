// ABOUTME: In-memory cookie store for the backend origin, backed by reqwest's cookie jar
// ABOUTME: Holds the session cookie and exposes the decoded XSRF-TOKEN value
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::{Arc, PoisonError, RwLock};

use booking_core::constants::security::XSRF_COOKIE;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use url::Url;

/// Cookie store shared by every request of one client
///
/// `Set-Cookie` parsing, expiry and scoping are left to [`Jar`]; lookups by
/// name read the cookies the jar would send to the backend origin. Nothing
/// is persisted.
#[derive(Debug)]
pub struct SessionCookieJar {
    origin: Url,
    jar: RwLock<Arc<Jar>>,
}

impl SessionCookieJar {
    /// Empty jar for the backend at `origin`
    #[must_use]
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            jar: RwLock::new(Arc::new(Jar::default())),
        }
    }

    /// Raw value of a cookie
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.pairs()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Current anti-forgery token, percent-decoded
    ///
    /// The server percent-encodes the cookie value; the header must carry
    /// the decoded form.
    #[must_use]
    pub fn xsrf_token(&self) -> Option<String> {
        let raw = self.get(XSRF_COOKIE)?;
        let decoded = urlencoding::decode(&raw).map_or(raw.clone(), |value| value.into_owned());
        Some(decoded)
    }

    /// Store a cookie for the whole origin
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        let cookie = format!("{}={}; Path=/", name.into(), value.into());
        self.current().add_cookie_str(&cookie, &self.origin);
    }

    /// Drop every cookie
    pub fn clear(&self) {
        *self.jar.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(Jar::default());
    }

    /// Number of cookies sent to the origin
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs().len()
    }

    /// Whether no cookie would be sent to the origin
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current(&self) -> Arc<Jar> {
        Arc::clone(&self.jar.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let Some(header) = self.current().cookies(&self.origin) else {
            return Vec::new();
        };
        header
            .to_str()
            .unwrap_or_default()
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect()
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.current().set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.current().cookies(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://127.0.0.1:8000/").unwrap()
    }

    fn set(jar: &SessionCookieJar, headers: &[&str]) {
        let values: Vec<HeaderValue> = headers
            .iter()
            .map(|header| HeaderValue::from_str(header).unwrap())
            .collect();
        let from = origin().join("sanctum/csrf-cookie").unwrap();
        jar.set_cookies(&mut values.iter(), &from);
    }

    #[test]
    fn test_xsrf_token_is_decoded() {
        let jar = SessionCookieJar::new(origin());
        set(
            &jar,
            &["XSRF-TOKEN=abc%3D%3D; expires=Fri, 01 Jan 2100 00:00:00 GMT; Max-Age=7200; \
               path=/; samesite=lax"],
        );
        assert_eq!(jar.get("XSRF-TOKEN").as_deref(), Some("abc%3D%3D"));
        assert_eq!(jar.xsrf_token().as_deref(), Some("abc=="));
    }

    #[test]
    fn test_expired_cookies_are_dropped() {
        let jar = SessionCookieJar::new(origin());
        set(&jar, &["XSRF-TOKEN=one; Path=/", "session=s1; Path=/; HttpOnly"]);
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("session").as_deref(), Some("s1"));

        set(&jar, &["session=; Path=/; Max-Age=0"]);
        set(&jar, &["XSRF-TOKEN=gone; Path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT"]);
        assert!(jar.is_empty());
        assert!(jar.cookies(&origin()).is_none());
    }

    #[test]
    fn test_insert_replaces_and_clear_empties() {
        let jar = SessionCookieJar::new(origin());
        set(&jar, &["XSRF-TOKEN=first; Path=/"]);
        jar.insert(XSRF_COOKIE, "stale");
        assert_eq!(jar.xsrf_token().as_deref(), Some("stale"));
        assert_eq!(jar.len(), 1);

        jar.clear();
        assert!(jar.is_empty());
        assert_eq!(jar.xsrf_token(), None);
    }
}
