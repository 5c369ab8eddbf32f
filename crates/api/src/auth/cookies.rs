//! Session cookies.
//!
//! The access and refresh tokens travel as two `HttpOnly`, `SameSite=Lax`
//! cookies scoped to `/`. The access cookie expires with the token; the
//! refresh cookie outlives it so the session middleware can renew the pair.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use weighbridge_supabase::Session;

pub const ACCESS_COOKIE: &str = "wb-access-token";
pub const REFRESH_COOKIE: &str = "wb-refresh-token";

/// Lifetime of the refresh cookie.
const REFRESH_COOKIE_MAX_AGE: Duration = Duration::days(30);

fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Cookies carrying a freshly issued session.
pub fn session_cookies(session: &Session, secure: bool) -> [Cookie<'static>; 2] {
    [
        session_cookie(
            ACCESS_COOKIE,
            session.access_token.clone(),
            Duration::seconds(session.expires_in),
            secure,
        ),
        session_cookie(
            REFRESH_COOKIE,
            session.refresh_token.clone(),
            REFRESH_COOKIE_MAX_AGE,
            secure,
        ),
    ]
}

/// Cookies that remove both session cookies from the browser.
pub fn removal_cookies(secure: bool) -> [Cookie<'static>; 2] {
    [ACCESS_COOKIE, REFRESH_COOKIE].map(|name| {
        let mut cookie = session_cookie(name, String::new(), Duration::ZERO, secure);
        cookie.make_removal();
        cookie
    })
}

/// Read a cookie value from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// Append one `Set-Cookie` header per cookie.
pub fn append_cookies<const N: usize>(headers: &mut HeaderMap, cookies: [Cookie<'static>; N]) {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(cookie = cookie.name(), error = %e, "Unencodable cookie"),
        }
    }
}
