//! http-only cookies carrying the access and refresh tokens.
//!
//! Browser clients authenticate with these cookies; API clients may use the
//! tokens from the JSON body instead. Both are accepted everywhere.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie holding the short-lived access token.
pub const ACCESS_COOKIE: &str = "access_token";

/// Cookie holding the opaque refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Add both token cookies to `jar`.
pub fn set_auth_cookies(jar: CookieJar, access: &str, refresh: &str, secure: bool) -> CookieJar {
    jar.add(token_cookie(ACCESS_COOKIE, access.to_string(), secure))
        .add(token_cookie(REFRESH_COOKIE, refresh.to_string(), secure))
}

/// Expire both token cookies, whether or not the request carried them.
pub fn clear_auth_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(expired_cookie(ACCESS_COOKIE, secure))
        .add(expired_cookie(REFRESH_COOKIE, secure))
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = token_cookie(name, String::new(), secure);
    cookie.make_removal();
    cookie
}
