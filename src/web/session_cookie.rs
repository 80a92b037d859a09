use axum::http::{header, HeaderMap, Uri};
use axum::response::Redirect;
use url::form_urlencoded;

use crate::constants::{LOGIN_PATH, SESSION_COOKIE};

/// Session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Post-login destination. Only local absolute paths are honoured.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n.to_string(),
        _ => "/".to_string(),
    }
}

/// Send an anonymous caller to the login page, remembering where they were going.
pub fn login_redirect(uri: &Uri) -> Redirect {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
    Redirect::to(&format!("{LOGIN_PATH}?next={encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::response::IntoResponse;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn empty_or_missing_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn next_must_be_local() {
        assert_eq!(safe_next(Some("/download_csv")), "/download_csv");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn redirect_preserves_path_and_query() {
        let uri: Uri = "/?filter_team=KC&filter_position=QB".parse().unwrap();
        let response = login_redirect(&uri).into_response();
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert_eq!(
            location,
            "/login?next=%2F%3Ffilter_team%3DKC%26filter_position%3DQB"
        );
    }
}
