//! Session cookie helpers

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};

use crate::{config::SecurityConfig, error::AppError};

/// Build the `HttpOnly` session cookie carrying `token`.
///
/// No `Max-Age`: the cookie lives for the browser session, token expiry is
/// enforced by the verifier.
pub fn session_cookie(security: &SecurityConfig, token: &str) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        security.cookie_name, token
    );
    if security.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
}

/// Build a cookie that clears the session cookie
pub fn clear_session_cookie(security: &SecurityConfig) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        security.cookie_name
    );
    if security.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
}

/// Read the session token from the named cookie, falling back to a bearer token
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    extract_cookie(headers, cookie_name).or_else(|| extract_bearer_token(headers))
}

fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    // 可能存在多个 Cookie 头
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            let val = val.trim();
            if key.trim() == cookie_name && !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn security(secure: bool) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
            token_ttl_secs: 900,
            cookie_name: "token".to_string(),
            cookie_secure: secure,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie(&security(true), "abc.def.ghi").unwrap();
        let cookie = cookie.to_str().unwrap();

        assert!(cookie.starts_with("token=abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(!cookie.contains("Max-Age"));

        let insecure = session_cookie(&security(false), "abc").unwrap();
        assert!(!insecure.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&security(true)).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; token=abc.def; other=1".parse().unwrap());

        assert_eq!(extract_session_token(&headers, "token"), Some("abc.def".to_string()));
        assert_eq!(extract_session_token(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_token_ignores_empty_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "token=".parse().unwrap());

        assert_eq!(extract_session_token(&headers, "token"), None);
    }

    #[test]
    fn test_extract_token_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer test_token_123".parse().unwrap());

        assert_eq!(
            extract_session_token(&headers, "token"),
            Some("test_token_123".to_string())
        );

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "InvalidFormat".parse().unwrap());
        assert_eq!(extract_session_token(&headers, "token"), None);
    }
}
