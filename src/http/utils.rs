use crate::http::error::HttpError;
use ::http::Method;

/// Parse a string into an HTTP method
///
/// Standard methods are matched case-insensitively. Any other valid HTTP
/// token is accepted as an extension method and upper-cased.
///
/// # Examples
///
/// ```
/// use fetchit::http::parse_method;
/// use http::Method;
///
/// assert_eq!(parse_method("GET").unwrap(), Method::GET);
/// assert_eq!(parse_method("post").unwrap(), Method::POST);
/// assert_eq!(parse_method("purge").unwrap().as_str(), "PURGE");
/// ```
pub fn parse_method(s: &str) -> Result<Method, HttpError> {
    match s.trim().to_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        "" => Err(HttpError::UnsupportedMethod(s.to_string())),
        other => Method::from_bytes(other.as_bytes())
            .map_err(|_| HttpError::UnsupportedMethod(s.to_string())),
    }
}

/// Join a relative path onto a base URL
///
/// Absolute `http://` and `https://` URLs are returned unchanged, as is any
/// path when there is no base.
///
/// ```
/// use fetchit::http::utils::join_url;
///
/// let base = Some("https://api.example.com/");
/// assert_eq!(join_url(base, "/items"), "https://api.example.com/items");
/// assert_eq!(join_url(base, "https://other.org/x"), "https://other.org/x");
/// assert_eq!(join_url(None, "/items"), "/items");
/// ```
pub fn join_url(base: Option<&str>, url: &str) -> String {
    let is_absolute = url.starts_with("http://") || url.starts_with("https://");
    match base {
        Some(base) if !is_absolute => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches('/')
        ),
        _ => url.to_string(),
    }
}
