use crate::http::{error::HttpError, qs};
use crate::KeyValuePairs;
use ::http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Request content types the client chooses between on its own
pub struct ContentType;

impl ContentType {
    pub const JSON: &'static str = "application/json;charset=UTF-8";
    pub const FORM: &'static str = "application/x-www-form-urlencoded;charset=UTF-8";
}

/// Name of the header carrying the bearer credential
pub const TOKEN_HEADER: &str = "token";

/// Per-call options for [`Client::send`](crate::http::Client::send)
///
/// Every field is optional. The default is a GET with no body, the injected
/// credential and a JSON content type.
///
/// # Examples
///
/// ```
/// use fetchit::http::{ContentType, RequestConfig};
/// use http::Method;
///
/// let config = RequestConfig::new()
///     .method(Method::POST)
///     .body(serde_json::json!({"a": 1, "b": {"c": 2}}))
///     .token("secret");
///
/// assert_eq!(config.resolve_content_type(), ContentType::FORM);
/// assert_eq!(config.serialized_body().as_deref(), Some("a=1&b[c]=2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Structured body, form-encoded for any method other than GET
    pub body: Option<serde_json::Value>,
    /// HTTP method; `None` means GET
    pub method: Option<Method>,
    /// Extra headers from the caller
    pub headers: KeyValuePairs,
    /// Bearer credential overriding the client's credential source
    pub token: Option<String>,
    /// Explicit Content-Type overriding the method-based default
    pub content_type: Option<String>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Add an extra header; later entries with the same name win
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add multiple headers from Vec
    pub fn headers_from_vec(mut self, headers: KeyValuePairs) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The method this request is sent with
    pub fn resolve_method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }

    /// Resolve the Content-Type header
    ///
    /// An explicit override wins, then POST selects form encoding, and
    /// everything else is JSON.
    pub fn resolve_content_type(&self) -> &str {
        if let Some(ref content_type) = self.content_type {
            return content_type;
        }
        if self.method.as_ref() == Some(&Method::POST) {
            return ContentType::FORM;
        }
        ContentType::JSON
    }

    /// The wire body, present for every method except GET
    ///
    /// A missing body on a non-GET method is sent as an empty string.
    pub fn serialized_body(&self) -> Option<String> {
        if self.resolve_method() == Method::GET {
            return None;
        }
        Some(self.body.as_ref().map(qs::stringify).unwrap_or_default())
    }

    /// Build the header set for this call
    ///
    /// Caller headers go in first, then `token` (from this config, else
    /// `fallback_token`) and `Content-Type` replace any caller entry of the
    /// same name. `token` is left out when neither source has one.
    pub fn resolve_headers(&self, fallback_token: Option<String>) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.headers {
            headers.insert(parse_header_name(key)?, parse_header_value(key, value)?);
        }

        if let Some(token) = self.token.clone().or(fallback_token) {
            headers.insert(TOKEN_HEADER, parse_header_value(TOKEN_HEADER, &token)?);
        }
        let content_type = self.resolve_content_type();
        headers.insert(
            ::http::header::CONTENT_TYPE,
            parse_header_value("Content-Type", content_type)?,
        );
        Ok(headers)
    }
}

fn parse_header_name(key: &str) -> Result<HeaderName, HttpError> {
    key.parse::<HeaderName>()
        .map_err(|_| HttpError::InvalidHeader(format!("invalid header name '{key}'")))
}

fn parse_header_value(key: &str, value: &str) -> Result<HeaderValue, HttpError> {
    value
        .parse::<HeaderValue>()
        .map_err(|_| HttpError::InvalidHeader(format!("invalid value for header '{key}'")))
}

/// Represents an HTTP request with URL, method, body, and headers
///
/// The fully resolved request handed to an [`HttpBackend`](crate::http::HttpBackend).
/// Produced by [`Client::prepare`](crate::http::Client::prepare), or built by
/// hand for raw calls through [`Client::execute`](crate::http::Client::execute).
///
/// # Examples
///
/// ```
/// use fetchit::http::HttpRequest;
/// use http::{HeaderMap, Method};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("token", "secret".parse().unwrap());
/// let request = HttpRequest::new(
///     "https://api.example.com/items",
///     Method::GET,
///     None,
///     headers
/// );
/// assert!(request.body.is_none());
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct HttpRequest {
    /// Target URL for the request
    pub url: String,
    /// HTTP method to use
    pub method: Method,
    /// Optional request body
    pub body: Option<String>,
    /// HTTP headers to send
    pub headers: HeaderMap,
}

impl HttpRequest {
    /// Constructs a new HttpRequest
    pub fn new(url: &str, method: Method, body: Option<String>, headers: HeaderMap) -> Self {
        Self {
            url: url.to_string(),
            method,
            body,
            headers,
        }
    }
}
