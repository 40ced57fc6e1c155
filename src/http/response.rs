use crate::http::{error::HttpError, qs};
use ::http::HeaderMap;
use std::borrow::Cow;
use std::fmt;

/// Represents an HTTP response with status, headers, and raw body bytes
///
/// Contains all the information returned by an HTTP server. The body is kept
/// as bytes so binary responses survive untouched; use [`HttpResponse::decode`]
/// to turn it into a [`Payload`] according to the declared content type.
///
/// # Examples
///
/// ```
/// use fetchit::http::{HttpResponse, Payload};
/// use http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("content-type", "application/json".parse().unwrap());
///
/// let response = HttpResponse {
///     status: 200,
///     headers,
///     body: br#"{"message": "success"}"#.to_vec(),
/// };
///
/// assert!(response.is_success());
/// assert_eq!(
///     response.decode().unwrap(),
///     Payload::Json(serde_json::json!({"message": "success"}))
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Returns true if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Returns the Content-Type header value, if present
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
    }

    /// Parse the response body as JSON into a concrete type
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HttpError::Parse(format!("Failed to parse JSON response: {e}")))
    }

    /// Get the response body as text, replacing invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body according to the declared content type
    pub fn decode(&self) -> Result<Payload, HttpError> {
        parse(self)
    }
}

/// Decoding strategy chosen from a response `Content-Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Json,
    Text,
    Form,
    Blob,
}

impl ContentCategory {
    /// Pick the decoder for a content type
    ///
    /// Checks are case-insensitive substring matches applied in order: `json`,
    /// `text`, `form`, `video`. Anything else, or a missing header, decodes as
    /// text.
    ///
    /// ```
    /// use fetchit::http::ContentCategory;
    ///
    /// let category = ContentCategory::from_content_type(Some("application/json"));
    /// assert_eq!(category, ContentCategory::Json);
    /// let category = ContentCategory::from_content_type(Some("video/mp4"));
    /// assert_eq!(category, ContentCategory::Blob);
    /// assert_eq!(ContentCategory::from_content_type(None), ContentCategory::Text);
    /// ```
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return ContentCategory::Text;
        };
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains("json") {
            ContentCategory::Json
        } else if lowered.contains("text") {
            ContentCategory::Text
        } else if lowered.contains("form") {
            ContentCategory::Form
        } else if lowered.contains("video") {
            ContentCategory::Blob
        } else {
            ContentCategory::Text
        }
    }
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Form(FormData),
    Blob(Blob),
}

impl Payload {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) => write!(f, "{value}"),
            Payload::Text(text) => write!(f, "{text}"),
            Payload::Form(form) => write!(f, "{form}"),
            Payload::Blob(blob) => write!(
                f,
                "<{} bytes of {}>",
                blob.data.len(),
                blob.content_type.as_deref().unwrap_or("unknown type")
            ),
        }
    }
}

/// Raw bytes together with their declared MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// A single value in a form body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

/// Ordered form fields, as sent by the server
///
/// Names may repeat; [`FormData::get`] returns the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.entries
            .iter()
            .filter(move |(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| match value {
                FormValue::Text(text) => format!("{name}={text}"),
                FormValue::File { filename, data, .. } => {
                    format!("{name}=<file {filename}, {} bytes>", data.len())
                }
            })
            .collect();
        write!(f, "{}", rendered.join("&"))
    }
}

/// Decode a response body according to its `Content-Type` header
pub fn parse(res: &HttpResponse) -> Result<Payload, HttpError> {
    let content_type = res.content_type();
    match ContentCategory::from_content_type(content_type) {
        ContentCategory::Json => res.json().map(Payload::Json),
        ContentCategory::Text => Ok(Payload::Text(res.text().into_owned())),
        ContentCategory::Form => {
            parse_form(content_type.unwrap_or_default(), &res.body).map(Payload::Form)
        }
        ContentCategory::Blob => Ok(Payload::Blob(Blob {
            content_type: content_type.map(str::to_string),
            data: res.body.clone(),
        })),
    }
}

/// Decode the body and let the status decide between success and rejection
///
/// A non-2xx response is returned as [`HttpError::Rejected`] carrying the
/// decoded body. A body that fails to decode is reported as a parse error
/// regardless of status.
pub fn handle_response(res: &HttpResponse) -> Result<Payload, HttpError> {
    let payload = parse(res)?;
    if res.is_success() {
        return Ok(payload);
    }
    tracing::warn!(status = res.status, "request rejected by server");
    Err(HttpError::Rejected {
        status: res.status,
        payload,
    })
}

fn parse_form(content_type: &str, body: &[u8]) -> Result<FormData, HttpError> {
    if content_type.to_ascii_lowercase().contains("multipart") {
        let boundary = header_param(content_type, "boundary")
            .ok_or_else(|| HttpError::Parse("multipart response without boundary".to_string()))?;
        return parse_multipart(&boundary, body);
    }
    let text = String::from_utf8_lossy(body);
    let entries = qs::parse(&text)
        .into_iter()
        .map(|(name, value)| (name, FormValue::Text(value)))
        .collect();
    Ok(FormData { entries })
}

/// Extract a `key=value` parameter from a Content-Type or Content-Disposition header
fn header_param(header: &str, name: &str) -> Option<String> {
    header.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Split a multipart body into fields
///
/// The first delimiter may open the body; every later one must start a line,
/// so boundary text inside a value is left alone.
fn parse_multipart(boundary: &str, body: &[u8]) -> Result<FormData, HttpError> {
    let delimiter = format!("\r\n--{boundary}").into_bytes();
    let mut form = FormData::default();
    let mut cursor = if body.starts_with(&delimiter[2..]) {
        0
    } else {
        find(body, &delimiter, 0).ok_or_else(|| {
            HttpError::Parse("multipart boundary not found in body".to_string())
        })? + 2
    };

    loop {
        cursor += delimiter.len() - 2;
        if body[cursor..].starts_with(b"--") {
            break;
        }
        if body[cursor..].starts_with(b"\r\n") {
            cursor += 2;
        }
        let next = find(body, &delimiter, cursor)
            .ok_or_else(|| HttpError::Parse("unterminated multipart body".to_string()))?;
        form.entries.push(parse_part(&body[cursor..next])?);
        cursor = next + 2;
    }
    Ok(form)
}

fn parse_part(part: &[u8]) -> Result<(String, FormValue), HttpError> {
    let split = find(part, b"\r\n\r\n", 0)
        .ok_or_else(|| HttpError::Parse("multipart part without header block".to_string()))?;
    let head = String::from_utf8_lossy(&part[..split]);
    let data = &part[split + 4..];

    let mut disposition = None;
    let mut content_type = None;
    for line in head.lines() {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("content-disposition") {
                disposition = Some(value.trim().to_string());
            } else if key.trim().eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }
    }

    let disposition = disposition.ok_or_else(|| {
        HttpError::Parse("multipart part without Content-Disposition".to_string())
    })?;
    let name = header_param(&disposition, "name")
        .ok_or_else(|| HttpError::Parse("multipart part without a field name".to_string()))?;

    let value = match header_param(&disposition, "filename") {
        Some(filename) => FormValue::File {
            filename,
            content_type,
            data: data.to_vec(),
        },
        None => FormValue::Text(String::from_utf8_lossy(data).into_owned()),
    };
    Ok((name, value))
}
