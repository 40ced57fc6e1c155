use crate::http::response::Payload;
use thiserror::Error;

/// Custom error types for HTTP operations
///
/// Represents the failure modes of a single request, from an unreachable host
/// to a server that answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// Network-related errors (connection failed, DNS failure, etc.)
    #[error("Network error: {0}")]
    Network(String),
    /// Body decoding errors (malformed JSON, unreadable form data, etc.)
    #[error("Parse error: {0}")]
    Parse(String),
    /// Method string that is not a valid HTTP token
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    /// Empty or otherwise unusable target address
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Header name or value that cannot be sent on the wire
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// The server answered outside the 2xx range
    ///
    /// `payload` is the decoded response body, exactly what a successful
    /// response would have produced. Callers inspect it to tell error kinds apart.
    #[error("Request rejected with status {status}: {payload}")]
    Rejected { status: u16, payload: Payload },
}

impl HttpError {
    /// Returns the decoded body of a rejected response
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            HttpError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Consumes the error, yielding the decoded body of a rejected response
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            HttpError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::Network("connection refused".to_string()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            HttpError::InvalidUrl("".to_string()).to_string(),
            "Invalid URL: "
        );
        let rejected = HttpError::Rejected {
            status: 404,
            payload: Payload::Text("not found".to_string()),
        };
        assert_eq!(
            rejected.to_string(),
            "Request rejected with status 404: not found"
        );
    }

    #[test]
    fn test_rejected_payload_accessors() {
        let payload = Payload::Json(serde_json::json!({"message": "not found"}));
        let err = HttpError::Rejected {
            status: 404,
            payload: payload.clone(),
        };
        assert_eq!(err.payload(), Some(&payload));
        assert_eq!(err.into_payload(), Some(payload));

        let network = HttpError::Network("down".to_string());
        assert!(network.payload().is_none());
        assert!(network.into_payload().is_none());
    }
}
