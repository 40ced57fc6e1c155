use thiserror::Error;

use crate::http::HttpError;

/// Central error type for the fetchit command line
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Transport, header or decoding failures from the HTTP layer
    #[error(transparent)]
    Http(HttpError),
    /// The server answered outside 2xx; the body has already been printed
    #[error("Server rejected the request with status {status}")]
    Rejected { status: u16 },
    /// Session file errors
    #[error(transparent)]
    Session(#[from] SessionError),
    /// CLI argument validation errors
    #[error(transparent)]
    Cli(#[from] CliError),
}

/// Session file errors
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Session file not found: '{0}'")]
    FileNotFound(String),
    #[error("Could not read session file '{path}': {reason}")]
    Unreadable { path: String, reason: String },
    #[error("Invalid YAML in session file: {0}")]
    InvalidYaml(String),
}

/// CLI argument parsing and validation errors
#[derive(Debug, Clone, Error)]
pub enum CliError {
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
    #[error("Invalid header format '{0}'. Headers must be in 'key:value' format")]
    InvalidHeaderFormat(String),
    #[error("Invalid body format '{0}'. Body data must be in 'key=value' format")]
    InvalidBodyFormat(String),
}

impl From<HttpError> for AppError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Rejected { status, .. } => AppError::Rejected { status },
            other => AppError::Http(other),
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Session(SessionError::InvalidYaml(err.to_string()))
    }
}

impl AppError {
    /// Provides a helpful suggestion for how to fix the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            AppError::Session(SessionError::FileNotFound(_)) => {
                Some("Create .fetchit/session.yaml or point --session at an existing file")
            }
            AppError::Session(SessionError::InvalidYaml(_)) => {
                Some("Example session file:\n  token: abc123\n  base_url: https://api.example.com")
            }
            AppError::Cli(CliError::InvalidUrl(_)) => {
                Some("Example: fetchit get https://api.example.com/items")
            }
            AppError::Cli(CliError::InvalidHeaderFormat(_)) => {
                Some("Example: X-Requested-With:XMLHttpRequest")
            }
            AppError::Cli(CliError::InvalidBodyFormat(_)) => {
                Some("Example: name=john address[city]=Paris")
            }
            AppError::Http(HttpError::Network(_)) => {
                Some("Check that the host is reachable and the URL is correct")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Payload;

    #[test]
    fn test_rejection_keeps_only_status() {
        let err: AppError = HttpError::Rejected {
            status: 404,
            payload: Payload::Text("missing".to_string()),
        }
        .into();
        assert!(matches!(err, AppError::Rejected { status: 404 }));
        assert_eq!(err.to_string(), "Server rejected the request with status 404");
    }

    #[test]
    fn test_http_error_is_transparent() {
        let err: AppError = HttpError::Network("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_cli_error_display_and_suggestion() {
        let err: AppError = CliError::InvalidBodyFormat("=x".to_string()).into();
        assert!(err.to_string().contains("key=value"));
        assert!(err.suggestion().unwrap().contains("address[city]"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_result: Result<serde_yaml::Value, serde_yaml::Error> =
            serde_yaml::from_str("key: [unclosed");
        let err: AppError = yaml_result.unwrap_err().into();
        assert!(matches!(err, AppError::Session(SessionError::InvalidYaml(_))));
        assert!(err.to_string().contains("Invalid YAML"));
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors = vec![
            AppError::Session(SessionError::FileNotFound("s.yaml".to_string())),
            AppError::Session(SessionError::Unreadable {
                path: "s.yaml".to_string(),
                reason: "denied".to_string(),
            }),
            AppError::Cli(CliError::InvalidUrl("".to_string())),
            AppError::Cli(CliError::InvalidHeaderFormat(":x".to_string())),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
            let _ = format!("{err:?}");
        }
    }
}
